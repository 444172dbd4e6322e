// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Build-on-first-use holder for service clients.

use super::ServiceError;
use std::sync::{Mutex, OnceLock};

type Factory<T> = Box<dyn Fn() -> Result<T, ServiceError> + Send + Sync>;

/// A client that is constructed the first time it is asked for.
///
/// Construction runs at most once on success; a failed attempt is retried on
/// the next call.
pub struct LazyClient<T> {
    cell: OnceLock<T>,
    init_lock: Mutex<()>,
    factory: Factory<T>,
}

impl<T> LazyClient<T> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<T, ServiceError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceLock::new(),
            init_lock: Mutex::new(()),
            factory: Box::new(factory),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get_or_init(&self) -> Result<&T, ServiceError> {
        if let Some(client) = self.cell.get() {
            return Ok(client);
        }
        let _guard = self.init_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(client) = self.cell.get() {
            return Ok(client);
        }
        let client = (self.factory)()?;
        log::debug!("Initialized service client");
        Ok(self.cell.get_or_init(|| client))
    }
}

impl<T> std::fmt::Debug for LazyClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyClient")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
