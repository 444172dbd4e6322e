// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background work with one in-flight slot per kind of operation.
//!
//! Each job runs on its own thread and reports back through a channel that
//! the UI drains once per frame. A kind that is already running refuses new
//! work instead of queueing it; a finished job frees only its own kind.

use std::collections::HashSet;
use std::sync::mpsc::{channel, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    LoadImage,
    Caption,
    Hashtags,
    Contrast,
    Export,
    Auth,
    Users,
}

pub struct TaskRunner<T> {
    sender: Sender<(TaskKind, T)>,
    receiver: Receiver<(TaskKind, T)>,
    in_flight: HashSet<TaskKind>,
}

impl<T: Send + 'static> Default for TaskRunner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> TaskRunner<T> {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            in_flight: HashSet::new(),
        }
    }

    pub fn is_busy(&self, kind: TaskKind) -> bool {
        self.in_flight.contains(&kind)
    }

    pub fn any_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Run `job` in the background. Returns false (and does nothing) when a
    /// job of the same kind is still running.
    pub fn spawn<F>(&mut self, kind: TaskKind, job: F) -> bool
    where
        F: FnOnce() -> T + Send + 'static,
    {
        if !self.in_flight.insert(kind) {
            log::debug!("{kind:?} already in flight");
            return false;
        }
        let sender = self.sender.clone();
        std::thread::spawn(move || {
            let _ = sender.send((kind, job()));
        });
        true
    }

    /// Collect finished jobs, freeing their kinds.
    pub fn poll(&mut self) -> Vec<(TaskKind, T)> {
        let finished: Vec<_> = self.receiver.try_iter().collect();
        for (kind, _) in &finished {
            self.in_flight.remove(kind);
        }
        finished
    }
}
