// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor-level errors and the notices they turn into.

use crate::io::media::MediaError;
use crate::render::export::ExportError;
use crate::services::ServiceError;
use thiserror::Error;

/// Remote operations the editor can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Caption,
    Hashtags,
    TextColor,
    SignIn,
    Register,
    RefreshAccount,
    LoadUsers,
    UpdateUser,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::Caption => "Failed to generate caption.",
            Operation::Hashtags => "Failed to generate hashtags.",
            Operation::TextColor => "Failed to adjust text color.",
            Operation::SignIn => "Sign in failed.",
            Operation::Register => "Registration failed.",
            Operation::RefreshAccount => "Failed to check account status.",
            Operation::LoadUsers => "Failed to load users.",
            Operation::UpdateUser => "Failed to update status.",
        }
    }
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Please upload an image first.")]
    NoImage,

    #[error("{}", .operation.failure_message())]
    Service {
        operation: Operation,
        #[source]
        source: ServiceError,
    },

    #[error("Export Failed")]
    Export(#[from] ExportError),

    #[error("Failed to load image.")]
    Media(#[from] MediaError),
}

impl EditorError {
    pub fn service(operation: Operation, source: ServiceError) -> Self {
        Self::Service { operation, source }
    }

    /// Text shown to the user. Input errors from a service carry their own
    /// message; everything else uses the fixed notice.
    pub fn notice(&self) -> String {
        match self {
            EditorError::Service {
                source: ServiceError::InvalidInput(message),
                ..
            } => message.clone(),
            EditorError::Service {
                source: ServiceError::Remote(message),
                operation: Operation::Register | Operation::SignIn,
            } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Extra detail for the notice, if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            EditorError::Export(e) => Some(e.to_string()),
            EditorError::Media(e) => Some(e.to_string()),
            _ => None,
        }
    }
}
