//! Error types surfaced across the bridge boundary.
//!
//! `BridgeError` is what the handler and notifier return internally.
//! `MethodError` is the flat `{code, message, details}` shape the host sees.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bridge::constants::{ErrorCode, ErrorMessage, MethodName};

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Arguments were absent, of the wrong type, or out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The host asked for a method this bridge does not know.
    #[error("Method not implemented: {0}")]
    NotImplemented(String),

    /// Registering a listener (or fetching the initial value for
    /// `emitOnStart`) failed.
    #[error("Failed to register listener: {0}")]
    ListenerRegistration(String),

    /// A stream was asked to listen while its subscription is already live.
    #[error("A listener is already registered for this stream")]
    AlreadyListening,

    /// The audio subsystem rejected a delegated call.
    #[error("{method} failed: {cause}")]
    Subsystem { method: MethodName, cause: String },
}

impl BridgeError {
    pub fn subsystem(method: MethodName, cause: impl std::fmt::Display) -> Self {
        Self::Subsystem {
            method,
            cause: format!("{cause:#}"),
        }
    }

    /// Wire error code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => ErrorCode::INVALID_ARGUMENT,
            Self::NotImplemented(_) => ErrorCode::NOT_IMPLEMENTED,
            Self::ListenerRegistration(_) | Self::AlreadyListening => {
                ErrorCode::REGISTER_VOLUME_LISTENER
            }
            Self::Subsystem { method, .. } => ErrorCode::for_method(*method),
        }
    }

    /// Human readable message paired with [`BridgeError::code`].
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => ErrorMessage::INVALID_ARGUMENT,
            Self::NotImplemented(_) => ErrorMessage::NOT_IMPLEMENTED,
            Self::ListenerRegistration(_) | Self::AlreadyListening => {
                ErrorMessage::REGISTER_VOLUME_LISTENER
            }
            Self::Subsystem { method, .. } => ErrorMessage::for_method(*method),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            Self::InvalidArgument(detail)
            | Self::NotImplemented(detail)
            | Self::ListenerRegistration(detail) => Some(detail.clone()),
            Self::AlreadyListening => Some(self.to_string()),
            Self::Subsystem { cause, .. } => Some(cause.clone()),
        }
    }
}

/// Error payload returned to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<BridgeError> for MethodError {
    fn from(error: BridgeError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.message().to_string(),
            details: error.details(),
        }
    }
}

impl std::fmt::Display for MethodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "[{}] {}: {}", self.code, self.message, details),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}
