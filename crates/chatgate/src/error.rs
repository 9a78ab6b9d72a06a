//! Error types for Chat Gate.

use chatgate_core::CoreError;
use chatgate_store::StoreError;
use thiserror::Error;

use crate::dispatcher::Command;

/// Why a command invocation was refused before touching any state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Usage {
    /// A targeted command arrived without any mentioned users.
    #[error("Mention one or more users after /{command}.")]
    MissingTargets { command: Command },

    /// A group-scoped command arrived outside a group chat.
    #[error("/{command} can only be used in a group chat.")]
    GroupOnly { command: Command },
}

/// Errors that can occur during Chat Gate operations.
#[derive(Debug, Error)]
pub enum GateError {
    /// Command invoked incorrectly. No state was changed.
    #[error("invalid invocation: {0}")]
    InvalidInvocation(#[from] Usage),

    /// The durable write failed. In-memory state was left unchanged.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    /// A persisted value exists but cannot be decoded. Nothing was loaded,
    /// so the stored bytes are left as they are.
    #[error("corrupt persisted value under {key}: {reason}")]
    CorruptState { key: String, reason: String },

    /// The state could not be encoded for storage.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] CoreError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for Chat Gate operations.
pub type Result<T> = std::result::Result<T, GateError>;
