//! Dispatch-side error types.
//!
//! Invocation-time failures surface from
//! [`Dispatcher::dispatch`](crate::Dispatcher::dispatch) per message;
//! registration-time failures abort only the offending registration and
//! leave the registry untouched.

use bosun_core::{BindError, SchemaError};
use thiserror::Error;

/// Error type command callbacks may return.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced by command registration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// The command's name or one of its aliases is already taken.
    #[error("a command or alias named '{name}' is already registered")]
    DuplicateName { name: String },
}

/// Errors produced while dispatching one message.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The invocation could not be tokenized or bound.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// A registration performed during dispatch (plugin load) collided.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A schema built during dispatch (plugin load) was invalid.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The command callback itself failed.
    #[error("command callback failed: {0}")]
    Callback(#[source] CallbackError),
}

/// Convenience alias for dispatch results.
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;
