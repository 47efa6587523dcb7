//! Error taxonomy for the invocation pipeline.
//!
//! Three families, matching the stages a message passes through:
//!
//! - [`TokenizeError`] — the raw invocation string was malformed.
//! - [`ConversionError`] — a token (or token sequence) could not be
//!   converted to its declared type.
//! - [`BindError`] — the umbrella for everything that can go wrong while
//!   binding a token stream against a signature: tokenization and
//!   conversion failures plus arity and unknown-flag errors.
//!
//! Schema-definition errors live in [`SchemaError`](crate::SchemaError);
//! those are programming errors surfaced when a command is built, not at
//! invocation time.

use thiserror::Error;

use crate::value::Value;

/// Errors produced by [`tokenize`](crate::tokenize::tokenize).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A quoted span was opened but its closing delimiter never appeared.
    #[error("unterminated quote: no closing '{expected}' for opening '{opening}'")]
    UnterminatedQuote {
        /// The opening quote character encountered.
        opening: char,
        /// The closing character that was expected.
        expected: char,
    },
}

/// A single token (or sequence of typed values) could not be converted
/// to its target type.
///
/// Carries the offending input, the target type name, the underlying
/// cause, and a best-effort snapshot of the values the binder had
/// already produced before the failure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot convert '{token}' to {target}: {cause}")]
pub struct ConversionError {
    /// The offending token, or a rendering of the offending values.
    pub token: String,
    /// Name of the target type, e.g. `"int"` or `"int | str"`.
    pub target: String,
    /// Human-readable underlying cause.
    pub cause: String,
    /// Values bound before the failure. Empty unless the error passed
    /// through the binder.
    pub partial: Vec<Value>,
}

impl ConversionError {
    /// Creates a conversion error with no partial results attached.
    pub fn new(
        token: impl Into<String>,
        target: impl Into<String>,
        cause: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            target: target.into(),
            cause: cause.into(),
            partial: Vec::new(),
        }
    }

    /// Attaches a snapshot of already-bound values for diagnostics.
    pub fn with_partial(mut self, partial: Vec<Value>) -> Self {
        self.partial = partial;
        self
    }
}

/// Errors produced while binding a token stream against a signature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    /// The invocation string could not be tokenized.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    /// A token could not be converted to its declared type.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// A required parameter received no token and has no default.
    #[error("required parameter '{name}' was not supplied a value")]
    MissingArgument { name: String },

    /// Tokens were left over after every positional parameter was bound.
    #[error("too many positional arguments: '{remainder}' remain unused")]
    TooManyArguments { remainder: String },

    /// More than one value was supplied for a parameter without a
    /// container type.
    #[error("more than one value for parameter '{name}' of type {target}")]
    TooManyValues { name: String, target: String },

    /// One or more provided flag names do not exist in the schema.
    #[error("unknown flags: '{}'", .0.join("', '"))]
    UnknownFlags(Vec<String>),
}

/// Convenience alias for binder results.
pub type BindResult<T> = std::result::Result<T, BindError>;
