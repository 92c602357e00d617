//! Unified error type.

use crate::invocation::OperationId;

/// The error type returned by weft's fallible operations.
///
/// Failures raised by an operation body travel through the decorator chain
/// as [`Error::Operation`] and reach the caller untouched: decorators never
/// catch, wrap, or retry them. The other variants surface a broken
/// decorator contract.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The operation body itself failed.
    #[error(transparent)]
    Operation(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// An around-decorator returned without invoking its continuation.
    #[error("around decorator `{decorator}` returned from `{operation}` without proceeding")]
    NotProceeded {
        operation: OperationId,
        decorator: &'static str,
    },

    /// An around-decorator replaced the result with a value of another type.
    #[error("`{operation}` produced a result that is not a `{expected}`")]
    UnexpectedOutput {
        operation: OperationId,
        expected: &'static str,
    },
}

impl Error {
    /// Wraps a failure raised inside an operation body.
    pub fn operation(e: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Operation(e.into())
    }
}
