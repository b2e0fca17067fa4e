//! Error types for the SVG map renderer

use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing an SVG document
#[derive(Error, Debug)]
pub enum Error {
    /// The output sink rejected a write
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A visitor method was called out of order
    #[error("Protocol violation: `{operation}` called while renderer is {state}")]
    Protocol {
        /// Visitor operation that was attempted
        operation: &'static str,
        /// Renderer state at the time of the call
        state: crate::rendering::RenderState,
    },

    /// Malformed map description, dimension or color
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidInput(err.to_string())
    }
}

impl Error {
    /// Whether this error signals a misuse of the visitor protocol
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Protocol { .. })
    }
}
