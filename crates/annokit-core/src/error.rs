//! Error handling for annokit
//!
//! The overlay's error taxonomy is intentionally narrow: identifier lookups
//! that find nothing are silent no-ops, never failures. The types here cover
//! the few genuinely fatal-at-call-site conditions:
//! - Tool errors (activating an unregistered drawing tool)
//! - Snippet errors (pixel extraction without a usable source)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Drawing-tool error type
///
/// Represents failures in the tool registry, which maps a geometry kind to
/// the drawing tool responsible for it.
#[derive(Error, Debug, Clone)]
pub enum ToolError {
    /// No tool registered for the requested kind
    #[error("No drawing tool registered for kind '{kind}'")]
    UnknownKind {
        /// The geometry kind that had no registered tool.
        kind: String,
    },

    /// Generic tool error
    #[error("Tool error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

/// Snippet extraction error type
///
/// Represents failures when cutting a pixel region out of the displayed image.
#[derive(Error, Debug, Clone)]
pub enum SnippetError {
    /// No pixel source was attached to the overlay
    #[error("No pixel source available for snippet extraction")]
    NoSource,

    /// The requested region has no pixels
    #[error("Snippet region is empty: {width}x{height}")]
    EmptyRegion {
        /// Rounded region width in pixels.
        width: u32,
        /// Rounded region height in pixels.
        height: u32,
    },
}

/// Main error type for annokit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Drawing-tool error
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Snippet extraction error
    #[error(transparent)]
    Snippet(#[from] SnippetError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a tool error
    pub fn is_tool_error(&self) -> bool {
        matches!(self, Error::Tool(_))
    }

    /// Check if this is a snippet error
    pub fn is_snippet_error(&self) -> bool {
        matches!(self, Error::Snippet(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
