// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the HAR tracer
//!
//! The tracer is deliberately tolerant: events referencing unknown pages or
//! requests are dropped silently, and missing optional signals degrade into
//! sentinel values instead of failing the trace. The variants here cover the
//! few places where an error is actually surfaced.

use thiserror::Error;

/// Result type alias for tracer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the HAR tracer
#[derive(Error, Debug)]
pub enum Error {
    /// The traced context has no associated browser handle, so the browser
    /// descriptor of the log cannot be populated. Fatal at construction.
    #[error("traced context has no associated browser handle")]
    BrowserUnavailable,

    /// The automation layer failed to service an accessor call (body bytes,
    /// resolved headers, server address, TLS details, page evaluation).
    /// Consumed best-effort inside enrichment units.
    #[error("automation layer error: {0}")]
    Automation(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for an automation-layer failure
    pub fn automation(message: impl Into<String>) -> Self {
        Error::Automation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::automation("page closed");
        assert_eq!(err.to_string(), "automation layer error: page closed");
        assert_eq!(
            Error::BrowserUnavailable.to_string(),
            "traced context has no associated browser handle"
        );
    }
}
