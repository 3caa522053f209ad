//! Error types for the HairBridge plugin
//!
//! This module defines the error types used at the internal seams of the plugin
//! (SDK adapter, graphics device, context initialization). Public context
//! operations never surface these to the host: they are logged and turned into
//! null handles or default values.

use std::fmt;

/// Result type for HairBridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// HairBridge errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (hair SDK or graphics device call failed)
    BackendError(String),

    /// Invalid resource (unknown handle, empty path, dead slot)
    InvalidResource(String),

    /// Initialization failed (SDK handshake, device-bound objects)
    InitializationFailed(String),

    /// The hair SDK library is not loaded
    SdkNotLoaded,

    /// The graphics device is gone (context finalized or migrated away)
    DeviceLost,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::SdkNotLoaded => write!(f, "Hair SDK not loaded"),
            Error::DeviceLost => write!(f, "Graphics device lost"),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
