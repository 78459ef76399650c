//! Error types for the Zivaas core library

use thiserror::Error;

/// Result type alias for Zivaas operations
pub type Result<T> = std::result::Result<T, ZivaasError>;

/// Main error type for Zivaas operations
#[derive(Error, Debug)]
pub enum ZivaasError {
    #[error("Gateway error: {message}")]
    Gateway { message: String },

    #[error("This property is already in your wishlist")]
    DuplicateMembership,

    #[error("Not authorized: {role} accounts cannot manage a wishlist")]
    NotAuthorized { role: String },

    #[error("Property not found: {id}")]
    PropertyNotFound { id: String },

    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl ZivaasError {
    /// Create a gateway error
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway {
            message: message.into(),
        }
    }

    /// Create a not-authorized error for the given role
    pub fn not_authorized(role: impl Into<String>) -> Self {
        Self::NotAuthorized { role: role.into() }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unknown error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }
}
