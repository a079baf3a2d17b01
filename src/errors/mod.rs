//! Error handling module for the donor finder.
//!
//! Provides a centralized error type with stable error codes and a mapping to
//! process exit codes for the command line front end.

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const LOCATION_UNSUPPORTED: &str = "LOCATION_UNSUPPORTED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const CANCELLED: &str = "CANCELLED";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Input rejected before any state change
    Validation(String),
    /// The environment has no way of obtaining a location
    LocationUnsupported(String),
    /// A location was requested but could not be obtained
    PermissionDenied(String),
    /// The user declined a confirmation prompt
    Cancelled(String),
    /// Database error
    Database(String),
    /// Value could not be encoded or decoded
    Serialization(String),
    /// Internal error
    Internal(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::LocationUnsupported(_) => codes::LOCATION_UNSUPPORTED,
            AppError::PermissionDenied(_) => codes::PERMISSION_DENIED,
            AppError::Cancelled(_) => codes::CANCELLED,
            AppError::Database(_) => codes::DATABASE_ERROR,
            AppError::Serialization(_) => codes::SERIALIZATION_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::LocationUnsupported(msg)
            | AppError::PermissionDenied(msg)
            | AppError::Cancelled(msg)
            | AppError::Database(msg)
            | AppError::Serialization(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Process exit code used by the command line front end.
    ///
    /// User-facing notices (bad input, missing location, declined prompt) exit
    /// with 1; storage and internal failures exit with 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Validation(_)
            | AppError::LocationUnsupported(_)
            | AppError::PermissionDenied(_)
            | AppError::Cancelled(_) => 1,
            AppError::Database(_) | AppError::Serialization(_) | AppError::Internal(_) => 2,
        }
    }

    /// Whether this error is a notice for the user rather than a failure.
    pub fn is_user_facing(&self) -> bool {
        self.exit_code() == 1
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {:?}", err);
        AppError::Internal(format!("I/O error: {}", err))
    }
}

/// Convenience alias used throughout the crate.
pub type AppResult<T> = Result<T, AppError>;
