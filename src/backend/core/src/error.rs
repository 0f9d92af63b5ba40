//! Error handling for the authorization core.
//!
//! This module provides:
//! - The `AuthzError` enum returned by parsing and guard operations
//! - Machine-readable error codes with HTTP-equivalent status numbers
//! - A serializable `ErrorResponse` body for the transport layer
//! - Error logging with tracing integration
//!
//! A denied permission check is not an error: `PermissionSet::can` simply
//! returns `false`. Only guards turn a denial into `AuthzError::Unauthorized`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, warn};

// ═══════════════════════════════════════════════════════════════════════════════
// Result Type Alias
// ═══════════════════════════════════════════════════════════════════════════════

/// A specialized Result type for authorization operations.
pub type Result<T> = std::result::Result<T, AuthzError>;

// ═══════════════════════════════════════════════════════════════════════════════
// Error Codes
// ═══════════════════════════════════════════════════════════════════════════════

/// Machine-readable error codes.
///
/// These codes are stable and can be used by clients for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Contract violations (1000-1099)
    InvalidRole,
    InvalidAction,
    InvalidResourceKind,
    InvalidPermission,
    ResourceMismatch,

    // Authorization (4000-4099)
    Unauthorized,

    // Validation (4100-4199)
    BadRequest,
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub const fn numeric_code(&self) -> u32 {
        match self {
            Self::InvalidRole => 1000,
            Self::InvalidAction => 1001,
            Self::InvalidResourceKind => 1002,
            Self::InvalidPermission => 1003,
            Self::ResourceMismatch => 1004,
            Self::Unauthorized => 4000,
            Self::BadRequest => 4100,
        }
    }

    /// HTTP-equivalent status number for the transport layer.
    ///
    /// Contract violations are programmer errors and map to 500.
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRole
            | Self::InvalidAction
            | Self::InvalidResourceKind
            | Self::InvalidPermission
            | Self::ResourceMismatch => 500,
            Self::Unauthorized => 401,
            Self::BadRequest => 400,
        }
    }

    /// Error category used as a structured log field.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::InvalidRole
            | Self::InvalidAction
            | Self::InvalidResourceKind
            | Self::InvalidPermission
            | Self::ResourceMismatch => "contract",
            Self::Unauthorized => "authorization",
            Self::BadRequest => "validation",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Severity
// ═══════════════════════════════════════════════════════════════════════════════

/// Severity level for errors (affects logging).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// User errors (bad input, denied access)
    Low,
    /// Denials worth surfacing in logs
    Medium,
    /// Caller contract violations
    High,
}

impl ErrorSeverity {
    /// Get severity based on error code.
    pub const fn from_code(code: &ErrorCode) -> Self {
        match code {
            ErrorCode::BadRequest => Self::Low,
            ErrorCode::Unauthorized => Self::Medium,
            ErrorCode::InvalidRole
            | ErrorCode::InvalidAction
            | ErrorCode::InvalidResourceKind
            | ErrorCode::InvalidPermission
            | ErrorCode::ResourceMismatch => Self::High,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Main Error Type
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors raised by the authorization core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Invalid resource kind: {0}")]
    InvalidResourceKind(String),

    #[error("Invalid permission: {0}")]
    InvalidPermission(String),

    #[error("Resource mismatch: expected {expected}, got {actual}")]
    ResourceMismatch { expected: String, actual: String },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),
}

impl AuthzError {
    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidRole(_) => ErrorCode::InvalidRole,
            Self::InvalidAction(_) => ErrorCode::InvalidAction,
            Self::InvalidResourceKind(_) => ErrorCode::InvalidResourceKind,
            Self::InvalidPermission(_) => ErrorCode::InvalidPermission,
            Self::ResourceMismatch { .. } => ErrorCode::ResourceMismatch,
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::BadRequest(_) => ErrorCode::BadRequest,
        }
    }

    /// Get the HTTP-equivalent status number.
    pub fn http_status(&self) -> u16 {
        self.code().http_status()
    }

    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::from_code(&self.code())
    }

    /// Message that is safe to hand back to a client.
    ///
    /// Contract violations are internal and never leak their details.
    pub fn client_message(&self) -> String {
        match self {
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
            _ => "Internal Server Error".to_string(),
        }
    }

    /// Log this error with appropriate severity.
    pub fn log(&self) {
        let code = self.code();
        let status = code.http_status();

        match self.severity() {
            ErrorSeverity::High => {
                error!(
                    error_code = %code,
                    category = code.category(),
                    http_status = status,
                    message = %self,
                    "Authorization contract violation"
                );
            }
            ErrorSeverity::Medium => {
                warn!(
                    error_code = %code,
                    category = code.category(),
                    http_status = status,
                    message = %self,
                    "Authorization denied"
                );
            }
            ErrorSeverity::Low => {
                debug!(
                    error_code = %code,
                    category = code.category(),
                    http_status = status,
                    message = %self,
                    "Request rejected"
                );
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Error Response
// ═══════════════════════════════════════════════════════════════════════════════

/// Serializable error body for the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&AuthzError> for ErrorResponse {
    fn from(err: &AuthzError) -> Self {
        Self {
            code: err.code(),
            message: err.client_message(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::Unauthorized.http_status(), 401);
        assert_eq!(ErrorCode::BadRequest.http_status(), 400);
        assert_eq!(ErrorCode::InvalidRole.http_status(), 500);
    }

    #[test]
    fn test_numeric_codes_are_unique() {
        let codes = [
            ErrorCode::InvalidRole,
            ErrorCode::InvalidAction,
            ErrorCode::InvalidResourceKind,
            ErrorCode::InvalidPermission,
            ErrorCode::ResourceMismatch,
            ErrorCode::Unauthorized,
            ErrorCode::BadRequest,
        ];
        let mut numeric: Vec<u32> = codes.iter().map(|c| c.numeric_code()).collect();
        numeric.sort_unstable();
        numeric.dedup();
        assert_eq!(numeric.len(), codes.len());
    }

    #[test]
    fn test_error_severity() {
        assert_eq!(
            AuthzError::BadRequest("x".into()).severity(),
            ErrorSeverity::Low
        );
        assert_eq!(
            AuthzError::Unauthorized("x".into()).severity(),
            ErrorSeverity::Medium
        );
        assert_eq!(
            AuthzError::InvalidRole("x".into()).severity(),
            ErrorSeverity::High
        );
    }

    #[test]
    fn test_error_display() {
        let error = AuthzError::InvalidRole("NOT_A_ROLE".into());
        assert_eq!(error.to_string(), "Invalid role: NOT_A_ROLE");

        let error = AuthzError::Unauthorized("You are not authorized to see project.".into());
        assert_eq!(error.to_string(), "You are not authorized to see project.");
    }

    #[test]
    fn test_error_response_hides_contract_details() {
        let error = AuthzError::InvalidRole("NOT_A_ROLE".into());
        let response = ErrorResponse::from(&error);
        assert_eq!(response.message, "Internal Server Error");

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("INVALID_ROLE"));
        assert!(!json.contains("NOT_A_ROLE"));
    }

    #[test]
    fn test_error_response_keeps_denial_message() {
        let error = AuthzError::Unauthorized("You are not authorized to create new invites.".into());
        let response = ErrorResponse::from(&error);
        assert_eq!(response.code, ErrorCode::Unauthorized);
        assert_eq!(response.message, "You are not authorized to create new invites.");
    }
}
