//! Error types and error codes for Cadeado
//!
//! This module defines:
//! - `CadeadoError`: Application-specific error enum
//! - `ErrorCode`: Structured error codes for API responses

use serde::{Deserialize, Serialize};

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum CadeadoError {
    #[error("caused: {0}")]
    IllegalArgument(String),

    #[error("coordination store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("lock '{0}' is held by another owner")]
    LockBusy(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

// General success and error codes
pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const PARAMETER_MISSING: ErrorCode<'static> = ErrorCode {
    code: 10000,
    message: "parameter missing",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const KEY_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "key not found",
};

pub const LOCK_BUSY: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "lock is held by another owner",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadeado_error_display() {
        let err = CadeadoError::IllegalArgument("invalid param".to_string());
        assert_eq!(format!("{}", err), "caused: invalid param");

        let err = CadeadoError::LockBusy("res1".to_string());
        assert_eq!(format!("{}", err), "lock 'res1' is held by another owner");

        let err = CadeadoError::StoreUnavailable("connection refused".to_string());
        assert_eq!(
            format!("{}", err),
            "coordination store unavailable: connection refused"
        );
    }

    #[test]
    fn test_error_code_constants() {
        assert_eq!(SUCCESS.code, 0);
        assert_eq!(SUCCESS.message, "success");
        assert_eq!(PARAMETER_MISSING.code, 10000);
        assert_eq!(LOCK_BUSY.code, 20005);
    }
}
