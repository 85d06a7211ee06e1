//! API response models

use serde::Serialize;

use cadeado_common::ErrorCode;

/// Error body returned by every endpoint on failure
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

impl ApiError {
    pub fn new(code: &ErrorCode<'_>) -> Self {
        Self {
            code: code.code,
            message: code.message.to_string(),
        }
    }

    pub fn with_detail(code: &ErrorCode<'_>, detail: impl Into<String>) -> Self {
        Self {
            code: code.code,
            message: format!("{}: {}", code.message, detail.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_detail() {
        let err = ApiError::with_detail(&cadeado_common::error::PARAMETER_MISSING, "key");
        assert_eq!(err.code, 10000);
        assert_eq!(err.message, "parameter missing: key");
    }
}
