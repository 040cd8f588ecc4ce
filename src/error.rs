use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::core::identifier::{IdentifierError, IdentifierExtractor, RaceId};
use crate::data::StoreError;
use crate::models::Envelope;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Missing or unusable request parameter
    ValidationError(String),
    /// No odds stored for the requested race
    NotFound(String),
    /// Internal server error
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::ValidationError(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::InternalError(msg) => msg.clone(),
        };

        HttpResponse::build(self.status_code()).json(Envelope::<()>::failure(message))
    }
}

impl From<IdentifierError> for AppError {
    fn from(err: IdentifierError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        if matches!(err, StoreError::NotFound(_)) {
            AppError::NotFound(err.to_string())
        } else {
            AppError::InternalError(err.to_string())
        }
    }
}

/// Validate the `race_id` query parameter (URL or bare digits)
pub fn validate_race_param(value: Option<&str>) -> Result<RaceId, AppError> {
    let value = value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError("race_idパラメータが必要です".to_string()))?;
    Ok(IdentifierExtractor::new().extract(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_race_param_valid() {
        assert_eq!(validate_race_param(Some("123")).unwrap().as_str(), "123");
        assert_eq!(
            validate_race_param(Some("https://race.netkeiba.com/race/shutuba.html?race_id=202505041007"))
                .unwrap()
                .as_str(),
            "202505041007"
        );
    }

    #[test]
    fn test_validate_race_param_missing() {
        let err = validate_race_param(None).unwrap_err();
        assert!(err.to_string().contains("race_idパラメータが必要です"));
        assert!(validate_race_param(Some("  ")).is_err());
    }

    #[test]
    fn test_validate_race_param_invalid() {
        let err = validate_race_param(Some("abc")).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_display() {
        let err = AppError::ValidationError("test error".to_string());
        assert!(err.to_string().contains("Validation error"));
    }

    #[test]
    fn test_store_error_mapping() {
        let err: AppError = StoreError::NotFound("1".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ValidationError("".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InternalError("".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
