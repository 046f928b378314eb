use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Failure kinds surfaced by the auth and attendance handlers. Storage
/// details go to the log, never into the response body.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "Record already exists")]
    Conflict,

    #[display(fmt = "Record not found")]
    NotFound,

    #[display(fmt = "Incorrect email or password")]
    Unauthorized,

    #[display(fmt = "Not authenticated")]
    Unauthenticated,

    #[display(fmt = "Invalid or expired token")]
    InvalidToken,

    #[display(fmt = "Already clocked in")]
    AlreadyClockedIn,

    #[display(fmt = "No open clock-in record")]
    NoOpenSession,

    #[display(fmt = "Internal server error")]
    Storage,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Conflict | ApiError::AlreadyClockedIn => StatusCode::CONFLICT,
            ApiError::NotFound | ApiError::NoOpenSession => StatusCode::NOT_FOUND,
            ApiError::Unauthorized | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken => StatusCode::FORBIDDEN,
            ApiError::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.to_string(),
        }))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database error");
        ApiError::Storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(ApiError::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::AlreadyClockedIn.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NoOpenSession.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn storage_message_is_opaque() {
        assert_eq!(ApiError::Storage.to_string(), "Internal server error");
    }
}
