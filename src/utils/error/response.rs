//! HTTP rendering of gateway errors

use super::types::GatewayError;
use crate::core::router::DispatchError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl GatewayError {
    /// Status, machine code and client-safe message
    ///
    /// Provider and dispatch failures never carry provider names or upstream
    /// text to the client; that detail is only logged.
    fn http_parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            GatewayError::Dispatch(DispatchError::Cancelled) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "REQUEST_CANCELLED",
                DispatchError::Cancelled.user_message().to_string(),
            ),
            GatewayError::Dispatch(err) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI_UNAVAILABLE",
                err.user_message().to_string(),
            ),
            GatewayError::Provider(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI_UNAVAILABLE",
                DispatchError::USER_MESSAGE.to_string(),
            ),
            GatewayError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", self.to_string()),
            GatewayError::Serialization(_) => (
                StatusCode::BAD_REQUEST,
                "INVALID_REQUEST",
                self.to_string(),
            ),
            GatewayError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        self.http_parts().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = self.http_parts();

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
