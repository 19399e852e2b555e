//! AI generation endpoint
//!
//! Feature code (resume optimization, cover letters, job matching, ...) posts an
//! [`AIRequest`] and gets back an [`AIResponse`], or a 503 carrying only the
//! generic unavailability message.

use crate::core::types::AIRequest;
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{HttpResponse, web};
use tracing::{error, info, warn};

/// Configure AI API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/v1/ai").route("/generate", web::post().to(generate)));
}

/// Generate text for a task
///
/// When the client disconnects actix drops this future, which cancels the
/// in-flight adapter call and stops the fallback walk.
pub async fn generate(
    state: web::Data<AppState>,
    request: web::Json<AIRequest>,
) -> Result<HttpResponse, GatewayError> {
    let request = request.into_inner();
    if let Err(e) = validate_request(&request) {
        warn!(task = %request.task_type, "Invalid AI request: {}", e);
        return Err(e);
    }

    info!(task = %request.task_type, "AI generation requested");

    match state.gateway.orchestrator().dispatch(&request).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            // Provider detail goes to the log only
            error!(task = %request.task_type, detail = %e, "AI generation failed");
            Err(e.into())
        }
    }
}

/// Reject requests no backend could serve
pub fn validate_request(request: &AIRequest) -> Result<(), GatewayError> {
    if request.prompt.trim().is_empty() {
        return Err(GatewayError::bad_request("prompt cannot be empty"));
    }
    let params = &request.parameters;
    if params.max_tokens == Some(0) {
        return Err(GatewayError::bad_request("max_tokens must be greater than 0"));
    }
    if let Some(temperature) = params.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(GatewayError::bad_request(
                "temperature must be between 0.0 and 2.0",
            ));
        }
    }
    if let Some(top_p) = params.top_p {
        if !(top_p > 0.0 && top_p <= 1.0) {
            return Err(GatewayError::bad_request("top_p must be in (0.0, 1.0]"));
        }
    }
    if request.deadline_ms == Some(0) {
        return Err(GatewayError::bad_request("deadline_ms must be greater than 0"));
    }
    Ok(())
}
