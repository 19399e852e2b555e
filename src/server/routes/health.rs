//! Health check and provider status endpoints

use crate::core::router::ProviderHealthState;
use crate::{BuildInfo, build_info};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("", web::get().to(health_check))
            .route("/providers", web::get().to(providers_health)),
    );
}

/// Liveness payload
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: Cow<'static, str>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub build: BuildInfo,
}

/// A configuration entry that never made it into the registry
#[derive(Debug, Clone, Serialize)]
pub struct RejectedProvider {
    pub provider_id: String,
    pub reason: String,
}

/// Registry and circuit state for operators
#[derive(Debug, Clone, Serialize)]
pub struct ProvidersHealth {
    pub registry_version: u64,
    /// Dispatch order
    pub providers: Vec<ProviderHealthState>,
    pub disabled: Vec<String>,
    pub rejected: Vec<RejectedProvider>,
}

/// Basic health check endpoint
pub async fn health_check() -> HttpResponse {
    debug!("Health check requested");

    HttpResponse::Ok().json(ApiResponse::success(HealthStatus {
        status: Cow::Borrowed("healthy"),
        timestamp: chrono::Utc::now(),
        build: build_info(),
    }))
}

/// Per-provider circuit state in dispatch order
pub async fn providers_health(state: web::Data<AppState>) -> HttpResponse {
    debug!("Provider health requested");

    let snapshot = state.gateway.registry().snapshot();
    let health = state.gateway.health();
    let providers: Vec<ProviderHealthState> = snapshot
        .eligible()
        .iter()
        .map(|entry| health.state(entry.id()))
        .collect();
    let available = providers
        .iter()
        .filter(|p| health.is_available(&p.provider_id))
        .count();

    let body = ProvidersHealth {
        registry_version: snapshot.version,
        providers,
        disabled: snapshot.disabled.clone(),
        rejected: snapshot
            .rejected
            .iter()
            .map(|err| RejectedProvider {
                provider_id: err.provider().to_string(),
                reason: err.message().to_string(),
            })
            .collect(),
    };

    HttpResponse::Ok().json(ApiResponse::success_with_meta(
        body,
        serde_json::json!({ "available": available }),
    ))
}
