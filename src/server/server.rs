//! HTTP server core implementation

use crate::config::ServerConfig;
use crate::core::Gateway;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use tracing::info;
use tracing_actix_web::TracingLogger;

/// HTTP server
#[derive(Debug)]
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server over an initialized gateway
    pub fn new(gateway: Gateway) -> Self {
        Self {
            config: gateway.config().server().clone(),
            state: AppState::new(gateway),
        }
    }

    /// Start the HTTP server and run until shutdown
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.bind_address();
        let max_body_size = self.config.max_body_size;

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);
        let mut server = ActixHttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .app_data(routes::json_config(max_body_size))
                .wrap(TracingLogger::default())
                .wrap(DefaultHeaders::new().add(("Server", "ApplyTrack-AI")))
                .configure(routes::configure_routes)
        });
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| GatewayError::Config(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);
        server.await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
