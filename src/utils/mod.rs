//! Utility modules for the gateway
//!
//! - **error**: crate-wide error type and HTTP rendering
//! - **logging**: tracing subscriber setup and shared log targets

pub mod error;
pub mod logging;

pub use error::{GatewayError, Result};
pub use logging::{LogFormat, init_logging};
