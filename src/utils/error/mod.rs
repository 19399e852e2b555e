//! Error handling for the Gateway
//!
//! Crate-wide error type and its HTTP rendering. Provider failures have their own
//! classified type in `core::providers`; dispatch outcomes live in `core::router`.

mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{GatewayError, Result};
