//! Module
//!
//! Contains base components shared by all providers

pub mod config;
pub mod connection_pool;
pub mod error_mapping;
pub mod worker_pool;

pub use config::BaseConfig;
pub use connection_pool::{ConnectionPool, HeaderPair, HttpReply, PoolConfig, header};
pub use error_mapping::{map_reqwest_error, map_status, parse_retry_after};
pub use worker_pool::{WorkerError, WorkerHandle, WorkerPool};
