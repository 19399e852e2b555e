//! Common test utilities for applytrack-ai
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::fixtures::{ScriptedAdapter, orchestrator_with};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let primary = ScriptedAdapter::succeeding();
//!     let orchestrator = orchestrator_with(vec![("primary", primary.clone())], 3);
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod fixtures;

pub use fixtures::{ScriptedAdapter, orchestrator_with, request};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err and return the error
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
