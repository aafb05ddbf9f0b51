//! Backend test support utilities
//!
//! Shared by the backend's unit and integration tests: logging
//! initialisation, Problem Details assertions, JSON-RPC request builders and
//! unique test data.

pub mod jsonrpc;
pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
