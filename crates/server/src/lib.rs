#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]

//! # Taskdesk server
//!
//! HTTP service exposing the task assignment and approval API. Identity is a
//! principal injected by the fronting gateway in a configurable header; all
//! authorization happens in the domain layer underneath.

// Environment-driven configuration
pub mod config;

// Domain error to HTTP status mapping
pub mod error;

// Request handlers
pub mod handlers;

// State, router, lifecycle
pub mod server;

pub use config::Config;
pub use error::{ApiError, ApiResult, ErrorBody};
pub use server::{build_router, run_server, ServerState};
