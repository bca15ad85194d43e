//! Client for the remote analysis backend
//!
//! The simulated scan never goes through here; the CLI uses it for
//! `--remote` and `--health`.

mod client;
mod error;
mod types;

pub use client::{API_URL_ENV, ApiClient, ApiConfig, DEFAULT_API_URL};
pub use error::ApiError;
pub use types::{DatasetInfo, HealthStatus, Statistics};
