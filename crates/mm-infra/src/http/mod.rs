pub mod client;
mod errors;

pub use client::{HttpBackend, HttpBackendConfig, DEFAULT_TIMEOUT};
