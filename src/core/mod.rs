//! Core runtime infrastructure.
//!
//! - [`config`] - Configuration parsing and validation
//! - [`runtime`] - Runtime orchestration and reload polling
//! - [`error`] - Error types and status mapping

pub mod config;
pub mod error;
pub mod runtime;
