//! NexaPro Core - client access layer for the NexaPro property management backend
//!
//! This crate provides the authenticated request pipeline with token refresh,
//! per-resource clients and caches, subscription feature gating and the
//! guarded route table used by NexaPro front ends.

pub mod api;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod gate;
pub mod http;
pub mod router;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use context::AppContext;
pub use error::{AppError, Result};
