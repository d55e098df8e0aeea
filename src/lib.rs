// EthXpose - Ethereum wallet fraud explorer

// Core types and primitives
pub mod core;

// Request/response and graph models
pub mod models;

// Upstream classifier client
pub mod infrastructure;

// Force layout and rendering of the transaction graph
pub mod graph;

// Page state machine and orchestration
pub mod page;

// HTTP surface
pub mod api;
pub mod web;

// Common utilities
pub mod app_state;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
