//! Configuration module for claim verification
//!
//! This module provides the `FactCheckConfig` struct, its type-safe builder
//! and environment loading, plus the `PipelineSettings` tunables.

// Sub-modules
pub mod builder;
pub mod env;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{
    ConfigError, DEFAULT_GEMINI_BASE_URL, DEFAULT_LANGUAGE_RESTRICT, DEFAULT_SEARCH_BASE_URL,
    FactCheckConfigBuilder, WithApiKey,
};
pub use types::{FactCheckConfig, PipelineSettings, SearchCredentials};
