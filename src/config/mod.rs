//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/reporoast/config.toml)
//! 3. Project config (.reporoast/config.toml)
//! 4. Environment variables (REPOROAST_*)
//! 5. CLI arguments (highest priority)
//!
//! The resolved `Config` is passed into component constructors; no component
//! reads the environment on its own.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
