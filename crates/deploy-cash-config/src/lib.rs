//! Configuration and file paths for the staging deploy checklist
//!
//! This crate provides:
//! - File path utilities for config and cache files
//! - Configuration file loading (TOML)
//! - Application configuration (AppConfig) and the target repository

pub mod app_config;
pub mod config_file;
pub mod paths;
pub mod repository;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

pub use app_config::AppConfig;
pub use config_file::load_config_file;
pub use paths::{app_config_path, cache_dir, config_dir};
pub use repository::RepositoryConfig;
