//! Configuration and file management for gh-auto-discover
//!
//! This crate provides:
//! - File path utilities for the user config file
//! - Configuration file lookup (TOML)
//! - Application configuration (AppConfig)
//! - Allow/deny list file loading

pub mod app_config;
pub mod config_file;
pub mod list_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::load_config_file;
pub use list_file::{load_list_file, load_optional_list_file, parse_list};
