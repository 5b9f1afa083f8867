//! Configuration module for Kerbside
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use kerbside::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kerbside.toml")).unwrap();
//! println!("Walking pages 1..{}", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SelectorConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
