//! Configuration module for Page-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every field has a default, so an empty file (or [`ScraperConfig::default`]) is a
//! valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use page_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will collect at most {} pages", config.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ScrapeOptions, ScraperConfig};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
