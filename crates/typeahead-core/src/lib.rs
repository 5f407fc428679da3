//! Core types for the typeahead search widget.
//!
//! This crate contains shared data structures used across all typeahead crates:
//! - Search terms
//! - Result payloads, rows and projections
//! - Configuration types
//! - Error types

mod config;
mod error;
mod row;
mod term;

pub use config::{config_dir, config_path, ensure_config_dir, ProviderConfig, WidgetConfig};
pub use error::{ConfigError, ProviderError, SearchError};
pub use row::{Projection, ResultPayload, ResultRow};
pub use term::SearchTerm;
