//! Typeahead - terminal entry point.
//!
//! Loads configuration, builds the Wikipedia provider and runs the widget on
//! a single-threaded tokio runtime.

use std::fs::{File, OpenOptions};
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;
use typeahead_core::{config_dir, ensure_config_dir, WidgetConfig};
use typeahead_ui::app;
use typeahead_wiki::WikiProvider;

// =============================================================================
// Logging
// =============================================================================

/// Open `typeahead.log` next to the config file.
fn open_log_file() -> Option<File> {
    ensure_config_dir().ok()?;
    let path = config_dir()?.join("typeahead.log");
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// The terminal belongs to the UI, so logs go to a file when possible.
fn init_logging() {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    match open_log_file() {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

// =============================================================================
// Configuration
// =============================================================================

fn load_config() -> WidgetConfig {
    match WidgetConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Using default configuration: {}", e);
            eprintln!("Warning: {} (using defaults)", e);
            WidgetConfig::default()
        }
    }
}

fn main() {
    init_logging();
    tracing::info!("Typeahead starting...");

    let config = load_config();

    let provider = match WikiProvider::from_config(&config) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            tracing::error!("Failed to create provider: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut terminal = ratatui::init();
    let result = rt.block_on(app::run(&mut terminal, config, provider));
    ratatui::restore();

    if let Err(e) = result {
        tracing::error!("Terminal error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
