//! Tracing setup for drivers and tests that host the pass.
//!
//! The pass itself only emits `tracing` events, prefixed with `[interop]`.
//! A host opts into seeing them with environment variables:
//!
//! ```bash
//! # Indented tree of library traversals
//! JSIL_LOG=debug JSIL_LOG_FORMAT=tree cargo test -p jsil-lowering
//!
//! # One JSON object per event
//! JSIL_LOG=jsil_lowering=trace JSIL_LOG_FORMAT=json <driver>
//! ```
//!
//! `JSIL_LOG` takes precedence over `RUST_LOG`. Output goes to stderr.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_ENV: &str = "JSIL_LOG";
const LOG_FORMAT_ENV: &str = "JSIL_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Flat `tracing-subscriber` lines.
    #[default]
    Text,
    /// Hierarchical output via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON.
    Json,
}

impl LogFormat {
    /// Parse a format name. Unknown names fall back to [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

/// Filter directives from `JSIL_LOG`, falling back to `RUST_LOG`, or `None`
/// when neither is set.
fn filter_from_env() -> Option<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(directives) => Some(EnvFilter::builder().parse_lossy(directives)),
        Err(_) if std::env::var("RUST_LOG").is_ok() => Some(EnvFilter::from_default_env()),
        Err(_) => None,
    }
}

/// Install a global subscriber when logging was requested.
///
/// Returns `false` when no log variable is set or a subscriber is already
/// installed, so the call is safe from every test binary.
pub fn init_tracing() -> bool {
    let Some(filter) = filter_from_env() else {
        return false;
    };

    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);
            Registry::default()
                .with(filter)
                .with(tree_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default()
                .with(filter)
                .with(json_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    }
}

#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tests;
