//! Pass configuration.
//!
//! Options are read from a JSON object with camelCase keys. Every key is
//! optional; missing keys take the defaults below.
//!
//! ```json
//! {
//!   "lowerExternalMembers": true,
//!   "optimizeUncheckedCalls": true,
//!   "legacyJsAnnotationLibraries": ["sdk:html"]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// SDK libraries that used the internal JS annotation before top-level
/// internal-interop members were lowered. Their top-level members keep the
/// legacy behavior.
pub const DEFAULT_LEGACY_JS_ANNOTATION_LIBRARIES: &[&str] = &[
    "sdk:html",
    "sdk:indexed_db",
    "sdk:svg",
    "sdk:web_audio",
    "sdk:web_gl",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoweringOptions {
    /// Synthesize bodies for external interop members.
    pub lower_external_members: bool,
    /// Rewrite checked primitive calls into their unchecked variants.
    pub optimize_unchecked_calls: bool,
    /// Import URIs excluded from top-level internal-interop resolution.
    pub legacy_js_annotation_libraries: Vec<String>,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            lower_external_members: true,
            optimize_unchecked_calls: true,
            legacy_js_annotation_libraries: DEFAULT_LEGACY_JS_ANNOTATION_LIBRARIES
                .iter()
                .map(|uri| (*uri).to_string())
                .collect(),
        }
    }
}

impl LoweringOptions {
    pub fn from_json_str(source: &str) -> Result<Self, OptionsError> {
        serde_json::from_str(source).map_err(|source| OptionsError::Parse {
            path: None,
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, OptionsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| OptionsError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })
    }

    pub fn is_legacy_library(&self, import_uri: &str) -> bool {
        self.legacy_js_annotation_libraries
            .iter()
            .any(|uri| uri == import_uri)
    }
}

/// Failure to load [`LoweringOptions`].
#[derive(Debug)]
pub enum OptionsError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read options {}: {}", path.display(), source)
            }
            Self::Parse {
                path: Some(path),
                source,
            } => write!(f, "invalid options in {}: {}", path.display(), source),
            Self::Parse { path: None, source } => write!(f, "invalid options: {source}"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
#[path = "tests/options_tests.rs"]
mod tests;
