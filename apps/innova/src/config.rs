//! # Application Configuration
//!
//! TOML configuration for the Innova binary: evidence policy, server
//! defaults, and optional catalog overrides.
//!
//! ```toml
//! [evidence]
//! strict = true
//! min_chars = 40
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! # Optional catalog overrides (paths relative to the config file)
//! schema = "catalog/schema.toml"
//! checklist = "catalog/checklist.toml"
//! ```
//!
//! Everything is optional; a missing config file means built-in defaults.

use innova_core::{AssessmentSchema, ChecklistCatalog, EvidencePolicy, InnovaError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Server section of the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Parsed application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Evidence acceptance policy.
    #[serde(default)]
    pub evidence: EvidencePolicy,
    /// Server defaults; CLI flags win over these.
    #[serde(default)]
    pub server: ServerConfig,
    /// Optional path to a schema catalog TOML.
    #[serde(default)]
    pub schema: Option<PathBuf>,
    /// Optional path to a checklist catalog TOML.
    #[serde(default)]
    pub checklist: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, InnovaError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| InnovaError::IoError(format!("Read config {:?}: {}", path, e)))?;
        toml::from_str(&text)
            .map_err(|e| InnovaError::DeserializationError(format!("config toml: {e}")))
    }

    /// Resolve the assessment schema: the configured catalog file if set,
    /// the built-in catalog otherwise. Relative paths resolve against the
    /// config file's directory.
    pub fn resolve_schema(&self, config_dir: Option<&Path>) -> Result<AssessmentSchema, InnovaError> {
        match &self.schema {
            Some(path) => {
                let resolved = resolve_path(path, config_dir);
                let text = std::fs::read_to_string(&resolved)
                    .map_err(|e| InnovaError::IoError(format!("Read schema {:?}: {}", resolved, e)))?;
                AssessmentSchema::from_toml_str(&text)
            }
            None => Ok(AssessmentSchema::builtin()),
        }
    }

    /// Resolve the checklist catalog, analogous to [`Self::resolve_schema`].
    pub fn resolve_checklist(
        &self,
        config_dir: Option<&Path>,
    ) -> Result<ChecklistCatalog, InnovaError> {
        match &self.checklist {
            Some(path) => {
                let resolved = resolve_path(path, config_dir);
                let text = std::fs::read_to_string(&resolved).map_err(|e| {
                    InnovaError::IoError(format!("Read checklist {:?}: {}", resolved, e))
                })?;
                ChecklistCatalog::from_toml_str(&text)
            }
            None => Ok(ChecklistCatalog::builtin()),
        }
    }

    /// The configured evidence policy.
    #[must_use]
    pub fn policy(&self) -> EvidencePolicy {
        self.evidence
    }
}

fn resolve_path(path: &Path, config_dir: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config_dir {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
