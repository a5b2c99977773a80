use crate::error::{ClouvelError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// SnapshotConfig
// ---------------------------------------------------------------------------

/// Limits applied when the pre-compact hook captures a session snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_status_excerpt")]
    pub status_excerpt_chars: usize,
    #[serde(default = "default_plan_excerpt")]
    pub plan_excerpt_chars: usize,
    #[serde(default = "default_max_rules")]
    pub max_rules_per_kind: usize,
    /// A plan document containing any of these strings is considered active.
    #[serde(default = "default_active_markers")]
    pub active_plan_markers: Vec<String>,
}

fn default_status_excerpt() -> usize {
    3000
}

fn default_plan_excerpt() -> usize {
    2000
}

fn default_max_rules() -> usize {
    5
}

fn default_active_markers() -> Vec<String> {
    vec![
        "LOCKED".to_string(),
        "IN_PROGRESS".to_string(),
        "진행 중".to_string(),
    ]
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            status_excerpt_chars: default_status_excerpt(),
            plan_excerpt_chars: default_plan_excerpt(),
            max_rules_per_kind: default_max_rules(),
            active_plan_markers: default_active_markers(),
        }
    }
}

// ---------------------------------------------------------------------------
// RecoveryConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    #[serde(default = "default_plan_lines")]
    pub plan_lines: usize,
    #[serde(default = "default_status_lines")]
    pub status_lines: usize,
}

fn default_plan_lines() -> usize {
    50
}

fn default_status_lines() -> usize {
    40
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            plan_lines: default_plan_lines(),
            status_lines: default_status_lines(),
        }
    }
}

// ---------------------------------------------------------------------------
// PlanningConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    #[serde(default = "default_progress_excerpt")]
    pub progress_excerpt_chars: usize,
}

fn default_progress_excerpt() -> usize {
    500
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            progress_excerpt_chars: default_progress_excerpt(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Directory (relative to the project root) holding the required documents.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub recovery: RecoveryConfig,
    #[serde(default)]
    pub planning: PlanningConfig,
}

fn default_version() -> u32 {
    1
}

fn default_docs_dir() -> String {
    paths::DOCS_DIR.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            docs_dir: default_docs_dir(),
            snapshot: SnapshotConfig::default(),
            recovery: RecoveryConfig::default(),
            planning: PlanningConfig::default(),
        }
    }
}

impl Config {
    /// Load `.claude/clouvel.yaml`, falling back to defaults when the file is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&data)
            .map_err(|e| ClouvelError::InvalidConfig(format!("{}: {e}", path.display())))
    }

    pub fn docs_path(&self, root: &Path) -> std::path::PathBuf {
        paths::docs_dir(root, &self.docs_dir)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.docs_dir.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "docs_dir is empty".to_string(),
            });
        } else if Path::new(&self.docs_dir).is_absolute() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "docs_dir '{}' is absolute; it should be relative to the project root",
                    self.docs_dir
                ),
            });
        }

        let limits = [
            ("snapshot.status_excerpt_chars", self.snapshot.status_excerpt_chars),
            ("snapshot.plan_excerpt_chars", self.snapshot.plan_excerpt_chars),
            ("snapshot.max_rules_per_kind", self.snapshot.max_rules_per_kind),
            ("recovery.plan_lines", self.recovery.plan_lines),
            ("recovery.status_lines", self.recovery.status_lines),
            (
                "planning.progress_excerpt_chars",
                self.planning.progress_excerpt_chars,
            ),
        ];
        for (key, value) in limits {
            if value == 0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("{key} is 0; the corresponding section will always be empty"),
                });
            }
        }

        if self.snapshot.active_plan_markers.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "snapshot.active_plan_markers is empty; no plan will ever be captured"
                    .to_string(),
            });
        }
        if self
            .snapshot
            .active_plan_markers
            .iter()
            .any(|m| m.is_empty())
        {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "snapshot.active_plan_markers contains an empty marker".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
