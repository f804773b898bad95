use crate::error::{KvpError, Result};
use crate::paths;
use crate::project::DEFAULT_PROJECT_NAME;
use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

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
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Role a fresh session starts with.
    #[serde(default)]
    pub default_role: Role,
    #[serde(default = "default_new_project_name")]
    pub new_project_name: String,
    /// Where exports land when no directory is given explicitly.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_version() -> u32 {
    1
}

fn default_new_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            default_role: Role::default(),
            new_project_name: default_new_project_name(),
            export_dir: default_export_dir(),
        }
    }
}

impl Config {
    /// Load `.kvp/config.yaml` under `root`, falling back to defaults when the
    /// file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load an explicitly named config file. A missing file is an error here.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(KvpError::NotFound(format!(
                "config file '{}'",
                path.display()
            )));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.new_project_name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "new_project_name is empty; new projects need a name".to_string(),
            });
        }

        if self.version != default_version() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("unknown config version {}", self.version),
            });
        }

        if self.default_role == Role::Reader {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "default_role is reader; sessions start read-only".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.default_role, Role::Admin);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn explicit_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = Config::load_from(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, KvpError::NotFound(_)));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = paths::config_path(dir.path());
        crate::io::atomic_write(&path, b"default_role: editor\n").unwrap();

        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.default_role, Role::Editor);
        assert_eq!(cfg.new_project_name, DEFAULT_PROJECT_NAME);
        assert_eq!(cfg.export_dir, PathBuf::from("."));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let cfg = Config {
            new_project_name: "Neues KVP-Projekt".to_string(),
            ..Config::default()
        };
        cfg.save(dir.path()).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), cfg);
    }

    #[test]
    fn validate_flags_blank_name_and_reader_default() {
        let cfg = Config {
            new_project_name: "  ".to_string(),
            default_role: Role::Reader,
            ..Config::default()
        };
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Error));
    }
}
