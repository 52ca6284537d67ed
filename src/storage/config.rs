//! Configuration files
//!
//! Two YAML files feed configuration resolution:
//! - the global multi-account store at `~/.config/recuerd0/config.yaml`
//! - an optional per-project `.recuerd0.yaml`, found by walking up from the
//!   working directory

use super::Result;
use crate::error::StorageError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://recuerd0.ai";

const APP_DIR: &str = "recuerd0";
const GLOBAL_FILE_NAME: &str = "config.yaml";
pub const LOCAL_FILE_NAME: &str = ".recuerd0.yaml";

/// Credentials for a single named account
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub api_url: String,
}

/// The persisted multi-account store
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalConfig {
    #[serde(default)]
    pub current: String,
    #[serde(default)]
    pub accounts: BTreeMap<String, AccountConfig>,
}

/// Per-project override. Only re-selects the account and the workspace.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalConfig {
    #[serde(default)]
    pub account: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub workspace: String,
}

// `workspace: 5` and `workspace: "5"` are the same workspace.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar workspace identifier, got {:?}",
            other
        ))),
    }
}

impl GlobalConfig {
    /// Load the store from `path`. A missing or empty file is an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|source| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(GlobalConfig::default());
        }

        serde_yaml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
            path: path.to_string_lossy().to_string(),
            message: e.to_string(),
        })
    }

    /// Write the store to `path`, replacing the previous file in one rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            // An existing directory keeps its mode
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                    path: parent.to_string_lossy().to_string(),
                    source,
                })?;
                restrict_permissions(parent, 0o700)?;
            }
        }

        let yaml = serde_yaml::to_string(self).map_err(|e| StorageError::ConfigSerialize {
            message: e.to_string(),
        })?;

        let tmp_path = path.with_extension("yaml.tmp");
        fs::write(&tmp_path, yaml).map_err(|source| StorageError::FileIo {
            path: tmp_path.to_string_lossy().to_string(),
            source,
        })?;
        let replaced = restrict_permissions(&tmp_path, 0o600).and_then(|()| {
            fs::rename(&tmp_path, path).map_err(|source| StorageError::FileIo {
                path: path.to_string_lossy().to_string(),
                source,
            })
        });
        if replaced.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }

        replaced
    }

    pub fn get_account(&self, name: &str) -> Option<&AccountConfig> {
        self.accounts.get(name)
    }

    /// Insert or replace an account. The first account, or any account added
    /// while no account is current, becomes current.
    pub fn add_account(&mut self, name: &str, token: &str, api_url: Option<&str>) {
        let api_url = api_url
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .to_string();

        self.accounts.insert(
            name.to_string(),
            AccountConfig {
                token: token.to_string(),
                api_url,
            },
        );

        if self.current.is_empty() || self.accounts.len() == 1 {
            self.current = name.to_string();
        }
    }

    pub fn remove_account(&mut self, name: &str) -> Result<()> {
        if !self.accounts.contains_key(name) {
            return Err(StorageError::AccountNotFound {
                name: name.to_string(),
            });
        }
        if self.current == name && self.accounts.len() > 1 {
            return Err(StorageError::CurrentAccountInUse {
                name: name.to_string(),
            });
        }

        self.accounts.remove(name);
        if self.current == name {
            self.current.clear();
        }
        Ok(())
    }

    pub fn set_current(&mut self, name: &str) -> Result<()> {
        if !self.accounts.contains_key(name) {
            return Err(StorageError::AccountNotFound {
                name: name.to_string(),
            });
        }
        self.current = name.to_string();
        Ok(())
    }
}

impl LocalConfig {
    /// Walk from `start_dir` up to the filesystem root and parse the first
    /// `.recuerd0.yaml` found. Levels without a readable file are skipped.
    pub fn find(start_dir: &Path) -> Result<Option<Self>> {
        for dir in start_dir.ancestors() {
            let path = dir.join(LOCAL_FILE_NAME);
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(_) => continue,
            };

            if content.trim().is_empty() {
                return Ok(Some(LocalConfig::default()));
            }

            let local = serde_yaml::from_str(&content).map_err(|e| {
                StorageError::ConfigParseError {
                    path: path.to_string_lossy().to_string(),
                    message: e.to_string(),
                }
            })?;
            return Ok(Some(local));
        }

        Ok(None)
    }
}

/// Location of the global store.
///
/// An explicit directory wins, then `$XDG_CONFIG_HOME/recuerd0`, then
/// `~/.config/recuerd0`.
pub fn global_config_path(config_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = config_dir {
        return Ok(dir.join(GLOBAL_FILE_NAME));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(APP_DIR).join(GLOBAL_FILE_NAME));
    }

    let home_dir = dirs::home_dir().ok_or(StorageError::ConfigDirNotFound)?;
    Ok(home_dir.join(".config").join(APP_DIR).join(GLOBAL_FILE_NAME))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|source| {
        StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
