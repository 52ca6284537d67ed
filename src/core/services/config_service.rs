//! Configuration service: layered resolution and account management
//!
//! Precedence, lowest first: global store, local `.recuerd0.yaml`,
//! `RECUERD0_*` environment variables, command-line flags.

use crate::Result;
use crate::storage::config::{
    AccountConfig, DEFAULT_API_URL, GlobalConfig, LocalConfig, global_config_path,
};
use crate::storage::environment::ConfigLayer;
use log::debug;
use std::path::{Path, PathBuf};

/// Effective settings for one invocation. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub token: String,
    pub api_url: String,
    pub account: String,
    pub workspace: String,
}

impl ResolvedConfig {
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn workspace(&self) -> Option<&str> {
        Some(self.workspace.as_str()).filter(|w| !w.is_empty())
    }
}

/// Merge already loaded layers into a [`ResolvedConfig`].
///
/// The account name is settled first because it selects which global
/// credentials the lower layers contribute.
pub fn merge_layers(
    global: &GlobalConfig,
    local: Option<&LocalConfig>,
    env: &ConfigLayer,
    flags: &ConfigLayer,
) -> ResolvedConfig {
    let mut resolved = ResolvedConfig {
        account: global.current.clone(),
        ..ResolvedConfig::default()
    };

    if let Some(local) = local {
        if !local.account.is_empty() {
            resolved.account = local.account.clone();
        }
    }
    if let Some(account) = &env.account {
        resolved.account = account.clone();
    }
    if let Some(account) = &flags.account {
        resolved.account = account.clone();
    }

    if let Some(acct) = global.get_account(&resolved.account) {
        resolved.token = acct.token.clone();
        resolved.api_url = acct.api_url.clone();
    }

    if let Some(local) = local {
        if !local.workspace.is_empty() {
            resolved.workspace = local.workspace.clone();
        }
    }

    for layer in [env, flags] {
        if let Some(token) = &layer.token {
            resolved.token = token.clone();
        }
        if let Some(api_url) = &layer.api_url {
            resolved.api_url = api_url.clone();
        }
        if let Some(workspace) = &layer.workspace {
            resolved.workspace = workspace.clone();
        }
    }

    if resolved.api_url.is_empty() {
        resolved.api_url = DEFAULT_API_URL.to_string();
    }

    resolved
}

/// Owns the inputs of configuration resolution for one process run
pub struct ConfigService {
    config_path: PathBuf,
    env: ConfigLayer,
    working_dir: Option<PathBuf>,
}

impl ConfigService {
    /// Create a service over explicit inputs
    pub fn new(config_path: PathBuf, env: ConfigLayer, working_dir: Option<PathBuf>) -> Self {
        Self {
            config_path,
            env,
            working_dir,
        }
    }

    /// Create a service from the process environment and working directory
    pub fn from_environment(config_dir: Option<&Path>) -> Result<Self> {
        let config_path = global_config_path(config_dir)?;
        Ok(Self::new(
            config_path,
            ConfigLayer::from_env(),
            std::env::current_dir().ok(),
        ))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load_global(&self) -> Result<GlobalConfig> {
        Ok(GlobalConfig::load(&self.config_path)?)
    }

    pub fn find_local(&self) -> Result<Option<LocalConfig>> {
        match &self.working_dir {
            Some(dir) => Ok(LocalConfig::find(dir)?),
            None => Ok(None),
        }
    }

    /// Resolve the effective configuration for this invocation
    pub fn resolve(&self, flags: &ConfigLayer) -> Result<ResolvedConfig> {
        let global = self.load_global()?;
        let local = self.find_local()?;

        let resolved = merge_layers(&global, local.as_ref(), &self.env, flags);
        debug!(
            "Resolved account '{}' against {} (workspace: '{}')",
            resolved.account, resolved.api_url, resolved.workspace
        );
        Ok(resolved)
    }

    /// Add or replace an account and persist the store
    pub fn add_account(
        &self,
        name: &str,
        token: &str,
        api_url: Option<&str>,
    ) -> Result<AccountConfig> {
        let mut global = self.load_global()?;
        global.add_account(name, token, api_url);
        global.save(&self.config_path)?;

        Ok(global.get_account(name).cloned().unwrap_or_default())
    }

    pub fn remove_account(&self, name: &str) -> Result<()> {
        let mut global = self.load_global()?;
        global.remove_account(name)?;
        global.save(&self.config_path)?;
        Ok(())
    }

    pub fn set_current(&self, name: &str) -> Result<()> {
        let mut global = self.load_global()?;
        global.set_current(name)?;
        global.save(&self.config_path)?;
        Ok(())
    }

    pub fn list_accounts(&self) -> Result<GlobalConfig> {
        self.load_global()
    }
}
