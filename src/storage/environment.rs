//! Environment and flag overrides
//!
//! Environment variables and command-line flags carry the same four optional
//! settings, so both are represented as a [`ConfigLayer`].

use std::env;

pub const ENV_ACCOUNT: &str = "RECUERD0_ACCOUNT";
pub const ENV_TOKEN: &str = "RECUERD0_TOKEN";
pub const ENV_API_URL: &str = "RECUERD0_API_URL";
pub const ENV_WORKSPACE: &str = "RECUERD0_WORKSPACE";

/// One override layer. `None` means the layer does not set the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub account: Option<String>,
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub workspace: Option<String>,
}

impl ConfigLayer {
    /// Build a layer, dropping empty values.
    pub fn new(
        account: Option<String>,
        token: Option<String>,
        api_url: Option<String>,
        workspace: Option<String>,
    ) -> Self {
        Self {
            account: non_empty(account),
            token: non_empty(token),
            api_url: non_empty(api_url),
            workspace: non_empty(workspace),
        }
    }

    /// Read the `RECUERD0_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the layer through an arbitrary lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(
            lookup(ENV_ACCOUNT),
            lookup(ENV_TOKEN),
            lookup(ENV_API_URL),
            lookup(ENV_WORKSPACE),
        )
    }
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
