//! Configuration of the MPEC fetch layer.
//!
//! [`FetchConfig::default`] targets the production MPC services. Fields are overridden
//! with the `with_*` builders or from the environment with [`FetchConfig::from_env`]:
//!
//! | variable                     | field        |
//! |------------------------------|--------------|
//! | `MPC_TOOLKIT_BASE_URL`       | `base_url`   |
//! | `MPC_TOOLKIT_CACHE_DIR`      | `cache_dir`  |
//! | `MPC_TOOLKIT_LIST_TTL_SECS`  | `list_ttl`   |
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use tracing::warn;

use crate::constants::{
    HTTP_TIMEOUT, MPC_BASE_URL, MPC_MPEC_API_URL, RECENT_LIST_TTL, USER_AGENT,
};

const ENV_BASE_URL: &str = "MPC_TOOLKIT_BASE_URL";
const ENV_CACHE_DIR: &str = "MPC_TOOLKIT_CACHE_DIR";
const ENV_LIST_TTL: &str = "MPC_TOOLKIT_LIST_TTL_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    /// Web root of the MPC site, without trailing slash
    pub base_url: String,
    /// MPEC search endpoint of the MPC API
    pub api_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Lifetime of the cached RecentMPECs list
    pub list_ttl: Duration,
    /// Lifetime of a designation lookup, `None` keeps it for the life of the client
    pub lookup_ttl: Option<Duration>,
    /// Directory of the bulletin disk cache, `None` disables it
    pub cache_dir: Option<Utf8PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            base_url: MPC_BASE_URL.to_string(),
            api_url: MPC_MPEC_API_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: HTTP_TIMEOUT,
            list_ttl: RECENT_LIST_TTL,
            lookup_ttl: None,
            cache_dir: None,
        }
    }
}

impl FetchConfig {
    /// Default configuration with the environment overrides applied.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let lookup = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        FetchConfig::default().apply_overrides(
            lookup(ENV_BASE_URL),
            lookup(ENV_CACHE_DIR),
            lookup(ENV_LIST_TTL),
        )
    }

    fn apply_overrides(
        mut self,
        base_url: Option<String>,
        cache_dir: Option<String>,
        list_ttl: Option<String>,
    ) -> Self {
        if let Some(url) = base_url {
            self = self.with_base_url(url.trim());
        }
        if let Some(dir) = cache_dir {
            self.cache_dir = Some(Utf8PathBuf::from(dir.trim()));
        }
        if let Some(secs) = list_ttl {
            match secs.trim().parse::<u64>() {
                Ok(secs) => self.list_ttl = Duration::from_secs(secs),
                Err(_) => warn!(variable = ENV_LIST_TTL, value = %secs, "ignoring invalid TTL"),
            }
        }
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_list_ttl(mut self, ttl: Duration) -> Self {
        self.list_ttl = ttl;
        self
    }

    pub fn with_lookup_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.lookup_ttl = ttl;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl AsRef<Utf8Path>) -> Self {
        self.cache_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Enable the disk cache in [`default_cache_dir`], when it can be resolved.
    pub fn with_default_cache_dir(mut self) -> Self {
        self.cache_dir = default_cache_dir();
        self
    }

    /// Full URL of an MPC site path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Default bulletin cache directory: `<user cache dir>/mpc_toolkit_cache/mpec`.
///
/// Return
/// ------
/// * `None` when the home directory is unknown or the cache path is not UTF-8
pub fn default_cache_dir() -> Option<Utf8PathBuf> {
    let base_dir = BaseDirs::new()?;
    let cache_path = Utf8Path::from_path(base_dir.cache_dir())?;
    Some(cache_path.join("mpc_toolkit_cache").join("mpec"))
}
