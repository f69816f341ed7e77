//! Configuration file handling
//!
//! 查找顺序：`--config` / `QCLOUD_TOOLKIT_CONFIG` > `<config_dir>/qcloud-toolkit/config.toml`。
//! 文件不存在时使用默认配置；环境变量中的凭证优先于文件。
//!
//! ```toml
//! [client]
//! default_region = "gz"
//! signature_method = "sha256"
//!
//! [credentials]
//! secret_id = "AKID..."
//! secret_key = "..."
//!
//! [log]
//! level = "debug"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use qcloud_toolkit_api::{ClientConfig, Credentials, ENV_SESSION_TOKEN};
use serde::Deserialize;

/// Environment variable pointing at the configuration file.
pub const CONFIG_ENV: &str = "QCLOUD_TOOLKIT_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub client: ClientConfig,
    pub credentials: Option<Credentials>,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl FileConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("invalid configuration")?;
        config.client.validate()?;
        Ok(config)
    }

    /// Load from `explicit` (must exist) or the default location (optional).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Credentials from the environment, falling back to the `[credentials]` table.
    pub fn credentials(&self) -> Result<Credentials> {
        merge_credentials(
            Credentials::from_env(),
            self.credentials.clone(),
            std::env::var(ENV_SESSION_TOKEN).ok(),
        )
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("qcloud-toolkit").join("config.toml"))
}

fn merge_credentials(
    from_env: Option<Credentials>,
    from_file: Option<Credentials>,
    env_token: Option<String>,
) -> Result<Credentials> {
    if let Some(credentials) = from_env {
        return Ok(credentials);
    }
    let Some(mut credentials) = from_file else {
        bail!(
            "no credentials: set TENCENTCLOUD_SECRETID / TENCENTCLOUD_SECRETKEY or add a [credentials] table to the config file"
        );
    };
    if credentials.session_token.is_none() {
        credentials.session_token = env_token.filter(|t| !t.is_empty());
    }
    Ok(credentials)
}
