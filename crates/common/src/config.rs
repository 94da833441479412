//! Runtime settings.

use serde::Deserialize;
use std::path::Path;

/// Top-level settings.
///
/// Every field has a compiled-in default, so library callers can use
/// [`Settings::default`] without touching the filesystem.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Photon proxy settings.
    #[serde(default)]
    pub photon: PhotonSettings,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Hosts used when rewriting image URLs through Photon.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PhotonSettings {
    /// Host that generic external images are rewritten onto.
    #[serde(default = "default_proxy_host")]
    pub proxy_host: String,
    /// Hosts that are already Photon image hosts.
    #[serde(default = "default_proxy_hosts")]
    pub proxy_hosts: Vec<String>,
    /// Domain shared by every Photon image host.
    #[serde(default = "default_proxy_domain")]
    pub proxy_domain: String,
    /// Primary service domain, which understands Photon query params itself.
    #[serde(default = "default_service_domain")]
    pub service_domain: String,
    /// Prefix of the authenticated proxy for private atomic sites.
    #[serde(default = "default_atomic_proxy_prefix")]
    pub atomic_proxy_prefix: String,
    /// Suffix of the authenticated proxy for private atomic sites.
    #[serde(default = "default_atomic_proxy_suffix")]
    pub atomic_proxy_suffix: String,
}

impl Default for PhotonSettings {
    fn default() -> Self {
        Self {
            proxy_host: default_proxy_host(),
            proxy_hosts: default_proxy_hosts(),
            proxy_domain: default_proxy_domain(),
            service_domain: default_service_domain(),
            atomic_proxy_prefix: default_atomic_proxy_prefix(),
            atomic_proxy_suffix: default_atomic_proxy_suffix(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_proxy_host() -> String {
    "i0.wp.com".to_string()
}

fn default_proxy_hosts() -> Vec<String> {
    vec![
        "i0.wp.com".to_string(),
        "i1.wp.com".to_string(),
        "i2.wp.com".to_string(),
    ]
}

fn default_proxy_domain() -> String {
    ".wp.com".to_string()
}

fn default_service_domain() -> String {
    "wordpress.com".to_string()
}

fn default_atomic_proxy_prefix() -> String {
    "https://public-api.wordpress.com/wpcom/v2/sites/".to_string()
}

fn default_atomic_proxy_suffix() -> String {
    "/atomic-auth-proxy/file".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Settings {
    /// Load settings from files and environment variables.
    ///
    /// Settings are loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `WPUTILS_ENV`)
    /// 3. Environment variables with `WPUTILS_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("WPUTILS_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("WPUTILS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load settings from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("WPUTILS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Parse settings from an in-memory TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
