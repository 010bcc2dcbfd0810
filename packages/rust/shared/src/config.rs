//! Application configuration for the Help Center tools.
//!
//! User config lives at `~/.helpcenter/helpcenter.toml`.
//! CLI flags and environment variables override config file values,
//! which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{HelpCenterError, Result};
use crate::types::{Credentials, DEFAULT_LOCALE, DEFAULT_PAGE, DEFAULT_PER_PAGE, RetrievalDefaults};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "helpcenter.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".helpcenter";

// ---------------------------------------------------------------------------
// Config structs (matching helpcenter.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Account settings.
    #[serde(default)]
    pub zendesk: ZendeskConfig,

    /// Retrieval defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// `[zendesk]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZendeskConfig {
    /// Account subdomain (`acme` for `acme.zendesk.com`).
    #[serde(default)]
    pub subdomain: String,

    /// Agent email used as the basic-auth account identifier.
    #[serde(default)]
    pub email: String,

    /// Name of the env var holding the API token (never store the token itself).
    #[serde(default = "default_api_token_env")]
    pub api_token_env: String,

    /// Override for the Help Center API root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ZendeskConfig {
    fn default() -> Self {
        Self {
            subdomain: String::new(),
            email: String::new(),
            api_token_env: default_api_token_env(),
            base_url: None,
        }
    }
}

fn default_api_token_env() -> String {
    "ZENDESK_API_TOKEN".into()
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

fn default_locale() -> String {
    DEFAULT_LOCALE.into()
}
fn default_page() -> u32 {
    DEFAULT_PAGE
}
fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

/// `[http]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// Overrides and resolution
// ---------------------------------------------------------------------------

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub subdomain: Option<String>,
    pub email: Option<String>,
    pub locale: Option<String>,
}

impl AppConfig {
    /// Overlay non-empty override values onto the loaded file config.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(subdomain) = non_empty(overrides.subdomain.as_deref()) {
            self.zendesk.subdomain = subdomain.to_string();
        }
        if let Some(email) = non_empty(overrides.email.as_deref()) {
            self.zendesk.email = email.to_string();
        }
        if let Some(locale) = non_empty(overrides.locale.as_deref()) {
            self.defaults.locale = locale.to_string();
        }
    }

    /// Retrieval defaults, with zero paging values replaced by the built-ins.
    pub fn retrieval_defaults(&self) -> RetrievalDefaults {
        let locale = non_empty(Some(&self.defaults.locale)).unwrap_or(DEFAULT_LOCALE);
        RetrievalDefaults {
            locale: locale.to_string(),
            page: if self.defaults.page == 0 { DEFAULT_PAGE } else { self.defaults.page },
            per_page: if self.defaults.per_page == 0 {
                DEFAULT_PER_PAGE
            } else {
                self.defaults.per_page
            },
        }
    }

    /// The API root every endpoint is resolved against.
    ///
    /// Returned with a trailing slash so that `Url::join` appends.
    pub fn base_url(&self) -> Result<Url> {
        let raw = match &self.zendesk.base_url {
            Some(url) => url.clone(),
            None => {
                let subdomain = self.zendesk.subdomain.trim();
                if subdomain.is_empty() {
                    return Err(HelpCenterError::config(
                        "Zendesk subdomain not set. Set ZENDESK_SUBDOMAIN or [zendesk].subdomain.",
                    ));
                }
                format!("https://{subdomain}.zendesk.com/api/v2/help_center")
            }
        };

        let with_slash = if raw.ends_with('/') { raw } else { format!("{raw}/") };
        Url::parse(&with_slash)
            .map_err(|e| HelpCenterError::config(format!("invalid base URL '{with_slash}': {e}")))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build credentials from the config plus the token env var.
///
/// Missing subdomain, email, or token is fatal for the caller.
pub fn resolve_credentials(config: &AppConfig) -> Result<Credentials> {
    let token = std::env::var(&config.zendesk.api_token_env).ok();
    credentials_from(config, token.as_deref())
}

fn credentials_from(config: &AppConfig, token: Option<&str>) -> Result<Credentials> {
    let subdomain = non_empty(Some(&config.zendesk.subdomain)).ok_or_else(|| {
        HelpCenterError::config(
            "Zendesk subdomain not set. Set ZENDESK_SUBDOMAIN or [zendesk].subdomain.",
        )
    })?;
    let email = non_empty(Some(&config.zendesk.email)).ok_or_else(|| {
        HelpCenterError::config("Zendesk email not set. Set ZENDESK_EMAIL or [zendesk].email.")
    })?;
    let var_name = &config.zendesk.api_token_env;
    let token = non_empty(token).ok_or_else(|| {
        HelpCenterError::config(format!(
            "Zendesk API token not found. Set the {var_name} environment variable."
        ))
    })?;

    Ok(Credentials::new(subdomain, email, token))
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.helpcenter/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| HelpCenterError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.helpcenter/helpcenter.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| HelpCenterError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        HelpCenterError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| HelpCenterError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| HelpCenterError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| HelpCenterError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
