//! Configuration management for Pagewright.
//!
//! Parses `pagewright.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `generator.api_url`
//! - `generator.api_key`
//! - `mirror.api_url`
//! - `mirror.owner`
//! - `mirror.repo`
//! - `mirror.token`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override site directory.
    pub site_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "pagewright.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Site configuration (path is a relative string from TOML).
    site: SiteConfigRaw,
    /// Content generator configuration.
    pub generator: GeneratorConfig,
    /// Mirror configuration. Absent means mirroring is disabled.
    pub mirror: Option<MirrorConfig>,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7878,
        }
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    dir: Option<String>,
}

/// Resolved site configuration with an absolute directory.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Directory holding live files, previews and snapshot history.
    pub dir: PathBuf,
}

/// Content generator configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Chat-completions endpoint URL.
    pub api_url: String,
    /// Bearer credential. Defaults to `${GROQ_API_KEY:-}` so the key is
    /// taken from the environment without appearing in the file.
    pub api_key: String,
    /// Model selector.
    pub model: String,
    /// Minimum seconds between admitted generation calls.
    pub min_interval_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai/v1/chat/completions".to_owned(),
            api_key: "${GROQ_API_KEY:-}".to_owned(),
            model: "llama-3.1-70b".to_owned(),
            min_interval_secs: 5,
        }
    }
}

/// Mirror configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// API base URL.
    pub api_url: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Access token. Defaults to `${GITHUB_TOKEN:-}`.
    pub token: String,
    /// Path prefix inside the repository for site files.
    pub path_prefix: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_owned(),
            owner: String::new(),
            repo: String::new(),
            token: "${GITHUB_TOKEN:-}".to_owned(),
            path_prefix: "site".to_owned(),
        }
    }
}

impl MirrorConfig {
    /// Whether the mirror has everything it needs to commit.
    ///
    /// Incomplete credentials degrade mirroring to a logged no-op, they
    /// are not a startup error.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.owner.is_empty() && !self.repo.is_empty() && !self.token.is_empty()
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`mirror.token`").
        field: String,
        /// Error message (e.g., "${`GITHUB_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `pagewright.toml` in current directory and
    /// parents, falling back to built-in defaults.
    ///
    /// CLI settings are applied after loading and path resolution, allowing
    /// CLI arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing
    /// fails, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            // Built-in defaults still carry env references for secrets.
            let mut config = Self::default_with_cwd();
            config.expand_env_vars()?;
            config
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(site_dir) = &settings.site_dir {
            self.site_resolved.dir.clone_from(site_dir);
        }
    }

    /// Mirror configuration, only when complete enough to commit.
    #[must_use]
    pub fn mirror(&self) -> Option<&MirrorConfig> {
        self.mirror.as_ref().filter(|m| m.is_configured())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfigRaw::default(),
            generator: GeneratorConfig::default(),
            mirror: None,
            site_resolved: SiteConfig {
                dir: base.join("site"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        require_http_url(&self.generator.api_url, "generator.api_url")?;
        require_non_empty(&self.generator.model, "generator.model")?;

        if let Some(mirror) = &self.mirror {
            require_http_url(&mirror.api_url, "mirror.api_url")?;
        }
        Ok(())
    }

    /// Expand environment variables in string fields.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.generator.api_url = expand::expand_env(&self.generator.api_url, "generator.api_url")?;
        self.generator.api_key = expand::expand_env(&self.generator.api_key, "generator.api_key")?;

        if let Some(mirror) = &mut self.mirror {
            mirror.api_url = expand::expand_env(&mirror.api_url, "mirror.api_url")?;
            mirror.owner = expand::expand_env(&mirror.owner, "mirror.owner")?;
            mirror.repo = expand::expand_env(&mirror.repo, "mirror.repo")?;
            mirror.token = expand::expand_env(&mirror.token, "mirror.token")?;
        }
        Ok(())
    }

    /// Resolve the site directory against the config file location.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = self.site.dir.as_deref().unwrap_or("site");
        let expanded = shellexpand::tilde(raw);
        let path = PathBuf::from(expanded.as_ref());
        self.site_resolved.dir = if path.is_absolute() {
            path
        } else {
            config_dir.join(path)
        };
    }
}
