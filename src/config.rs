use crate::error::{ConfigError, Result};
use crate::logging::parse_log_level;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct UrlConfig {
    #[serde(default = "default_docs_url")]
    pub docs_url: String,
    #[serde(default = "default_pep_url")]
    pub pep_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: PathBuf,
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_true")]
    pub cache: bool,
    #[serde(default = "default_true")]
    pub progress: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_filename")]
    pub filename: String,
    #[serde(default = "default_log_max_bytes")]
    pub max_bytes: u64,
    #[serde(default = "default_log_backups")]
    pub backups: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub urls: UrlConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            docs_url: default_docs_url(),
            pep_url: default_pep_url(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            downloads_dir: default_downloads_dir(),
            results_dir: default_results_dir(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            cache: true,
            progress: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            filename: default_log_filename(),
            max_bytes: default_log_max_bytes(),
            backups: default_log_backups(),
        }
    }
}

impl Config {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        }
        Self::from_file(path)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;
        let config = Self::from_toml(&content)?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Index page listing every "What's New" article.
    pub fn whats_new_url(&self) -> Result<Url> {
        join_url(&self.urls.docs_url, "whatsnew/")
    }

    pub fn downloads_url(&self) -> Result<Url> {
        join_url(&self.urls.docs_url, "download.html")
    }

    fn validate(&self) -> Result<()> {
        validate_base_url("docs_url", &self.urls.docs_url)?;
        validate_base_url("pep_url", &self.urls.pep_url)?;

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be greater than 0".to_string(),
            )
            .into());
        }

        if self.http.user_agent.is_empty() {
            return Err(ConfigError::MissingField("user_agent".to_string()).into());
        }

        if self.logging.max_bytes == 0 {
            return Err(ConfigError::InvalidValue(
                "logging.max_bytes must be greater than 0".to_string(),
            )
            .into());
        }

        if self.logging.filename.is_empty() {
            return Err(ConfigError::MissingField("logging.filename".to_string()).into());
        }

        parse_log_level(&self.logging.level)?;

        Ok(())
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ConfigError::MissingField(field.to_string()).into());
    }
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidValue(format!("{} is not a valid URL: {}", field, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue(format!(
            "{} must start with http(s): {}",
            field, value
        ))
        .into());
    }
    // Relative links only resolve under the base when it ends in a slash.
    if !value.ends_with('/') {
        return Err(ConfigError::InvalidValue(format!(
            "{} must end with '/': {}",
            field, value
        ))
        .into());
    }
    Ok(())
}

fn join_url(base: &str, path: &str) -> Result<Url> {
    Url::parse(base)
        .and_then(|base| base.join(path))
        .map_err(|e| ConfigError::InvalidValue(format!("cannot join {} onto {}: {}", path, base, e)).into())
}

fn default_docs_url() -> String {
    "https://docs.python.org/3/".to_string()
}

fn default_pep_url() -> String {
    "https://peps.python.org/".to_string()
}

fn default_downloads_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".cache")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("pydoc-scraper/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filename() -> String {
    "parser.log".to_string()
}

fn default_log_max_bytes() -> u64 {
    1_000_000
}

fn default_log_backups() -> usize {
    5
}
