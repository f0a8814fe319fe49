use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Scraping error: {0}")]
    Scraper(#[from] ScraperError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AppError {
    /// Short tag used as the `kind` field in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Client(_) => "client",
            AppError::Parse(_) => "parse",
            AppError::Scraper(_) => "scraper",
            AppError::Io(_) => "io",
            AppError::Csv(_) => "csv",
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build client: {0}")]
    BuildError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Response error {status_code} for {url}")]
    ResponseError { status_code: u16, url: String },
}

/// Structural violations: the page does not have the shape the scraper expects.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Tag not found: <{tag}> {filter}")]
    TagNotFound { tag: String, filter: String },

    #[error("Tag <{tag}> has no `{attribute}` attribute")]
    MissingAttribute { tag: String, attribute: String },

    #[error("No `Status:` label in the PEP header")]
    StatusLabelMissing,
}

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("No list containing \"All versions\" found in the sidebar")]
    VersionListNotFound,

    #[error("Unknown preview status code {code:?} for {url}")]
    UnknownPreviewStatus { code: String, url: String },

    #[error("Row has {found} columns, header has {expected}")]
    RowArity { expected: usize, found: usize },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
