use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown sort kind: {0} (expected Time or Votes)")]
    InvalidSortKind(String),
}

impl NewsError {
    /// 是否為網路或 API 層級的錯誤（狀態應保持不變）
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            NewsError::ApiError(_) | NewsError::HttpStatusError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            NewsError::ApiError(_) => "Check network connectivity and that base_url is reachable",
            NewsError::HttpStatusError { status: 401, .. }
            | NewsError::HttpStatusError { status: 403, .. } => "Check that news_api_key is valid",
            NewsError::HttpStatusError { .. } => "The News API rejected the request; retry later",
            NewsError::IoError(_) => "Check that the config file exists and is readable",
            NewsError::SerializationError(_) => "The API response was not the expected JSON shape",
            NewsError::ConfigError { .. }
            | NewsError::MissingConfigError { .. }
            | NewsError::InvalidConfigValueError { .. } => {
                "Set NEWS_BASE_URL and NEWS_API_KEY, or pass --config with a valid TOML file"
            }
            NewsError::InvalidSortKind(_) => "Use --sort Time or --sort Votes",
        }
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;
