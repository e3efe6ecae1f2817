use crate::core::ConfigProvider;
use crate::core::service::DEFAULT_SOURCE;
use crate::utils::error::{NewsError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

#[derive(Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    pub base_url: String,
    pub news_api_key: String,
    #[serde(default = "default_source")]
    pub default_source: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

// API key 不寫進日誌
impl fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsConfig")
            .field("base_url", &self.base_url)
            .field("news_api_key", &"***")
            .field("default_source", &self.default_source)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

impl NewsConfig {
    pub fn new(base_url: impl Into<String>, news_api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            news_api_key: news_api_key.into(),
            default_source: default_source(),
            request_timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// 從環境變數載入配置
    ///
    /// `NEWS_BASE_URL` 與 `NEWS_API_KEY` 為必填，`NEWS_DEFAULT_SOURCE` 與
    /// `NEWS_REQUEST_TIMEOUT` 可省略。
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("NEWS_BASE_URL").ok();
        let api_key = env::var("NEWS_API_KEY").ok();

        let request_timeout_seconds = match env::var("NEWS_REQUEST_TIMEOUT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| NewsError::InvalidConfigValueError {
                    field: "NEWS_REQUEST_TIMEOUT".to_string(),
                    value: raw.clone(),
                    reason: "Expected a whole number of seconds".to_string(),
                })?,
            Err(_) => DEFAULT_TIMEOUT_SECONDS,
        };

        Ok(Self {
            base_url: validation::validate_required_field("NEWS_BASE_URL", &base_url)?.clone(),
            news_api_key: validation::validate_required_field("NEWS_API_KEY", &api_key)?.clone(),
            default_source: env::var("NEWS_DEFAULT_SOURCE").unwrap_or_else(|_| default_source()),
            request_timeout_seconds,
        })
    }

    /// 從 TOML 檔案載入指定環境的配置
    pub fn from_file<P: AsRef<Path>>(path: P, environment: &str) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content, environment)
    }

    /// 從 TOML 字串解析配置，每個環境一個 table，例如 `[development]`、`[production]`
    pub fn from_toml_str(content: &str, environment: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        let mut environments: HashMap<String, NewsConfig> = toml::from_str(&processed_content)
            .map_err(|e| NewsError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        environments
            .remove(environment)
            .ok_or_else(|| NewsError::MissingConfigError {
                field: format!("[{}]", environment),
            })
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_non_empty_string("news_api_key", &self.news_api_key)?;
        validation::validate_range("request_timeout_seconds", self.request_timeout_seconds, 1, 300)?;
        Ok(())
    }
}

/// 替換環境變數 (例如 ${NEWS_API_KEY})，找不到的變數保持原樣
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| NewsError::ConfigError {
        message: format!("Invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

impl ConfigProvider for NewsConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key(&self) -> &str {
        &self.news_api_key
    }

    fn default_source(&self) -> &str {
        &self.default_source
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds
    }
}

impl Validate for NewsConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ENVIRONMENTS: &str = r#"
[development]
base_url = "http://localhost:8080"
news_api_key = "dev-key"

[production]
base_url = "https://newsapi.org"
news_api_key = "${TEST_NEWS_PROD_KEY}"
default_source = "bbc-news"
request_timeout_seconds = 30
"#;

    #[test]
    fn test_select_environment_with_defaults() {
        let config = NewsConfig::from_toml_str(ENVIRONMENTS, "development").unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.api_key(), "dev-key");
        assert_eq!(config.default_source, DEFAULT_SOURCE);
        assert_eq!(config.request_timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_NEWS_PROD_KEY", "prod-secret");

        let config = NewsConfig::from_toml_str(ENVIRONMENTS, "production").unwrap();
        assert_eq!(config.news_api_key, "prod-secret");
        assert_eq!(config.default_source, "bbc-news");
        assert_eq!(config.request_timeout_seconds, 30);

        std::env::remove_var("TEST_NEWS_PROD_KEY");
    }

    #[test]
    fn test_unknown_environment() {
        let err = NewsConfig::from_toml_str(ENVIRONMENTS, "staging").unwrap_err();
        assert!(matches!(err, NewsError::MissingConfigError { field } if field == "[staging]"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = NewsConfig::new("newsapi.org", "key");
        assert!(config.validate().is_err());

        config.base_url = "https://newsapi.org".to_string();
        config.news_api_key = " ".to_string();
        assert!(config.validate().is_err());

        config.news_api_key = "key".to_string();
        config.request_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = NewsConfig::new("https://newsapi.org", "super-secret");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("https://newsapi.org"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(ENVIRONMENTS.as_bytes()).unwrap();

        let config = NewsConfig::from_file(temp_file.path(), "development").unwrap();
        assert_eq!(config.news_api_key, "dev-key");
    }
}
