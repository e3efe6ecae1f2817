use crate::utils::error::{NewsError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(NewsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(NewsError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(NewsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| NewsError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(NewsError::InvalidConfigValueError {
            field: field_name.to_string(),
            // API key 不應出現在錯誤訊息中，只回報長度
            value: format!("<{} chars>", value.len()),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(NewsError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("base_url", "https://newsapi.org").is_ok());
        assert!(validate_url("base_url", "http://localhost:8080").is_ok());
        assert!(validate_url("base_url", "").is_err());
        assert!(validate_url("base_url", "newsapi.org").is_err());
        assert!(validate_url("base_url", "ftp://newsapi.org").is_err());
    }

    #[test]
    fn test_validate_non_empty_string_hides_value() {
        assert!(validate_non_empty_string("news_api_key", "abc123").is_ok());

        let err = validate_non_empty_string("news_api_key", "   ").unwrap_err();
        match err {
            NewsError::InvalidConfigValueError { field, value, .. } => {
                assert_eq!(field, "news_api_key");
                assert_eq!(value, "<3 chars>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("request_timeout_seconds", 30u64, 1, 300).is_ok());
        assert!(validate_range("request_timeout_seconds", 0u64, 1, 300).is_err());
        assert!(validate_range("request_timeout_seconds", 301u64, 1, 300).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("reddit-r-all".to_string());
        let missing: Option<String> = None;
        assert_eq!(
            validate_required_field("default_source", &present).unwrap(),
            "reddit-r-all"
        );
        assert!(matches!(
            validate_required_field("default_source", &missing),
            Err(NewsError::MissingConfigError { .. })
        ));
    }
}
