use crate::core::{Article, ConfigProvider, NewsApi, Source};
use crate::utils::error::{NewsError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const ARTICLES_PATH: &str = "/v1/articles";
pub const SOURCES_PATH: &str = "/v1/sources";

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    source: Option<serde_json::Value>,
    #[serde(default)]
    articles: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SourcesResponse {
    #[serde(default)]
    sources: Vec<Source>,
}

/// 以 reqwest 實作的新聞 API 用戶端，每個請求都帶上 `apiKey`
pub struct HttpNewsClient<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> HttpNewsClient<C> {
    pub fn new(config: C) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds()))
            .build()?;
        Ok(Self { config, client })
    }

    /// 組合 `{base_url}{path}`，容許 base_url 結尾帶斜線
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url().trim_end_matches('/'), path)
    }

    fn query_params<'a>(&'a self, source_key: Option<&'a str>) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![("apiKey", self.config.api_key())];
        if let Some(key) = source_key.filter(|k| !k.is_empty()) {
            params.push(("source", key));
        }
        params
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        source_key: Option<&str>,
    ) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!("📡 GET {} (source: {:?})", url, source_key);

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(source_key))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("📡 {} responded with {}", url, status);

        if !status.is_success() {
            return Err(NewsError::HttpStatusError {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl<C: ConfigProvider> NewsApi for HttpNewsClient<C> {
    async fn fetch_articles(&self, source_key: Option<&str>) -> Result<Vec<Article>> {
        let response: ArticlesResponse = self.get_json(ARTICLES_PATH, source_key).await?;
        let response_source = response.source.as_ref().and_then(|v| v.as_str());
        let total = response.articles.len();

        // 單一元素格式錯誤只略過該筆，不影響整批
        let articles: Vec<Article> = response
            .articles
            .into_iter()
            .enumerate()
            .filter_map(|(index, json)| match Article::from_json(json) {
                Ok(article) => Some(article.with_default_source(response_source)),
                Err(e) => {
                    tracing::warn!("⚠️ Skipping malformed article #{}: {}", index, e);
                    None
                }
            })
            .collect();

        tracing::debug!("📰 Parsed {} of {} articles", articles.len(), total);
        Ok(articles)
    }

    async fn fetch_sources(&self) -> Result<Vec<Source>> {
        let response: SourcesResponse = self.get_json(SOURCES_PATH, None).await?;
        tracing::debug!("🗂️ Parsed {} sources", response.sources.len());
        Ok(response.sources)
    }
}
