use crate::domain::model::{Article, Source};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn default_source(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
}

/// 遠端新聞 API
///
/// `source_key` 為空字串或 `None` 時不帶 `source` 參數。
#[async_trait]
pub trait NewsApi: Send + Sync {
    async fn fetch_articles(&self, source_key: Option<&str>) -> Result<Vec<Article>>;
    async fn fetch_sources(&self) -> Result<Vec<Source>>;
}
