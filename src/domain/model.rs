use crate::utils::error::{NewsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 文章所屬的新聞來源資訊
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

fn string_field(obj: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

/// 票數可能是整數、浮點數或數字字串，浮點數直接截斷
fn votes_field(value: Option<&serde_json::Value>) -> i64 {
    match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().map(|f| f.trunc() as i64).unwrap_or(0),
        _ => 0,
    }
}

fn source_field(value: Option<&serde_json::Value>) -> Option<ArticleSource> {
    match value? {
        serde_json::Value::String(id) => Some(ArticleSource {
            id: Some(id.clone()),
            name: None,
        }),
        serde_json::Value::Object(obj) => Some(ArticleSource {
            id: string_field(obj, "id"),
            name: string_field(obj, "name"),
        }),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub votes: i64,
    pub source: Option<ArticleSource>,
}

impl Article {
    pub fn new(title: impl Into<String>, published_at: Option<DateTime<Utc>>, votes: i64) -> Self {
        Self {
            title: title.into(),
            description: None,
            author: None,
            url: None,
            image_url: None,
            published_at,
            votes,
            source: None,
        }
    }

    /// 由 API 回傳的 JSON 建立文章
    ///
    /// `publishedAt` 無法解析時視為沒有發佈時間；`votes` 缺少時為 0，浮點數會截斷。
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        // 只有整個元素不是物件時才失敗，個別欄位型別不符一律給預設值
        let obj: serde_json::Map<String, serde_json::Value> = serde_json::from_value(value)?;

        let published_at = obj
            .get("publishedAt")
            .and_then(|v| v.as_str())
            .and_then(|s| {
                DateTime::parse_from_rfc3339(s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        tracing::debug!("Unparseable publishedAt '{}': {}", s, e);
                    })
                    .ok()
            });

        Ok(Self {
            title: string_field(&obj, "title").unwrap_or_default(),
            description: string_field(&obj, "description"),
            author: string_field(&obj, "author"),
            url: string_field(&obj, "url"),
            image_url: string_field(&obj, "urlToImage"),
            published_at,
            votes: votes_field(obj.get("votes")),
            source: source_field(obj.get("source")),
        })
    }

    /// 回應層級的 `source` 只在文章本身沒有來源時套用
    pub fn with_default_source(mut self, source_key: Option<&str>) -> Self {
        if self.source.is_none() {
            self.source = source_key.map(|id| ArticleSource {
                id: Some(id.to_string()),
                name: None,
            });
        }
        self
    }
}

/// API 回傳的來源描述，原樣保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Source(pub serde_json::Value);

impl Source {
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(|v| v.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKind {
    Time,
    Votes,
}

impl FromStr for SortKind {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "time" => Ok(SortKind::Time),
            "votes" => Ok(SortKind::Votes),
            _ => Err(NewsError::InvalidSortKind(s.to_string())),
        }
    }
}

impl fmt::Display for SortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKind::Time => write!(f, "Time"),
            SortKind::Votes => write!(f, "Votes"),
        }
    }
}

/// 排序方向：`Descending` 對應 +1（最新、最多票在前），`Ascending` 對應 -1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Descending,
    Ascending,
}

impl SortDirection {
    pub fn from_sign(sign: i32) -> Self {
        if sign < 0 {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    pub fn sign(self) -> i32 {
        match self {
            SortDirection::Descending => 1,
            SortDirection::Ascending => -1,
        }
    }
}

impl From<i32> for SortDirection {
    fn from(sign: i32) -> Self {
        Self::from_sign(sign)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub kind: SortKind,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            kind: SortKind::Time,
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    /// 淺層合併：未指定的欄位沿用目前的值
    pub fn merge(self, update: SortUpdate) -> Self {
        Self {
            kind: update.kind.unwrap_or(self.kind),
            direction: update.direction.unwrap_or(self.direction),
        }
    }
}

/// 部分排序更新
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortUpdate {
    pub kind: Option<SortKind>,
    pub direction: Option<SortDirection>,
}

impl SortUpdate {
    pub fn new(kind: SortKind, direction: impl Into<SortDirection>) -> Self {
        Self {
            kind: Some(kind),
            direction: Some(direction.into()),
        }
    }

    pub fn kind(kind: SortKind) -> Self {
        Self {
            kind: Some(kind),
            direction: None,
        }
    }

    pub fn direction(direction: impl Into<SortDirection>) -> Self {
        Self {
            kind: None,
            direction: Some(direction.into()),
        }
    }
}
