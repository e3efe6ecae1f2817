pub mod news_config;

#[cfg(feature = "cli")]
use crate::domain::model::{SortDirection, SortKind, SortUpdate};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "news-feed")]
#[command(about = "Fetch, sort and filter news articles from a News API")]
pub struct CliConfig {
    /// TOML config file with one table per environment; falls back to NEWS_* env vars
    #[arg(short, long)]
    pub config: Option<String>,

    /// Environment table to read from the config file
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Source key to load articles for (defaults to the configured source)
    #[arg(short, long)]
    pub source: Option<String>,

    /// Sort by Time or Votes
    #[arg(long, default_value = "Time")]
    pub sort: String,

    /// 1 for newest / most voted first, -1 to reverse
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub direction: i32,

    /// Case-insensitive pattern matched against titles
    #[arg(short, long)]
    pub filter: Option<String>,

    #[arg(long, default_value = "20")]
    pub limit: usize,

    /// Only list the available sources
    #[arg(long)]
    pub list_sources: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn sort_update(&self) -> Result<SortUpdate> {
        let kind: SortKind = self.sort.parse()?;
        Ok(SortUpdate::new(kind, SortDirection::from_sign(self.direction)))
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_args() {
        let config = CliConfig::parse_from([
            "news-feed",
            "--source",
            "bbc-news",
            "--sort",
            "votes",
            "--direction",
            "-1",
            "--filter",
            "cat",
        ]);

        assert_eq!(config.source.as_deref(), Some("bbc-news"));
        assert_eq!(config.env, "development");
        assert_eq!(config.limit, 20);
        assert_eq!(
            config.sort_update().unwrap(),
            SortUpdate::new(SortKind::Votes, SortDirection::Ascending)
        );
    }

    #[test]
    fn test_unknown_sort_kind() {
        let config = CliConfig::parse_from(["news-feed", "--sort", "comments"]);
        assert!(config.sort_update().is_err());
    }
}
