pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::news_config::NewsConfig;
pub use core::{
    client::HttpNewsClient,
    service::{ArticleService, FetchOutcome, RefreshStatus, DEFAULT_SOURCE},
};
pub use domain::model::{Article, ArticleSource, SortDirection, SortKind, SortSpec, SortUpdate, Source};
pub use utils::error::{NewsError, Result};
