pub mod client;
pub mod ordering;
pub mod service;
pub mod state;

pub use crate::domain::model::{Article, Source};
pub use crate::domain::ports::{ConfigProvider, NewsApi};
pub use crate::utils::error::Result;
