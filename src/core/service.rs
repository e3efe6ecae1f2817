use crate::core::client::HttpNewsClient;
use crate::core::ordering::{order_articles, ArticleFilter};
use crate::core::state::StateCell;
use crate::core::{Article, ConfigProvider, NewsApi, Source};
use crate::domain::model::{SortSpec, SortUpdate};
use crate::utils::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::watch;

pub const DEFAULT_SOURCE: &str = "reddit-r-all";

/// 一次抓取的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 已取代目前的清單
    Applied(usize),
    /// 回應為空清單，保留原本的狀態
    EmptyIgnored,
    /// 回應抵達前已有較新的請求，結果被丟棄
    Stale,
}

/// 最近一次（最新 ticket）文章請求的狀態
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RefreshStatus {
    #[default]
    Pending,
    Loaded { source: String, count: usize },
    Failed { source: String, message: String },
}

struct ServiceState<A: NewsApi> {
    api: A,
    articles: StateCell<Vec<Article>>,
    sources: StateCell<Vec<Source>>,
    refresh: StateCell<String>,
    sort: StateCell<SortSpec>,
    filter: StateCell<ArticleFilter>,
    ordered: StateCell<Vec<Article>>,
    status: StateCell<RefreshStatus>,
    latest_ticket: AtomicU64,
    // 序列化所有寫入與重新計算
    write_lock: Mutex<()>,
}

impl<A: NewsApi> ServiceState<A> {
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_ticket(&self) -> u64 {
        self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// 呼叫端須持有 write_lock
    fn recompute(&self) {
        let spec = self.sort.get();
        let ordered = self
            .articles
            .with(|articles| self.filter.with(|filter| order_articles(articles, filter, spec)));
        tracing::debug!(
            "🔃 Recomputed ordered articles: {} shown (sort: {} {:+}, filter: '{}')",
            ordered.len(),
            spec.kind,
            spec.direction.sign(),
            self.filter.with(|f| f.text().to_string())
        );
        self.ordered.set(ordered);
    }

    async fn fetch_articles(&self, source_key: &str, ticket: u64) -> Result<FetchOutcome> {
        let source = Some(source_key).filter(|k| !k.is_empty());
        let fetched = self.api.fetch_articles(source).await;

        let _guard = self.lock();
        let latest = self.latest_ticket.load(Ordering::SeqCst);

        // 較新的請求失敗時不會回頭採用較舊的結果，狀態維持在兩者之前
        let articles = match fetched {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!("❌ Failed to fetch articles for '{}': {}", source_key, e);
                if ticket == latest {
                    self.status.set(RefreshStatus::Failed {
                        source: source_key.to_string(),
                        message: e.to_string(),
                    });
                }
                return Err(e);
            }
        };

        if ticket != latest {
            tracing::debug!(
                "⏭️ Dropping stale articles for '{}' (request {}, latest {})",
                source_key,
                ticket,
                latest
            );
            return Ok(FetchOutcome::Stale);
        }

        let count = articles.len();
        self.articles.set(articles);
        self.recompute();
        self.status.set(RefreshStatus::Loaded {
            source: source_key.to_string(),
            count,
        });
        tracing::info!("📰 Loaded {} articles for '{}'", count, source_key);
        Ok(FetchOutcome::Applied(count))
    }
}

/// 新聞文章的狀態服務
///
/// 保存文章、來源、目前選取的來源、排序與過濾條件，並在任何一項改變時
/// 同步重新計算 `ordered_articles`。建立時會啟動一個 refresh worker，
/// 因此必須在 tokio runtime 中呼叫 [`ArticleService::new`]。
pub struct ArticleService<A: NewsApi + 'static> {
    state: Arc<ServiceState<A>>,
}

impl<A: NewsApi + 'static> Clone for ArticleService<A> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: ConfigProvider + 'static> ArticleService<HttpNewsClient<C>> {
    pub fn from_config(config: C) -> Result<Self> {
        let default_source = config.default_source().to_string();
        let client = HttpNewsClient::new(config)?;
        Ok(Self::new(client, default_source))
    }
}

impl<A: NewsApi + 'static> ArticleService<A> {
    pub fn new(api: A, default_source: impl Into<String>) -> Self {
        let state = Arc::new(ServiceState {
            api,
            articles: StateCell::default(),
            sources: StateCell::default(),
            refresh: StateCell::new(default_source.into()),
            sort: StateCell::default(),
            filter: StateCell::default(),
            ordered: StateCell::default(),
            status: StateCell::default(),
            latest_ticket: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        });

        let refresh_rx = state.refresh.subscribe();
        tokio::spawn(run_refresh_worker(Arc::downgrade(&state), refresh_rx));

        Self { state }
    }

    /// 抓取指定來源的文章並取代目前清單
    ///
    /// 失敗時狀態不變；若期間已有較新的請求，回傳 [`FetchOutcome::Stale`]。
    pub async fn get_articles(&self, source_key: &str) -> Result<FetchOutcome> {
        let ticket = self.state.next_ticket();
        self.state.fetch_articles(source_key, ticket).await
    }

    /// 抓取來源清單；空清單不會覆蓋目前的值
    pub async fn get_sources(&self) -> Result<FetchOutcome> {
        let sources = self.state.api.fetch_sources().await.map_err(|e| {
            tracing::warn!("❌ Failed to fetch sources: {}", e);
            e
        })?;

        if sources.is_empty() {
            tracing::debug!("🗂️ Empty source list received, keeping previous sources");
            return Ok(FetchOutcome::EmptyIgnored);
        }

        let count = sources.len();
        let _guard = self.state.lock();
        self.state.sources.set(sources);
        tracing::info!("🗂️ Loaded {} sources", count);
        Ok(FetchOutcome::Applied(count))
    }

    /// 切換來源；refresh worker 會在背景重新抓取文章
    pub fn update_articles(&self, source_key: impl Into<String>) {
        let source_key = source_key.into();
        tracing::debug!("🔄 Refresh requested for '{}'", source_key);
        self.state.refresh.set(source_key);
    }

    pub fn sort_by(&self, update: SortUpdate) {
        let _guard = self.state.lock();
        self.state.sort.update(|spec| *spec = spec.merge(update));
        self.state.recompute();
    }

    pub fn filter_by(&self, text: &str) {
        let _guard = self.state.lock();
        self.state.filter.set(ArticleFilter::new(text));
        self.state.recompute();
    }

    pub fn ordered_articles(&self) -> watch::Receiver<Vec<Article>> {
        self.state.ordered.subscribe()
    }

    pub fn current_ordered_articles(&self) -> Vec<Article> {
        self.state.ordered.get()
    }

    pub fn articles(&self) -> watch::Receiver<Vec<Article>> {
        self.state.articles.subscribe()
    }

    pub fn current_articles(&self) -> Vec<Article> {
        self.state.articles.get()
    }

    pub fn sources(&self) -> watch::Receiver<Vec<Source>> {
        self.state.sources.subscribe()
    }

    pub fn current_sources(&self) -> Vec<Source> {
        self.state.sources.get()
    }

    pub fn refresh_status(&self) -> watch::Receiver<RefreshStatus> {
        self.state.status.subscribe()
    }

    pub fn current_refresh_status(&self) -> RefreshStatus {
        self.state.status.get()
    }

    pub fn selected_source(&self) -> String {
        self.state.refresh.get()
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.state.sort.get()
    }

    pub fn filter_text(&self) -> String {
        self.state.filter.with(|f| f.text().to_string())
    }
}

async fn run_refresh_worker<A: NewsApi + 'static>(
    state: Weak<ServiceState<A>>,
    mut refresh_rx: watch::Receiver<String>,
) {
    // 初始來源也要觸發一次抓取
    refresh_rx.mark_changed();

    while refresh_rx.changed().await.is_ok() {
        let source_key = refresh_rx.borrow_and_update().clone();
        let Some(state) = state.upgrade() else {
            break;
        };

        // 每個請求各自執行，以 ticket 決定誰的結果生效
        let ticket = state.next_ticket();
        tokio::spawn(async move {
            if let Err(e) = state.fetch_articles(&source_key, ticket).await {
                tracing::debug!("Refresh for '{}' did not update articles: {}", source_key, e);
            }
        });
    }

    tracing::debug!("🛑 Refresh worker stopped");
}
