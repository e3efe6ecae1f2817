use clap::Parser;
use news_feed::utils::{logger, validation::Validate};
use news_feed::{
    Article, ArticleService, CliConfig, FetchOutcome, NewsConfig, NewsError, RefreshStatus,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting news-feed");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    // 命令列指定的來源優先
    if let Some(source) = &cli.source {
        config.default_source = source.clone();
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }
    tracing::debug!("Using config: {:?}", config);

    let sort = match cli.sort_update() {
        Ok(sort) => sort,
        Err(e) => exit_with(&e),
    };

    let timeout = Duration::from_secs(config.request_timeout_seconds + 1);
    let source = config.default_source.clone();
    let service = ArticleService::from_config(config)?;

    if cli.list_sources {
        match service.get_sources().await {
            Ok(FetchOutcome::Applied(_)) => {
                for source in service.current_sources() {
                    println!(
                        "{:<28} {}",
                        source.id().unwrap_or("-"),
                        source.name().unwrap_or("")
                    );
                }
            }
            Ok(_) => println!("No sources available"),
            Err(e) => exit_with(&e),
        }
        return Ok(());
    }

    // 建構時的 refresh worker 已在抓取 default_source，等它的結果即可
    let mut status_rx = service.refresh_status();
    let status = match tokio::time::timeout(
        timeout,
        status_rx.wait_for(|status| *status != RefreshStatus::Pending),
    )
    .await
    {
        Ok(Ok(status)) => status.clone(),
        _ => {
            tracing::warn!("⚠️ Timed out waiting for articles from '{}'", source);
            eprintln!("❌ No response for '{}' within {:?}", source, timeout);
            std::process::exit(1);
        }
    };

    if let RefreshStatus::Failed { source, message } = status {
        tracing::error!("❌ Failed to load articles for '{}': {}", source, message);
        eprintln!("❌ Failed to load articles for '{}': {}", source, message);
        eprintln!("💡 Check base_url, news_api_key and the source key");
        std::process::exit(1);
    }

    service.sort_by(sort);
    if let Some(filter) = &cli.filter {
        service.filter_by(filter);
    }

    let ordered = service.current_ordered_articles();
    tracing::info!(
        "✅ {} of {} articles match",
        ordered.len(),
        service.current_articles().len()
    );

    for article in ordered.iter().take(cli.limit) {
        println!("{}", format_article(article));
    }

    Ok(())
}

fn load_config(cli: &CliConfig) -> news_feed::Result<NewsConfig> {
    match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {} [{}]", path, cli.env);
            NewsConfig::from_file(path, &cli.env)
        }
        None => {
            tracing::info!("📁 Loading configuration from NEWS_* environment variables");
            NewsConfig::from_env()
        }
    }
}

fn format_article(article: &Article) -> String {
    let published = article
        .published_at
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "----------------".to_string());
    let source = article
        .source
        .as_ref()
        .and_then(|s| s.name.as_deref().or(s.id.as_deref()))
        .unwrap_or("");

    format!("{:>5} ▲  {}  {}  ({})", article.votes, published, article.title, source)
}

fn exit_with(e: &NewsError) -> ! {
    tracing::error!("❌ {}", e);
    eprintln!("❌ {}", e);
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}
