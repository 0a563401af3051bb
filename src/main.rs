use anyhow::Context;
use clap::Parser;
use geonews::config::{Config, DEFAULT_ALLOW_ORIGIN};
use geonews::feed::DEFAULT_FEED_URL;
use geonews::location::{GeocodeCache, GSI_ADDRESS_SEARCH_URL};
use geonews::news::NewsStore;
use geonews::scheduler::RefreshScheduler;
use geonews::server::{self, AppState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// geonews: geotagged news for a map client
///
/// Polls a news feed, pulls place names out of each article, geocodes them
/// and serves the result at GET /api/news.
///
/// Examples:
///   geonews
///   geonews --port 8080 --interval 300
///   geonews --tagger-url http://localhost:8000/ents
///   geonews --once --no-cache
#[derive(Parser)]
#[command(name = "geonews", version, about, long_about = None)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "GEONEWS_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind.
    #[arg(long, short = 'p', env = "GEONEWS_PORT", default_value_t = 5000)]
    port: u16,

    /// RSS feed to poll.
    #[arg(long, env = "GEONEWS_FEED_URL", default_value = DEFAULT_FEED_URL)]
    feed_url: String,

    /// Address search endpoint; the query is sent as `?q=`.
    #[arg(long, env = "GEONEWS_GEOCODER_URL", default_value = GSI_ADDRESS_SEARCH_URL)]
    geocoder_url: String,

    /// NER service endpoint. Without it the built-in lexicon tagger is used.
    #[arg(long, env = "GEONEWS_TAGGER_URL")]
    tagger_url: Option<String>,

    /// Tagger labels treated as place names.
    #[arg(long = "label", env = "GEONEWS_LABELS", value_delimiter = ',', default_value = "GPE,Province,City")]
    labels: Vec<String>,

    /// Seconds between feed refreshes.
    #[arg(long, env = "GEONEWS_INTERVAL_SECS", default_value_t = 600)]
    interval: u64,

    /// HTTP timeout in seconds for feed, tagger and geocoder calls.
    #[arg(long, env = "GEONEWS_TIMEOUT_SECS", default_value_t = 10)]
    timeout: u64,

    /// Allowed CORS origin (repeatable). "*" allows any origin.
    #[arg(long = "allow-origin", env = "GEONEWS_ALLOW_ORIGINS", value_delimiter = ',', default_value = DEFAULT_ALLOW_ORIGIN)]
    allow_origins: Vec<String>,

    /// JSON file with the items served while no live item is available.
    #[arg(long, env = "GEONEWS_FALLBACK_FILE")]
    fallback_file: Option<PathBuf>,

    /// Geocode cache location. Defaults to ~/.geonews/geocode-cache.json.
    #[arg(long, env = "GEONEWS_CACHE_PATH")]
    cache_path: Option<PathBuf>,

    /// Disable the geocode cache.
    #[arg(long)]
    no_cache: bool,

    /// Run one refresh cycle, print the dataset as JSON and exit.
    #[arg(long)]
    once: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let cache_path = if self.no_cache {
            None
        } else {
            Some(self.cache_path.clone().unwrap_or_else(GeocodeCache::default_path))
        };

        Config {
            host: self.host.clone(),
            port: self.port,
            feed_url: self.feed_url.clone(),
            geocoder_url: self.geocoder_url.clone(),
            tagger_url: self.tagger_url.clone(),
            target_labels: self.labels.clone(),
            interval: Duration::from_secs(self.interval),
            http_timeout: Duration::from_secs(self.timeout),
            allow_origins: self.allow_origins.clone(),
            fallback_file: self.fallback_file.clone(),
            cache_path,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("geonews=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let pipeline = Arc::new(config.build_pipeline());

    // ── One-shot mode ───────────────────────────────────────────

    if cli.once {
        let items = tokio::task::spawn_blocking(move || pipeline.run_cycle())
            .await?
            .context("refresh cycle failed")?;
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    // ── Server mode ─────────────────────────────────────────────

    let fallback = config.fallback().context("loading fallback dataset")?;
    let cors = server::cors_layer(&config.allow_origins).context("invalid --allow-origin")?;

    let store = Arc::new(NewsStore::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh = RefreshScheduler::new(pipeline, Arc::clone(&store), config.interval).spawn(shutdown_rx);

    let app = server::build_router(Arc::new(AppState { store, fallback }), cors);
    server::start(&config.host, config.port, app, shutdown_signal())
        .await
        .with_context(|| format!("serving on {}:{}", config.host, config.port))?;

    let _ = shutdown_tx.send(true);
    refresh.await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl+C, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
