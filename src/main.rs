//! CLI entry point for the Halifax Transit vehicle-position proxy.
//!
//! `serve` runs the HTTP facade for the map frontend; `dump` fetches or reads
//! a single feed snapshot and logs its contents.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hfx_positions::{
    config::{DEFAULT_FEED_URL, ServerConfig, TlsPaths},
    fetch::{BasicClient, FetchConfig, fetch_bytes},
    output::{append_records, log_entities, print_json, print_pretty},
    parser::{FeedSummary, parse_feed},
    projection::project,
    server,
};
use reqwest::Url;
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "hfx_positions")]
#[command(about = "Serves live transit vehicle positions as JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server for the map frontend
    Serve(ServeArgs),
    /// Fetch or read one feed snapshot and log its entities
    Dump {
        /// Path to a .pb file or URL to fetch
        #[arg(value_name = "FILE_OR_URL", default_value = DEFAULT_FEED_URL)]
        source: String,

        /// Log projected records as JSON instead of Rust debug format
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append projected records to
        #[arg(long)]
        csv: Option<String>,

        #[command(flatten)]
        upstream: UpstreamArgs,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5000")]
    bind: SocketAddr,

    /// Upstream GTFS-RT vehicle positions feed
    #[arg(long, env = "FEED_URL", default_value = DEFAULT_FEED_URL)]
    feed_url: Url,

    /// Directory containing index.html
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// PEM certificate chain; serve over TLS together with --tls-key
    #[arg(long, env = "TLS_CERT")]
    tls_cert: Option<PathBuf>,

    /// PEM private key
    #[arg(long, env = "TLS_KEY")]
    tls_key: Option<PathBuf>,

    #[command(flatten)]
    upstream: UpstreamArgs,
}

#[derive(Args)]
struct UpstreamArgs {
    /// Timeout for the upstream request, in seconds
    #[arg(long, env = "FEED_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Skip TLS certificate verification for the upstream host
    #[arg(long, env = "FEED_INSECURE_TLS", default_value_t = false)]
    insecure_upstream_tls: bool,
}

impl UpstreamArgs {
    fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            accept_invalid_certs: self.insecure_upstream_tls,
            ..Default::default()
        }
    }
}

impl ServeArgs {
    fn into_config(self) -> Result<ServerConfig> {
        let fetch = self.upstream.fetch_config();
        Ok(ServerConfig {
            bind: self.bind,
            feed_url: self.feed_url,
            static_dir: self.static_dir,
            tls: TlsPaths::from_parts(self.tls_cert, self.tls_key)?,
            fetch,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/hfx_positions.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("hfx_positions.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = args.into_config()?;
            server::serve(config).await?;
        }
        Commands::Dump {
            source,
            json,
            csv,
            upstream,
        } => {
            let bytes = fetcher(&source, &upstream.fetch_config()).await?;
            let feed = parse_feed(&bytes)?;

            let summary = FeedSummary::from_feed(&feed);
            info!(
                version = %summary.gtfs_realtime_version,
                feed_timestamp = ?summary.feed_timestamp,
                entities = summary.total_entities,
                vehicles = summary.vehicles,
                trip_updates = summary.trip_updates,
                alerts = summary.alerts,
                "Feed decoded"
            );
            log_entities(&feed);

            let records = project(&feed);
            if json {
                print_json(&records)?;
            } else {
                print_pretty(&records);
            }

            if let Some(path) = csv {
                append_records(&path, &records)?;
                info!(path = %path, rows = records.len(), "Records appended");
            }
        }
    }

    Ok(())
}

/// Loads feed data from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(config), fields(source = %source))]
async fn fetcher(source: &str, config: &FetchConfig) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let url = Url::parse(source).with_context(|| format!("Invalid feed URL '{source}'"))?;
        let client = BasicClient::new(config)?;
        fetch_bytes(&client, &url).await?.to_vec()
    } else {
        std::fs::read(source).with_context(|| format!("Failed to read '{source}'"))?
    };
    Ok(bytes)
}
