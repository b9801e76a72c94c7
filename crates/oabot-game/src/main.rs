//! OABot game server - Entry Point

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use oabot_game::{Config, GameServer};

#[derive(Parser, Debug)]
#[command(name = "oabot-game")]
#[command(about = "Game backend for adding open-access full texts to Wikidata")]
#[command(version)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1", env = "HOST")]
    host: IpAddr,

    /// HTTP server port
    #[arg(long, default_value = "5000", env = "PORT")]
    port: u16,

    /// Decision log file (CSV)
    #[arg(long, env = "OABOT_LOG_PATH")]
    log_path: Option<PathBuf>,

    /// Wikidata SPARQL endpoint
    #[arg(long, env = "OABOT_SPARQL_URL")]
    sparql_url: Option<String>,

    /// Dissemin query endpoint
    #[arg(long, env = "OABOT_RESOLVER_URL")]
    resolver_url: Option<String>,

    /// Timeout for each upstream request, in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::new();
        if let Some(url) = &self.sparql_url {
            config.sparql_url.clone_from(url);
        }
        if let Some(url) = &self.resolver_url {
            config.resolver_url.clone_from(url);
        }
        if let Some(path) = &self.log_path {
            config.log_path.clone_from(path);
        }
        config.request_timeout = Duration::from_secs(self.timeout_secs);
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting OABot game server");

    let config = cli.config()?;
    let server = GameServer::new(config);

    server.run(SocketAddr::new(cli.host, cli.port)).await
}
