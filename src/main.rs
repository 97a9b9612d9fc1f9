use clap::Parser;
use gemini_proxy::config::{self, Config, UpstreamConfig};
use gemini_proxy::handler::ProxyHandler;
use gemini_proxy::server::Server;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let config = Config::from_file(path)?;
            info!("Configuration loaded from {}", path);
            config
        }
        None => Config {
            upstream: UpstreamConfig::from_env(),
            ..Config::default()
        },
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let api_key = config::api_key_from_env();
    if api_key.is_none() {
        warn!("{} is not set; requests will fail with a configuration error", config::API_KEY_ENV);
    }

    info!("Forwarding to model {}", config.upstream.model);
    let handler = ProxyHandler::new(config.upstream, api_key);
    let server = Server::new(config.server, handler);

    server.run().await?;

    Ok(())
}
