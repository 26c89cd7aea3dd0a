mod ai;
mod config;
mod http;
mod whatsapp;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::log::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Applied to the shared outbound client, covering both the Graph API
/// and the AI provider. No other deadline exists.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "study-bot")]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(version = VERSION)]
struct CliArguments {
    /// Alternate .env file to load before reading configuration.
    #[arg(short, long, value_name = "FILE")]
    env_file: Option<PathBuf>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
    info!("build version: {VERSION}");
}

fn main() -> Result<()> {
    let args = CliArguments::parse();
    match &args.env_file {
        Some(path) => {
            dotenv::from_path(path)?;
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    init_tracing();
    let config = config::AppConfig::from_env()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async move {
            let client = reqwest::Client::builder().timeout(CLIENT_TIMEOUT).build()?;

            let provider = ai::create_provider(&config.ai, client.clone());
            let sender = Arc::new(whatsapp::CloudApiSender::new(config.whatsapp.clone(), client));

            let address = config.http.address();
            let app = http::create_app(config, provider, sender);

            info!("Starting HTTP server on {address}");
            axum_server::bind(address)
                .serve(app.into_make_service())
                .await
                .map_err(anyhow::Error::from)
        })
}
