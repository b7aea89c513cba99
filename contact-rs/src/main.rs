use clap::Parser;
use contact_rs::api::ApiServer;
use contact_rs::config::Config;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "contact-rs", about = "Portfolio site with contact-form backend")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the listen address from the configuration
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::from_file(&args.config)?
    } else {
        let mut config = Config::default();
        config.apply_env();
        config
    };

    if let Some(listen) = args.listen {
        config.server.listen_addr = listen;
    }

    // Initialize logging
    let level = config
        .logging
        .level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    if config.logging.format == "json" {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .pretty()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
    }

    info!("Starting contact-rs");

    let server = ApiServer::new(config)?;
    server.run().await?;

    Ok(())
}
