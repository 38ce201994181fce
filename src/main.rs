use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use tuber::api::VideoApiClient;
use tuber::app::{App, AppEvent};
use tuber::config::Config;
use tuber::storage::{Database, DatabaseError};
use tuber::store::StateStore;
use tuber::theme::ThemeVariant;
use tuber::ui;

/// Get the config directory path (~/.config/tuber/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("tuber"))
}

#[derive(Parser, Debug)]
#[command(name = "tuber", about = "Terminal client for browsing a video platform")]
struct Args {
    /// Reset persisted state (theme, subscriptions, watch history)
    #[arg(long)]
    reset_state: bool,

    /// Override the configured region code for the popular chart
    #[arg(long, value_name = "CODE")]
    region: Option<String>,

    /// Use an alternative config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // User-only access on Unix: the directory holds the API key and history.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(region) = args.region {
        config.region = region;
    }

    let api_key = match config.resolve_api_key() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            eprintln!("Set your API key either:");
            eprintln!("  - in the TUBER_API_KEY environment variable, or");
            eprintln!("  - as api_key = \"...\" in {}", config_path.display());
            std::process::exit(1);
        }
    };

    let db_path = config_dir.join("state.db");

    // Handle --reset-state flag
    if args.reset_state && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete state database")?;
        println!("State reset.");
    }

    // Open database
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of tuber appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open state database: {}", e));
        }
    };

    // Load persisted state (theme, subscriptions, watch history). The config
    // theme only seeds the default; a persisted preference wins.
    let default_dark = matches!(
        ThemeVariant::from_str_name(&config.theme),
        Some(ThemeVariant::Dark) | None
    );
    let store = StateStore::load_with_defaults(&db, default_dark)
        .await
        .context("Failed to load application state")?;

    // HTTP client with connection pooling and keepalive
    let http = reqwest::Client::builder()
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .tcp_keepalive(std::time::Duration::from_secs(60))
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;

    let client = VideoApiClient::new(http, api_key, config.region.clone());

    let mut app = App::new(db, store, client, &config);

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
