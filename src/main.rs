// hinglish-bridge - Translate coding-problem descriptions to Hinglish
// Author: kelexine (https://github.com/kelexine)

use anyhow::{bail, Context, Result};
use clap::Parser;
use hinglish_bridge::cache::{self, CacheStore};
use hinglish_bridge::cli::{Args, CacheAction, Command, KeyAction};
use hinglish_bridge::config::AppConfig;
use hinglish_bridge::server::{create_router, AppState};
use hinglish_bridge::settings::SettingsStore;
use hinglish_bridge::translation::Translator;
use hinglish_bridge::utils::{logging, text};
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let config = AppConfig::load_from(args.config.as_deref())?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.workers.max(1))
        .enable_all()
        .build()
        .context("failed to build Tokio runtime")?;

    runtime.block_on(run(args, config))
}

async fn run(args: Args, config: AppConfig) -> Result<()> {
    // Phase 3: Open stores
    let cache_store = cache::from_config(&config.cache, args.ephemeral)?;
    let settings = Arc::new(if args.ephemeral {
        SettingsStore::in_memory(None).with_env_override()
    } else {
        SettingsStore::file(&config.settings.path).with_env_override()
    });

    match args.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => serve(config, cache_store, settings).await,
        Command::Translate {
            problem_id,
            url,
            title,
            file,
            sanitize,
            clean,
        } => {
            let raw = match file {
                Some(path) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read stdin")?;
                    buf
                }
            };
            let input = if sanitize { text::sanitize_text(&raw) } else { raw };
            if input.trim().is_empty() {
                bail!("No problem description provided");
            }

            let problem_id = problem_id.unwrap_or_else(|| {
                text::problem_id(url.as_deref().unwrap_or(""), title.as_deref())
            });

            let translator = Translator::from_config(&config, cache_store, settings)?;
            let translation = translator.translate(&input, &problem_id).await?;
            info!(
                "Translated {} {}",
                problem_id,
                if translation.from_cache { "(cached)" } else { "(fresh)" }
            );

            let output = if clean {
                text::parse_translated_content(&translation.text)
            } else {
                translation.text
            };
            println!("{}", output);
            Ok(())
        }
        Command::Cache { action } => {
            match action {
                CacheAction::Clear => {
                    cache_store.clear().await;
                    println!("Translation cache cleared");
                }
                CacheAction::Prune => {
                    let removed = cache_store.prune_expired().await;
                    println!("Removed {} expired translations", removed);
                }
            }
            Ok(())
        }
        Command::Key { action } => {
            match action {
                KeyAction::Set { key } => {
                    settings.set_api_key(&key).await?;
                    println!("Settings saved successfully");
                }
                KeyAction::Clear => {
                    settings.clear_api_key().await?;
                    println!("API key cleared");
                }
                KeyAction::Status => {
                    if settings.has_api_key().await {
                        println!("API key configured");
                    } else {
                        println!("API key not set");
                    }
                }
            }
            Ok(())
        }
        Command::Enable => {
            settings.set_enabled(true).await?;
            println!("Translation enabled");
            Ok(())
        }
        Command::Disable => {
            settings.set_enabled(false).await?;
            println!("Translation disabled");
            Ok(())
        }
    }
}

async fn serve(
    config: AppConfig,
    cache_store: Arc<dyn CacheStore>,
    settings: Arc<SettingsStore>,
) -> Result<()> {
    info!("Starting hinglish-bridge v{}", env!("CARGO_PKG_VERSION"));

    if config.cache.prune_on_startup {
        let removed = cache_store.prune_expired().await;
        info!("Pruned {} expired translations", removed);
    }

    if !settings.has_api_key().await {
        tracing::warn!("API key not set. Translations will fail until one is configured.");
    }

    // Phase 4: Build orchestrator and HTTP server
    let translator = Arc::new(Translator::from_config(&config, cache_store, settings)?);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(AppState::new(config, translator));

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
