use anyhow::{Context, Result};
use clap::Parser;
use sfxgen_core::AppConfig;
use sfxgen_engine::{AdapterSettings, EngineRegistry, InferenceAdapter, SoundGenerator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "sfxgen.toml";

#[derive(Parser)]
#[command(name = "sfxgen", about = "Text-to-audio sound effect generator")]
struct Cli {
    /// Path to the configuration file (default: sfxgen.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override server.host
    #[arg(long)]
    host: Option<String>,

    /// Override server.port
    #[arg(long)]
    port: Option<u16>,
}

/// An explicit path must load; the default path is optional.
fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match explicit {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {:?}", path)),
        None => {
            let path = Path::new(DEFAULT_CONFIG_PATH);
            if path.exists() {
                AppConfig::load_from_file(path)
                    .with_context(|| format!("failed to load config from {:?}", path))
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(ref host) = cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        );

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    tracing::info!(
        model = %config.model.repo_id,
        device = config.model.device.as_str(),
        engine = %config.engine.name,
        "sfxgen starting"
    );

    let registry = EngineRegistry::new();
    let engine_config = config
        .engine_settings()
        .context("failed to build engine settings")?;
    let adapter = InferenceAdapter::load(
        &registry,
        &config.engine.name,
        engine_config,
        AdapterSettings::from_config(&config),
    )
    .await
    .with_context(|| {
        format!(
            "failed to load pipeline '{}' with engine '{}'",
            config.model.repo_id, config.engine.name
        )
    })?;

    if adapter.device().is_cpu() {
        tracing::warn!("running on CPU; generation will be slow");
    }

    let adapter = Arc::new(adapter);
    let generator: Arc<dyn SoundGenerator> = adapter.clone();
    let state = sfxgen_web::AppState::new(generator);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on http://{addr}");

    sfxgen_web::serve(listener, state, shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shutting down");
    adapter.shutdown().await;

    Ok(())
}
