use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use albumroll::{
    AppState, Config,
    album::{Album, HttpAlbumSource},
    create_app,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[arg(short, long)]
    port: Option<u16>,

    #[arg(long)]
    host: Option<String>,

    /// Automatically quit after specified number of seconds (useful for testing)
    #[arg(long)]
    quit_after: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::load(&cli.config).inspect_err(|e| {
        tracing::error!("Failed to load {:?}: {}", cli.config, e);
    })?;
    info!("Configuration loaded from: {:?}", cli.config);
    info!("Album URL: {}", config.album_url);

    let host = cli.host.unwrap_or(config.host.clone());
    let port = cli.port.unwrap_or(config.port);

    let source = Arc::new(HttpAlbumSource::new()?);
    let album = Arc::new(Album::new(config.album(), source));

    // Initial refresh before serving traffic
    if let Err(e) = album.refresh().await {
        Album::log_refresh_failure(&e);
    }

    let shutdown = CancellationToken::new();
    let refresh_task = if config.refresh_interval_hours > 0 {
        Some(Album::start_background_refresh(
            album.clone(),
            config.refresh_interval_hours,
            shutdown.clone(),
        ))
    } else {
        info!("Auto-refresh disabled");
        None
    };

    let app = create_app(AppState {
        album,
        config: config.clone(),
    });

    let addr = SocketAddr::from((host.parse::<std::net::IpAddr>()?, port));
    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app);
    let graceful = server.with_graceful_shutdown(shutdown_signal(cli.quit_after));

    if let Err(e) = graceful.await {
        tracing::error!("Server error: {}", e);
    }

    info!("Shutting down");
    shutdown.cancel();
    if let Some(task) = refresh_task
        && let Err(e) = task.await
    {
        tracing::error!("Auto-refresh task failed: {}", e);
    }

    Ok(())
}

async fn shutdown_signal(quit_after: Option<u64>) {
    use tokio::signal;
    use tokio::time::{Duration, sleep};

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

    let quit_timer = async {
        if let Some(seconds) = quit_after {
            info!(
                "Server will automatically shut down after {} seconds",
                seconds
            );
            sleep(Duration::from_secs(seconds)).await;
            info!("Quit timer expired, shutting down");
        } else {
            std::future::pending::<()>().await
        }
    };

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        },
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        },
        _ = quit_timer => {},
    }
}
