//! Git Graph Viewer - upload a `.git` directory, browse its commit graph
//!
//! # Usage
//! ```bash
//! git-graph-viewer                              # Serve on 127.0.0.1:3001
//! git-graph-viewer --port 8080 --repo-ttl-secs 600
//! GGV_STORAGE_DIR=/var/tmp/ggv git-graph-viewer
//! ```

mod error;
mod git;
mod graph;
mod models;
mod routes;
mod store;

#[cfg(test)]
mod test_support;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use routes::AppState;
use store::{FsRepoStore, RepoStore};

/// Git Graph Viewer - Upload a .git directory and browse its commit graph
#[derive(Parser, Debug)]
#[command(name = "git-graph-viewer")]
#[command(about = "Serves the commit graph of uploaded git repositories", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, env = "GGV_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to run the server on
    #[arg(short, long, env = "GGV_PORT", default_value = "3001")]
    port: u16,

    /// Directory holding uploaded repositories (default: <tmp>/git-graph-viewer)
    #[arg(long, env = "GGV_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Largest accepted upload, in MiB
    #[arg(long, env = "GGV_MAX_UPLOAD_MB", default_value = "512")]
    max_upload_mb: usize,

    /// Uploaded repositories are deleted after this many seconds
    #[arg(long, env = "GGV_REPO_TTL_SECS", default_value = "3600")]
    repo_ttl_secs: u64,

    /// How often expired repositories are swept
    #[arg(long, env = "GGV_SWEEP_INTERVAL_SECS", default_value = "300")]
    sweep_interval_secs: u64,
}

impl Cli {
    fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| {
            let mut path = std::env::temp_dir();
            path.push("git-graph-viewer");
            path
        })
    }

    fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Periodically drop repositories older than `ttl`.
fn spawn_sweeper(store: Arc<dyn RepoStore>, ttl: Duration, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every.max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            let store = store.clone();
            match tokio::task::spawn_blocking(move || store.sweep_expired(ttl)).await {
                Ok(Ok(0)) => {}
                Ok(Ok(removed)) => tracing::info!("Swept {} expired repositories", removed),
                Ok(Err(e)) => tracing::warn!("Sweep failed: {}", e),
                Err(e) => tracing::warn!("Sweep task panicked: {}", e),
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let fs_store = FsRepoStore::new(cli.storage_dir())?;
    let storage_dir = fs_store.root().to_path_buf();
    let store: Arc<dyn RepoStore> = Arc::new(fs_store);

    spawn_sweeper(
        store.clone(),
        Duration::from_secs(cli.repo_ttl_secs),
        Duration::from_secs(cli.sweep_interval_secs),
    );

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::create_router(AppState::new(store), cli.max_upload_bytes())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::new(cli.host, cli.port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to {}: {}", addr, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    println!();
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │              Git Graph Viewer               │");
    println!("  └─────────────────────────────────────────────┘");
    println!();
    println!("  Server:   http://{}", addr);
    println!("  Storage:  {}", storage_dir.display());
    println!("  TTL:      {}s", cli.repo_ttl_secs);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
