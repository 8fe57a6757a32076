use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ttsrelay::args::Args;
use ttsrelay::provider;
use ttsrelay::server::{self, AppState};
use ttsrelay::storage::AudioStore;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let synth = match provider::from_args(&args) {
        Ok(synth) => synth,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("Using {} provider, {} output", synth.name(), args.format.extension());

    tokio::fs::create_dir_all(&args.output_dir).await?;
    info!("Storing audio under {}", args.output_dir.display());

    let state = AppState {
        synth,
        store: AudioStore::new(&args.output_dir, args.format),
        batch_response: args.batch_response,
    };
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
