use clap::Parser;
use photosorter::config::Cli;
use photosorter::daemon::{RunLoop, ShutdownSignals};
use photosorter::watch::watch_source;
use photosorter::{Config, SeenStore, Syncer, SIGNAL_QUEUE_CAPACITY};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photosorter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Convert CLI args to Config - missing -s/-t exits 1 here
    let config = Config::try_from(cli)?;
    info!("photosorter v{}", photosorter::VERSION);

    let store = SeenStore::locate()?;
    if let Err(e) = store.prepare() {
        warn!("Could not create seen cache directory: {}", e);
    }

    // Registered before the first pass so an early SIGTERM waits for it
    let mut shutdown_signals = ShutdownSignals::install()?;

    let (signal_tx, signal_rx) = mpsc::channel(SIGNAL_QUEUE_CAPACITY);
    let _watcher = watch_source(&config.source, signal_tx)?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        match shutdown_signals.recv().await {
            Ok(reason) => {
                let _ = shutdown_tx.send(reason);
            }
            Err(e) => warn!("Could not listen for shutdown signals: {}", e),
        }
    });

    let mut run_loop = RunLoop::new();
    let reason = run_loop
        .run(Syncer::new(config, store), signal_rx, shutdown_rx)
        .await?;
    info!("Stopping due to {}", reason);

    Ok(())
}
