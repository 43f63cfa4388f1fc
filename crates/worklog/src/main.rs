//! `worklog` - serve the work-hours logger page.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

use anyhow::Context;
use clap::Parser;
use tracing::info;

use worklog::cli::Cli;
use worklog::{build_state, init_logging};
use worklog_core::{create_listener, serve};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    let config = cli.server_config();
    let state = build_state(&cli.assets)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(async move {
        let addr = config.addr()?;
        let listener = create_listener(&addr).with_context(|| format!("binding {addr}"))?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
                let _ = shutdown_tx.send(());
            }
        });

        serve(listener, state, shutdown_rx).await?;
        Ok(())
    })
}
