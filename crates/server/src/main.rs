// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jobserver: coordinates job requests between researchers and backends.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use js_adapters::{GithubClient, GithubMembership, GithubRepoHost};
use js_core::SystemClock;
use js_server::lifecycle::{spawn_checkpoints, startup};
use js_server::routes::router;
use js_server::{logging, AppState, Config, Production};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "jobserver", version, about = "Job server for research backends")]
struct Args {
    /// Path to a TOML config file
    #[arg(long, env = "JOBSERVER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref()).context("loading config")?;
    let _log_guard = logging::init(&config.log_dir()).context("initialising logging")?;

    let server = startup(&config, &SystemClock).context("starting server")?;
    let github = GithubClient::new(
        &config.github.api_url,
        &config.github.org,
        config.github.token.as_deref(),
    )?;
    let state = AppState::<Production>::new(
        config.clone(),
        server.store.clone(),
        GithubMembership::new(github.clone()),
        GithubRepoHost::new(github),
        SystemClock,
    );

    let cancel = CancellationToken::new();
    let checkpoints = spawn_checkpoints(
        server.store.clone(),
        server.checkpointer(),
        config.checkpoint_interval(),
        cancel.clone(),
    );

    let listener = TcpListener::bind(config.bind).await.with_context(|| format!("binding {}", config.bind))?;
    info!(addr = %config.bind, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    cancel.cancel();
    checkpoints.await.ok();
    server.shutdown();
    Ok(())
}

/// Resolves on ctrl-c or SIGTERM, or when `cancel` fires.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => {}
    }
    info!("shutdown signal received");
}
