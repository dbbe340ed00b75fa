//! `gauntlet run`: drive the tournament until completion or shutdown.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::cli::load_config;
use crate::domain::ports::{NullNotifier, TrophyNotifier};
use crate::infrastructure::logging;
use crate::infrastructure::notifier::XPoster;
use crate::infrastructure::oracle::OllamaClient;
use crate::infrastructure::persistence::JsonSnapshotStore;
use crate::services::{Arena, DuelRunner, PersonaCatalog};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Override the maximum number of simultaneously in-flight matches
    #[arg(long)]
    pub max_parallel_battles: Option<usize>,
}

pub async fn execute(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(cap) = args.max_parallel_battles {
        config.arena.max_parallel_battles = cap;
        crate::infrastructure::config::ConfigLoader::validate(&config)?;
    }

    logging::init(&config.logging);

    let catalog = PersonaCatalog::load(Path::new(&config.personas.path))
        .context("cannot seed a population without a valid persona catalog")?;

    let oracle = Arc::new(
        OllamaClient::new(config.oracle.clone()).context("failed to build oracle client")?,
    );
    let duels = Arc::new(DuelRunner::new(oracle, config.arena.battle_kinds.clone()));
    let store = Arc::new(JsonSnapshotStore::new(&config.persistence.path));

    let notifier: Arc<dyn TrophyNotifier> = match (
        config.notifier.enabled,
        config.notifier.bearer_token.clone(),
    ) {
        (true, Some(token)) => {
            Arc::new(XPoster::new(token).context("failed to build trophy poster")?)
        }
        _ => Arc::new(NullNotifier),
    };

    let arena = Arena::new(
        config.arena.clone(),
        catalog,
        duels,
        store,
        notifier,
        config.notifier.hashtag.clone(),
    );

    arena.bootstrap().await?;
    spawn_signal_listener(arena.shutdown_token());
    arena.run().await
}

/// Translate process signals into a cooperative stop: in-flight matches
/// finish, no new round launches, state is never left half-applied.
fn spawn_signal_listener(token: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(err) => {
                    error!(error = %err, "failed to install SIGTERM handler");
                    return;
                }
            };
            tokio::select! {
                _ = ctrl_c => {}
                _ = sigterm.recv() => {}
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
        }

        warn!("shutdown signal received; finishing in-flight matches");
        token.cancel();
    });
}
