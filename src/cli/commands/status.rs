//! `gauntlet status`: read-only summary of the persisted snapshot.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

use crate::cli::load_config;
use crate::domain::models::Soul;
use crate::domain::ports::SnapshotStore;
use crate::infrastructure::persistence::JsonSnapshotStore;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// How many souls to list, ranked by kills
    #[arg(long, default_value = "10")]
    pub top: usize,
}

pub async fn execute(args: StatusArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let store = JsonSnapshotStore::new(&config.persistence.path);

    let Some(snapshot) = store.load().await? else {
        println!(
            "No snapshot at {} yet. Run `gauntlet run` to start the tournament.",
            config.persistence.path
        );
        return Ok(());
    };

    let collective = &snapshot.collective;
    println!("{}", collective.tagline);

    let mut summary = Table::new();
    summary.load_preset(UTF8_FULL).set_header(vec![
        "souls absorbed",
        "total battles",
        "generation",
        "alive",
        "complete",
    ]);
    summary.add_row(vec![
        format!("{}/{}", collective.souls_absorbed, config.arena.target_souls),
        collective.total_battles.to_string(),
        collective.current_generation.to_string(),
        snapshot.alive_count().to_string(),
        collective.complete.to_string(),
    ]);
    println!("{summary}");

    let mut souls: Vec<&Soul> = snapshot.souls.values().collect();
    souls.sort_by(|a, b| b.kills.cmp(&a.kills).then_with(|| a.name.cmp(&b.name)));

    let mut ranking = Table::new();
    ranking
        .load_preset(UTF8_FULL)
        .set_header(vec!["soul", "kills", "generation", "alive"]);
    for soul in souls.iter().take(args.top) {
        ranking.add_row(vec![
            soul.name.clone(),
            soul.kills.to_string(),
            soul.generation.to_string(),
            (if soul.alive { "yes" } else { "absorbed" }).to_string(),
        ]);
    }
    println!("{ranking}");

    if collective.complete {
        println!("Complete: {}", collective.complete_reason);
    }

    Ok(())
}
