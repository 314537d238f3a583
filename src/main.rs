//! Treasure Hunt Demo
//!
//! Runs a scripted session and verifies it by replay.
//!
//! Usage: `treasure-hunt [config.json]`. Log level via `RUST_LOG`.

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use treasure_hunt::{
    Action, Direction, HuntConfig, HuntSession, PlayerId, VERSION,
    game::events::GameEventData,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Treasure Hunt v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => HuntConfig::from_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => HuntConfig::default(),
    };

    demo_session(config)
}

/// Demo function to exercise the engine.
fn demo_session(config: HuntConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Session ===");

    let mut session = HuntSession::new(config.clone()).context("starting session")?;
    info!("Grid: {0}x{0}, seed: {1}", config.grid_size, session.seed());
    info!("Treasure starts at cell {}", session.treasure_position());

    let players: Vec<PlayerId> = (1..=3u8).map(|i| PlayerId::new([i; 16])).collect();

    // Each player walks a diagonal staircase from the origin.
    let mut script = Vec::new();
    for (i, id) in players.iter().enumerate() {
        script.push(Action::Join { player_id: *id, stake: 100 * (i as u128 + 1) });
    }
    for step in 0..12u32 {
        for (i, id) in players.iter().enumerate() {
            let direction = if (step + i as u32) % 2 == 0 { Direction::Right } else { Direction::Down };
            script.push(Action::Move { player_id: *id, direction_code: direction.code() });
        }
    }
    // A few deliberately bad requests
    script.push(Action::Join { player_id: players[0], stake: 0 });
    script.push(Action::Move { player_id: PlayerId::new([9; 16]), direction_code: 1 });
    script.push(Action::Move { player_id: players[0], direction_code: 255 });
    script.push(Action::Receive { from: players[2], amount: 50 });

    let mut rejected = 0;
    for action in &script {
        if let Err(err) = session.apply(*action) {
            warn!("Rejected {:?}: {}", action, err);
            rejected += 1;
        }
    }

    let events = session.take_events();
    let relocations = events
        .iter()
        .filter(|e| matches!(e.data, GameEventData::TreasureRelocated { .. }))
        .count();

    info!("=== Session Results ===");
    for id in &players {
        if let Some(player) = session.player(id) {
            info!("Player {} at cell {} (staked {})", id, player.position, player.stake);
        }
    }
    info!("Treasure at cell {}", session.treasure_position());
    info!("Pool balance: {}", session.pool_balance());
    info!("{} events, {} relocations, {} rejected actions", events.len(), relocations, rejected);

    let hash = session.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying the accepted actions
    info!("=== Verifying Determinism ===");
    let (replayed, _) = HuntSession::replay(config, session.seed(), session.history())
        .context("replaying session")?;
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    anyhow::ensure!(hash == replay_hash, "determinism failure: hashes differ");
    info!("DETERMINISM VERIFIED: Hashes match!");

    Ok(())
}
