//! Pixel Dash Headless Runner
//!
//! Plays one scripted round without a window, logs what happened, then
//! replays the recorded inputs and checks the state hash matches.
//!
//! Environment:
//! - `RUST_LOG`: log filter (default `info`)
//! - `PIXEL_DASH_LEVEL`: path to a JSON level manifest (default: built-in level)
//! - `PIXEL_DASH_*`: tunable overrides, see `GameConfig::from_env`
//!
//! `pixel-dash dump-level` prints the active level manifest as JSON.

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pixel_dash::{
    TICK_RATE, VERSION,
    game::{
        config::GameConfig,
        events::GameEventData,
        hooks::{dispatch, AudioCueSink, EventSink, LogSink},
        input::{InputFrame, InputRecording, JumpEdge},
        manifest::LevelManifest,
        session::{MenuAction, Session},
        tick::{replay_round, step},
    },
};

/// Give up after two minutes of game time.
const MAX_TICKS: u32 = TICK_RATE * 120;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = GameConfig::from_env();
    config.validate().context("Invalid configuration")?;
    let manifest = load_manifest(&config)?;

    if std::env::args().nth(1).as_deref() == Some("dump-level") {
        println!("{}", manifest.to_json_pretty()?);
        return Ok(());
    }

    info!("Pixel Dash v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);
    info!(
        "Level: {} blocks, {} spikes, {} enemies, {} coins, length {}",
        manifest.obstacles.len(),
        manifest.spikes.len(),
        manifest.enemy_count(),
        manifest.coins.len(),
        config.level_length
    );

    demo_round(config, manifest)
}

fn load_manifest(config: &GameConfig) -> Result<LevelManifest> {
    match std::env::var("PIXEL_DASH_LEVEL") {
        Ok(path) => {
            info!("Loading level from {}", path);
            LevelManifest::from_json_file(&path).with_context(|| format!("Failed to load level {}", path))
        }
        Err(_) => Ok(LevelManifest::pixel_dash(config)),
    }
}

/// Scripted input: hold right and tap jump on a fixed rhythm, with a
/// second tap mid-air for a double jump.
fn scripted_input(tick: u32, jump_key: &mut JumpEdge) -> InputFrame {
    let phase = tick % 40;
    let key_down = phase < 3 || (12..15).contains(&phase);
    let mut frame = InputFrame::with_movement(false, true);
    frame.set_jump(jump_key.update(key_down));
    frame
}

/// Play one round, then verify it by replay.
fn demo_round(config: GameConfig, manifest: LevelManifest) -> Result<()> {
    info!("=== Starting Demo Round ===");

    let mut session = Session::new(config.clone(), manifest.clone());
    let mut sinks: Vec<Box<dyn EventSink>> = vec![Box::new(LogSink), Box::new(AudioCueSink::new(session.audio))];

    // Tutorial -> menu -> playing, as a player would
    session.key_pressed();
    session.menu_action(MenuAction::Start);
    dispatch(&session.take_events(), &mut sinks);

    let mut recording = InputRecording::new();
    let mut jump_key = JumpEdge::new();
    let mut stomps = 0;
    let mut jumps = 0;
    let mut last_report_tick = 0;

    while session.is_playing() && session.tick < MAX_TICKS {
        let frame = scripted_input(session.tick, &mut jump_key);
        recording.record(session.tick, frame);

        let result = step(&mut session, frame);
        dispatch(&result.events, &mut sinks);

        for event in &result.events {
            match &event.data {
                GameEventData::EnemyStomped { species, .. } => {
                    stomps += 1;
                    info!("Tick {}: stomped a {}", event.tick, species.name());
                }
                GameEventData::PlayerJumped { .. } => jumps += 1,
                GameEventData::PlayerDied { cause } => {
                    info!("Tick {}: died ({:?}) at x = {:.1}", event.tick, cause, session.player.x());
                }
                GameEventData::LevelCompleted { score, all_coins_collected } => {
                    info!(
                        "Tick {}: level complete, score {} (all coins: {})",
                        event.tick, score, all_coins_collected
                    );
                }
                _ => {}
            }
        }

        // Report every 10 seconds
        if session.tick - last_report_tick >= TICK_RATE * 10 {
            info!(
                "Tick {}: x = {:.1}, score {}, {} enemies left, camera {:.1}",
                session.tick,
                session.player.x(),
                session.score,
                session.enemies.len(),
                session.camera.offset_x
            );
            last_report_tick = session.tick;
        }
    }
    recording.finalize(session.tick.saturating_sub(1));

    // Print final results
    info!("=== Round Results ===");
    info!("Phase: {:?} after {} ticks", session.phase, session.tick);
    info!("Score: {}/{}", session.score, config.total_coins);
    info!("Jumps: {}, stomps: {}", jumps, stomps);
    info!(
        "Recording: {} deltas, {} bytes",
        recording.delta_count(),
        recording.to_bytes()?.len()
    );
    let hash = session.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Input Hash: {}", hex::encode(recording.compute_hash()));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let bytes = recording.to_bytes()?;
    let decoded = InputRecording::from_bytes(&bytes)?;
    let (replayed, _) = replay_round(config, manifest, &decoded, MAX_TICKS);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!(
            "Replay diverged: {} != {}",
            hex::encode(hash),
            hex::encode(replay_hash)
        );
    }
    info!("Determinism verified: hashes match");

    Ok(())
}
