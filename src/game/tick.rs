//! Simulation Tick
//!
//! One fixed-timestep update of a running round. The order of the steps is
//! part of the game's behavior and must not change:
//!
//! 1. jump trigger
//! 2. horizontal motion
//! 3. gravity integration
//! 4. ground clamp
//! 5. obstacle collision
//! 6. enemy collision / stomps
//! 7. coin pickup
//! 8. lethal-contact check
//! 9. enemy and flag advance
//! 10. coin animation
//! 11. player animation
//! 12. camera
//! 13. phase transition (death before completion)
//!
//! Same session + same inputs = same state hash, every time.

#[cfg(feature = "debug-tracing")]
use tracing::trace;
use tracing::{debug, info};

use crate::game::collision::{lethal_contact, resolve_obstacles, resolve_stomps};
use crate::game::config::GameConfig;
use crate::game::events::GameEvent;
use crate::game::input::{InputFrame, InputRecording};
use crate::game::manifest::LevelManifest;
use crate::game::session::{GamePhase, Session};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events queued since the last take, including this tick's
    pub events: Vec<GameEvent>,
    /// Whether the round ended this tick
    pub round_ended: bool,
}

/// Run one simulation tick.
///
/// Outside `Playing` this is a no-op that returns an empty result and
/// leaves queued events in the session.
pub fn step(session: &mut Session, input: InputFrame) -> TickResult {
    let mut result = TickResult::default();

    if !session.is_playing() {
        return result;
    }

    session.tick += 1;
    let tick = session.tick;
    let config = &session.config;
    let tolerance = config.collision_tolerance;

    // 1. Jump
    if input.jump_pressed() && session.player.try_jump(config.jump_power) {
        let jumps_left = session.player.jumps_left;
        session.push_event(GameEvent::player_jumped(tick, jumps_left));
    }

    let config = &session.config;

    // 2-4. Motion, gravity and the global floor
    session.player.move_horizontal(input, config.player_speed);
    session.player.integrate(config.gravity);
    session.player.clamp_to_ground(session.level.ground_top_y);

    // 5. Blocks and platforms
    resolve_obstacles(&mut session.player, &session.level, tolerance);

    // 6. Stomps
    let stomps = resolve_stomps(
        &mut session.player,
        &mut session.enemies,
        tolerance,
        config.stomp_velocity(),
    );
    for stomp in stomps {
        debug!("Stomped {} at ({:.1}, {:.1})", stomp.species.name(), stomp.x, stomp.y);
        session.push_event(GameEvent::enemy_stomped(tick, stomp.species, stomp.x, stomp.y));
    }

    // 7. Coins
    let collected = session.coins.collect_overlapping(&session.player.body);
    for _ in 0..collected {
        session.score += 1;
        debug!("Coin collected, score {}", session.score);
        session.push_event(GameEvent::coin_collected(tick, session.score));
    }

    // 8. Lethal contact against the post-stomp population
    let lethal = lethal_contact(&session.player, &session.level, &session.enemies, tolerance);

    // 9-12. Animation and camera
    let gravity = session.config.gravity;
    session.enemies.advance(gravity);
    session.level.flag.advance();
    session.coins.animate();
    session.player.animate(input.has_movement());
    session.camera.follow(
        session.player.x(),
        session.config.screen_width,
        session.config.camera_lead,
    );

    #[cfg(feature = "debug-tracing")]
    trace!(
        "tick {} x={:.2} y={:.2} vy={:.2} ground={} jumps={}",
        tick,
        session.player.x(),
        session.player.body.center_y(),
        session.player.vy,
        session.player.on_ground,
        session.player.jumps_left
    );

    // 13. Transitions
    if let Some(cause) = lethal {
        info!("Player died on tick {}: {:?}, score {}", tick, cause, session.score);
        session.push_event(GameEvent::player_died(tick, cause));
        session.set_phase(GamePhase::GameOver);
    } else if session.player.x() >= session.config.level_length {
        session.all_coins_collected = session.score == session.config.total_coins;
        info!(
            "Level completed on tick {}: score {}/{}",
            tick, session.score, session.config.total_coins
        );
        session.push_event(GameEvent::level_completed(
            tick,
            session.score,
            session.all_coins_collected,
        ));
        session.set_phase(GamePhase::Complete);
    }

    result.round_ended = session.phase.is_round_over();
    result.events = session.take_events();
    result
}

/// Replay a round from a recording.
///
/// Starts a fresh round and feeds recorded inputs until the round ends, the
/// recording runs out, or `max_ticks` ticks have run. Returns the final
/// session and every event produced.
pub fn replay_round(
    config: GameConfig,
    manifest: LevelManifest,
    recording: &InputRecording,
    max_ticks: u32,
) -> (Session, Vec<GameEvent>) {
    let mut session = Session::new(config, manifest);
    session.start_round();
    let mut all_events = session.take_events();

    for (t, frame) in recording.replay_iter() {
        if t >= max_ticks {
            break;
        }

        let result = step(&mut session, frame);
        all_events.extend(result.events);

        if result.round_ended {
            break;
        }
    }

    (session, all_events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rect::Rect;
    use crate::game::enemy::Species;
    use crate::game::events::{DeathCause, GameEventData};
    use crate::game::level::Hazard;
    use crate::game::player::MAX_JUMPS;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn playing() -> Session {
        let mut session = Session::with_builtin_level(GameConfig::default());
        session.start_round();
        session.take_events();
        session
    }

    fn playing_empty() -> Session {
        let config = GameConfig::default();
        let manifest = LevelManifest::empty(&config);
        let mut session = Session::new(config, manifest);
        session.start_round();
        session.take_events();
        session
    }

    fn place(session: &mut Session, cx: f32, bottom: f32, vy: f32) {
        session.player.body.set_center_x(cx);
        session.player.body.set_bottom(bottom);
        session.player.vy = vy;
    }

    fn random_inputs(seed: u64, count: usize) -> Vec<InputFrame> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let mut frame = InputFrame::with_movement(rng.gen_bool(0.2), rng.gen_bool(0.7));
                frame.set_jump(rng.gen_bool(0.05));
                frame
            })
            .collect()
    }

    #[test]
    fn test_idle_fall_lands_on_ground_line() {
        let mut session = playing_empty();
        place(&mut session, 0.0, 124.0, 0.0);
        session.player.on_ground = false;

        let mut landed_at = None;
        for t in 0..600 {
            step(&mut session, InputFrame::new());
            if session.player.on_ground && landed_at.is_none() {
                landed_at = Some(t);
            }
        }

        assert!(landed_at.is_some());
        assert_eq!(session.player.body.bottom(), session.level.ground_top_y);
        assert_eq!(session.player.vy, 0.0);
        assert!(session.player.on_ground);
        assert_eq!(session.player.jumps_left, MAX_JUMPS);
        assert_eq!(session.camera.offset_x, 0.0);
        assert!(session.is_playing());
    }

    #[test]
    fn test_ground_line_is_floor_everywhere() {
        // Section 3 has no ground tiles under its platforms
        let mut session = playing();
        place(&mut session, 2550.0, 300.0, 0.0);
        for _ in 0..120 {
            step(&mut session, InputFrame::new());
        }
        assert_eq!(session.player.body.bottom(), 560.0);
        assert!(session.player.on_ground);
    }

    #[test]
    fn test_jump_trigger() {
        let mut session = playing();
        let result = step(&mut session, InputFrame::jump());

        assert_eq!(session.player.jumps_left, 1);
        assert!((session.player.vy - (-11.4)).abs() < 1e-5);
        assert!(!session.player.on_ground);
        assert!(result
            .events
            .iter()
            .any(|e| e.data == GameEventData::PlayerJumped { jumps_left: 1 }));
    }

    #[test]
    fn test_double_jump_then_budget_exhausted() {
        let mut session = playing();
        step(&mut session, InputFrame::jump());
        step(&mut session, InputFrame::new());
        step(&mut session, InputFrame::jump());
        assert_eq!(session.player.jumps_left, 0);

        let vy_before = session.player.vy;
        let result = step(&mut session, InputFrame::jump());
        assert_eq!(session.player.jumps_left, 0);
        assert!((session.player.vy - (vy_before + 0.6)).abs() < 1e-5);
        assert!(!result.events.iter().any(|e| matches!(e.data, GameEventData::PlayerJumped { .. })));
    }

    #[test]
    fn test_spike_is_lethal_at_any_velocity() {
        for vy in [-12.0, -3.0, 0.0, 5.0, 12.0] {
            let mut session = playing();
            // First warm-up spike: x 568..616, y 528..560
            place(&mut session, 592.0, 564.0, vy);

            let result = step(&mut session, InputFrame::new());

            assert_eq!(session.phase, GamePhase::GameOver, "vy = {}", vy);
            assert!(result.round_ended);
            assert!(result
                .events
                .iter()
                .any(|e| e.data == GameEventData::PlayerDied { cause: DeathCause::Spike }));
        }
    }

    #[test]
    fn test_stomp_removes_enemy_for_good() {
        let mut session = playing();
        // First walker spans x 678..722, y 520..560
        place(&mut session, 700.0, 516.0, 5.0);

        let result = step(&mut session, InputFrame::new());

        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.enemies.species(Species::Walker).len(), 3);
        assert!((session.player.vy - (-8.4)).abs() < 1e-5);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::EnemyStomped { species: Species::Walker, .. })));

        for _ in 0..200 {
            step(&mut session, InputFrame::new());
        }
        assert_eq!(session.enemies.species(Species::Walker).len(), 3);
    }

    #[test]
    fn test_walking_into_enemy_is_lethal() {
        let mut session = playing();
        place(&mut session, 660.0, 560.0, 0.0);

        let mut died = None;
        for _ in 0..30 {
            let result = step(&mut session, InputFrame::with_movement(false, true));
            if let Some(e) = result.events.iter().find(|e| e.is_round_end()) {
                died = Some(e.data.clone());
                break;
            }
        }

        assert_eq!(
            died,
            Some(GameEventData::PlayerDied { cause: DeathCause::Enemy(Species::Walker) })
        );
        assert_eq!(session.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_completion_with_all_coins() {
        let mut session = playing();
        place(&mut session, 7998.0, 560.0, 0.0);
        session.score = 30;

        let result = step(&mut session, InputFrame::with_movement(false, true));

        assert_eq!(session.phase, GamePhase::Complete);
        assert!(session.all_coins_collected);
        assert!(result.round_ended);
        assert!(result.events.iter().any(|e| e.data
            == GameEventData::LevelCompleted { score: 30, all_coins_collected: true }));
    }

    #[test]
    fn test_completion_flag_frozen() {
        let mut session = playing();
        place(&mut session, 7998.0, 560.0, 0.0);
        session.score = 29;

        step(&mut session, InputFrame::with_movement(false, true));
        assert_eq!(session.phase, GamePhase::Complete);
        assert!(!session.all_coins_collected);

        // Nothing runs after the round is over
        let tick = session.tick;
        let hash = session.compute_hash();
        session.score = 30;
        let result = step(&mut session, InputFrame::with_movement(false, true));
        assert!(result.events.is_empty());
        assert!(!result.round_ended);
        assert_eq!(session.tick, tick);
        assert!(!session.all_coins_collected);
        session.score = 29;
        assert_eq!(session.compute_hash(), hash);
    }

    #[test]
    fn test_death_wins_over_completion() {
        let mut session = playing();
        place(&mut session, 7998.0, 560.0, 0.0);
        session.level.hazards.push(Hazard { body: Rect::new(7990.0, 530.0, 30.0, 30.0) });

        let result = step(&mut session, InputFrame::with_movement(false, true));

        assert_eq!(session.phase, GamePhase::GameOver);
        assert!(!result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::LevelCompleted { .. })));
    }

    #[test]
    fn test_step_outside_playing_is_noop() {
        let mut session = Session::with_builtin_level(GameConfig::default());
        let hash = session.compute_hash();

        let result = step(&mut session, InputFrame::with_movement(false, true).and_jump());

        assert!(result.events.is_empty());
        assert_eq!(session.tick, 0);
        assert_eq!(session.compute_hash(), hash);
    }

    #[test]
    fn test_random_play_is_deterministic() {
        let inputs = random_inputs(0xDA5, 1200);

        let run = || {
            let mut session = playing();
            let mut events = Vec::new();
            for input in &inputs {
                events.extend(step(&mut session, *input).events);
            }
            (session.compute_hash(), events)
        };

        let (hash1, events1) = run();
        let (hash2, events2) = run();
        assert_eq!(hash1, hash2);
        assert_eq!(events1, events2);
    }

    #[test]
    fn test_replay_matches_live_round() {
        let inputs = random_inputs(7, 900);
        let config = GameConfig::default();
        let manifest = LevelManifest::pixel_dash(&config);

        let mut live = Session::new(config.clone(), manifest.clone());
        live.start_round();
        let mut live_events = live.take_events();
        let mut recording = InputRecording::new();

        for input in &inputs {
            recording.record(live.tick, *input);
            let result = step(&mut live, *input);
            live_events.extend(result.events);
            if result.round_ended {
                break;
            }
        }
        recording.finalize(live.tick.saturating_sub(1));

        let (replayed, replay_events) = replay_round(config, manifest, &recording, u32::MAX);

        assert_eq!(replayed.tick, live.tick);
        assert_eq!(replayed.compute_hash(), live.compute_hash());
        assert_eq!(replay_events, live_events);
    }

    #[test]
    fn test_replay_respects_max_ticks() {
        let mut recording = InputRecording::new();
        recording.record(0, InputFrame::new());
        recording.finalize(499);

        let config = GameConfig::default();
        let manifest = LevelManifest::pixel_dash(&config);
        let (session, _) = replay_round(config, manifest, &recording, 100);

        assert_eq!(session.tick, 100);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_round_invariants(flags in prop::collection::vec(0u8..8, 0..400)) {
            let mut session = playing();
            let mut last_score = 0;

            for bits in flags {
                let input = InputFrame { flags: bits };
                let jumps_before = session.player.jumps_left;
                let was_playing = session.is_playing();

                let result = step(&mut session, input);

                prop_assert!(session.player.jumps_left <= MAX_JUMPS);
                prop_assert!(session.score >= last_score);
                prop_assert_eq!(session.score as usize, 30 - session.coins.len());
                prop_assert!(session.camera.offset_x >= 0.0);

                if was_playing {
                    prop_assert_eq!(
                        session.camera.offset_x,
                        (session.player.x() - 800.0 * 0.4).max(0.0)
                    );

                    let jumped = result
                        .events
                        .iter()
                        .find_map(|e| match e.data {
                            GameEventData::PlayerJumped { jumps_left } => Some(jumps_left),
                            _ => None,
                        });
                    if input.jump_pressed() && jumps_before > 0 {
                        prop_assert_eq!(jumped, Some(jumps_before - 1));
                    } else {
                        prop_assert_eq!(jumped, None);
                    }
                }

                last_score = session.score;
            }
        }
    }
}
