//! Session Controller
//!
//! Owns everything mutable about one play session and the phase machine
//! around it:
//!
//! ```text
//! Tutorial --key--> Menu --Start--> Playing --lethal--> GameOver --click--> Menu
//!                                           --finish--> Complete --click--> Menu
//! ```
//!
//! Only `Playing` runs the simulation (see `tick::step`). The harness feeds
//! key presses, clicks and resolved menu actions in; it never touches the
//! world directly.

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::game::camera::Camera;
use crate::game::coins::{CoinField, CoinFrame};
use crate::game::config::GameConfig;
use crate::game::enemy::EnemyPopulation;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::level::LevelLayout;
use crate::game::manifest::LevelManifest;
use crate::game::player::Player;

/// Session phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Controls screen shown at launch
    #[default]
    Tutorial,
    /// Main menu
    Menu,
    /// Round in progress
    Playing,
    /// Round lost
    GameOver,
    /// Round won
    Complete,
}

impl GamePhase {
    /// Check if this phase ends a round.
    pub fn is_round_over(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Complete)
    }

    fn to_u8(self) -> u8 {
        match self {
            GamePhase::Tutorial => 0,
            GamePhase::Menu => 1,
            GamePhase::Playing => 2,
            GamePhase::GameOver => 3,
            GamePhase::Complete => 4,
        }
    }
}

/// A menu button, already hit-tested by the harness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    Start,
    Quit,
    ToggleMusic,
    ToggleSounds,
}

/// What the harness should do after a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Keep running
    Continue,
    /// Close the game
    Quit,
}

/// Music and sound-effect toggles. Survive round resets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub music_on: bool,
    pub sounds_on: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            music_on: true,
            sounds_on: true,
        }
    }
}

/// One play session.
#[derive(Clone, Debug)]
pub struct Session {
    /// Tunables
    pub config: GameConfig,
    /// Level the world is rebuilt from on reset
    pub manifest: LevelManifest,

    /// Current phase
    pub phase: GamePhase,
    /// Ticks simulated in the current round
    pub tick: u32,
    /// Coins collected this round
    pub score: u32,
    /// Frozen at completion: `score == total_coins`
    pub all_coins_collected: bool,

    /// The controlled body
    pub player: Player,
    /// Static geometry, spikes and flag
    pub level: LevelLayout,
    /// Live enemies
    pub enemies: EnemyPopulation,
    /// Remaining coins
    pub coins: CoinField,
    /// Follow camera
    pub camera: Camera,
    /// Music/sound toggles
    pub audio: AudioSettings,

    /// Events not yet taken by the harness
    pending_events: Vec<GameEvent>,
}

impl Session {
    /// Create a session in the tutorial phase with a fresh world.
    pub fn new(config: GameConfig, manifest: LevelManifest) -> Self {
        let level = LevelLayout::from_manifest(&manifest, &config);
        Self {
            phase: GamePhase::Tutorial,
            tick: 0,
            score: 0,
            all_coins_collected: false,
            player: Player::spawn(&manifest),
            enemies: EnemyPopulation::from_manifest(&manifest),
            coins: CoinField::from_manifest(&manifest),
            camera: Camera::new(),
            audio: AudioSettings::default(),
            pending_events: Vec::new(),
            level,
            config,
            manifest,
        }
    }

    /// Session using the built-in level.
    pub fn with_builtin_level(config: GameConfig) -> Self {
        let manifest = LevelManifest::pixel_dash(&config);
        Self::new(config, manifest)
    }

    /// Discard all round state and rebuild the world from the manifest.
    ///
    /// Audio toggles and the phase are left alone.
    pub fn reset(&mut self) {
        self.tick = 0;
        self.score = 0;
        self.all_coins_collected = false;
        self.player = Player::spawn(&self.manifest);
        self.level = LevelLayout::from_manifest(&self.manifest, &self.config);
        self.enemies = EnemyPopulation::from_manifest(&self.manifest);
        self.coins = CoinField::from_manifest(&self.manifest);
        self.camera = Camera::new();
    }

    /// Check if the simulation is running.
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Any key went down.
    pub fn key_pressed(&mut self) {
        if self.phase == GamePhase::Tutorial {
            self.set_phase(GamePhase::Menu);
        }
    }

    /// The mouse was clicked outside any menu button.
    pub fn clicked(&mut self) {
        if self.phase.is_round_over() {
            self.set_phase(GamePhase::Menu);
        }
    }

    /// A menu button was clicked. Ignored outside the menu.
    pub fn menu_action(&mut self, action: MenuAction) -> SessionCommand {
        if self.phase != GamePhase::Menu {
            return SessionCommand::Continue;
        }

        match action {
            MenuAction::Start => {
                self.reset();
                self.set_phase(GamePhase::Playing);
                self.push_event(GameEvent::new(self.tick, GameEventData::RoundStarted));
                info!(
                    "Round started: {} enemies, {} coins",
                    self.enemies.len(),
                    self.coins.len()
                );
            }
            MenuAction::Quit => {
                info!("Quit requested from menu");
                return SessionCommand::Quit;
            }
            MenuAction::ToggleMusic => {
                self.audio.music_on = !self.audio.music_on;
                self.push_settings_changed();
            }
            MenuAction::ToggleSounds => {
                self.audio.sounds_on = !self.audio.sounds_on;
                self.push_settings_changed();
            }
        }

        SessionCommand::Continue
    }

    /// Skip tutorial and menu and start a round directly.
    ///
    /// Restarts the round if one is already running.
    pub fn start_round(&mut self) {
        match self.phase {
            GamePhase::Tutorial => self.key_pressed(),
            GamePhase::GameOver | GamePhase::Complete => self.clicked(),
            GamePhase::Playing => {
                self.reset();
                self.push_event(GameEvent::new(self.tick, GameEventData::RoundStarted));
                return;
            }
            GamePhase::Menu => {}
        }
        self.menu_action(MenuAction::Start);
    }

    fn push_settings_changed(&mut self) {
        debug!(
            "Audio settings: music {}, sounds {}",
            self.audio.music_on, self.audio.sounds_on
        );
        self.push_event(GameEvent::new(
            self.tick,
            GameEventData::SettingsChanged {
                music_on: self.audio.music_on,
                sounds_on: self.audio.sounds_on,
            },
        ));
    }

    /// Move to `new_phase`, emitting `PhaseChanged` if it differs.
    pub(crate) fn set_phase(&mut self, new_phase: GamePhase) {
        let old_phase = self.phase;
        if old_phase == new_phase {
            return;
        }
        debug!("Phase {:?} -> {:?}", old_phase, new_phase);
        self.phase = new_phase;
        self.push_event(GameEvent::phase_changed(self.tick, old_phase, new_phase));
    }

    /// Queue an event for the harness.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Take all queued events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Deterministic fingerprint of the simulation state.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, |hasher| {
            hasher.update_u8(self.phase.to_u8());
            hasher.update_u32(self.score);
            hasher.update_bool(self.all_coins_collected);

            self.player.hash_into(hasher);
            self.enemies.hash_into(hasher);

            hasher.update_u32(self.coins.len() as u32);
            for coin in self.coins.coins() {
                hasher.update_rect(&coin.body);
            }
            hasher.update_bool(self.coins.frame == CoinFrame::B);
            hasher.update_u32(self.coins.timer);

            hasher.update_u8(self.level.flag.anim.frame);
            hasher.update_u8(self.level.flag.anim.timer);
            hasher.update_f32(self.camera.offset_x);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn new_session() -> Session {
        Session::with_builtin_level(GameConfig::default())
    }

    fn phase_changes(events: &[GameEvent]) -> Vec<(GamePhase, GamePhase)> {
        events
            .iter()
            .filter_map(|e| match e.data {
                GameEventData::PhaseChanged { old_phase, new_phase } => Some((old_phase, new_phase)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_starts_in_tutorial() {
        let session = new_session();
        assert_eq!(session.phase, GamePhase::Tutorial);
        assert_eq!(session.score, 0);
        assert_eq!(session.enemies.len(), 12);
        assert_eq!(session.coins.len(), 30);
    }

    #[test]
    fn test_menu_flow() {
        let mut session = new_session();

        // Clicks and menu actions do nothing in the tutorial
        session.clicked();
        assert_eq!(session.menu_action(MenuAction::Start), SessionCommand::Continue);
        assert_eq!(session.phase, GamePhase::Tutorial);

        session.key_pressed();
        assert_eq!(session.phase, GamePhase::Menu);

        // Further key presses stay in the menu
        session.key_pressed();
        assert_eq!(session.phase, GamePhase::Menu);

        session.menu_action(MenuAction::Start);
        assert_eq!(session.phase, GamePhase::Playing);

        let events = session.take_events();
        assert_eq!(
            phase_changes(&events),
            vec![(GamePhase::Tutorial, GamePhase::Menu), (GamePhase::Menu, GamePhase::Playing)]
        );
        assert!(events.iter().any(|e| e.data == GameEventData::RoundStarted));
    }

    #[test]
    fn test_quit_only_from_menu() {
        let mut session = new_session();
        assert_eq!(session.menu_action(MenuAction::Quit), SessionCommand::Continue);
        session.key_pressed();
        assert_eq!(session.menu_action(MenuAction::Quit), SessionCommand::Quit);
        assert_eq!(session.phase, GamePhase::Menu);
    }

    #[test]
    fn test_audio_toggles_survive_reset() {
        let mut session = new_session();
        session.key_pressed();
        session.menu_action(MenuAction::ToggleMusic);
        session.menu_action(MenuAction::ToggleSounds);
        session.menu_action(MenuAction::ToggleSounds);
        assert_eq!(session.audio, AudioSettings { music_on: false, sounds_on: true });

        session.menu_action(MenuAction::Start);
        assert!(!session.audio.music_on);

        let settings: Vec<_> = session
            .take_events()
            .into_iter()
            .filter(|e| matches!(e.data, GameEventData::SettingsChanged { .. }))
            .collect();
        assert_eq!(settings.len(), 3);
    }

    #[test]
    fn test_click_returns_to_menu_after_round() {
        let mut session = new_session();
        session.start_round();
        session.clicked();
        assert_eq!(session.phase, GamePhase::Playing);

        session.set_phase(GamePhase::GameOver);
        session.clicked();
        assert_eq!(session.phase, GamePhase::Menu);

        session.menu_action(MenuAction::Start);
        session.set_phase(GamePhase::Complete);
        session.clicked();
        assert_eq!(session.phase, GamePhase::Menu);
    }

    #[test]
    fn test_reset_restores_world() {
        let mut session = new_session();
        session.start_round();

        session.score = 7;
        session.all_coins_collected = true;
        session.tick = 300;
        session.camera.offset_x = 900.0;
        session.player.body.translate(2000.0, -50.0);
        session.player.jumps_left = 0;
        let marked: Vec<_> = session.enemies.iter_with_ids().map(|(id, _)| id).take(5).collect();
        session.enemies.remove_marked(&marked);
        let everything = crate::core::rect::Rect::new(-1.0e6, -1.0e6, 2.0e6, 2.0e6);
        session.coins.collect_overlapping(&everything);

        let fresh = new_session();
        session.reset();

        assert_eq!(session.score, 0);
        assert!(!session.all_coins_collected);
        assert_eq!(session.tick, 0);
        assert_eq!(session.camera.offset_x, 0.0);
        assert_eq!(session.player, fresh.player);
        assert_eq!(session.enemies, fresh.enemies);
        assert_eq!(session.coins, fresh.coins);
        assert_eq!(session.compute_hash(), {
            let mut fresh = fresh;
            fresh.phase = GamePhase::Playing;
            fresh.compute_hash()
        });
    }

    #[test]
    fn test_hash_tracks_state() {
        let a = new_session();
        let mut b = new_session();
        assert_eq!(a.compute_hash(), b.compute_hash());

        b.player.vy = -0.0;
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[derive(Clone, Copy, Debug)]
    enum Notice {
        Key,
        Click,
        Menu(MenuAction),
        Lose,
        Win,
    }

    fn notice() -> impl Strategy<Value = Notice> {
        prop_oneof![
            Just(Notice::Key),
            Just(Notice::Click),
            Just(Notice::Menu(MenuAction::Start)),
            Just(Notice::Menu(MenuAction::Quit)),
            Just(Notice::Menu(MenuAction::ToggleMusic)),
            Just(Notice::Menu(MenuAction::ToggleSounds)),
            Just(Notice::Lose),
            Just(Notice::Win),
        ]
    }

    fn allowed(from: GamePhase, to: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (from, to),
            (Tutorial, Menu)
                | (Menu, Playing)
                | (Playing, GameOver)
                | (Playing, Complete)
                | (GameOver, Menu)
                | (Complete, Menu)
        )
    }

    proptest! {
        #[test]
        fn prop_only_documented_transitions(notices in prop::collection::vec(notice(), 0..40)) {
            let mut session = new_session();
            for n in notices {
                match n {
                    Notice::Key => session.key_pressed(),
                    Notice::Click => session.clicked(),
                    Notice::Menu(action) => {
                        session.menu_action(action);
                    }
                    // Stand-ins for the round-ending ticks
                    Notice::Lose if session.is_playing() => session.set_phase(GamePhase::GameOver),
                    Notice::Win if session.is_playing() => session.set_phase(GamePhase::Complete),
                    Notice::Lose | Notice::Win => {}
                }
            }
            for (from, to) in phase_changes(&session.take_events()) {
                prop_assert!(allowed(from, to), "{:?} -> {:?}", from, to);
            }
        }
    }
}
