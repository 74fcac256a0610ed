//! Event Hooks
//!
//! Delivery of game events to outside collaborators (audio, logging, UI).
//! Sinks are fire-and-forget: an error or panic inside a sink is logged and
//! swallowed, and never reaches the simulation.

use std::panic::{self, AssertUnwindSafe};

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::game::events::{GameEvent, GameEventData};
use crate::game::session::AudioSettings;

/// Sound effect volume.
pub const SOUND_VOLUME: f32 = 0.2;

/// Background music volume.
pub const MUSIC_VOLUME: f32 = 0.04;

/// One-shot sound effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Squish,
    Coin,
    Jump,
    GameOver,
    Victory,
}

impl SoundCue {
    /// Name of the sound asset.
    pub fn asset_name(self) -> &'static str {
        match self {
            SoundCue::Squish => "squish",
            SoundCue::Coin => "coin_sound",
            SoundCue::Jump => "jump",
            SoundCue::GameOver => "game_over",
            SoundCue::Victory => "victory",
        }
    }
}

/// Background music control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicCue {
    Play,
    Stop,
}

impl GameEventData {
    /// Sound effect for this event, if any.
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            GameEventData::EnemyStomped { .. } => Some(SoundCue::Squish),
            GameEventData::CoinCollected { .. } => Some(SoundCue::Coin),
            GameEventData::PlayerJumped { .. } => Some(SoundCue::Jump),
            GameEventData::PlayerDied { .. } => Some(SoundCue::GameOver),
            GameEventData::LevelCompleted { .. } => Some(SoundCue::Victory),
            _ => None,
        }
    }

    /// Music change for this event, if any.
    pub fn music_cue(&self) -> Option<MusicCue> {
        match self {
            GameEventData::RoundStarted => Some(MusicCue::Play),
            GameEventData::PlayerDied { .. } | GameEventData::LevelCompleted { .. } => Some(MusicCue::Stop),
            GameEventData::SettingsChanged { music_on, .. } => {
                Some(if *music_on { MusicCue::Play } else { MusicCue::Stop })
            }
            _ => None,
        }
    }
}

/// Errors a sink may report.
#[derive(Debug, Error)]
pub enum SinkError {
    /// An asset the sink needs is missing.
    #[error("Missing asset: {0}")]
    MissingAsset(String),

    /// The sink's backend failed.
    #[error("Sink backend failed: {0}")]
    Backend(String),
}

/// A consumer of game events.
pub trait EventSink {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Handle one event.
    fn handle(&mut self, event: &GameEvent) -> Result<(), SinkError>;
}

/// Deliver every event to every sink, in order.
///
/// Returns the number of failed deliveries (errors plus panics).
pub fn dispatch(events: &[GameEvent], sinks: &mut [Box<dyn EventSink>]) -> usize {
    let mut failures = 0;

    for event in events {
        for sink in sinks.iter_mut() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| sink.handle(event)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!("Sink '{}' failed on tick {}: {}", sink.name(), event.tick, e);
                    failures += 1;
                }
                Err(_) => {
                    warn!("Sink '{}' panicked on tick {}", sink.name(), event.tick);
                    failures += 1;
                }
            }
        }
    }

    failures
}

/// A cue ready for an audio backend.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AudioCue {
    /// Play a sound effect at a volume
    Sound(SoundCue, f32),
    /// Change background music
    Music(MusicCue),
}

/// Turns events into audio cues, honoring the menu's music/sound toggles.
///
/// The backend drains the queue once per frame.
#[derive(Clone, Debug, Default)]
pub struct AudioCueSink {
    settings: AudioSettings,
    queue: Vec<AudioCue>,
}

impl AudioCueSink {
    /// Sink starting from the given toggles.
    pub fn new(settings: AudioSettings) -> Self {
        Self {
            settings,
            queue: Vec::new(),
        }
    }

    /// Current toggles as last seen by this sink.
    pub fn settings(&self) -> AudioSettings {
        self.settings
    }

    /// Take all pending cues.
    pub fn drain(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.queue)
    }
}

impl EventSink for AudioCueSink {
    fn name(&self) -> &str {
        "audio"
    }

    fn handle(&mut self, event: &GameEvent) -> Result<(), SinkError> {
        if let GameEventData::SettingsChanged { music_on, sounds_on } = event.data {
            self.settings = AudioSettings { music_on, sounds_on };
        }

        if let Some(cue) = event.data.sound_cue() {
            if self.settings.sounds_on {
                self.queue.push(AudioCue::Sound(cue, SOUND_VOLUME));
            }
        }

        match event.data.music_cue() {
            Some(MusicCue::Play) if self.settings.music_on => self.queue.push(AudioCue::Music(MusicCue::Play)),
            Some(MusicCue::Stop) => self.queue.push(AudioCue::Music(MusicCue::Stop)),
            _ => {}
        }

        Ok(())
    }
}

/// Writes every event to the log at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn handle(&mut self, event: &GameEvent) -> Result<(), SinkError> {
        debug!("tick {}: {:?}", event.tick, event.data);
        Ok(())
    }
}
