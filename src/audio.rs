//! Sound triggers and background music
//!
//! Synthesis happens outside the crate. The simulation's events are mapped to
//! [`SoundEffect`]s and handed to an [`AudioSink`] fire-and-forget; the music
//! sequencer runs on its own millisecond clock and is pumped after ticks.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundEffect {
    /// Jump flick (also played on escaping a net)
    Jump,
    /// Damage or a predator's bite
    Hit,
    /// Pickup chime
    Item,
    /// Struggle tap, pitched up with each attempt
    Struggle { count: u32 },
    /// Soft pop for trail bubbles
    Bubble,
    /// Low-passed rushing water
    Rumble { volume: f32 },
}

impl SoundEffect {
    /// Which sound an event triggers, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jump { .. } | GameEvent::Escaped => Some(Self::Jump),
            GameEvent::Hit { .. } | GameEvent::Bitten => Some(Self::Hit),
            GameEvent::Collected { .. } | GameEvent::ExtraLife { .. } | GameEvent::AchievementUnlocked(_) => {
                Some(Self::Item)
            }
            GameEvent::Struggle { count, .. } => Some(Self::Struggle { count: *count }),
            GameEvent::Bubble => Some(Self::Bubble),
            GameEvent::RapidCurrentRumble { volume } => Some(Self::Rumble { volume: *volume }),
            _ => None,
        }
    }

    /// Base loudness before the player's volume settings
    pub fn base_volume(&self) -> f32 {
        match self {
            Self::Jump => 0.1,
            Self::Hit => 0.2,
            Self::Item => 0.1,
            Self::Struggle { .. } => 0.1,
            Self::Bubble => 0.02,
            Self::Rumble { volume } => *volume,
        }
    }

    /// Tone frequency for the struggle tap
    pub fn struggle_frequency(count: u32) -> f32 {
        400.0 + count as f32 * 100.0
    }
}

/// Output end of the audio system
///
/// Calls never report back; a sink that cannot play simply drops the request.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    /// One sequencer note (triangle wave)
    fn play_note(&mut self, frequency: f32, duration_secs: f32, volume: f32);
}

/// Sink that discards everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
    fn play_note(&mut self, _frequency: f32, _duration_secs: f32, _volume: f32) {}
}

/// What a [`MemorySink`] heard
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Played {
    Effect(SoundEffect, f32),
    Note(f32),
}

/// Sink that records requests in order
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub played: Vec<Played>,
}

impl AudioSink for MemorySink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.played.push(Played::Effect(effect, volume));
    }

    fn play_note(&mut self, frequency: f32, _duration_secs: f32, _volume: f32) {
        self.played.push(Played::Note(frequency));
    }
}

/// Step sequencer for the background loop
///
/// Slower and lower with depth; a rapid current doubles the tempo and raises
/// the pitch.
#[derive(Debug, Clone)]
pub struct BgmSequencer {
    step: usize,
    tempo_ms: f64,
    pitch: f32,
    /// Wall-clock time the next step is due, `None` while stopped
    next_due_ms: Option<f64>,
}

impl Default for BgmSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl BgmSequencer {
    /// G3, C4, A3, G3 with rests between
    pub const NOTES: [f32; 8] = [196.0, 0.0, 261.0, 0.0, 220.0, 0.0, 196.0, 0.0];
    pub const NOTE_SECS: f32 = 0.2;
    pub const NOTE_VOLUME: f32 = 0.1;
    const SURFACE_TEMPO_MS: f64 = 250.0;
    const ABYSS_TEMPO_MS: f64 = 400.0;
    const FULL_DEPTH: f64 = 2000.0;

    pub fn new() -> Self {
        Self {
            step: 0,
            tempo_ms: Self::SURFACE_TEMPO_MS,
            pitch: 1.0,
            next_due_ms: None,
        }
    }

    pub fn tempo_ms(&self) -> f64 {
        self.tempo_ms
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Retune for the current depth
    pub fn set_params(&mut self, score: f64, in_rapid_current: bool) {
        let ratio = (score / Self::FULL_DEPTH).clamp(0.0, 1.0);
        self.tempo_ms = Self::SURFACE_TEMPO_MS + ratio * (Self::ABYSS_TEMPO_MS - Self::SURFACE_TEMPO_MS);
        self.pitch = 1.0 - ratio as f32 * 0.4;
        if in_rapid_current {
            self.tempo_ms *= 0.5;
            self.pitch += 0.5;
        }
    }

    /// Start looping; the first step is due immediately
    pub fn start(&mut self, now_ms: f64) {
        if self.next_due_ms.is_none() {
            self.next_due_ms = Some(now_ms);
        }
    }

    pub fn stop(&mut self) {
        self.next_due_ms = None;
    }

    /// Advance at most one step. Returns the note frequency to play, if any.
    pub fn pump(&mut self, now_ms: f64) -> Option<f32> {
        let due = self.next_due_ms?;
        if now_ms < due {
            return None;
        }
        let base = Self::NOTES[self.step % Self::NOTES.len()];
        self.step += 1;
        // After a long stall, resync instead of bursting through missed steps
        let next = due + self.tempo_ms;
        self.next_due_ms = Some(if next <= now_ms { now_ms + self.tempo_ms } else { next });
        (base > 0.0).then_some(base * self.pitch)
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    bgm_volume: f32,
    muted: bool,
    bgm: BgmSequencer,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AudioManager {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            master_volume: settings.master_volume,
            sfx_volume: settings.sfx_volume,
            bgm_volume: settings.bgm_volume,
            muted: settings.muted,
            bgm: BgmSequencer::new(),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_bgm_volume(&mut self, vol: f32) {
        self.bgm_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        log::debug!("Audio {}", if muted { "muted" } else { "unmuted" });
    }

    fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn effective_bgm_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.bgm_volume
        }
    }

    pub fn bgm(&self) -> &BgmSequencer {
        &self.bgm
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect, sink: &mut dyn AudioSink) {
        let vol = effect.base_volume() * self.effective_sfx_volume();
        if vol <= 0.001 {
            return;
        }
        sink.play(effect, vol);
    }

    /// React to one tick's events: sounds plus music start/stop
    pub fn handle_events(&mut self, events: &[GameEvent], now_ms: f64, sink: &mut dyn AudioSink) {
        for event in events {
            match event {
                GameEvent::RunStarted { .. } | GameEvent::Resumed => self.bgm.start(now_ms),
                GameEvent::Paused | GameEvent::GameOver { .. } => self.bgm.stop(),
                _ => {}
            }
            if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect, sink);
            }
        }
    }

    /// Drive the music clock; never blocks
    pub fn pump(&mut self, now_ms: f64, score: f64, in_rapid_current: bool, sink: &mut dyn AudioSink) {
        self.bgm.set_params(score, in_rapid_current);
        let Some(freq) = self.bgm.pump(now_ms) else {
            return;
        };
        let vol = BgmSequencer::NOTE_VOLUME * self.effective_bgm_volume();
        if vol > 0.001 {
            sink.play_note(freq, BgmSequencer::NOTE_SECS, vol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::DeathCause;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Jump { rhythm: true }),
            Some(SoundEffect::Jump)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Hit {
                cause: DeathCause::Shark,
                lives: 1
            }),
            Some(SoundEffect::Hit)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Struggle { count: 2, required: 3 }),
            Some(SoundEffect::Struggle { count: 2 })
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::BossWarning), None);
        assert_eq!(SoundEffect::struggle_frequency(2), 600.0);
    }

    #[test]
    fn test_bgm_params_follow_depth() {
        let mut bgm = BgmSequencer::new();
        bgm.set_params(0.0, false);
        assert_eq!((bgm.tempo_ms(), bgm.pitch()), (250.0, 1.0));
        bgm.set_params(2000.0, false);
        assert_eq!(bgm.tempo_ms(), 400.0);
        assert!((bgm.pitch() - 0.6).abs() < 1e-6);
        bgm.set_params(1000.0, true);
        assert_eq!(bgm.tempo_ms(), 162.5);
        assert!((bgm.pitch() - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_bgm_steps_on_its_own_clock() {
        let mut bgm = BgmSequencer::new();
        assert_eq!(bgm.pump(0.0), None);
        bgm.start(1000.0);
        assert_eq!(bgm.pump(1000.0), Some(196.0));
        // Rest step, then nothing until the next tempo boundary
        assert_eq!(bgm.pump(1100.0), None);
        assert_eq!(bgm.pump(1250.0), None);
        assert_eq!(bgm.pump(1499.0), None);
        assert_eq!(bgm.pump(1500.0), Some(261.0));
        bgm.stop();
        assert_eq!(bgm.pump(5000.0), None);
    }

    #[test]
    fn test_bgm_resyncs_after_stall() {
        let mut bgm = BgmSequencer::new();
        bgm.start(0.0);
        assert!(bgm.pump(0.0).is_some());
        // A long gap plays one step, not a burst
        assert_eq!(bgm.pump(10_000.0), None);
        assert_eq!(bgm.pump(10_000.0), None);
        assert_eq!(bgm.pump(10_250.0), Some(261.0));
    }

    #[test]
    fn test_muted_manager_is_silent() {
        let mut audio = AudioManager::default();
        audio.set_muted(true);
        let mut sink = MemorySink::default();
        audio.handle_events(&[GameEvent::Jump { rhythm: false }], 0.0, &mut sink);
        audio.pump(0.0, 0.0, false, &mut sink);
        assert!(sink.played.is_empty());
    }

    #[test]
    fn test_events_start_music_and_play_effects() {
        let mut audio = AudioManager::default();
        let mut sink = MemorySink::default();
        audio.handle_events(
            &[
                GameEvent::RunStarted {
                    difficulty: crate::settings::Difficulty::Normal,
                    start_score: 0,
                },
                GameEvent::Collected { points: 50 },
            ],
            0.0,
            &mut sink,
        );
        assert!(audio.bgm().is_running());
        assert!(matches!(sink.played.as_slice(), [Played::Effect(SoundEffect::Item, _)]));
        audio.pump(0.0, 0.0, false, &mut sink);
        assert_eq!(sink.played.last(), Some(&Played::Note(196.0)));

        audio.handle_events(&[GameEvent::Paused], 10.0, &mut sink);
        assert!(!audio.bgm().is_running());
    }
}
