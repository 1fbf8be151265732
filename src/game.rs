//! Frame driver
//!
//! [`Game`] owns the simulation plus its collaborators (records store, audio)
//! and runs exactly one tick per [`Game::frame`] call.

use crate::audio::{AudioManager, AudioSink, NullSink};
use crate::consts::TICKS_PER_SECOND;
use crate::records::{MemoryStore, RecordStore, Records};
use crate::renderer::{Scene, compose_current};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, ReplayBuffer, RunState, StartRequest, StateTag, TickInput, tick};

/// Game instance holding all state
pub struct Game {
    state: GameState,
    settings: Settings,
    records: Records,
    store: Box<dyn RecordStore>,
    audio: AudioManager,
    sink: Box<dyn AudioSink>,
    /// Latest audio clock reading, used to start music on events
    clock_ms: f64,
    last_events: Vec<GameEvent>,
}

impl Game {
    pub fn new(settings: Settings, store: Box<dyn RecordStore>, sink: Box<dyn AudioSink>) -> Self {
        let records = Records::load(store.as_ref());
        let mut state = GameState::new(settings.seed, settings.width, settings.height);
        state.difficulty = settings.difficulty;
        state.unlocked_achievements = records.unlocked();
        log::info!(
            "Game ready ({}x{}, {}, seed {:#x})",
            settings.width,
            settings.height,
            settings.difficulty.as_str(),
            settings.seed
        );
        Self {
            state,
            audio: AudioManager::from_settings(&settings),
            settings,
            records,
            store,
            sink,
            clock_ms: 0.0,
            last_events: Vec::new(),
        }
    }

    /// No persistence, no sound
    pub fn headless(settings: Settings) -> Self {
        Self::new(settings, Box::new(MemoryStore::new()), Box::new(NullSink))
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.settings.width = width;
        self.settings.height = height;
        self.state.resize(width, height);
    }

    /// Run one tick and dispatch its events. Returns the events it produced.
    pub fn frame(&mut self, input: &TickInput) -> &[GameEvent] {
        let mut input = input.clone();
        // A bare action on the title screen starts at the configured difficulty
        if self.state.run_state == RunState::Start && input.action && input.start.is_none() {
            input.start = Some(StartRequest::new(self.settings.difficulty));
        }

        tick(&mut self.state, &input);

        let events = self.state.drain_events();
        if self.settings.invincible_mode && events.iter().any(|e| matches!(e, GameEvent::RunStarted { .. })) {
            self.state.set_invincible_mode(true);
        }
        self.update_records(&events);
        self.audio.handle_events(&events, self.clock_ms, self.sink.as_mut());
        self.last_events = events;
        &self.last_events
    }

    /// Drive the music clock (wall-clock milliseconds)
    pub fn pump_audio(&mut self, now_ms: f64) {
        self.clock_ms = now_ms;
        self.audio.pump(
            now_ms,
            self.state.score,
            self.state.rapid.body_inside,
            self.sink.as_mut(),
        );
    }

    fn update_records(&mut self, events: &[GameEvent]) {
        let mut dirty = false;
        for event in events {
            match event {
                GameEvent::AchievementUnlocked(a) => dirty |= self.records.unlock(*a),
                GameEvent::GameOver { score, .. } => {
                    if self.records.submit_score(*score) {
                        log::info!("New high score: {score}m");
                        dirty = true;
                    }
                }
                _ => {}
            }
        }
        if dirty {
            self.records.save(self.store.as_mut());
        }
    }

    /// Flip the settings-level invincible mode (applies to the current run too)
    pub fn set_invincible_mode(&mut self, on: bool) {
        self.settings.invincible_mode = on;
        if self.state.run_state.is_simulating() || self.state.run_state == RunState::Paused {
            self.state.set_invincible_mode(on);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    pub fn state_tag(&self) -> StateTag {
        self.state.run_state.tag()
    }

    /// Distance in whole metres
    pub fn score(&self) -> u32 {
        self.state.score.floor() as u32
    }

    /// Simulated time at the nominal tick rate
    pub fn elapsed_secs(&self) -> f64 {
        self.state.tick_count as f64 / f64::from(TICKS_PER_SECOND)
    }

    pub fn lives(&self) -> u32 {
        self.state.lives
    }

    pub fn rank(&self) -> &'static str {
        self.state.rank
    }

    pub fn boss_warning(&self) -> bool {
        self.state.boss_warning
    }

    pub fn replay(&self) -> &ReplayBuffer {
        &self.state.replay
    }

    /// Draw data for the current frame; `None` for an empty replay frame
    pub fn scene(&self) -> Option<Scene> {
        compose_current(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::Achievement;

    fn action() -> TickInput {
        TickInput {
            action: true,
            ..TickInput::default()
        }
    }

    #[test]
    fn test_action_starts_configured_difficulty() {
        let mut game = Game::headless(Settings::from_difficulty(Difficulty::Hard));
        let events = game.frame(&action()).to_vec();
        assert_eq!(game.state_tag(), StateTag::Playing);
        assert_eq!(game.state().difficulty, Difficulty::Hard);
        assert!(events.contains(&GameEvent::RunStarted {
            difficulty: Difficulty::Hard,
            start_score: 0
        }));
    }

    #[test]
    fn test_settings_invincible_survives_run_start() {
        let settings = Settings {
            invincible_mode: true,
            ..Settings::default()
        };
        let mut game = Game::headless(settings);
        game.frame(&action());
        assert!(game.state().invincible_mode);
        assert!(game.state().invincible_mode_used);
    }

    #[test]
    fn test_records_loaded_and_saved() {
        let store = MemoryStore::with_json(r#"{"high_score":5,"achievements":["collector"]}"#);
        let mut game = Game::new(Settings::default(), Box::new(store), Box::new(NullSink));
        assert_eq!(game.records().high_score, 5);
        assert!(game.state().unlocked_achievements.contains(&Achievement::Collector));

        game.frame(&TickInput {
            start: Some(StartRequest {
                difficulty: Difficulty::Normal,
                start_score: 600,
            }),
            ..TickInput::default()
        });
        game.frame(&TickInput::default());
        assert!(game.records().has(Achievement::Reach500));

        game.state.game_over(None);
        game.frame(&TickInput::default());
        assert_eq!(game.records().high_score, 600);
    }

    #[test]
    fn test_elapsed_secs_follows_tick_count() {
        let mut game = Game::headless(Settings::default());
        game.frame(&action());
        for _ in 0..89 {
            game.frame(&TickInput::default());
        }
        assert_eq!(game.state().tick_count, 90);
        assert!((game.elapsed_secs() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_scene_available_while_playing() {
        let mut game = Game::headless(Settings::default());
        game.frame(&action());
        assert!(game.scene().is_some());
        assert_eq!(game.lives(), 1);
        assert_eq!(game.rank(), "Lost Shrimp");
    }
}
