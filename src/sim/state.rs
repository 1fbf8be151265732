//! Game state and core simulation types
//!
//! Everything the tick mutates lives in `GameState`; the driver only reads it
//! and drains its events.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::collision::Seabed;
use super::entity::{DeathCause, WorldContext};
use super::item::Item;
use super::progress::{Achievement, rank_for};
use super::registry::EntityRegistry;
use super::replay::ReplayBuffer;
use super::scenery::{BackgroundObject, Bubble, Decoration, FloatingText, StreamLine};
use super::scheduler::Scheduler;
use super::terrain::TerrainSegment;
use crate::consts::*;
use crate::settings::Difficulty;

/// Discriminant of [`RunState`], for collaborators that only need the phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateTag {
    Start,
    Playing,
    Paused,
    GameOver,
    Bitten,
    Caught,
    Replay,
    Gallery,
}

impl StateTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateTag::Start => "START",
            StateTag::Playing => "PLAYING",
            StateTag::Paused => "PAUSED",
            StateTag::GameOver => "GAMEOVER",
            StateTag::Bitten => "BITTEN",
            StateTag::Caught => "CAUGHT",
            StateTag::Replay => "REPLAY",
            StateTag::Gallery => "GALLERY",
        }
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Title screen, waiting for a start request
    Start,
    Playing,
    /// Simulation frozen; resumes to `Playing`
    Paused,
    GameOver,
    /// Scripted predator death: body locked until the countdown ends
    Bitten { predator: u32, elapsed: u32 },
    /// Restrained by a net until enough struggles land
    Caught { net: u32, struggles: u32, required: u32 },
    /// Playing back the snapshot at `index`
    Replay { index: usize },
    /// Archetype catalogue (animation clock only)
    Gallery,
}

impl RunState {
    pub fn tag(&self) -> StateTag {
        match self {
            RunState::Start => StateTag::Start,
            RunState::Playing => StateTag::Playing,
            RunState::Paused => StateTag::Paused,
            RunState::GameOver => StateTag::GameOver,
            RunState::Bitten { .. } => StateTag::Bitten,
            RunState::Caught { .. } => StateTag::Caught,
            RunState::Replay { .. } => StateTag::Replay,
            RunState::Gallery => StateTag::Gallery,
        }
    }

    /// States in which the world advances
    #[inline]
    pub fn is_simulating(&self) -> bool {
        matches!(self, RunState::Playing | RunState::Caught { .. })
    }
}

/// Discrete environmental zone chosen by depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Zone {
    #[default]
    Open,
    Sludge,
    Ice,
    Space,
}

impl Zone {
    pub const SLUDGE_START: f64 = 3000.0;
    pub const ICE_START: f64 = 4000.0;
    pub const SPACE_START: f64 = 5000.0;

    pub fn for_score(score: f64) -> Self {
        if score >= Self::SPACE_START {
            Zone::Space
        } else if score >= Self::ICE_START {
            Zone::Ice
        } else if score >= Self::SLUDGE_START {
            Zone::Sludge
        } else {
            Zone::Open
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Open => "open water",
            Zone::Sludge => "sludge",
            Zone::Ice => "ice",
            Zone::Space => "space",
        }
    }
}

/// Cause of death plus whether it happened inside a rapid current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathReason {
    pub cause: DeathCause,
    pub rapid_current: bool,
}

impl DeathReason {
    pub fn new(cause: DeathCause, rapid_current: bool) -> Self {
        Self { cause, rapid_current }
    }
}

impl fmt::Display for DeathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.rapid_current {
            return write!(f, "{}", self.cause);
        }
        match self.cause {
            DeathCause::SweptAway => f.write_str("Swallowed by the rapid current and lost to the deep..."),
            DeathCause::SweptAwayInNet => f.write_str("Carried off, net and all, by the rapid current..."),
            cause => write!(f, "No escape in the rapid current! {cause}"),
        }
    }
}

/// Rapid-current band state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RapidCurrent {
    pub active: bool,
    /// Calm ticks while inactive, elapsed ticks while active
    pub timer: u32,
    pub center_y: f32,
    /// Body inside the band this tick
    pub body_inside: bool,
}

impl RapidCurrent {
    pub const DURATION: u32 = 300;
    pub const HALF_BAND: f32 = 100.0;
    pub const START_CHANCE: f32 = 0.02;
    /// Leftward velocity applied to a body inside the band
    pub const BODY_PUSH: f32 = 0.8;
}

/// Slow-water kelp forest state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KelpForest {
    pub active: bool,
    pub timer: u32,
    /// Scroll speed restored when the forest ends
    pub saved_scroll: f32,
}

impl KelpForest {
    pub const INTERVAL: u32 = 1000;
    pub const DURATION: u32 = 400;
    pub const START_CHANCE: f32 = 0.02;
    pub const BODY_DRAG: f32 = 0.95;
    pub const SCROLL_DECAY: f32 = 0.8;
    pub const MIN_SCROLL: f32 = 1.0;
}

/// Something collaborators (audio, UI, records) react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RunStarted { difficulty: Difficulty, start_score: u32 },
    Jump { rhythm: bool },
    Hit { cause: DeathCause, lives: u32 },
    Collected { points: u32 },
    ExtraLife { lives: u32 },
    Captured,
    Struggle { count: u32, required: u32 },
    Escaped,
    Bitten,
    BossWarning,
    BossSpawned,
    LevelUp { level: u32 },
    ZoneEntered(Zone),
    RapidCurrentStarted,
    /// Rushing-water noise; louder while the body is inside the band
    RapidCurrentRumble { volume: f32 },
    KelpForestStarted,
    RankUp(&'static str),
    AchievementUnlocked(Achievement),
    Paused,
    Resumed,
    GameOver { reason: String, score: u32 },
    ReplayStarted,
    ReplayFinished,
    Bubble,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    pub run_state: RunState,
    /// Incremented on every run start; guards deferred actions
    pub run_id: u32,
    pub difficulty: Difficulty,

    // === Viewport ===
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,

    pub scroll_speed: f32,
    pub scroll_offset: f32,
    /// Ticks since run start (reset on game over for the restart delay)
    pub frame_count: u64,
    /// Monotonic clock for scheduled actions; frozen while paused
    pub tick_count: u64,

    /// Distance travelled in metres
    pub score: f64,
    pub lives: u32,
    pub level: u32,

    pub player: PhysicsBody,
    pub enemies: EntityRegistry,
    pub items: Vec<Item>,
    pub terrain: Vec<TerrainSegment>,
    pub decorations: Vec<Decoration>,
    pub background: Vec<BackgroundObject>,
    pub bubbles: Vec<Bubble>,
    pub stream_lines: Vec<StreamLine>,
    pub floating_texts: Vec<FloatingText>,

    pub zone: Zone,
    pub rapid: RapidCurrent,
    pub kelp: KelpForest,

    pub last_boss_distance: f64,
    /// Boss warning shown; hazards stop spawning until it clears
    pub boss_warning: bool,
    pub scheduler: Scheduler,
    pub replay: ReplayBuffer,

    pub death: Option<DeathReason>,
    pub damage_taken: bool,
    /// Ignore all damage
    pub invincible_mode: bool,
    /// Invincible mode was switched on at some point this run
    pub invincible_mode_used: bool,
    pub items_collected: u32,
    pub chests_collected: u32,

    #[serde(skip, default = "default_rank")]
    pub rank: &'static str,
    /// Achievements ever unlocked (seeded from the records store)
    pub unlocked_achievements: Vec<Achievement>,
    /// Achievements whose condition held during this run
    pub session_achievements: Vec<Achievement>,

    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

fn default_rank() -> &'static str {
    rank_for(0.0, 0.0)
}

/// Viewport scale applied to body and hazard sizes
pub fn scale_factor_for(width: f32, height: f32) -> f32 {
    let base = if height > width { 600.0 } else { 1000.0 };
    (width / base).clamp(0.6, 1.0)
}

/// Scroll speed for a difficulty and viewport (before level-ups)
pub fn scroll_speed_for(difficulty: Difficulty, width: f32, height: f32) -> f32 {
    let mut speed = difficulty.base_scroll_speed() * (width / 1000.0).clamp(0.6, 1.0);
    if height > width {
        speed *= 0.8;
    }
    speed
}

impl GameState {
    /// Create a state sitting on the title screen
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let difficulty = Difficulty::default();
        let scale_factor = scale_factor_for(width, height);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            run_state: RunState::Start,
            run_id: 0,
            difficulty,
            width,
            height,
            scale_factor,
            scroll_speed: scroll_speed_for(difficulty, width, height),
            scroll_offset: 0.0,
            frame_count: 0,
            tick_count: 0,
            score: 0.0,
            lives: STARTING_LIVES,
            level: 0,
            player: PhysicsBody::new(Vec2::ZERO),
            enemies: EntityRegistry::new(),
            items: Vec::new(),
            terrain: Vec::new(),
            decorations: Vec::new(),
            background: Vec::new(),
            bubbles: Vec::new(),
            stream_lines: Vec::new(),
            floating_texts: Vec::new(),
            zone: Zone::Open,
            rapid: RapidCurrent::default(),
            kelp: KelpForest::default(),
            last_boss_distance: 0.0,
            boss_warning: false,
            scheduler: Scheduler::default(),
            replay: ReplayBuffer::new(),
            death: None,
            damage_taken: false,
            invincible_mode: false,
            invincible_mode_used: false,
            items_collected: 0,
            chests_collected: 0,
            rank: default_rank(),
            unlocked_achievements: Vec::new(),
            session_achievements: Vec::new(),
            events: Vec::new(),
        };
        let start = state.start_position();
        state.player.reset(start);
        state.update_player_size();
        state
    }

    /// Where the body starts; narrow screens start further left
    pub fn start_position(&self) -> Vec2 {
        let x = if self.width < 600.0 {
            self.width * 0.15
        } else {
            self.width / 3.0
        };
        Vec2::new(x, self.height / 2.0)
    }

    /// Recompute viewport-derived parameters
    ///
    /// Resets the scroll speed to the difficulty baseline, dropping level-up
    /// bonuses.
    pub fn resize(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("Ignoring degenerate viewport {width}x{height}");
            return;
        }
        self.width = width;
        self.height = height;
        self.scale_factor = scale_factor_for(width, height);
        self.scroll_speed = scroll_speed_for(self.difficulty, width, height);
        self.update_player_size();
    }

    /// Body radius follows the life count
    pub fn update_player_size(&mut self) {
        let base = BODY_BASE_SIZE * self.scale_factor;
        let size = base + (self.lives as f32 - 3.0) * BODY_SIZE_PER_LIFE * self.scale_factor;
        self.player.radius = size.max(BODY_MIN_SIZE);
    }

    /// Begin a new run
    pub fn start_run(&mut self, difficulty: Difficulty, start_score: u32) {
        self.difficulty = difficulty;
        self.run_state = RunState::Playing;
        self.run_id = self.run_id.wrapping_add(1);
        self.score = 0.0;
        self.lives = STARTING_LIVES;
        self.level = start_score / LEVEL_DISTANCE as u32;

        self.resize(self.width, self.height);

        self.last_boss_distance = (f64::from(start_score) / BOSS_INTERVAL).floor() * BOSS_INTERVAL;
        self.boss_warning = false;
        self.scheduler.clear();
        self.frame_count = 0;
        self.scroll_offset = 0.0;
        self.zone = Zone::Open;
        self.rapid = RapidCurrent::default();
        self.kelp = KelpForest::default();

        self.death = None;
        self.damage_taken = false;
        self.invincible_mode = false;
        self.invincible_mode_used = false;
        self.items_collected = 0;
        self.chests_collected = 0;
        self.rank = rank_for(0.0, 0.0);
        self.session_achievements.clear();
        self.replay.clear();

        self.enemies.clear();
        self.items.clear();
        self.terrain.clear();
        self.decorations.clear();
        self.background.clear();
        self.bubbles.clear();
        self.stream_lines.clear();
        self.floating_texts.clear();

        let start = self.start_position();
        self.player.reset(start);
        self.update_player_size();

        if start_score > 0 {
            self.score = f64::from(start_score);
            self.floating_texts.push(FloatingText::new(
                self.player.pos - Vec2::new(0.0, 50.0),
                "DEEP SEA MODE!",
                0xFF00FF,
            ));
        }

        log::info!(
            "Run {} started ({}, from {}m)",
            self.run_id,
            difficulty.as_str(),
            start_score
        );
        self.events.push(GameEvent::RunStarted { difficulty, start_score });
    }

    /// Back to the title screen
    pub fn reset_to_start(&mut self) {
        self.run_state = RunState::Start;
    }

    /// Switch invincible mode; the run stays flagged once it was on
    pub fn set_invincible_mode(&mut self, on: bool) {
        self.invincible_mode = on;
        if on {
            self.invincible_mode_used = true;
        }
    }

    #[inline]
    pub fn is_deep(&self) -> bool {
        self.score > DEEP_SCORE
    }

    pub fn seabed(&self) -> Seabed<'_> {
        Seabed {
            height: self.height,
            scroll_offset: self.scroll_offset,
            terrain: &self.terrain,
        }
    }

    /// Baseline seabed height at x (ignores rock formations)
    pub fn ground_y(&self, x: f32) -> f32 {
        self.seabed().baseline(x)
    }

    pub fn world_context(&self) -> WorldContext<'_> {
        WorldContext {
            scroll_speed: self.scroll_speed,
            width: self.width,
            height: self.height,
            score: self.score,
            player_pos: self.player.pos,
            seabed: self.seabed(),
        }
    }

    /// World view plus the RNG, borrowed side by side
    pub fn context_and_rng(&mut self) -> (WorldContext<'_>, &mut Pcg32) {
        let ctx = WorldContext {
            scroll_speed: self.scroll_speed,
            width: self.width,
            height: self.height,
            score: self.score,
            player_pos: self.player.pos,
            seabed: Seabed {
                height: self.height,
                scroll_offset: self.scroll_offset,
                terrain: &self.terrain,
            },
        };
        (ctx, &mut self.rng)
    }

    /// Whether the body ignores damage this tick
    #[inline]
    fn is_protected(&self) -> bool {
        self.invincible_mode || self.player.is_invincible()
    }

    fn reason(&self, cause: DeathCause) -> DeathReason {
        DeathReason::new(cause, self.rapid.body_inside)
    }

    /// Apply a hazard hit. Returns true if the hit landed.
    pub fn hit(&mut self, cause: DeathCause) -> bool {
        if self.is_protected() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        self.update_player_size();
        self.damage_taken = true;
        let reason = self.reason(cause);
        self.death = Some(reason);
        self.events.push(GameEvent::Hit { cause, lives: self.lives });

        if self.lives == 0 {
            self.game_over(Some(reason));
        } else {
            self.player.set_invincible(HIT_INVINCIBLE_TICKS);
        }
        true
    }

    /// Restrain the body in a net. Returns true if the capture landed.
    pub fn capture(&mut self, net: u32) -> bool {
        if self.is_protected() {
            return false;
        }
        self.run_state = RunState::Caught {
            net,
            struggles: 0,
            required: REQUIRED_STRUGGLES,
        };
        self.floating_texts.push(FloatingText::new(
            self.player.pos - Vec2::new(0.0, 40.0),
            "Mash to escape!",
            0xFF4500,
        ));
        log::debug!("Caught in net #{net}");
        self.events.push(GameEvent::Captured);
        true
    }

    /// Count one struggle while restrained; escapes once enough have landed
    pub fn struggle(&mut self) {
        let RunState::Caught { net, struggles, required } = self.run_state else {
            return;
        };
        let count = struggles + 1;
        self.run_state = RunState::Caught {
            net,
            struggles: count,
            required,
        };
        self.events.push(GameEvent::Struggle { count, required });
        if count >= required {
            self.escape();
        }
    }

    /// Break free of the net: jump out with a fresh invincibility grant
    pub fn escape(&mut self) {
        let RunState::Caught { net, .. } = self.run_state else {
            return;
        };
        self.run_state = RunState::Playing;
        self.player.set_invincible(HIT_INVINCIBLE_TICKS);
        self.player.jump();
        self.enemies.mark_for_deletion(net);
        self.floating_texts
            .push(FloatingText::new(self.player.pos, "Escaped!", 0xFFFFFF));
        log::debug!("Escaped net #{net}");
        self.events.push(GameEvent::Escaped);
    }

    /// Scripted flatfish death. Returns true if the bite landed.
    pub fn bite(&mut self, predator: u32) -> bool {
        if self.is_protected() {
            return false;
        }
        let Some(pos) = self.enemies.get(predator).map(|e| e.pos) else {
            return false;
        };
        self.run_state = RunState::Bitten { predator, elapsed: 0 };
        self.player.pos = pos;
        self.player.vel = Vec2::ZERO;
        self.death = Some(self.reason(DeathCause::EatenByFlatfish));
        self.events.push(GameEvent::Bitten);
        true
    }

    /// End the run
    pub fn game_over(&mut self, reason: Option<DeathReason>) {
        if let Some(reason) = reason {
            self.death = Some(reason);
        }
        self.run_state = RunState::GameOver;
        self.boss_warning = false;
        self.frame_count = 0;

        let reason = self.death.map(|r| r.to_string()).unwrap_or_default();
        let score = self.score.floor() as u32;
        log::info!("Game over at {score}m: {reason}");
        self.events.push(GameEvent::GameOver { reason, score });
    }

    /// Enter replay playback of the tail of the snapshot buffer
    pub fn start_replay(&mut self) -> bool {
        if self.replay.is_empty() {
            return false;
        }
        self.run_state = RunState::Replay {
            index: self.replay.playback_start(),
        };
        self.events.push(GameEvent::ReplayStarted);
        true
    }

    pub fn add_floating_text(&mut self, pos: Vec2, text: impl Into<String>, color: u32) {
        self.floating_texts.push(FloatingText::new(pos, text, color));
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Archetype, Entity};

    fn playing() -> GameState {
        let mut s = GameState::new(7, 1000.0, 600.0);
        s.start_run(Difficulty::Normal, 0);
        s
    }

    #[test]
    fn test_new_state_waits_on_title() {
        let s = GameState::new(1, 1000.0, 600.0);
        assert_eq!(s.run_state, RunState::Start);
        assert_eq!(s.lives, 1);
        assert_eq!(s.player.pos, Vec2::new(1000.0 / 3.0, 300.0));
    }

    #[test]
    fn test_viewport_parameters() {
        assert_eq!(scale_factor_for(1000.0, 600.0), 1.0);
        assert_eq!(scale_factor_for(375.0, 800.0), 0.625);
        assert_eq!(scale_factor_for(300.0, 200.0), 0.6);
        assert!((scroll_speed_for(Difficulty::Normal, 1000.0, 600.0) - 3.5).abs() < 1e-6);
        let portrait = scroll_speed_for(Difficulty::Normal, 500.0, 900.0);
        assert!((portrait - 3.5 * 0.6 * 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_body_size_follows_lives() {
        let mut s = playing();
        // One life: max(10, 20 - 10)
        assert_eq!(s.player.radius, 10.0);
        s.lives = 5;
        s.update_player_size();
        assert_eq!(s.player.radius, 30.0);
    }

    #[test]
    fn test_deep_start() {
        let mut s = GameState::new(1, 1000.0, 600.0);
        s.start_run(Difficulty::Normal, 2000);
        assert_eq!(s.score, 2000.0);
        assert_eq!(s.level, 20);
        assert_eq!(s.last_boss_distance, 1800.0);
        assert!(s.is_deep());
    }

    #[test]
    fn test_hit_with_one_life_ends_run() {
        let mut s = playing();
        assert!(s.hit(DeathCause::Shark));
        assert_eq!(s.run_state, RunState::GameOver);
        assert_eq!(s.death, Some(DeathReason::new(DeathCause::Shark, false)));
    }

    #[test]
    fn test_hit_grants_invincibility() {
        let mut s = playing();
        s.lives = 3;
        assert!(s.hit(DeathCause::Fish));
        assert_eq!(s.lives, 2);
        assert!(s.player.is_invincible());
        assert!(!s.hit(DeathCause::Fish));
        assert_eq!(s.lives, 2);
        assert!(s.damage_taken);
    }

    #[test]
    fn test_invincible_mode_blocks_everything() {
        let mut s = playing();
        s.set_invincible_mode(true);
        assert!(!s.hit(DeathCause::Tuna));
        assert!(!s.capture(3));
        assert_eq!(s.run_state, RunState::Playing);
        s.set_invincible_mode(false);
        assert!(s.invincible_mode_used);
    }

    #[test]
    fn test_struggle_to_escape() {
        let mut s = playing();
        let net = {
            let ctx = s.world_context();
            Entity::new(Archetype::Net, Vec2::new(400.0, 300.0), &mut Pcg32::seed_from_u64(1), &ctx)
        };
        let id = s.enemies.push(net);
        assert!(s.capture(id));
        s.struggle();
        s.struggle();
        assert!(matches!(s.run_state, RunState::Caught { struggles: 2, .. }));
        s.struggle();
        assert_eq!(s.run_state, RunState::Playing);
        assert!(s.player.is_invincible());
        assert!(s.enemies.get(id).is_some_and(|e| e.marked_for_deletion));
    }

    #[test]
    fn test_bite_locks_body_on_predator() {
        let mut s = playing();
        let fish = {
            let ctx = s.world_context();
            Entity::new(Archetype::Flatfish, Vec2::new(420.0, 560.0), &mut Pcg32::seed_from_u64(1), &ctx)
        };
        let id = s.enemies.push(fish);
        assert!(s.bite(id));
        assert_eq!(s.run_state, RunState::Bitten { predator: id, elapsed: 0 });
        assert_eq!(s.player.pos, Vec2::new(420.0, 560.0));
    }

    #[test]
    fn test_rapid_current_wording() {
        let swept = DeathReason::new(DeathCause::SweptAway, true);
        assert!(swept.to_string().contains("rapid current"));
        let shark = DeathReason::new(DeathCause::Shark, true);
        assert_eq!(shark.to_string(), "No escape in the rapid current! Bitten by a shark");
        assert_eq!(DeathReason::new(DeathCause::Shark, false).to_string(), "Bitten by a shark");
    }

    #[test]
    fn test_zone_bands() {
        assert_eq!(Zone::for_score(2999.9), Zone::Open);
        assert_eq!(Zone::for_score(3000.0), Zone::Sludge);
        assert_eq!(Zone::for_score(4500.0), Zone::Ice);
        assert_eq!(Zone::for_score(9000.0), Zone::Space);
    }

    #[test]
    fn test_replay_needs_snapshots() {
        let mut s = playing();
        s.game_over(None);
        assert!(!s.start_replay());
        assert_eq!(s.run_state, RunState::GameOver);
    }
}
