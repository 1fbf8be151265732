//! Ebi Dash - a side-scrolling deep-sea survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, body physics, entities, spawning, run state, replay)
//! - `renderer`: Draw-data composition for live and replayed frames
//! - `audio`: Sound trigger mapping and the background music sequencer
//! - `records`: High score and achievement persistence
//! - `settings`: Difficulty and player preferences
//! - `game`: Frame driver tying the simulation to its collaborators

pub mod audio;
pub mod game;
pub mod records;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use records::{MemoryStore, RecordStore, Records};
pub use settings::{Difficulty, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// Every rate is per logical tick (one tick per rendered frame, nominally 60 Hz).
pub mod consts {
    /// Nominal tick rate, used only to convert tick counts for display
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Downward acceleration applied to the player body every tick
    pub const GRAVITY: f32 = 0.15;
    /// Default jump impulse
    pub const JUMP_FORCE_X: f32 = -4.0;
    pub const JUMP_FORCE_Y: f32 = -5.0;
    /// Rhythm jump impulse (jump landed inside the rhythm window)
    pub const BONUS_JUMP_FORCE_X: f32 = 2.5;
    pub const BONUS_JUMP_FORCE_Y: f32 = -5.5;
    /// Rhythm window bounds, exclusive, in ticks since the previous jump
    pub const RHYTHM_WINDOW_MIN: u32 = 15;
    pub const RHYTHM_WINDOW_MAX: u32 = 45;
    /// Value of the since-last-jump counter for a fresh body (outside the window)
    pub const TICKS_SINCE_JUMP_INITIAL: u32 = 60;
    pub const BEND_TICKS: u32 = 15;
    pub const RECOVERY_BOOST_TICKS: u32 = 30;
    pub const BONUS_EFFECT_TICKS: u32 = 20;

    /// Homing toward the preferred column
    pub const HOMING_FORCE: f32 = 0.2;
    pub const HOMING_FORCE_BOOSTED: f32 = 0.35;
    pub const HOMING_DRAG: f32 = 0.95;
    pub const LEFT_EDGE_PUSH: f32 = 0.5;
    /// Fraction of the viewport width the body drifts back toward
    pub const HOMING_COLUMN: f32 = 0.3;

    /// Player body size and lives
    pub const BODY_BASE_SIZE: f32 = 20.0;
    pub const BODY_SIZE_PER_LIFE: f32 = 5.0;
    pub const BODY_MIN_SIZE: f32 = 10.0;
    pub const STARTING_LIVES: u32 = 1;
    pub const MAX_LIVES: u32 = 5;
    pub const HIT_INVINCIBLE_TICKS: u32 = 60;

    /// Trail of recent poses followers sample from
    pub const HISTORY_LENGTH: usize = 100;
    pub const FOLLOWER_LAG: usize = 8;
    pub const FOLLOWER_SCALE: f32 = 0.7;

    /// Distance travelled per tick (score units)
    pub const SCORE_PER_TICK: f64 = 0.1;
    pub const LEVEL_DISTANCE: f64 = 100.0;
    pub const LEVEL_SPEED_STEP: f32 = 0.5;
    /// Distance beyond which the deep-sea variants apply
    pub const DEEP_SCORE: f64 = 1000.0;

    /// Boss cadence
    pub const BOSS_INTERVAL: f64 = 300.0;
    pub const BOSS_WARNING_TICKS: u64 = 180;

    /// Capture and bite
    pub const REQUIRED_STRUGGLES: u32 = 3;
    pub const BITTEN_TICKS: u32 = 60;
    /// Ticks after GAMEOVER before an action input restarts
    pub const RESTART_DELAY_TICKS: u64 = 30;

    /// Replay recording
    pub const REPLAY_CAPACITY: usize = 300;
    pub const REPLAY_RECORD_INTERVAL: u64 = 2;
    pub const REPLAY_TAIL: usize = 90;
    pub const REPLAY_FOLLOWER_LAG: usize = 4;

    /// Terrain wall resolution
    pub const WALL_PUSH_MIN: f32 = 5.0;
    pub const WALL_BOUNCE: f32 = -0.5;
    pub const FLOOR_TOLERANCE: f32 = 5.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `theta`
#[inline]
pub fn heading(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// True when both components are finite
#[inline]
pub fn is_finite_vec(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
