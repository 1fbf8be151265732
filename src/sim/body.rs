//! Player body: jump/homing control model, terrain resolution and pose history

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Seabed, TerrainContact, resolve_terrain};
use super::terrain::TerrainSegment;
use crate::consts::*;
use crate::is_finite_vec;

/// Position where a corrupted coordinate is restored to
const HEAL_COORD: f32 = 100.0;

/// One recorded pose (also what followers render)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub pos: Vec2,
    pub angle: f32,
    pub bending: bool,
}

/// Which impulse a jump applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    Normal,
    /// Landed inside the rhythm window
    Rhythm,
}

/// The player-controlled body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Facing angle used for rendering
    pub angle: f32,
    /// Tail-flick pose shown for a few ticks after each jump
    pub bending: bool,
    pub bend_ticks: u32,
    pub invincible_ticks: u32,
    /// Stronger homing for a short while after a jump
    pub recovery_boost_ticks: u32,
    /// Sparkle shown after a rhythm jump
    pub bonus_effect_ticks: u32,
    pub ticks_since_jump: u32,
    pub on_ground: bool,
    /// Accumulates while resting on a floor
    pub walk_timer: f32,
    /// Recent poses, newest first
    pub history: VecDeque<Pose>,
}

impl PhysicsBody {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: BODY_BASE_SIZE,
            angle: 0.0,
            bending: false,
            bend_ticks: 0,
            invincible_ticks: 0,
            recovery_boost_ticks: 0,
            bonus_effect_ticks: 0,
            ticks_since_jump: TICKS_SINCE_JUMP_INITIAL,
            on_ground: false,
            walk_timer: 0.0,
            history: VecDeque::with_capacity(HISTORY_LENGTH),
        }
    }

    /// Reinitialize in place for a new run (radius is kept; it follows lives)
    pub fn reset(&mut self, pos: Vec2) {
        let radius = self.radius;
        *self = Self::new(pos);
        self.radius = radius;
    }

    pub fn pose(&self) -> Pose {
        Pose {
            pos: self.pos,
            angle: self.angle,
            bending: self.bending,
        }
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    pub fn set_invincible(&mut self, ticks: u32) {
        self.invincible_ticks = ticks;
    }

    /// Apply a jump impulse (replaces velocity)
    ///
    /// A jump landing strictly inside the rhythm window after the previous
    /// one gets a forward-biased bonus impulse instead of the default back-flick.
    pub fn jump(&mut self) -> JumpKind {
        let kind = if self.ticks_since_jump > RHYTHM_WINDOW_MIN && self.ticks_since_jump < RHYTHM_WINDOW_MAX {
            self.vel = Vec2::new(BONUS_JUMP_FORCE_X, BONUS_JUMP_FORCE_Y);
            self.bonus_effect_ticks = BONUS_EFFECT_TICKS;
            JumpKind::Rhythm
        } else {
            self.vel = Vec2::new(JUMP_FORCE_X, JUMP_FORCE_Y);
            JumpKind::Normal
        };
        self.ticks_since_jump = 0;
        self.bending = true;
        self.bend_ticks = BEND_TICKS;
        self.recovery_boost_ticks = RECOVERY_BOOST_TICKS;
        kind
    }

    /// Whether the body has drifted past the left boundary
    #[inline]
    pub fn is_past_left_edge(&self) -> bool {
        self.pos.x < -self.radius
    }

    /// Advance one tick
    ///
    /// Gravity, homing toward the preferred column, integration, then ceiling,
    /// terrain and right-wall constraints. Returns early without resolving
    /// terrain when the body has been swept past the left edge (the caller
    /// ends the run).
    pub fn update(&mut self, width: f32, seabed: &Seabed) -> TerrainContact {
        self.ticks_since_jump = self.ticks_since_jump.saturating_add(1);
        self.vel.y += GRAVITY;
        self.on_ground = false;

        self.recovery_boost_ticks = self.recovery_boost_ticks.saturating_sub(1);
        let homing = if self.recovery_boost_ticks > 0 {
            HOMING_FORCE_BOOSTED
        } else {
            HOMING_FORCE
        };

        if self.pos.x < self.radius * 4.0 {
            // Near the left edge the current wins
            self.vel.x -= LEFT_EDGE_PUSH;
        } else if self.pos.x < width * HOMING_COLUMN {
            self.vel.x += homing;
        } else {
            self.vel.x *= HOMING_DRAG;
        }

        self.pos += self.vel;

        if self.is_past_left_edge() {
            return TerrainContact::none();
        }

        if self.pos.y < self.radius {
            self.pos.y = self.radius;
            self.vel.y = 0.0;
        }

        let contact = resolve_terrain(&mut self.pos, &mut self.vel, self.radius, seabed);
        self.on_ground = contact.on_ground;

        if self.pos.x > width - self.radius {
            self.pos.x = width - self.radius;
        }

        if self.bend_ticks > 0 {
            self.bend_ticks -= 1;
        } else {
            self.bending = false;
        }

        if self.on_ground {
            self.walk_timer += 0.5;
        } else {
            self.walk_timer = 0.0;
        }

        self.heal_non_finite();
        self.record_history();

        self.invincible_ticks = self.invincible_ticks.saturating_sub(1);
        self.bonus_effect_ticks = self.bonus_effect_ticks.saturating_sub(1);

        self.angle = if self.bending {
            -std::f32::consts::FRAC_PI_4
        } else {
            (self.vel.y * 0.1).clamp(-std::f32::consts::FRAC_PI_4, std::f32::consts::FRAC_PI_4)
        };

        contact
    }

    /// Replace non-finite coordinates with a safe position and zero the
    /// matching velocity. Returns true if anything was repaired.
    pub fn heal_non_finite(&mut self) -> bool {
        if is_finite_vec(self.pos) && is_finite_vec(self.vel) {
            return false;
        }
        log::warn!("Non-finite body state pos={:?} vel={:?}, healing", self.pos, self.vel);
        if !self.pos.x.is_finite() {
            self.pos.x = HEAL_COORD;
            self.vel.x = 0.0;
        }
        if !self.pos.y.is_finite() {
            self.pos.y = HEAL_COORD;
            self.vel.y = 0.0;
        }
        if !self.vel.x.is_finite() {
            self.vel.x = 0.0;
        }
        if !self.vel.y.is_finite() {
            self.vel.y = 0.0;
        }
        true
    }

    /// Push the current pose onto the history (newest first, bounded)
    pub fn record_history(&mut self) {
        self.history.push_front(self.pose());
        self.history.truncate(HISTORY_LENGTH);
    }

    /// Pose follower `n` (1-based) renders at, sampled `n * FOLLOWER_LAG` ticks back
    pub fn follower_pose(&self, n: usize) -> Option<Pose> {
        self.history.get(n * FOLLOWER_LAG).copied()
    }

    /// Poses of the trailing followers (one per extra life), skipping any
    /// that would sit inside a rock's leading edge
    pub fn followers(&self, lives: u32, terrain: &[TerrainSegment]) -> Vec<Pose> {
        let follower_radius = self.radius * FOLLOWER_SCALE;
        (1..lives as usize)
            .filter_map(|n| self.follower_pose(n))
            .filter(|p| !terrain.iter().any(|t| t.check_side_collision(p.pos, follower_radius)))
            .collect()
    }
}
