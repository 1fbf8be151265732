//! Render-only scenery: seabed decorations, parallax background props and
//! particle effects. None of these affect collisions; terrain lives in
//! `terrain.rs` because the body collides with it.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Background props scroll at this fraction of the world speed
pub const PARALLAX: f32 = 0.5;

/// One coral branch, relative to the coral base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoralBranch {
    pub x: f32,
    pub height: f32,
    pub width: f32,
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecorationKind {
    Seaweed { height: f32, sway_offset: f32 },
    Coral { tint: u8, branches: Vec<CoralBranch> },
}

/// Ground-anchored foreground decoration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub pos: Vec2,
    pub kind: DecorationKind,
}

impl Decoration {
    pub fn seaweed(pos: Vec2, rng: &mut Pcg32) -> Self {
        Self {
            pos,
            kind: DecorationKind::Seaweed {
                height: rng.random_range(80.0..180.0),
                sway_offset: rng.random::<f32>() * std::f32::consts::TAU,
            },
        }
    }

    pub fn coral(pos: Vec2, rng: &mut Pcg32) -> Self {
        let tint = rng.random_range(0..3);
        let branches = (0..8)
            .map(|_| {
                let height = rng.random_range(30.0..80.0);
                let angle = rng.random::<f32>() - 0.5;
                CoralBranch {
                    x: (rng.random::<f32>() - 0.5) * 40.0,
                    height,
                    width: rng.random_range(4.0..12.0),
                    angle,
                }
            })
            .collect();
        Self {
            pos,
            kind: DecorationKind::Coral { tint, branches },
        }
    }

    pub fn update(&mut self, speed: f32) {
        self.pos.x -= speed;
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x < 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundKind {
    Shipwreck,
    Satellite,
}

/// Slow-scrolling background prop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundObject {
    pub pos: Vec2,
    pub kind: BackgroundKind,
}

impl BackgroundObject {
    pub fn new(kind: BackgroundKind, pos: Vec2) -> Self {
        Self { pos, kind }
    }

    pub fn update(&mut self, speed: f32) {
        self.pos.x -= speed * PARALLAX;
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x < -300.0
    }
}

/// Rising bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub pos: Vec2,
    pub size: f32,
    /// Opacity, removed at zero
    pub life: f32,
    pub decay: f32,
    pub rise: f32,
    pub scroll_factor: f32,
    /// Drawn behind the playfield
    pub background: bool,
}

impl Bubble {
    /// Trail bubble released by the player
    pub fn trail(pos: Vec2, rng: &mut Pcg32) -> Self {
        Self {
            pos,
            size: rng.random_range(2.0..7.0),
            life: 1.0,
            decay: 0.02,
            rise: 1.0,
            scroll_factor: 0.5,
            background: false,
        }
    }

    /// Faint, long-lived ambient bubble
    pub fn ambient(pos: Vec2, rng: &mut Pcg32) -> Self {
        Self {
            pos,
            size: rng.random_range(2.0..7.0),
            life: rng.random_range(0.1..0.6),
            decay: 0.002 + rng.random::<f32>() * 0.003,
            rise: rng.random_range(0.5..2.0),
            scroll_factor: 0.1,
            background: true,
        }
    }

    pub fn update(&mut self, speed: f32) {
        self.pos.x -= speed * self.scroll_factor;
        self.pos.y -= self.rise;
        self.life -= self.decay;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// Streak drawn through a rapid current
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamLine {
    pub pos: Vec2,
    pub length: f32,
}

impl StreamLine {
    pub fn new(pos: Vec2, rng: &mut Pcg32) -> Self {
        Self {
            pos,
            length: rng.random_range(50.0..150.0),
        }
    }

    pub fn update(&mut self, speed: f32) {
        self.pos.x -= speed;
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x < -200.0
    }
}

/// Short-lived caption (score popups, warnings)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    /// 0xRRGGBB
    pub color: u32,
    pub life: f32,
}

impl FloatingText {
    pub fn new(pos: Vec2, text: impl Into<String>, color: u32) -> Self {
        Self {
            pos,
            text: text.into(),
            color,
            life: 1.0,
        }
    }

    pub fn update(&mut self) {
        self.pos.y -= 1.5;
        self.life -= 0.02;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}
