//! Seabed geometry
//!
//! Two sources of floor: a procedural baseline (sum of sines over absolute
//! scroll position) and rugged terrain segments, piecewise-linear polylines
//! anchored at the bottom of the screen that scroll left with the world.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Number of linear pieces in a generated terrain segment
pub const TERRAIN_PIECES: usize = 10;

/// Depth of the baseline seabed below the bottom edge of the viewport
pub const BASELINE_DEPTH: f32 = 50.0;

/// Baseline seabed height at screen x for the given scroll offset
#[inline]
pub fn baseline_ground_y(height: f32, x: f32, scroll_offset: f32) -> f32 {
    let u = x + scroll_offset;
    (height - BASELINE_DEPTH) + (u * 0.005).sin() * 20.0 + (u * 0.02).sin() * 10.0
}

/// Height and gradient of a terrain surface at one x
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceInfo {
    pub y: f32,
    /// dy/dx of the piece containing x (positive = descending to the right)
    pub slope: f32,
}

impl SurfaceInfo {
    /// Gentle pieces (|slope| <= 1) act as floor, steeper ones as walls
    #[inline]
    pub fn is_floor(&self) -> bool {
        self.slope.abs() <= 1.0
    }
}

/// A rugged rock formation
///
/// Points are relative to `anchor`; x is strictly increasing and the first
/// point sits at relative x = 0. The anchor y is the base line the polygon
/// closes against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainSegment {
    pub anchor: Vec2,
    pub points: Vec<Vec2>,
    pub width: f32,
    pub base_height: f32,
}

impl TerrainSegment {
    /// Build from explicit points, rejecting fewer than two points or
    /// non-increasing x
    pub fn from_points(anchor: Vec2, points: Vec<Vec2>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        if points.windows(2).any(|w| !(w[1].x > w[0].x)) {
            return None;
        }
        let width = points[points.len() - 1].x - points[0].x;
        let base_height = points.iter().map(|p| -p.y).fold(0.0_f32, f32::max);
        Some(Self {
            anchor,
            points,
            width,
            base_height,
        })
    }

    /// Generate a random formation with its left edge at `x`, base at `base_y`
    pub fn generate(rng: &mut Pcg32, x: f32, base_y: f32) -> Self {
        let width = rng.random_range(250.0..550.0);
        let base_height = rng.random_range(100.0..300.0);
        let points = (0..=TERRAIN_PIECES)
            .map(|i| {
                let px = i as f32 / TERRAIN_PIECES as f32 * width;
                let py = -base_height - (rng.random::<f32>() - 0.5) * 80.0;
                Vec2::new(px, py)
            })
            .collect();
        Self {
            anchor: Vec2::new(x, base_y),
            points,
            width,
            base_height,
        }
    }

    /// Absolute position of point `i`
    #[inline]
    pub fn point(&self, i: usize) -> Option<Vec2> {
        self.points.get(i).map(|p| self.anchor + *p)
    }

    /// Absolute x of the first point
    pub fn start_x(&self) -> f32 {
        self.anchor.x + self.points.first().map_or(0.0, |p| p.x)
    }

    /// Absolute x of the last point
    pub fn end_x(&self) -> f32 {
        self.anchor.x + self.points.last().map_or(0.0, |p| p.x)
    }

    /// Whether `x` lies in [start_x, end_x]
    #[inline]
    pub fn spans(&self, x: f32) -> bool {
        x >= self.start_x() && x <= self.end_x()
    }

    /// Surface height and slope at absolute x, `None` outside the segment
    pub fn surface_info(&self, x: f32) -> Option<SurfaceInfo> {
        self.points.windows(2).find_map(|w| {
            let p1 = self.anchor + w[0];
            let p2 = self.anchor + w[1];
            if x >= p1.x && x <= p2.x {
                let ratio = (x - p1.x) / (p2.x - p1.x);
                Some(SurfaceInfo {
                    y: p1.y + (p2.y - p1.y) * ratio,
                    slope: (p2.y - p1.y) / (p2.x - p1.x),
                })
            } else {
                None
            }
        })
    }

    /// Vertical leading edge: from the first surface point down to the base line
    pub fn leading_edge(&self) -> (Vec2, Vec2) {
        let top = self.point(0).unwrap_or(self.anchor);
        (top, Vec2::new(top.x, self.anchor.y))
    }

    /// Whether a circle touches the vertical leading edge
    pub fn check_side_collision(&self, center: Vec2, radius: f32) -> bool {
        let (top, bottom) = self.leading_edge();
        super::collision::dist_to_segment(center, top, bottom) < radius
    }

    /// Scroll left by `dx`
    #[inline]
    pub fn scroll(&mut self, dx: f32) {
        self.anchor.x -= dx;
    }

    /// Fully past the left edge of the screen
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.anchor.x + self.width < 0.0
    }

    /// Closed polygon outline in absolute coordinates (base, surface, base)
    pub fn outline(&self) -> Vec<Vec2> {
        let mut out = Vec::with_capacity(self.points.len() + 2);
        out.push(Vec2::new(self.start_x(), self.anchor.y));
        out.extend(self.points.iter().map(|p| self.anchor + *p));
        out.push(Vec2::new(self.end_x(), self.anchor.y));
        out
    }
}
