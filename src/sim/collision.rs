//! Collision detection and response against the seabed
//!
//! The tricky part of Ebi Dash: a circular body resolved against a wavy
//! baseline plus any number of rugged terrain segments, where gentle pieces
//! are floor, steep pieces are walls that shove the body sideways, and each
//! segment's vertical leading edge blocks the body from the left.

use glam::Vec2;

use super::terrain::{TerrainSegment, baseline_ground_y};
use crate::consts::*;

/// Circle-circle overlap (strict, sum of radii)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Shortest distance from `p` to the segment `a`-`b`
pub fn dist_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Horizontal displacement that ejects a body embedded `embed` px into a wall
/// of the given slope. Magnitude is never below `WALL_PUSH_MIN`.
#[inline]
pub fn wall_push(embed: f32, slope: f32) -> f32 {
    let push = (embed + 2.0) / slope;
    if slope < 0.0 {
        push.min(-WALL_PUSH_MIN)
    } else {
        push.max(WALL_PUSH_MIN)
    }
}

/// Result of resolving a body against the seabed
#[derive(Debug, Clone)]
pub struct TerrainContact {
    /// Body came to rest on a floor this tick
    pub on_ground: bool,
    /// A steep wall pushed the body sideways
    pub pushed_by_wall: bool,
    /// A leading edge stopped the body
    pub side_blocked: bool,
    /// Effective floor height used for the landing test
    pub ground_y: f32,
}

impl TerrainContact {
    pub fn none() -> Self {
        Self {
            on_ground: false,
            pushed_by_wall: false,
            side_blocked: false,
            ground_y: f32::INFINITY,
        }
    }
}

/// Seabed the body is resolved against
#[derive(Debug, Clone, Copy)]
pub struct Seabed<'a> {
    pub height: f32,
    pub scroll_offset: f32,
    pub terrain: &'a [TerrainSegment],
}

impl Seabed<'_> {
    /// Baseline floor at x, ignoring terrain
    #[inline]
    pub fn baseline(&self, x: f32) -> f32 {
        baseline_ground_y(self.height, x, self.scroll_offset)
    }

    /// Highest gentle surface at x (baseline unless a floor piece is higher)
    pub fn floor_at(&self, x: f32) -> f32 {
        let mut ground = self.baseline(x);
        for seg in self.terrain {
            match seg.surface_info(x) {
                Some(info) if info.is_floor() && info.y < ground + FLOOR_TOLERANCE => ground = info.y,
                _ => {}
            }
        }
        ground
    }
}

/// Resolve a circle against the seabed, mutating position and velocity
///
/// For each segment spanning the body's x: a gentle piece may lower the
/// effective floor (taken if within tolerance of the current floor), a steep
/// piece the body has sunk into pushes it out horizontally and reflects vx
/// at half strength. Every segment's leading edge then blocks the body from
/// the left. Finally the body lands on the effective floor.
pub fn resolve_terrain(pos: &mut Vec2, vel: &mut Vec2, radius: f32, seabed: &Seabed) -> TerrainContact {
    let mut contact = TerrainContact::none();
    let mut ground_y = seabed.baseline(pos.x);

    for seg in seabed.terrain {
        let surface = if seg.spans(pos.x) { seg.surface_info(pos.x) } else { None };
        if let Some(info) = surface {
            if info.is_floor() {
                if info.y < ground_y + FLOOR_TOLERANCE {
                    ground_y = info.y;
                }
            } else if pos.y + radius > info.y {
                let embed = (pos.y + radius) - info.y;
                pos.x += wall_push(embed, info.slope);
                vel.x *= WALL_BOUNCE;
                contact.pushed_by_wall = true;
            }
        }

        if seg.check_side_collision(*pos, radius) {
            pos.x = seg.anchor.x - radius;
            vel.x = 0.0;
            contact.side_blocked = true;
        }
    }

    if pos.y > ground_y - radius {
        pos.y = ground_y - radius;
        vel.y = 0.0;
        contact.on_ground = true;
    }
    contact.ground_y = ground_y;
    contact
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn block(anchor_x: f32) -> TerrainSegment {
        // Flat-topped block 100 px tall, 200 px wide
        TerrainSegment::from_points(
            Vec2::new(anchor_x, 600.0),
            vec![Vec2::new(0.0, -100.0), Vec2::new(100.0, -100.0), Vec2::new(200.0, -100.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_circles_overlap_strict() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(19.9, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
    }

    #[test]
    fn test_dist_to_segment_cases() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(0.0, 10.0);
        assert!((dist_to_segment(Vec2::new(3.0, 5.0), a, b) - 3.0).abs() < 1e-6);
        assert!((dist_to_segment(Vec2::new(0.0, -4.0), a, b) - 4.0).abs() < 1e-6);
        assert!((dist_to_segment(Vec2::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_wall_push_minimum() {
        // Tiny embed on a steep descending wall still ejects by 5
        assert_eq!(wall_push(0.1, 10.0), 5.0);
        assert_eq!(wall_push(0.1, -10.0), -5.0);
        // Large embed on a moderate wall pushes further
        assert!((wall_push(48.0, 2.0) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_side_collision_stops_body_at_leading_edge() {
        let terrain = vec![block(500.0)];
        let seabed = Seabed {
            height: 600.0,
            scroll_offset: 0.0,
            terrain: &terrain,
        };
        // Body just left of the edge, overlapping it, below the top
        let mut pos = Vec2::new(485.0, 530.0);
        let mut vel = Vec2::new(3.0, 0.0);
        let contact = resolve_terrain(&mut pos, &mut vel, 20.0, &seabed);
        assert!(contact.side_blocked);
        assert_eq!(pos.x, 480.0);
        assert_eq!(vel.x, 0.0);
    }

    #[test]
    fn test_side_collision_clamps_to_anchor_minus_radius() {
        let anchor_x = 60.0;
        let terrain = vec![block(anchor_x)];
        let seabed = Seabed {
            height: 600.0,
            scroll_offset: 0.0,
            terrain: &terrain,
        };
        let mut pos = Vec2::new(50.0, 530.0);
        let mut vel = Vec2::new(2.0, 0.0);
        let contact = resolve_terrain(&mut pos, &mut vel, 20.0, &seabed);
        assert!(contact.side_blocked);
        assert_eq!(pos.x, anchor_x - 20.0);
        assert_eq!(vel.x, 0.0);
    }

    #[test]
    fn test_lands_on_terrain_top() {
        let terrain = vec![block(0.0)];
        let seabed = Seabed {
            height: 600.0,
            scroll_offset: 0.0,
            terrain: &terrain,
        };
        let mut pos = Vec2::new(100.0, 495.0);
        let mut vel = Vec2::new(0.0, 2.0);
        let contact = resolve_terrain(&mut pos, &mut vel, 10.0, &seabed);
        assert!(contact.on_ground);
        assert_eq!(pos.y, 490.0);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_steep_wall_pushes_back() {
        let wall = TerrainSegment::from_points(
            Vec2::new(0.0, 600.0),
            vec![Vec2::new(0.0, -10.0), Vec2::new(10.0, -200.0), Vec2::new(400.0, -200.0)],
        )
        .unwrap();
        let terrain = vec![wall];
        let seabed = Seabed {
            height: 600.0,
            scroll_offset: 0.0,
            terrain: &terrain,
        };
        // Ascending wall (slope -19): pushed left by at least 5
        let mut pos = Vec2::new(5.0, 490.0);
        let mut vel = Vec2::new(2.0, 0.0);
        let contact = resolve_terrain(&mut pos, &mut vel, 10.0, &seabed);
        assert!(contact.pushed_by_wall);
        assert!(pos.x <= 0.0);
        assert_eq!(vel.x, -1.0);
    }

    #[test]
    fn test_floor_at_prefers_raised_floor() {
        let terrain = vec![block(0.0)];
        let seabed = Seabed {
            height: 600.0,
            scroll_offset: 0.0,
            terrain: &terrain,
        };
        assert_eq!(seabed.floor_at(50.0), 500.0);
        assert_eq!(seabed.floor_at(300.0), seabed.baseline(300.0));
    }

    proptest! {
        #[test]
        fn prop_circles_overlap_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, ra in 0.0f32..100.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, rb in 0.0f32..100.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(circles_overlap(a, ra, b, rb), circles_overlap(b, rb, a, ra));
        }

        #[test]
        fn prop_wall_push_at_least_minimum(embed in 0.0f32..200.0, slope in 1.0001f32..50.0, neg in any::<bool>()) {
            let slope = if neg { -slope } else { slope };
            let push = wall_push(embed, slope);
            prop_assert!(push.abs() >= WALL_PUSH_MIN);
            prop_assert_eq!(push.signum(), slope.signum());
        }
    }
}
