//! Backdrop layers
//!
//! Everything here is a pure function of score and viewport, so a replayed
//! frame recomputes the same sky and darkness from its recorded score.

use glam::Vec2;

use crate::sim::Zone;

/// Linear RGBA, 0..1 per channel
pub type Color = [f32; 4];

/// `0xRRGGBB` to an opaque [`Color`]
pub fn hex(rgb: u32) -> Color {
    hex_alpha(rgb, 1.0)
}

pub fn hex_alpha(rgb: u32, alpha: f32) -> Color {
    [
        ((rgb >> 16) & 0xFF) as f32 / 255.0,
        ((rgb >> 8) & 0xFF) as f32 / 255.0,
        (rgb & 0xFF) as f32 / 255.0,
        alpha,
    ]
}

fn rgb8(r: f32, g: f32, b: f32) -> Color {
    [r / 255.0, g / 255.0, b / 255.0, 1.0]
}

/// Score at which the sky is fully abyssal
pub const SKY_FULL_DEPTH: f64 = 2000.0;
const SURFACE_RGB: [f32; 3] = [135.0, 206.0, 235.0];
const ABYSS_RGB: [f32; 3] = [0.0, 16.0, 32.0];
/// Light from above brightens the top of the gradient
const SKY_TOP_LIFT: f32 = 30.0;

pub const DARKNESS_START: f64 = 500.0;
pub const DARKNESS_END: f64 = 3000.0;
pub const MAX_DARKNESS: f32 = 0.95;
pub const LIGHT_RADIUS: f32 = 120.0;

pub const SAND: u32 = 0xE0C090;
const SPACE_SKY: u32 = 0x0B0B3B;
const ICE_SHELF_DEPTH: f32 = 60.0;

/// Background fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sky {
    Gradient { top: Color, bottom: Color },
    /// Flat night with a drifting star field
    Space { color: Color, star_count: u32 },
}

/// Full-viewport tint laid over the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub color: Color,
    /// Covers `0..height` from the top of the viewport
    pub height: f32,
}

/// Radial darkness centred on the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Darkness {
    pub alpha: f32,
    /// Fully lit inside this radius
    pub light_radius: f32,
    /// Fully dark beyond this radius
    pub fade_radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    pub sky: Sky,
    pub zone_overlay: Option<Overlay>,
    pub darkness: Option<Darkness>,
}

impl Backdrop {
    pub fn for_score(score: f64, width: f32, height: f32) -> Self {
        let zone = Zone::for_score(score);
        let sky = if zone == Zone::Space {
            Sky::Space {
                color: hex(SPACE_SKY),
                star_count: 50,
            }
        } else {
            let [r, g, b] = sky_rgb(score);
            Sky::Gradient {
                top: rgb8(
                    (r + SKY_TOP_LIFT).min(255.0),
                    (g + SKY_TOP_LIFT).min(255.0),
                    (b + SKY_TOP_LIFT).min(255.0),
                ),
                bottom: rgb8(r, g, b),
            }
        };

        let zone_overlay = match zone {
            Zone::Sludge => Some(Overlay {
                color: [85.0 / 255.0, 107.0 / 255.0, 47.0 / 255.0, 0.4],
                height,
            }),
            Zone::Ice => Some(Overlay {
                color: [1.0, 1.0, 1.0, 0.8],
                height: ICE_SHELF_DEPTH,
            }),
            Zone::Open | Zone::Space => None,
        };

        let alpha = darkness_alpha(score);
        let darkness = (alpha > 0.01).then(|| Darkness {
            alpha,
            light_radius: LIGHT_RADIUS,
            fade_radius: LIGHT_RADIUS + if width < 600.0 { 200.0 } else { 400.0 },
        });

        Self {
            sky,
            zone_overlay,
            darkness,
        }
    }
}

/// Depth-tinted sea colour (0..255 channels, floored)
pub fn sky_rgb(score: f64) -> [f32; 3] {
    let ratio = (score / SKY_FULL_DEPTH).clamp(0.0, 1.0) as f32;
    let mut out = [0.0; 3];
    for (i, c) in out.iter_mut().enumerate() {
        *c = (SURFACE_RGB[i] * (1.0 - ratio) + ABYSS_RGB[i] * ratio).floor();
    }
    out
}

pub fn darkness_alpha(score: f64) -> f32 {
    let ratio = ((score - DARKNESS_START) / (DARKNESS_END - DARKNESS_START)).clamp(0.0, 1.0);
    ratio as f32 * MAX_DARKNESS
}

/// Star positions for the space sky on a given frame
pub fn star_field(frame: u64, count: u32, width: f32, height: f32) -> Vec<(Vec2, f32)> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    (0..count)
        .map(|i| {
            let x = (frame as f32 * 0.5 + i as f32 * 137.0) % width;
            let y = (i as f32 * 93.0) % height;
            (Vec2::new(x, y), (i % 3 + 1) as f32)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sky_lerps_to_abyss() {
        assert_eq!(sky_rgb(0.0), [135.0, 206.0, 235.0]);
        assert_eq!(sky_rgb(1000.0), [67.0, 111.0, 133.0]);
        assert_eq!(sky_rgb(2000.0), [0.0, 16.0, 32.0]);
        assert_eq!(sky_rgb(9000.0), [0.0, 16.0, 32.0]);
    }

    #[test]
    fn test_darkness_ramp() {
        assert_eq!(darkness_alpha(0.0), 0.0);
        assert_eq!(darkness_alpha(500.0), 0.0);
        assert!((darkness_alpha(1750.0) - 0.475).abs() < 1e-5);
        assert!((darkness_alpha(5000.0) - MAX_DARKNESS).abs() < 1e-6);
    }

    #[test]
    fn test_darkness_only_when_visible() {
        assert!(Backdrop::for_score(510.0, 1000.0, 600.0).darkness.is_none());
        let d = Backdrop::for_score(2000.0, 1000.0, 600.0).darkness;
        assert_eq!(d.map(|d| d.fade_radius), Some(520.0));
        let narrow = Backdrop::for_score(2000.0, 400.0, 700.0).darkness;
        assert_eq!(narrow.map(|d| d.fade_radius), Some(320.0));
    }

    #[test]
    fn test_zone_layers() {
        let sludge = Backdrop::for_score(3500.0, 1000.0, 600.0);
        assert_eq!(sludge.zone_overlay.map(|o| o.height), Some(600.0));
        let ice = Backdrop::for_score(4500.0, 1000.0, 600.0);
        assert_eq!(ice.zone_overlay.map(|o| o.height), Some(60.0));
        let space = Backdrop::for_score(5200.0, 1000.0, 600.0);
        assert!(matches!(space.sky, Sky::Space { star_count: 50, .. }));
        assert!(space.zone_overlay.is_none());
    }

    #[test]
    fn test_hex() {
        assert_eq!(hex(0xFF0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex_alpha(0x0000FF, 0.5), [0.0, 0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_star_field_in_bounds() {
        for (p, size) in star_field(1234, 50, 800.0, 600.0) {
            assert!(p.x >= 0.0 && p.x < 800.0);
            assert!(p.y >= 0.0 && p.y < 600.0);
            assert!((1.0..=3.0).contains(&size));
        }
        assert!(star_field(0, 50, 0.0, 600.0).is_empty());
    }
}
