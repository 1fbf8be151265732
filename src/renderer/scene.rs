//! Scene composition
//!
//! A [`Scene`] is everything one frame draws, in draw order. Live frames and
//! replayed frames go through the same [`compose`] path: live state is first
//! captured into a [`Snapshot`], exactly as the recorder would.

use glam::Vec2;

use super::backdrop::{Backdrop, Color, SAND, hex, hex_alpha};
use crate::consts::FOLLOWER_SCALE;
use crate::sim::entity::DeathCause;
use crate::sim::replay::{Look, PlayerSnapshot, Snapshot};
use crate::sim::state::{GameState, RapidCurrent, RunState};
use crate::sim::terrain::baseline_ground_y;

/// Horizontal spacing of the sand polyline
pub const GROUND_SAMPLE_STEP: f32 = 10.0;

/// One positioned object to draw
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    pub radius: f32,
    /// Per-archetype payload the draw routine reads
    pub look: Look,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub pos: Vec2,
    pub text: String,
    pub color: Color,
}

/// Net drawn over a restrained body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOverlay {
    pub center: Vec2,
    /// Clip radius of the mesh
    pub radius: f32,
    /// Struggle progress, `None` once the run is over
    pub progress: Option<(u32, u32)>,
}

/// Translucent band marking the rapid current
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentBand {
    pub center_y: f32,
    pub half_height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub backdrop: Backdrop,
    /// Sand polyline from x = 0 to the right edge
    pub ground: Vec<Vec2>,
    pub ground_color: Color,
    /// Closed rock outlines
    pub terrain: Vec<Vec<Vec2>>,
    pub sprites: Vec<Sprite>,
    pub player: PlayerSnapshot,
    pub followers: Vec<PlayerSnapshot>,
    pub capture: Option<CaptureOverlay>,
    pub current: Option<CurrentBand>,
    pub kelp_tint: Option<Color>,
    pub captions: Vec<Caption>,
    pub score: f64,
    pub lives: u32,
}

/// Shared composition for live and replayed frames
fn compose(snapshot: &Snapshot, width: f32, height: f32, followers: Vec<PlayerSnapshot>) -> Scene {
    let mut ground = Vec::with_capacity((width / GROUND_SAMPLE_STEP) as usize + 2);
    let mut x = 0.0;
    while x <= width {
        ground.push(Vec2::new(x, baseline_ground_y(height, x, snapshot.scroll_offset)));
        x += GROUND_SAMPLE_STEP;
    }

    Scene {
        width,
        height,
        backdrop: Backdrop::for_score(snapshot.score, width, height),
        ground,
        ground_color: hex(SAND),
        terrain: snapshot.terrain.iter().map(|t| t.outline()).collect(),
        sprites: snapshot
            .objects
            .iter()
            .map(|o| Sprite {
                pos: o.pos,
                radius: o.radius,
                look: o.look.clone(),
            })
            .collect(),
        player: snapshot.player,
        followers,
        capture: None,
        current: None,
        kelp_tint: None,
        captions: Vec::new(),
        score: snapshot.score,
        lives: snapshot.lives,
    }
}

fn shrink(mut pose: PlayerSnapshot) -> PlayerSnapshot {
    pose.radius *= FOLLOWER_SCALE;
    pose
}

/// Frame for the live run
pub fn compose_live(state: &GameState) -> Scene {
    let snapshot = Snapshot::capture(state);
    let followers = state
        .player
        .followers(state.lives, &state.terrain)
        .into_iter()
        .map(|p| PlayerSnapshot {
            pos: p.pos,
            angle: p.angle,
            bending: p.bending,
            radius: state.player.radius * FOLLOWER_SCALE,
        })
        .collect();
    let mut scene = compose(&snapshot, state.width, state.height, followers);

    let net_radius = state.player.radius + 8.0;
    scene.capture = match state.run_state {
        RunState::Caught { struggles, required, .. } => Some(CaptureOverlay {
            center: state.player.pos,
            radius: net_radius,
            progress: Some((struggles, required)),
        }),
        RunState::GameOver if state.death.is_some_and(|d| d.cause == DeathCause::SweptAwayInNet) => {
            Some(CaptureOverlay {
                center: state.player.pos,
                radius: net_radius,
                progress: None,
            })
        }
        _ => None,
    };
    scene.current = state.rapid.active.then_some(CurrentBand {
        center_y: state.rapid.center_y,
        half_height: RapidCurrent::HALF_BAND,
    });
    scene.kelp_tint = state.kelp.active.then(|| hex_alpha(0x2E8B57, 0.1));
    scene.captions = state
        .floating_texts
        .iter()
        .map(|t| Caption {
            pos: t.pos,
            text: t.text.clone(),
            color: hex_alpha(t.color, t.life.clamp(0.0, 1.0)),
        })
        .collect();
    scene
}

/// Frame for replay entry `index`; `None` outside the buffer
pub fn compose_replay(state: &GameState, index: usize) -> Option<Scene> {
    let snapshot = state.replay.get(index)?;
    let followers = state
        .replay
        .followers(index, snapshot.lives)
        .into_iter()
        .map(shrink)
        .collect();
    Some(compose(snapshot, state.width, state.height, followers))
}

/// Whatever the current run state shows
pub fn compose_current(state: &GameState) -> Option<Scene> {
    match state.run_state {
        RunState::Replay { index } => compose_replay(state, index),
        _ => Some(compose_live(state)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::tick::{TickInput, tick};

    fn running(ticks: usize) -> GameState {
        let mut s = GameState::new(5, 1000.0, 600.0);
        s.start_run(Difficulty::Normal, 0);
        s.set_invincible_mode(true);
        for _ in 0..ticks {
            tick(&mut s, &TickInput::default());
        }
        s
    }

    #[test]
    fn test_ground_samples_span_viewport() {
        let scene = compose_live(&running(5));
        assert_eq!(scene.ground.len(), 101);
        assert_eq!(scene.ground.first().map(|p| p.x), Some(0.0));
        assert_eq!(scene.ground.last().map(|p| p.x), Some(1000.0));
    }

    #[test]
    fn test_out_of_range_replay_is_noop() {
        let s = running(10);
        assert!(compose_replay(&s, 0).is_some());
        assert!(compose_replay(&s, s.replay.len()).is_none());
    }

    #[test]
    fn test_replay_backdrop_follows_recorded_score() {
        let mut s = running(4);
        let first = compose_replay(&s, 0);
        s.score = 2500.0;
        let again = compose_replay(&s, 0);
        assert_eq!(first.map(|f| f.backdrop), again.map(|f| f.backdrop));
    }

    #[test]
    fn test_capture_overlay_while_caught() {
        let mut s = running(1);
        assert!(compose_live(&s).capture.is_none());
        s.run_state = RunState::Caught {
            net: 0,
            struggles: 1,
            required: 3,
        };
        let overlay = compose_live(&s).capture;
        assert_eq!(overlay.and_then(|o| o.progress), Some((1, 3)));
    }

    #[test]
    fn test_live_sprites_match_world() {
        let s = running(600);
        let scene = compose_live(&s);
        let expected = s.decorations.len()
            + s.background.len()
            + s.items.len()
            + s.enemies.len()
            + s.bubbles.len()
            + s.stream_lines.len();
        assert_eq!(scene.sprites.len(), expected);
        assert_eq!(scene.terrain.len(), s.terrain.len());
    }
}
