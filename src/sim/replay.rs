//! Snapshot recording and playback
//!
//! While a run is live every second tick appends an immutable [`Snapshot`]
//! to a bounded FIFO. Playback walks the tail of the buffer one snapshot per
//! tick; renderers rebuild frames purely from recorded fields.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::EntityKind;
use super::item::ItemKind;
use super::scenery::{BackgroundKind, DecorationKind};
use super::state::GameState;
use super::terrain::TerrainSegment;
use crate::consts::*;

/// How a recorded object is drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Look {
    Decoration(DecorationKind),
    Background(BackgroundKind),
    Item(ItemKind),
    Enemy(EntityKind),
    Bubble { size: f32, life: f32, background: bool },
    StreamLine { length: f32 },
}

/// One recorded object, in draw order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSnapshot {
    pub pos: Vec2,
    pub radius: f32,
    pub look: Look,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub pos: Vec2,
    pub angle: f32,
    pub bending: bool,
    pub radius: f32,
}

/// Immutable capture of one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Run tick the snapshot was taken on
    pub tick: u64,
    pub player: PlayerSnapshot,
    pub lives: u32,
    pub score: f64,
    pub scroll_offset: f32,
    pub objects: Vec<ObjectSnapshot>,
    pub terrain: Vec<TerrainSegment>,
}

impl Snapshot {
    /// Capture everything a frame needs from the live state
    pub fn capture(state: &GameState) -> Self {
        let mut objects = Vec::with_capacity(
            state.decorations.len()
                + state.background.len()
                + state.items.len()
                + state.enemies.len()
                + state.bubbles.len()
                + state.stream_lines.len(),
        );
        objects.extend(state.decorations.iter().map(|d| ObjectSnapshot {
            pos: d.pos,
            radius: 0.0,
            look: Look::Decoration(d.kind.clone()),
        }));
        objects.extend(state.background.iter().map(|b| ObjectSnapshot {
            pos: b.pos,
            radius: 0.0,
            look: Look::Background(b.kind),
        }));
        objects.extend(state.items.iter().map(|i| ObjectSnapshot {
            pos: i.pos,
            radius: i.radius,
            look: Look::Item(i.kind.clone()),
        }));
        objects.extend(state.enemies.iter().map(|e| ObjectSnapshot {
            pos: e.pos,
            radius: e.radius,
            look: Look::Enemy(e.kind.clone()),
        }));
        objects.extend(state.bubbles.iter().map(|b| ObjectSnapshot {
            pos: b.pos,
            radius: b.size,
            look: Look::Bubble {
                size: b.size,
                life: b.life,
                background: b.background,
            },
        }));
        objects.extend(state.stream_lines.iter().map(|s| ObjectSnapshot {
            pos: s.pos,
            radius: 0.0,
            look: Look::StreamLine { length: s.length },
        }));

        Self {
            tick: state.frame_count,
            player: PlayerSnapshot {
                pos: state.player.pos,
                angle: state.player.angle,
                bending: state.player.bending,
                radius: state.player.radius,
            },
            lives: state.lives,
            score: state.score,
            scroll_offset: state.scroll_offset,
            objects,
            terrain: state.terrain.clone(),
        }
    }
}

/// Bounded FIFO of snapshots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayBuffer {
    snapshots: VecDeque<Snapshot>,
}

impl ReplayBuffer {
    pub fn new() -> Self {
        Self {
            snapshots: VecDeque::with_capacity(REPLAY_CAPACITY),
        }
    }

    /// Whether a snapshot is due on this run tick
    #[inline]
    pub fn should_record(tick: u64) -> bool {
        tick % REPLAY_RECORD_INTERVAL == 0
    }

    /// Append, evicting the oldest snapshot once full
    pub fn push(&mut self, snapshot: Snapshot) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > REPLAY_CAPACITY {
            self.snapshots.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshot at `index`; `None` outside the buffer
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn oldest(&self) -> Option<&Snapshot> {
        self.snapshots.front()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    /// First index played back (the last few seconds before the end)
    pub fn playback_start(&self) -> usize {
        self.snapshots.len().saturating_sub(REPLAY_TAIL)
    }

    /// Follower poses for the frame at `index`, sampled further back per follower
    pub fn followers(&self, index: usize, lives: u32) -> Vec<PlayerSnapshot> {
        (1..lives as usize)
            .filter_map(|n| index.checked_sub(n * REPLAY_FOLLOWER_LAG))
            .filter_map(|i| self.get(i))
            .map(|s| s.player)
            .collect()
    }

    /// Export the buffer as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshots)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let snapshots: VecDeque<Snapshot> = serde_json::from_str(json)?;
        let mut buffer = Self::new();
        for snapshot in snapshots {
            buffer.push(snapshot);
        }
        Ok(buffer)
    }
}
