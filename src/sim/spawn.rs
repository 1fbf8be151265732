//! Spawn director
//!
//! Hazards come from cumulative weighted tables sampled on a cadence that
//! tightens with distance. Scenery, collectibles and effects run on their
//! own fixed cadences. Bosses are spawned by the tick when the scheduled
//! warning expires.

use glam::Vec2;
use rand::Rng;

use super::entity::{Archetype, Entity};
use super::item::Item;
use super::scenery::{BackgroundKind, BackgroundObject, Bubble, Decoration, StreamLine};
use super::state::{GameEvent, GameState, Zone};
use super::terrain::TerrainSegment;
use crate::consts::*;
use crate::settings::Difficulty;

/// Score per tick of cadence reduction
const CADENCE_SCORE_STEP: f64 = 25.0;
/// Viewports narrower than this spawn less often
const NARROW_VIEWPORT: f32 = 600.0;
const NARROW_CADENCE_SCALE: f32 = 1.2;

/// Ticks between hazard spawns
///
/// Shrinks by one tick per 25 m, never below the difficulty floor.
pub fn cadence(difficulty: Difficulty, width: f32, score: f64) -> u32 {
    let (mut base, mut min) = difficulty.spawn_cadence();
    if width < NARROW_VIEWPORT {
        base = (base as f32 * NARROW_CADENCE_SCALE).floor() as u32;
        min = (min as f32 * NARROW_CADENCE_SCALE).floor() as u32;
    }
    let reduction = (score.max(0.0) / CADENCE_SCORE_STEP).floor();
    let reduction = if reduction >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        reduction as u32
    };
    base.saturating_sub(reduction).max(min).max(1)
}

/// One row of a cumulative spawn table: picked when the sample is below `below`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnEntry {
    pub below: f32,
    pub archetype: Archetype,
}

const fn entry(below: f32, archetype: Archetype) -> SpawnEntry {
    SpawnEntry { below, archetype }
}

static SHALLOW: [SpawnEntry; 14] = [
    entry(0.20, Archetype::Fish),
    entry(0.35, Archetype::Sardine),
    entry(0.45, Archetype::Tuna),
    entry(0.50, Archetype::Shark),
    entry(0.60, Archetype::Net),
    entry(0.70, Archetype::Hook),
    entry(0.80, Archetype::Squid),
    entry(0.85, Archetype::Jellyfish),
    entry(0.90, Archetype::Octopus),
    entry(0.93, Archetype::Porcupinefish),
    entry(0.97, Archetype::Whirlpool),
    entry(0.98, Archetype::Flatfish),
    entry(0.995, Archetype::Crab),
    entry(1.0, Archetype::SeaUrchin),
];

static DEEP: [SpawnEntry; 13] = [
    entry(0.20, Archetype::Flatfish),
    entry(0.35, Archetype::SeaUrchin),
    entry(0.45, Archetype::Tuna),
    entry(0.50, Archetype::Shark),
    entry(0.80, Archetype::Squid),
    entry(0.85, Archetype::Jellyfish),
    entry(0.90, Archetype::Octopus),
    entry(0.93, Archetype::Porcupinefish),
    entry(0.95, Archetype::ElectricEel),
    entry(0.97, Archetype::Whirlpool),
    entry(0.98, Archetype::Flatfish),
    entry(0.995, Archetype::Crab),
    entry(1.0, Archetype::SeaUrchin),
];

static SLUDGE: [SpawnEntry; 3] = [
    entry(0.6, Archetype::Trash),
    entry(0.9, Archetype::MorayEel),
    entry(1.0, Archetype::Jellyfish),
];

static ICE: [SpawnEntry; 4] = [
    entry(0.4, Archetype::Penguin),
    entry(0.7, Archetype::Seal),
    entry(0.9, Archetype::Walrus),
    entry(1.0, Archetype::IceFloe),
];

static SPACE: [SpawnEntry; 2] = [entry(0.7, Archetype::Meteor), entry(1.0, Archetype::SpaceDebris)];

/// Weighted archetype set in effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnTable {
    Shallow,
    Deep,
    Sludge,
    Ice,
    Space,
}

impl SpawnTable {
    pub fn entries(&self) -> &'static [SpawnEntry] {
        match self {
            SpawnTable::Shallow => &SHALLOW,
            SpawnTable::Deep => &DEEP,
            SpawnTable::Sludge => &SLUDGE,
            SpawnTable::Ice => &ICE,
            SpawnTable::Space => &SPACE,
        }
    }

    /// Zone tables replace the depth tables wholesale
    pub fn active(zone: Zone, deep: bool) -> Self {
        match zone {
            Zone::Sludge => SpawnTable::Sludge,
            Zone::Ice => SpawnTable::Ice,
            Zone::Space => SpawnTable::Space,
            Zone::Open if deep => SpawnTable::Deep,
            Zone::Open => SpawnTable::Shallow,
        }
    }

    /// Extra spawn period for zone tables, applied on top of [`cadence`]
    pub fn fixed_cadence(&self) -> Option<u32> {
        match self {
            SpawnTable::Sludge => Some(60),
            SpawnTable::Ice => Some(70),
            SpawnTable::Space => Some(50),
            SpawnTable::Shallow | SpawnTable::Deep => None,
        }
    }

    /// Archetype for a uniform sample in [0, 1)
    pub fn pick(&self, sample: f32) -> Option<Archetype> {
        self.entries()
            .iter()
            .find(|e| sample < e.below)
            .map(|e| e.archetype)
    }
}

/// Space-zone planet appears past this depth
const PLANET_SCORE: f64 = 5500.0;
/// Deep-sea boss band
const ARCHITEUTHIS_BAND: std::ops::Range<f64> = 2000.0..3000.0;

/// Boss for the current zone and depth
pub fn boss_for(zone: Zone, score: f64) -> Archetype {
    if zone == Zone::Space {
        Archetype::Planet
    } else if ARCHITEUTHIS_BAND.contains(&score) {
        Archetype::Architeuthis
    } else {
        Archetype::Whale
    }
}

/// Build an entity, scale it to the viewport and register it
fn admit(state: &mut GameState, archetype: Archetype, pos: Vec2) -> u32 {
    let scale = state.scale_factor;
    let mut entity = {
        let (ctx, rng) = state.context_and_rng();
        Entity::new(archetype, pos, rng, &ctx)
    };
    entity.radius *= scale;
    state.enemies.push(entity)
}

fn add_item(state: &mut GameState, mut item: Item) {
    item.radius *= state.scale_factor;
    state.items.push(item);
}

/// Spawn point for an archetype entering from the right edge
fn entry_point(state: &mut GameState, archetype: Archetype) -> Vec2 {
    let w = state.width;
    let h = state.height;
    let ground = state.ground_y(w);
    let rng = &mut state.rng;
    match archetype {
        Archetype::Flatfish => Vec2::new(w, h - 40.0),
        Archetype::SeaUrchin => Vec2::new(w, h - 65.0),
        Archetype::Crab => Vec2::new(w, ground),
        Archetype::Net => Vec2::new(w + 100.0, rng.random::<f32>() * (h - 200.0) + 100.0),
        Archetype::Hook => Vec2::new(w * 0.8 + rng.random::<f32>() * w * 0.2, -100.0),
        Archetype::Squid | Archetype::Octopus => Vec2::new(w, rng.random::<f32>() * (h - 200.0) + 100.0),
        Archetype::Jellyfish => Vec2::new(w, rng.random::<f32>() * (h - 150.0) + 50.0),
        Archetype::Whirlpool => Vec2::new(w, rng.random::<f32>() * 80.0 + 40.0),
        Archetype::MorayEel | Archetype::Walrus => Vec2::new(w, rng.random::<f32>() * (h - 150.0) + 100.0),
        Archetype::Penguin => Vec2::new(w, rng.random::<f32>() * (h / 2.0)),
        Archetype::IceFloe => Vec2::new(w, 0.0),
        Archetype::Meteor | Archetype::SpaceDebris => Vec2::new(w, rng.random::<f32>() * h),
        Archetype::Planet => Vec2::new(w + 200.0, h / 2.0),
        Archetype::Whale | Archetype::Architeuthis => Vec2::new(w, h / 2.0),
        _ => Vec2::new(w, rng.random::<f32>() * (h - 100.0) + 50.0),
    }
}

fn spawn_sardine_school(state: &mut GameState) {
    let w = state.width;
    let base_y = state.rng.random::<f32>() * (state.height - 150.0) + 50.0;
    let count = state.rng.random_range(10..16);
    for _ in 0..count {
        let pos = Vec2::new(
            w + state.rng.random::<f32>() * 200.0,
            base_y + state.rng.random::<f32>() * 80.0 - 40.0,
        );
        admit(state, Archetype::Sardine, pos);
    }
}

/// Rock formation entering at the right edge, if any
fn entering_rock(state: &GameState) -> Option<usize> {
    let w = state.width;
    state
        .terrain
        .iter()
        .position(|t| t.anchor.x > w - 100.0 && t.anchor.x < w + 200.0)
}

/// Perch a stationary hazard on an interior vertex of an entering rock
fn spawn_on_rock(state: &mut GameState, rock: usize, deep: bool) {
    let Some(segment) = state.terrain.get(rock) else {
        return;
    };
    let interior = segment.points.len().saturating_sub(2).max(1);
    let index = state.rng.random_range(0..interior) + 1;
    let Some(pos) = state.terrain.get(rock).and_then(|t| t.point(index)) else {
        return;
    };
    if state.rng.random::<f32>() < 0.5 {
        admit(state, Archetype::SeaAnemone, pos);
    } else if deep {
        admit(state, Archetype::SeaUrchin, pos - Vec2::new(0.0, 15.0));
    } else {
        admit(state, Archetype::Starfish, pos);
    }
}

/// Hazard spawning for one tick
pub fn spawn_hazards(state: &mut GameState) {
    if state.boss_warning || state.enemies.boss_alive() {
        return;
    }

    let deep = state.is_deep();
    let table = SpawnTable::active(state.zone, deep);
    let every = cadence(state.difficulty, state.width, state.score);
    if state.frame_count % u64::from(every) != 0 {
        return;
    }
    // Zone tables additionally wait for their own period
    if let Some(period) = table.fixed_cadence() {
        if state.frame_count % u64::from(period) != 0 {
            return;
        }
    }

    let sample: f32 = state.rng.random();

    if table == SpawnTable::Space {
        if let Some(archetype) = table.pick(sample) {
            let pos = entry_point(state, archetype);
            admit(state, archetype, pos);
        }
        if state.score > PLANET_SCORE && !state.enemies.contains(Archetype::Planet) {
            let pos = entry_point(state, Archetype::Planet);
            admit(state, Archetype::Planet, pos);
        }
        return;
    }

    if table.fixed_cadence().is_none() {
        if deep && state.rng.random::<f32>() < 0.3 {
            let pos = entry_point(state, Archetype::Anglerfish);
            admit(state, Archetype::Anglerfish, pos);
            return;
        }
        if let Some(rock) = entering_rock(state) {
            if state.rng.random::<f32>() < 0.5 {
                spawn_on_rock(state, rock, deep);
                return;
            }
        }
    }

    match table.pick(sample) {
        Some(Archetype::Sardine) => spawn_sardine_school(state),
        Some(archetype) => {
            let pos = entry_point(state, archetype);
            admit(state, archetype, pos);
        }
        None => log::debug!("Spawn sample {sample} fell outside {table:?}"),
    }
}

/// Spawn the boss for the current zone
pub fn spawn_boss(state: &mut GameState) -> u32 {
    let archetype = boss_for(state.zone, state.score);
    let pos = entry_point(state, archetype);
    let id = admit(state, archetype, pos);
    log::info!("{} appeared at {:.0}m", archetype.name(), state.score);
    state.events.push(GameEvent::BossSpawned);
    id
}

/// Ground decorations, rock formations and collectibles
pub fn spawn_scenery(state: &mut GameState) {
    let w = state.width;
    let h = state.height;
    let frame = state.frame_count;
    let ground = state.ground_y(w);
    let deep = state.is_deep();

    if state.zone == Zone::Space {
        if frame % 100 == 0 {
            let y = state.rng.random::<f32>() * h;
            state
                .background
                .push(BackgroundObject::new(BackgroundKind::Satellite, Vec2::new(w, y)));
        }
        return;
    }

    if frame % 30 == 0 {
        if state.kelp.active {
            if state.rng.random::<f32>() < 0.8 {
                let seaweed = Decoration::seaweed(Vec2::new(w, ground), &mut state.rng);
                state.decorations.push(seaweed);
            }
        } else if state.rng.random::<f32>() < 0.8 {
            let roll: f32 = state.rng.random();
            let rock_below = if deep { 0.8 } else { 0.9 };
            if roll < 0.5 && !deep {
                let seaweed = Decoration::seaweed(Vec2::new(w, ground), &mut state.rng);
                state.decorations.push(seaweed);
                if state.rng.random::<f32>() < 0.1 {
                    add_item(state, Item::garden_eel(Vec2::new(w + 20.0, ground)));
                }
            } else if roll < rock_below {
                let rock = TerrainSegment::generate(&mut state.rng, w, h);
                state.terrain.push(rock);
            } else if !deep {
                let coral = Decoration::coral(Vec2::new(w, ground), &mut state.rng);
                state.decorations.push(coral);
                if state.rng.random::<f32>() < 0.5 {
                    add_item(state, Item::clownfish(Vec2::new(w, h - 80.0)));
                }
            }
        }
    }

    if frame % 300 == 0 {
        add_item(state, Item::pearl(Vec2::new(w, ground - 15.0)));
    }
    if frame % 100 == 0 {
        let y = state.rng.random::<f32>() * (h - 100.0) + 50.0;
        let plankton = Item::plankton(Vec2::new(w, y), &mut state.rng);
        add_item(state, plankton);
    }

    let friend_every = if state.lives < 3 || state.score < DEEP_SCORE {
        200
    } else {
        600
    };
    if frame % friend_every == 0 {
        let y = state.rng.random::<f32>() * (h - 100.0) + 50.0;
        let friend = Item::friend_shrimp(Vec2::new(w, y), &mut state.rng);
        add_item(state, friend);
    }
}

/// Shipwrecks (each guarding a treasure chest) past the deep threshold
pub fn spawn_background(state: &mut GameState) {
    if state.score <= DEEP_SCORE || state.frame_count % 1200 != 0 {
        return;
    }
    let x = state.width;
    state.background.push(BackgroundObject::new(
        BackgroundKind::Shipwreck,
        Vec2::new(x, state.height - 50.0),
    ));
    let chest_x = x + 100.0;
    let chest = Item::treasure_chest(Vec2::new(chest_x, state.ground_y(chest_x)));
    add_item(state, chest);
}

/// Stream lines, trail bubbles and ambient bubbles
pub fn spawn_effects(state: &mut GameState) {
    let frame = state.frame_count;

    if state.rapid.active && frame % 2 == 0 {
        let y = state.rapid.center_y + (state.rng.random::<f32>() - 0.5) * 200.0;
        let line = StreamLine::new(Vec2::new(state.width, y), &mut state.rng);
        state.stream_lines.push(line);
    }

    if frame % 20 == 0 {
        let bubble = Bubble::trail(state.player.pos, &mut state.rng);
        state.bubbles.push(bubble);
        if state.rng.random::<f32>() < 0.05 {
            state.events.push(GameEvent::Bubble);
        }
    }

    if frame % 15 == 0 {
        let density = (state.score / 300.0).floor().clamp(0.0, 20.0) as f32;
        if state.rng.random::<f32>() < 0.2 + density * 0.05 {
            let x = state.rng.random::<f32>() * (state.width + 100.0);
            let bubble = Bubble::ambient(Vec2::new(x, state.height + 10.0), &mut state.rng);
            state.bubbles.push(bubble);
        }
    }
}
