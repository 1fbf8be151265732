//! Hazard entities
//!
//! Every hazard is one `Entity` with a closed `EntityKind` payload. The
//! uniform contract is `update` (scroll plus per-kind motion), `is_off_screen`,
//! `check_collision` and the deletion flag; `contact` classifies a confirmed
//! collision into a hit, a capture or a bite.

use std::f32::consts::TAU;
use std::fmt;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::collision::{Seabed, circles_overlap};
use crate::consts::DEEP_SCORE;
use crate::normalize_angle;

/// Judged circle of a net (smaller than its drawn extent, offset down)
pub const NET_JUDGED_RADIUS: f32 = 50.0;
pub const NET_JUDGED_OFFSET: f32 = 10.0;
/// Flatfish lunge height when biting
pub const FLATFISH_BITE_LIFT: f32 = 20.0;
/// Slack added to the tentacle tip test
pub const TENTACLE_TIP_REACH: f32 = 30.0;
/// Half-width of a water spout column
pub const SPOUT_HALF_WIDTH: f32 = 30.0;
/// Whale suction reach and strength
pub const WHALE_SUCK_RANGE: f32 = 600.0;
pub const WHALE_SUCK_FORCE: f32 = 2.0;
pub const WHALE_MOUTH_OFFSET: f32 = 30.0;
/// Squid dash cadence and impulse
pub const SQUID_DASH_TICKS: u32 = 150;
pub const SQUID_DASH_SPEED: f32 = 6.0;
pub const SQUID_DASH_LIFT: f32 = 3.0;

/// Fieldless tag for each hazard type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Fish,
    Sardine,
    Tuna,
    Shark,
    Anglerfish,
    Hook,
    Net,
    Squid,
    Jellyfish,
    ElectricEel,
    Flatfish,
    SeaUrchin,
    Octopus,
    Porcupinefish,
    Needle,
    Crab,
    SeaAnemone,
    Starfish,
    Whirlpool,
    Whale,
    Architeuthis,
    GiantTentacle,
    WaterSpout,
    WaterDrop,
    Trash,
    MorayEel,
    Penguin,
    Seal,
    Walrus,
    IceFloe,
    Meteor,
    SpaceDebris,
    Planet,
}

impl Archetype {
    pub const ALL: [Archetype; 33] = [
        Archetype::Fish,
        Archetype::Sardine,
        Archetype::Tuna,
        Archetype::Shark,
        Archetype::Anglerfish,
        Archetype::Hook,
        Archetype::Net,
        Archetype::Squid,
        Archetype::Jellyfish,
        Archetype::ElectricEel,
        Archetype::Flatfish,
        Archetype::SeaUrchin,
        Archetype::Octopus,
        Archetype::Porcupinefish,
        Archetype::Needle,
        Archetype::Crab,
        Archetype::SeaAnemone,
        Archetype::Starfish,
        Archetype::Whirlpool,
        Archetype::Whale,
        Archetype::Architeuthis,
        Archetype::GiantTentacle,
        Archetype::WaterSpout,
        Archetype::WaterDrop,
        Archetype::Trash,
        Archetype::MorayEel,
        Archetype::Penguin,
        Archetype::Seal,
        Archetype::Walrus,
        Archetype::IceFloe,
        Archetype::Meteor,
        Archetype::SpaceDebris,
        Archetype::Planet,
    ];

    /// Unscaled collision radius
    pub fn base_radius(&self) -> f32 {
        match self {
            Archetype::Fish => 15.0,
            Archetype::Sardine => 12.0,
            Archetype::Tuna => 25.0,
            Archetype::Shark => 30.0,
            Archetype::Anglerfish => 25.0,
            Archetype::Hook => 10.0,
            Archetype::Net => 80.0,
            Archetype::Squid => 18.0,
            Archetype::Jellyfish => 20.0,
            Archetype::ElectricEel => 20.0,
            Archetype::Flatfish => 20.0,
            Archetype::SeaUrchin => 15.0,
            Archetype::Octopus => 25.0,
            Archetype::Porcupinefish => 20.0,
            Archetype::Needle => 5.0,
            Archetype::Crab => 18.0,
            Archetype::SeaAnemone => 15.0,
            Archetype::Starfish => 15.0,
            Archetype::Whirlpool => 35.0,
            Archetype::Whale => 150.0,
            Archetype::Architeuthis => 120.0,
            Archetype::GiantTentacle => 15.0,
            Archetype::WaterSpout => 30.0,
            Archetype::WaterDrop => 8.0,
            Archetype::Trash => 18.0,
            Archetype::MorayEel => 30.0,
            Archetype::Penguin => 25.0,
            Archetype::Seal => 30.0,
            Archetype::Walrus => 40.0,
            Archetype::IceFloe => 40.0,
            Archetype::Meteor => 20.0,
            Archetype::SpaceDebris => 15.0,
            Archetype::Planet => 100.0,
        }
    }

    /// Bosses are mutually exclusive and suppress regular spawning
    pub fn is_boss(&self) -> bool {
        matches!(self, Archetype::Whale | Archetype::Architeuthis | Archetype::Planet)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Fish => "Fish",
            Archetype::Sardine => "Sardine",
            Archetype::Tuna => "Tuna",
            Archetype::Shark => "Shark",
            Archetype::Anglerfish => "Anglerfish",
            Archetype::Hook => "Fishing Hook",
            Archetype::Net => "Trawl Net",
            Archetype::Squid => "Squid",
            Archetype::Jellyfish => "Jellyfish",
            Archetype::ElectricEel => "Electric Eel",
            Archetype::Flatfish => "Flatfish",
            Archetype::SeaUrchin => "Sea Urchin",
            Archetype::Octopus => "Octopus",
            Archetype::Porcupinefish => "Porcupinefish",
            Archetype::Needle => "Needle",
            Archetype::Crab => "Crab",
            Archetype::SeaAnemone => "Sea Anemone",
            Archetype::Starfish => "Starfish",
            Archetype::Whirlpool => "Whirlpool",
            Archetype::Whale => "Whale",
            Archetype::Architeuthis => "Giant Squid",
            Archetype::GiantTentacle => "Giant Tentacle",
            Archetype::WaterSpout => "Water Spout",
            Archetype::WaterDrop => "Water Drop",
            Archetype::Trash => "Trash",
            Archetype::MorayEel => "Moray Eel",
            Archetype::Penguin => "Penguin",
            Archetype::Seal => "Seal",
            Archetype::Walrus => "Walrus",
            Archetype::IceFloe => "Ice Floe",
            Archetype::Meteor => "Meteor",
            Archetype::SpaceDebris => "Space Debris",
            Archetype::Planet => "Planet",
        }
    }
}

/// Flatfish ambush sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlatfishMode {
    Hiding,
    Revealing,
    Biting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrashVariant {
    Can,
    Bag,
    Bottle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebrisVariant {
    Panel,
    Metal,
    Satellite,
}

/// Per-kind sub-state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Fish { extra_speed: f32, phase: f32 },
    Sardine { phase: f32 },
    Tuna,
    Shark,
    Anglerfish { phase: f32 },
    Hook { vy: f32, on_rock: bool },
    Net { phase: f32 },
    Squid { timer: f32, lunge_timer: u32, vel: Vec2, sleeping: bool },
    Jellyfish { phase: f32, electric_timer: u32, electric: bool },
    ElectricEel { phase: f32, electric_timer: u32 },
    Flatfish { mode: FlatfishMode, reveal_timer: u32 },
    SeaUrchin,
    Octopus { move_timer: f32, sleeping: bool },
    Porcupinefish { timer: u32, exploded: bool, scale: f32 },
    Needle { vel: Vec2 },
    Crab { walk_timer: f32 },
    SeaAnemone { timer: f32, tint: u8 },
    Starfish { angle: f32, tint: u8 },
    Whirlpool { angle: f32 },
    Whale { phase: f32, attack_timer: u32, sucking: bool, suck_timer: u32 },
    Architeuthis { phase: f32, attack_timer: u32 },
    GiantTentacle { angle: f32, length: f32, life: u32 },
    WaterSpout { life: u32, height: f32 },
    WaterDrop { vel: Vec2 },
    Trash { angle: f32, variant: TrashVariant },
    MorayEel { timer: f32 },
    Penguin { vy: f32, timer: f32 },
    Seal { timer: f32 },
    Walrus { timer: f32 },
    IceFloe,
    Meteor { angle: f32 },
    SpaceDebris { angle: f32, variant: DebrisVariant },
    Planet,
}

impl EntityKind {
    pub fn archetype(&self) -> Archetype {
        match self {
            EntityKind::Fish { .. } => Archetype::Fish,
            EntityKind::Sardine { .. } => Archetype::Sardine,
            EntityKind::Tuna => Archetype::Tuna,
            EntityKind::Shark => Archetype::Shark,
            EntityKind::Anglerfish { .. } => Archetype::Anglerfish,
            EntityKind::Hook { .. } => Archetype::Hook,
            EntityKind::Net { .. } => Archetype::Net,
            EntityKind::Squid { .. } => Archetype::Squid,
            EntityKind::Jellyfish { .. } => Archetype::Jellyfish,
            EntityKind::ElectricEel { .. } => Archetype::ElectricEel,
            EntityKind::Flatfish { .. } => Archetype::Flatfish,
            EntityKind::SeaUrchin => Archetype::SeaUrchin,
            EntityKind::Octopus { .. } => Archetype::Octopus,
            EntityKind::Porcupinefish { .. } => Archetype::Porcupinefish,
            EntityKind::Needle { .. } => Archetype::Needle,
            EntityKind::Crab { .. } => Archetype::Crab,
            EntityKind::SeaAnemone { .. } => Archetype::SeaAnemone,
            EntityKind::Starfish { .. } => Archetype::Starfish,
            EntityKind::Whirlpool { .. } => Archetype::Whirlpool,
            EntityKind::Whale { .. } => Archetype::Whale,
            EntityKind::Architeuthis { .. } => Archetype::Architeuthis,
            EntityKind::GiantTentacle { .. } => Archetype::GiantTentacle,
            EntityKind::WaterSpout { .. } => Archetype::WaterSpout,
            EntityKind::WaterDrop { .. } => Archetype::WaterDrop,
            EntityKind::Trash { .. } => Archetype::Trash,
            EntityKind::MorayEel { .. } => Archetype::MorayEel,
            EntityKind::Penguin { .. } => Archetype::Penguin,
            EntityKind::Seal { .. } => Archetype::Seal,
            EntityKind::Walrus { .. } => Archetype::Walrus,
            EntityKind::IceFloe => Archetype::IceFloe,
            EntityKind::Meteor { .. } => Archetype::Meteor,
            EntityKind::SpaceDebris { .. } => Archetype::SpaceDebris,
            EntityKind::Planet => Archetype::Planet,
        }
    }
}

/// Read-only view of the world an entity reacts to
#[derive(Debug, Clone, Copy)]
pub struct WorldContext<'a> {
    pub scroll_speed: f32,
    pub width: f32,
    pub height: f32,
    pub score: f64,
    pub player_pos: Vec2,
    pub seabed: Seabed<'a>,
}

impl WorldContext<'_> {
    /// Baseline seabed height at x
    #[inline]
    pub fn ground_y(&self, x: f32) -> f32 {
        self.seabed.baseline(x)
    }

    #[inline]
    pub fn is_deep(&self) -> bool {
        self.score > DEEP_SCORE
    }
}

/// Why a hit ended (or hurt) the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Enemy,
    Fish,
    SardineSchool,
    Tuna,
    Hook,
    Anglerfish,
    Shark,
    Squid,
    Octopus,
    Jellyfish,
    Needles,
    Whirlpool,
    WhaleCollision,
    WhaleSuction,
    WhaleSpout,
    GiantSquid,
    SeaUrchin,
    Crab,
    SeaAnemone,
    Starfish,
    ElectricEel,
    Trash,
    MorayEel,
    Penguin,
    SeaMammal,
    SpaceJunk,
    Planet,
    /// Drifted off the left edge
    SweptAway,
    /// Drifted off the left edge while restrained
    SweptAwayInNet,
    EatenByFlatfish,
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DeathCause::Enemy => "Bumped into an enemy",
            DeathCause::Fish => "Bumped into a fish",
            DeathCause::SardineSchool => "Caught up in a school of sardines",
            DeathCause::Tuna => "Rammed by a tuna",
            DeathCause::Hook => "Snagged on a fishing hook",
            DeathCause::Anglerfish => "Eaten by an anglerfish",
            DeathCause::Shark => "Bitten by a shark",
            DeathCause::Squid => "Bumped into a squid",
            DeathCause::Octopus => "Grabbed by an octopus",
            DeathCause::Jellyfish => "Stung by a jellyfish",
            DeathCause::Needles => "Pierced by porcupinefish needles",
            DeathCause::Whirlpool => "Dragged into a whirlpool",
            DeathCause::WhaleCollision => "Crashed into a giant whale",
            DeathCause::WhaleSuction => "Sucked in by a whale",
            DeathCause::WhaleSpout => "Blasted by a whale's spout",
            DeathCause::GiantSquid => "Devoured by a giant squid",
            DeathCause::SeaUrchin => "Pricked by a sea urchin",
            DeathCause::Crab => "Pinched by a crab",
            DeathCause::SeaAnemone => "Stung by a sea anemone",
            DeathCause::Starfish => "Smothered by a starfish",
            DeathCause::ElectricEel => "Shocked by an electric eel",
            DeathCause::Trash => "Hit by floating trash",
            DeathCause::MorayEel => "Bitten by a moray eel",
            DeathCause::Penguin => "Collided with a penguin",
            DeathCause::SeaMammal => "Bumped into a sea mammal",
            DeathCause::SpaceJunk => "Lost among the space junk",
            DeathCause::Planet => "Crashed into a planet",
            DeathCause::SweptAway => "Swallowed by the waves",
            DeathCause::SweptAwayInNet => "Swept away while caught in a net",
            DeathCause::EatenByFlatfish => "Eaten by a flatfish",
        };
        f.write_str(text)
    }
}

/// Outcome of a confirmed collision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Generic damage
    Hit(DeathCause),
    /// Net restrains the body (enters CAUGHT)
    Capture,
    /// Scripted predator death (enters BITTEN)
    Bite,
}

/// A hazard in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Assigned by the registry on insertion
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub marked_for_deletion: bool,
    pub kind: EntityKind,
}

fn random_phase(rng: &mut Pcg32) -> f32 {
    rng.random::<f32>() * TAU
}

fn random_tint(rng: &mut Pcg32) -> u8 {
    rng.random_range(0..3)
}

impl Entity {
    /// Construct a fresh entity of `archetype` at `pos` with randomized sub-state
    pub fn new(archetype: Archetype, pos: Vec2, rng: &mut Pcg32, ctx: &WorldContext) -> Self {
        let mut pos = pos;
        let kind = match archetype {
            Archetype::Fish => EntityKind::Fish {
                extra_speed: rng.random::<f32>() * 2.0,
                phase: random_phase(rng),
            },
            Archetype::Sardine => EntityKind::Sardine {
                phase: random_phase(rng),
            },
            Archetype::Tuna => EntityKind::Tuna,
            Archetype::Shark => EntityKind::Shark,
            Archetype::Anglerfish => EntityKind::Anglerfish {
                phase: random_phase(rng),
            },
            Archetype::Hook => EntityKind::Hook {
                vy: 4.5,
                on_rock: false,
            },
            Archetype::Net => EntityKind::Net { phase: 0.0 },
            Archetype::Squid => EntityKind::Squid {
                timer: 0.0,
                lunge_timer: rng.random_range(0..100),
                vel: Vec2::ZERO,
                sleeping: false,
            },
            Archetype::Jellyfish => EntityKind::Jellyfish {
                phase: random_phase(rng),
                electric_timer: 0,
                electric: false,
            },
            Archetype::ElectricEel => EntityKind::ElectricEel {
                phase: 0.0,
                electric_timer: 0,
            },
            Archetype::Flatfish => EntityKind::Flatfish {
                mode: FlatfishMode::Hiding,
                reveal_timer: 0,
            },
            Archetype::SeaUrchin => EntityKind::SeaUrchin,
            Archetype::Octopus => EntityKind::Octopus {
                move_timer: rng.random::<f32>() * 100.0,
                sleeping: false,
            },
            Archetype::Porcupinefish => EntityKind::Porcupinefish {
                timer: 0,
                exploded: false,
                scale: 1.0,
            },
            Archetype::Needle => EntityKind::Needle { vel: Vec2::ZERO },
            Archetype::Crab => EntityKind::Crab { walk_timer: 0.0 },
            Archetype::SeaAnemone => EntityKind::SeaAnemone {
                timer: rng.random::<f32>() * 100.0,
                tint: random_tint(rng),
            },
            Archetype::Starfish => EntityKind::Starfish {
                angle: random_phase(rng),
                tint: random_tint(rng),
            },
            Archetype::Whirlpool => EntityKind::Whirlpool { angle: 0.0 },
            Archetype::Whale => EntityKind::Whale {
                phase: 0.0,
                attack_timer: 0,
                sucking: false,
                suck_timer: 0,
            },
            Archetype::Architeuthis => EntityKind::Architeuthis {
                phase: 0.0,
                attack_timer: 0,
            },
            Archetype::GiantTentacle => {
                let to_player = ctx.player_pos - pos;
                EntityKind::GiantTentacle {
                    angle: to_player.y.atan2(to_player.x),
                    length: 10.0,
                    life: 120,
                }
            }
            Archetype::WaterSpout => EntityKind::WaterSpout { life: 60, height: 0.0 },
            Archetype::WaterDrop => EntityKind::WaterDrop { vel: Vec2::ZERO },
            Archetype::Trash => {
                let angle = random_phase(rng);
                let r: f32 = rng.random();
                let variant = if r < 0.33 {
                    TrashVariant::Can
                } else if r < 0.66 {
                    TrashVariant::Bag
                } else {
                    TrashVariant::Bottle
                };
                EntityKind::Trash { angle, variant }
            }
            Archetype::MorayEel => EntityKind::MorayEel { timer: 0.0 },
            Archetype::Penguin => EntityKind::Penguin { vy: 2.0, timer: 0.0 },
            Archetype::Seal => EntityKind::Seal { timer: 0.0 },
            Archetype::Walrus => EntityKind::Walrus { timer: 0.0 },
            Archetype::IceFloe => {
                pos.y = 40.0;
                EntityKind::IceFloe
            }
            Archetype::Meteor => EntityKind::Meteor { angle: 0.0 },
            Archetype::SpaceDebris => {
                let angle: f32 = rng.random();
                let r: f32 = rng.random();
                let variant = if r < 0.33 {
                    DebrisVariant::Panel
                } else if r < 0.66 {
                    DebrisVariant::Metal
                } else {
                    DebrisVariant::Satellite
                };
                EntityKind::SpaceDebris { angle, variant }
            }
            Archetype::Planet => EntityKind::Planet,
        };
        Self {
            id: 0,
            pos,
            radius: archetype.base_radius(),
            marked_for_deletion: false,
            kind,
        }
    }

    /// A projectile with its own velocity (needles, spout drops)
    pub fn projectile(archetype: Archetype, pos: Vec2, vel: Vec2) -> Self {
        let kind = match archetype {
            Archetype::WaterDrop => EntityKind::WaterDrop { vel },
            _ => EntityKind::Needle { vel },
        };
        let radius = kind.archetype().base_radius();
        Self {
            id: 0,
            pos,
            radius,
            marked_for_deletion: false,
            kind,
        }
    }

    #[inline]
    pub fn archetype(&self) -> Archetype {
        self.kind.archetype()
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        self.archetype().is_boss()
    }

    /// Mouth position while a whale is sucking
    pub fn suction_mouth(&self) -> Option<Vec2> {
        match self.kind {
            EntityKind::Whale { sucking: true, .. } => Some(self.pos + Vec2::new(0.0, WHALE_MOUTH_OFFSET)),
            _ => None,
        }
    }

    /// Advance one tick. Entities this one emits are pushed onto `spawned`.
    pub fn update(&mut self, ctx: &WorldContext, rng: &mut Pcg32, spawned: &mut Vec<Entity>) {
        let speed = ctx.scroll_speed;
        match &mut self.kind {
            EntityKind::Fish { extra_speed, phase } => {
                self.pos.x -= speed + *extra_speed;
                *phase += 0.05;
                self.pos.y += phase.sin() * 1.5;
            }
            EntityKind::Sardine { phase } => {
                self.pos.x -= speed + 2.0;
                *phase += 0.1;
                self.pos.y += phase.sin() * 0.5;
            }
            EntityKind::Tuna => {
                let narrow = if ctx.width < 600.0 { 0.8 } else { 1.0 };
                self.pos.x -= speed + 8.0 * narrow;
            }
            EntityKind::Shark => {
                self.pos.x -= speed + 6.5;
                self.pos.y += (ctx.player_pos.y - self.pos.y) * 0.025;
            }
            EntityKind::Anglerfish { phase } => {
                self.pos.x -= speed * 0.7;
                *phase += 0.03;
                self.pos.y += phase.sin() * 0.5;
            }
            EntityKind::Hook { vy, on_rock } => {
                self.pos.x -= speed;
                self.pos.y += *vy;
                let mut limit = ctx.ground_y(self.pos.x);
                *on_rock = false;
                for seg in ctx.seabed.terrain {
                    if !seg.spans(self.pos.x) {
                        continue;
                    }
                    if let Some(info) = seg.surface_info(self.pos.x) {
                        if info.y < limit {
                            limit = info.y;
                            *on_rock = true;
                        }
                    }
                }
                if self.pos.y > limit {
                    self.pos.y = limit;
                }
            }
            EntityKind::Net { phase } => {
                self.pos.x -= speed;
                *phase += 0.02;
                self.pos.y += phase.sin();
            }
            EntityKind::Squid {
                timer,
                lunge_timer,
                vel,
                sleeping,
            } => {
                self.pos.x -= speed;
                *timer += 0.05;
                *lunge_timer += 1;
                if ctx.is_deep() {
                    // Dozes on the seabed
                    *sleeping = true;
                    let rest = ctx.ground_y(self.pos.x) - 20.0;
                    if self.pos.y < rest {
                        self.pos.y += 0.5;
                    } else {
                        self.pos.y = rest;
                    }
                    self.pos.y += timer.sin() * 0.2;
                    return;
                }
                *sleeping = false;
                if *lunge_timer >= SQUID_DASH_TICKS {
                    *lunge_timer = 0;
                    let dy = ctx.player_pos.y - self.pos.y;
                    *vel = Vec2::new(SQUID_DASH_SPEED, dy.signum() * SQUID_DASH_LIFT);
                }
                *vel *= 0.95;
                self.pos.x -= vel.x;
                self.pos.y += vel.y;
                self.pos.y += timer.sin() * 0.5;
            }
            EntityKind::Jellyfish {
                phase,
                electric_timer,
                electric,
            } => {
                self.pos.x -= speed;
                *phase += 0.05;
                self.pos.y += phase.sin() * 0.5;
                *electric_timer += 1;
                if *electric_timer > 120 {
                    *electric = !*electric;
                    *electric_timer = 0;
                }
            }
            EntityKind::ElectricEel { phase, electric_timer } => {
                self.pos.x -= speed + 4.5;
                self.pos.y += (ctx.player_pos.y - self.pos.y) * 0.02;
                *phase += 0.15;
                *electric_timer += 1;
            }
            EntityKind::Flatfish { mode, reveal_timer } => {
                self.pos.x -= speed;
                self.pos.y = ctx.ground_y(self.pos.x) - 5.0;
                match mode {
                    FlatfishMode::Hiding => {
                        if self.pos.distance(ctx.player_pos) < 100.0 {
                            *mode = FlatfishMode::Revealing;
                            *reveal_timer = 20;
                        }
                    }
                    FlatfishMode::Revealing => {
                        *reveal_timer = reveal_timer.saturating_sub(1);
                        if *reveal_timer == 0 {
                            *mode = FlatfishMode::Biting;
                        }
                    }
                    FlatfishMode::Biting => {}
                }
            }
            EntityKind::SeaUrchin | EntityKind::IceFloe => {
                self.pos.x -= speed;
            }
            EntityKind::Octopus { move_timer, sleeping } => {
                self.pos.x -= speed;
                *move_timer += 0.1;
                if ctx.is_deep() {
                    *sleeping = true;
                    let rest = ctx.ground_y(self.pos.x) - 25.0;
                    if self.pos.y < rest {
                        self.pos.y += 0.5;
                    } else {
                        self.pos.y = rest;
                    }
                    self.pos.y += (*move_timer * 0.5).sin();
                } else {
                    *sleeping = false;
                    self.pos.y += move_timer.sin() * 4.0 + (*move_timer * 3.0).sin() * 2.0;
                }
            }
            EntityKind::Porcupinefish { timer, exploded, scale } => {
                self.pos.x -= speed;
                *timer += 1;
                if !*exploded && *timer > 90 && *timer <= 120 {
                    *scale = 1.0 + ((*timer - 90) as f32 * 0.8).sin() * 0.1;
                }
                if !*exploded && *timer > 120 && self.pos.x < ctx.width - 50.0 {
                    for i in 0..8 {
                        let dir = crate::heading(TAU / 8.0 * i as f32);
                        spawned.push(Entity::projectile(Archetype::Needle, self.pos, dir * 4.0));
                    }
                    *exploded = true;
                    *scale = 0.9;
                }
            }
            EntityKind::Needle { vel } => {
                self.pos += *vel;
                self.pos.x -= speed;
            }
            EntityKind::Crab { walk_timer } => {
                self.pos.x -= speed + 0.5;
                *walk_timer += 0.2;
                self.pos.y = ctx.ground_y(self.pos.x) - 15.0;
            }
            EntityKind::SeaAnemone { timer, .. } => {
                self.pos.x -= speed;
                *timer += 0.05;
            }
            EntityKind::Starfish { .. } => {
                self.pos.x -= speed;
            }
            EntityKind::Whirlpool { angle } => {
                self.pos.x -= speed;
                *angle += 0.2;
            }
            EntityKind::Whale {
                phase,
                attack_timer,
                sucking,
                suck_timer,
            } => {
                self.pos.x -= speed * 0.8;
                *phase += 0.02;
                self.pos.y += phase.sin() * 0.5;
                *attack_timer += 1;
                if *attack_timer > 300 && *attack_timer < 500 {
                    *sucking = true;
                    *suck_timer += 1;
                } else {
                    *sucking = false;
                    *suck_timer = 0;
                }
                if *attack_timer > 600 {
                    *attack_timer = 0;
                    if rng.random::<f32>() < 0.7 {
                        let origin = self.pos + Vec2::new(-80.0, -50.0);
                        spawned.push(Entity::new(Archetype::WaterSpout, origin, rng, ctx));
                        for i in 0..6 {
                            // Leave one gap in the spray
                            if i == 3 {
                                continue;
                            }
                            let vel = Vec2::new((rng.random::<f32>() - 0.8) * 10.0, -rng.random::<f32>() * 15.0 - 5.0);
                            spawned.push(Entity::projectile(Archetype::WaterDrop, origin, vel));
                        }
                    }
                }
            }
            EntityKind::Architeuthis { phase, attack_timer } => {
                self.pos.x -= speed * 0.6;
                *phase += 0.02;
                self.pos.y += phase.sin() * 0.5;
                *attack_timer += 1;
                if *attack_timer > 180 {
                    *attack_timer = 0;
                    let root = self.pos + Vec2::new(-60.0, 0.0);
                    spawned.push(Entity::new(Archetype::GiantTentacle, root, rng, ctx));
                }
            }
            EntityKind::GiantTentacle { angle, length, life } => {
                self.pos.x -= speed;
                if *life > 60 {
                    *length += (400.0 - *length) * 0.1;
                    let to_player = ctx.player_pos - self.pos;
                    let target = to_player.y.atan2(to_player.x);
                    let diff = normalize_angle(target - *angle);
                    *angle += diff * 0.05;
                } else {
                    *length *= 0.85;
                }
                *life = life.saturating_sub(1);
                if *life == 0 {
                    self.marked_for_deletion = true;
                }
            }
            EntityKind::WaterSpout { life, height } => {
                self.pos.x -= speed * 0.8;
                *life = life.saturating_sub(1);
                if *life > 40 {
                    *height += 20.0;
                } else if *life < 20 {
                    *height -= 20.0;
                }
                if *life == 0 {
                    // Parked below the screen so the off-screen sweep collects it
                    self.pos.y = 9999.0;
                }
            }
            EntityKind::WaterDrop { vel } => {
                self.pos += *vel;
                vel.y += 0.5;
                self.pos.x -= speed;
            }
            EntityKind::Trash { angle, .. } => {
                self.pos.x -= speed;
                *angle += 0.05;
            }
            EntityKind::MorayEel { timer } => {
                self.pos.x -= speed + 2.0;
                *timer += 0.1;
                self.pos.y += timer.sin() * 2.0;
            }
            EntityKind::Penguin { vy, timer } => {
                self.pos.x -= speed + 3.0;
                self.pos.y += *vy;
                if self.pos.y > 300.0 || self.pos.y < 50.0 {
                    *vy = -*vy;
                }
                *timer += 0.2;
            }
            EntityKind::Seal { timer } => {
                self.pos.x -= speed + 1.0;
                *timer += 0.05;
            }
            EntityKind::Walrus { timer } => {
                self.pos.x -= speed + 0.5;
                *timer += 0.05;
            }
            EntityKind::Meteor { angle } => {
                self.pos.x -= speed + 4.0;
                *angle += 0.1;
            }
            EntityKind::SpaceDebris { angle, .. } => {
                self.pos.x -= speed + 2.0;
                *angle += 0.2;
            }
            EntityKind::Planet => {
                self.pos.x -= speed * 0.5;
            }
        }
    }

    /// Whether the entity has left the playfield for good
    pub fn is_off_screen(&self, _width: f32, height: f32) -> bool {
        match self.kind {
            EntityKind::Whale { .. } | EntityKind::Architeuthis { .. } => self.pos.x < -500.0,
            _ => self.pos.x < -100.0 || self.pos.y > height + 100.0,
        }
    }

    /// Collision test against the player body
    pub fn check_collision(&self, body: &PhysicsBody) -> bool {
        match &self.kind {
            EntityKind::Net { .. } => {
                let judged = self.pos + Vec2::new(0.0, NET_JUDGED_OFFSET);
                circles_overlap(judged, NET_JUDGED_RADIUS, body.pos, body.radius)
            }
            EntityKind::Flatfish { mode, .. } => {
                *mode == FlatfishMode::Biting
                    && circles_overlap(
                        self.pos - Vec2::new(0.0, FLATFISH_BITE_LIFT),
                        self.radius,
                        body.pos,
                        body.radius,
                    )
            }
            EntityKind::GiantTentacle { angle, length, .. } => {
                let tip = self.pos + crate::heading(*angle) * *length;
                tip.distance(body.pos) < TENTACLE_TIP_REACH + body.radius
            }
            EntityKind::WaterSpout { height, .. } => {
                body.pos.x > self.pos.x - SPOUT_HALF_WIDTH
                    && body.pos.x < self.pos.x + SPOUT_HALF_WIDTH
                    && body.pos.y > self.pos.y - *height
                    && body.pos.y < self.pos.y
            }
            _ => circles_overlap(self.pos, self.radius, body.pos, body.radius),
        }
    }

    /// Classify a confirmed collision
    pub fn contact(&self) -> Contact {
        let cause = match &self.kind {
            EntityKind::Net { .. } => return Contact::Capture,
            EntityKind::Flatfish { .. } => return Contact::Bite,
            EntityKind::Fish { .. } => DeathCause::Fish,
            EntityKind::Sardine { .. } => DeathCause::SardineSchool,
            EntityKind::Tuna => DeathCause::Tuna,
            EntityKind::Hook { .. } => DeathCause::Hook,
            EntityKind::Anglerfish { .. } => DeathCause::Anglerfish,
            EntityKind::Shark => DeathCause::Shark,
            EntityKind::Squid { .. } => DeathCause::Squid,
            EntityKind::Octopus { .. } => DeathCause::Octopus,
            EntityKind::Jellyfish { .. } => DeathCause::Jellyfish,
            EntityKind::Porcupinefish { .. } | EntityKind::Needle { .. } => DeathCause::Needles,
            EntityKind::Whirlpool { .. } => DeathCause::Whirlpool,
            EntityKind::Whale { sucking, .. } => {
                if *sucking {
                    DeathCause::WhaleSuction
                } else {
                    DeathCause::WhaleCollision
                }
            }
            EntityKind::WaterSpout { .. } | EntityKind::WaterDrop { .. } => DeathCause::WhaleSpout,
            EntityKind::Architeuthis { .. } | EntityKind::GiantTentacle { .. } => DeathCause::GiantSquid,
            EntityKind::SeaUrchin => DeathCause::SeaUrchin,
            EntityKind::Crab { .. } => DeathCause::Crab,
            EntityKind::SeaAnemone { .. } => DeathCause::SeaAnemone,
            EntityKind::Starfish { .. } => DeathCause::Starfish,
            EntityKind::ElectricEel { .. } => DeathCause::ElectricEel,
            EntityKind::Trash { .. } => DeathCause::Trash,
            EntityKind::MorayEel { .. } => DeathCause::MorayEel,
            EntityKind::Penguin { .. } => DeathCause::Penguin,
            EntityKind::Seal { .. } | EntityKind::Walrus { .. } => DeathCause::SeaMammal,
            EntityKind::Meteor { .. } | EntityKind::SpaceDebris { .. } => DeathCause::SpaceJunk,
            EntityKind::Planet => DeathCause::Planet,
            EntityKind::IceFloe => DeathCause::Enemy,
        };
        Contact::Hit(cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::f32::consts::PI;

    fn ctx(player: Vec2, score: f64) -> WorldContext<'static> {
        WorldContext {
            scroll_speed: 3.0,
            width: 1000.0,
            height: 600.0,
            score,
            player_pos: player,
            seabed: Seabed {
                height: 600.0,
                scroll_offset: 0.0,
                terrain: &[],
            },
        }
    }

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    fn body_at(pos: Vec2, radius: f32) -> PhysicsBody {
        let mut b = PhysicsBody::new(pos);
        b.radius = radius;
        b
    }

    #[test]
    fn test_all_archetypes_construct_and_update() {
        let mut r = rng();
        let c = ctx(Vec2::new(300.0, 300.0), 0.0);
        for archetype in Archetype::ALL {
            let mut e = Entity::new(archetype, Vec2::new(800.0, 300.0), &mut r, &c);
            assert_eq!(e.archetype(), archetype);
            assert_eq!(e.radius, archetype.base_radius());
            let mut spawned = Vec::new();
            for _ in 0..10 {
                e.update(&c, &mut r, &mut spawned);
            }
            assert!(e.pos.x.is_finite() && e.pos.y.is_finite(), "{archetype:?}");
        }
    }

    #[test]
    fn test_default_scroll_moves_left() {
        let mut r = rng();
        let c = ctx(Vec2::new(300.0, 300.0), 0.0);
        let mut e = Entity::new(Archetype::SeaUrchin, Vec2::new(500.0, 500.0), &mut r, &c);
        e.update(&c, &mut r, &mut Vec::new());
        assert_eq!(e.pos, Vec2::new(497.0, 500.0));
    }

    #[test]
    fn test_default_off_screen() {
        let mut r = rng();
        let c = ctx(Vec2::ZERO, 0.0);
        let mut e = Entity::new(Archetype::Fish, Vec2::new(-99.0, 300.0), &mut r, &c);
        assert!(!e.is_off_screen(1000.0, 600.0));
        e.pos.x = -101.0;
        assert!(e.is_off_screen(1000.0, 600.0));
        e.pos = Vec2::new(100.0, 701.0);
        assert!(e.is_off_screen(1000.0, 600.0));

        let mut whale = Entity::new(Archetype::Whale, Vec2::new(-400.0, 300.0), &mut r, &c);
        assert!(!whale.is_off_screen(1000.0, 600.0));
        whale.pos.x = -501.0;
        assert!(whale.is_off_screen(1000.0, 600.0));
    }

    #[test]
    fn test_net_uses_judged_circle() {
        let mut r = rng();
        let c = ctx(Vec2::ZERO, 0.0);
        let net = Entity::new(Archetype::Net, Vec2::new(500.0, 300.0), &mut r, &c);
        // Inside the drawn radius (80) but outside the judged one (50 + 10)
        assert!(!net.check_collision(&body_at(Vec2::new(570.0, 310.0), 10.0)));
        assert!(net.check_collision(&body_at(Vec2::new(555.0, 310.0), 10.0)));
        assert_eq!(net.contact(), Contact::Capture);
    }

    #[test]
    fn test_flatfish_only_bites_after_reveal() {
        let mut r = rng();
        let player = Vec2::new(500.0, 540.0);
        let c = ctx(player, 0.0);
        let mut fish = Entity::new(Archetype::Flatfish, Vec2::new(503.0, 560.0), &mut r, &c);
        let body = body_at(Vec2::new(500.0, 530.0), 20.0);
        assert!(!fish.check_collision(&body));
        let mut spawned = Vec::new();
        fish.update(&c, &mut r, &mut spawned);
        assert!(matches!(fish.kind, EntityKind::Flatfish { mode: FlatfishMode::Revealing, .. }));
        for _ in 0..20 {
            fish.update(&c, &mut r, &mut spawned);
        }
        assert!(matches!(fish.kind, EntityKind::Flatfish { mode: FlatfishMode::Biting, .. }));
        let judged = fish.pos - Vec2::new(0.0, FLATFISH_BITE_LIFT);
        assert!(fish.check_collision(&body_at(judged, 5.0)));
        assert_eq!(fish.contact(), Contact::Bite);
    }

    #[test]
    fn test_water_spout_rect() {
        let spout = Entity {
            id: 1,
            pos: Vec2::new(400.0, 300.0),
            radius: 30.0,
            marked_for_deletion: false,
            kind: EntityKind::WaterSpout { life: 50, height: 100.0 },
        };
        assert!(spout.check_collision(&body_at(Vec2::new(420.0, 250.0), 1.0)));
        assert!(!spout.check_collision(&body_at(Vec2::new(431.0, 250.0), 1.0)));
        assert!(!spout.check_collision(&body_at(Vec2::new(400.0, 301.0), 1.0)));
        assert!(!spout.check_collision(&body_at(Vec2::new(400.0, 199.0), 1.0)));
        assert_eq!(spout.contact(), Contact::Hit(DeathCause::WhaleSpout));
    }

    #[test]
    fn test_tentacle_threatens_only_near_tip() {
        let tentacle = Entity {
            id: 1,
            pos: Vec2::new(500.0, 300.0),
            radius: 15.0,
            marked_for_deletion: false,
            kind: EntityKind::GiantTentacle {
                angle: PI,
                length: 200.0,
                life: 100,
            },
        };
        assert!(tentacle.check_collision(&body_at(Vec2::new(310.0, 300.0), 10.0)));
        // On the shaft, far from the tip
        assert!(!tentacle.check_collision(&body_at(Vec2::new(450.0, 300.0), 10.0)));
    }

    #[test]
    fn test_tentacle_expires() {
        let mut r = rng();
        let c = ctx(Vec2::new(100.0, 300.0), 0.0);
        let mut t = Entity::new(Archetype::GiantTentacle, Vec2::new(600.0, 300.0), &mut r, &c);
        let mut spawned = Vec::new();
        for _ in 0..119 {
            t.update(&c, &mut r, &mut spawned);
        }
        assert!(!t.marked_for_deletion);
        t.update(&c, &mut r, &mut spawned);
        assert!(t.marked_for_deletion);
    }

    #[test]
    fn test_porcupinefish_bursts_into_needles() {
        let mut r = rng();
        let c = ctx(Vec2::ZERO, 0.0);
        let mut p = Entity::new(Archetype::Porcupinefish, Vec2::new(900.0, 300.0), &mut r, &c);
        let mut spawned = Vec::new();
        for _ in 0..121 {
            p.update(&c, &mut r, &mut spawned);
        }
        assert_eq!(spawned.len(), 8);
        assert!(spawned.iter().all(|n| n.archetype() == Archetype::Needle));
        p.update(&c, &mut r, &mut spawned);
        assert_eq!(spawned.len(), 8);
    }

    #[test]
    fn test_architeuthis_emits_tentacles() {
        let mut r = rng();
        let c = ctx(Vec2::new(200.0, 300.0), 2500.0);
        let mut boss = Entity::new(Archetype::Architeuthis, Vec2::new(2000.0, 300.0), &mut r, &c);
        let mut spawned = Vec::new();
        for _ in 0..181 {
            boss.update(&c, &mut r, &mut spawned);
        }
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].archetype(), Archetype::GiantTentacle);
    }

    #[test]
    fn test_whale_suck_window() {
        let mut r = rng();
        let c = ctx(Vec2::new(200.0, 300.0), 0.0);
        let mut whale = Entity::new(Archetype::Whale, Vec2::new(5000.0, 300.0), &mut r, &c);
        let mut spawned = Vec::new();
        for _ in 0..300 {
            whale.update(&c, &mut r, &mut spawned);
        }
        assert!(whale.suction_mouth().is_none());
        whale.update(&c, &mut r, &mut spawned);
        assert!(whale.suction_mouth().is_some());
        assert_eq!(whale.contact(), Contact::Hit(DeathCause::WhaleSuction));
        for _ in 0..199 {
            whale.update(&c, &mut r, &mut spawned);
        }
        assert!(whale.suction_mouth().is_none());
    }

    #[test]
    fn test_sleepers_settle_when_deep() {
        let mut r = rng();
        let c = ctx(Vec2::ZERO, 1500.0);
        let mut squid = Entity::new(Archetype::Squid, Vec2::new(800.0, 100.0), &mut r, &c);
        squid.update(&c, &mut r, &mut Vec::new());
        assert!(matches!(squid.kind, EntityKind::Squid { sleeping: true, .. }));
        let mut octopus = Entity::new(Archetype::Octopus, Vec2::new(800.0, 100.0), &mut r, &c);
        octopus.update(&c, &mut r, &mut Vec::new());
        assert!(matches!(octopus.kind, EntityKind::Octopus { sleeping: true, .. }));
    }

    #[test]
    fn test_squid_dash_decays() {
        let mut r = rng();
        let c = ctx(Vec2::new(100.0, 300.0), 0.0);
        let mut squid = Entity::new(Archetype::Squid, Vec2::new(800.0, 300.0), &mut r, &c);
        if let EntityKind::Squid { lunge_timer, .. } = &mut squid.kind {
            *lunge_timer = SQUID_DASH_TICKS - 1;
        }
        squid.update(&c, &mut r, &mut Vec::new());
        let EntityKind::Squid { vel, .. } = squid.kind else {
            panic!("not a squid");
        };
        assert!((vel.x - SQUID_DASH_SPEED * 0.95).abs() < 1e-5);
        squid.update(&c, &mut r, &mut Vec::new());
        let EntityKind::Squid { vel: later, .. } = squid.kind else {
            panic!("not a squid");
        };
        assert!(later.x < vel.x);
    }

    #[test]
    fn test_only_three_bosses() {
        let bosses: Vec<_> = Archetype::ALL.iter().filter(|a| a.is_boss()).collect();
        assert_eq!(bosses.len(), 3);
    }

    #[test]
    fn test_cause_text() {
        assert_eq!(DeathCause::Shark.to_string(), "Bitten by a shark");
        assert_eq!(DeathCause::SweptAway.to_string(), "Swallowed by the waves");
    }
}
