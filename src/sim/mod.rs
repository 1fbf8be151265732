//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod entity;
pub mod item;
pub mod progress;
pub mod registry;
pub mod replay;
pub mod scenery;
pub mod scheduler;
pub mod spawn;
pub mod state;
pub mod terrain;
pub mod tick;

pub use body::{JumpKind, PhysicsBody, Pose};
pub use collision::{Seabed, TerrainContact, resolve_terrain};
pub use entity::{Archetype, Contact, DeathCause, Entity, EntityKind, WorldContext};
pub use item::{Item, ItemKind, Reward};
pub use progress::{Achievement, RunStats, rank_for};
pub use registry::EntityRegistry;
pub use replay::{Look, ObjectSnapshot, PlayerSnapshot, ReplayBuffer, Snapshot};
pub use scheduler::{ScheduledAction, ScheduledEvent, Scheduler};
pub use state::{DeathReason, GameEvent, GameState, KelpForest, RapidCurrent, RunState, StateTag, Zone};
pub use terrain::TerrainSegment;
pub use tick::{StartRequest, TickInput, tick};
