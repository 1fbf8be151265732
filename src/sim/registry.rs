//! Ordered collection of live hazards
//!
//! Owns id assignment, the per-tick update sweep (including entities emitted
//! by other entities), whale suction and current drift, culling, and the
//! collision pass against the player body.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::entity::{
    Archetype, Contact, Entity, WHALE_SUCK_FORCE, WHALE_SUCK_RANGE, WorldContext,
};
use crate::is_finite_vec;

/// Distance from the mouth inside which dragged entities are swallowed
const SWALLOW_BOX: f32 = 50.0;
/// Fraction of the gap to the mouth closed per tick by dragged entities
const DRAG_RATE: f32 = 0.05;
/// Horizontal drift applied to entities inside the rapid-current band
pub const CURRENT_DRIFT: f32 = 5.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    next_id: u32,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert an entity, assigning it a fresh id
    pub fn push(&mut self, mut entity: Entity) -> u32 {
        if self.next_id == 0 {
            self.next_id = 1;
        }
        entity.id = self.next_id;
        self.next_id += 1;
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Whether any boss is alive
    pub fn boss_alive(&self) -> bool {
        self.entities.iter().any(|e| e.is_boss())
    }

    pub fn contains(&self, archetype: Archetype) -> bool {
        self.entities.iter().any(|e| e.archetype() == archetype)
    }

    pub fn count(&self, archetype: Archetype) -> usize {
        self.entities.iter().filter(|e| e.archetype() == archetype).count()
    }

    /// Update every live entity, then admit whatever they emitted
    pub fn update_all(&mut self, ctx: &WorldContext, rng: &mut Pcg32) {
        let mut spawned = Vec::new();
        for entity in &mut self.entities {
            entity.update(ctx, rng, &mut spawned);
        }
        for entity in spawned {
            self.push(entity);
        }
    }

    /// Pull the body (and drag smaller entities) toward every sucking whale's mouth
    ///
    /// Suction only acts while the body is within range; dragged entities that
    /// reach the mouth are swallowed.
    pub fn apply_suction(&mut self, body: &mut PhysicsBody) -> bool {
        let mouths: Vec<(u32, Vec2)> = self
            .entities
            .iter()
            .filter_map(|e| e.suction_mouth().map(|m| (e.id, m)))
            .collect();
        let mut pulled = false;
        for (whale_id, mouth) in mouths {
            let to_mouth = mouth - body.pos;
            let dist = to_mouth.length();
            if dist >= WHALE_SUCK_RANGE || dist <= f32::EPSILON {
                continue;
            }
            let force = (WHALE_SUCK_RANGE - dist) / WHALE_SUCK_RANGE * WHALE_SUCK_FORCE;
            body.vel += to_mouth / dist * force;
            pulled = true;

            for other in self.entities.iter_mut() {
                if other.id == whale_id || other.is_boss() {
                    continue;
                }
                other.pos += (mouth - other.pos) * DRAG_RATE;
                if (other.pos.x - mouth.x).abs() < SWALLOW_BOX && (other.pos.y - mouth.y).abs() < SWALLOW_BOX {
                    other.marked_for_deletion = true;
                }
            }
        }
        pulled
    }

    /// Drift every entity inside the current band leftward
    pub fn apply_current_drift(&mut self, center_y: f32, half_band: f32) {
        for entity in &mut self.entities {
            if (entity.pos.y - center_y).abs() < half_band {
                entity.pos.x -= CURRENT_DRIFT;
            }
        }
    }

    pub fn mark_for_deletion(&mut self, id: u32) {
        if let Some(e) = self.get_mut(id) {
            e.marked_for_deletion = true;
        }
    }

    /// Drop flagged, numerically corrupted and off-screen entities
    pub fn cull(&mut self, width: f32, height: f32) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| {
            if !is_finite_vec(e.pos) {
                log::warn!("Dropping {:?} #{} with non-finite position", e.archetype(), e.id);
                return false;
            }
            !e.marked_for_deletion && !e.is_off_screen(width, height)
        });
        before - self.entities.len()
    }

    /// Contacts with the body, in registry order
    pub fn collisions(&self, body: &PhysicsBody) -> Vec<(u32, Contact)> {
        self.entities
            .iter()
            .filter(|e| !e.marked_for_deletion && e.check_collision(body))
            .map(|e| (e.id, e.contact()))
            .collect()
    }

    /// Mutable access for the spawn director (rock-mounted placement etc)
    pub fn last_mut(&mut self) -> Option<&mut Entity> {
        self.entities.last_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Seabed;
    use crate::sim::entity::{DeathCause, EntityKind};
    use rand::SeedableRng;

    fn ctx() -> WorldContext<'static> {
        WorldContext {
            scroll_speed: 3.0,
            width: 1000.0,
            height: 600.0,
            score: 0.0,
            player_pos: Vec2::new(300.0, 300.0),
            seabed: Seabed {
                height: 600.0,
                scroll_offset: 0.0,
                terrain: &[],
            },
        }
    }

    fn make(archetype: Archetype, pos: Vec2) -> Entity {
        let mut rng = Pcg32::seed_from_u64(1);
        Entity::new(archetype, pos, &mut rng, &ctx())
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut reg = EntityRegistry::new();
        let a = reg.push(make(Archetype::Fish, Vec2::ZERO));
        let b = reg.push(make(Archetype::Fish, Vec2::ZERO));
        assert!(b > a);
        assert_eq!(reg.get(b).map(|e| e.id), Some(b));
    }

    #[test]
    fn test_boss_alive() {
        let mut reg = EntityRegistry::new();
        reg.push(make(Archetype::Shark, Vec2::new(500.0, 300.0)));
        assert!(!reg.boss_alive());
        reg.push(make(Archetype::Planet, Vec2::new(900.0, 300.0)));
        assert!(reg.boss_alive());
    }

    #[test]
    fn test_cull_removes_flagged_nan_and_offscreen() {
        let mut reg = EntityRegistry::new();
        let keep = reg.push(make(Archetype::Fish, Vec2::new(500.0, 300.0)));
        let flagged = reg.push(make(Archetype::Fish, Vec2::new(500.0, 300.0)));
        reg.push(make(Archetype::Fish, Vec2::new(f32::NAN, 300.0)));
        reg.push(make(Archetype::Fish, Vec2::new(-150.0, 300.0)));
        reg.mark_for_deletion(flagged);
        assert_eq!(reg.cull(1000.0, 600.0), 3);
        assert_eq!(reg.len(), 1);
        assert!(reg.get(keep).is_some());
    }

    #[test]
    fn test_emitted_entities_join_registry() {
        let mut reg = EntityRegistry::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut squid = make(Archetype::Architeuthis, Vec2::new(2000.0, 300.0));
        if let EntityKind::Architeuthis { attack_timer, .. } = &mut squid.kind {
            *attack_timer = 180;
        }
        reg.push(squid);
        reg.update_all(&ctx(), &mut rng);
        assert_eq!(reg.count(Archetype::GiantTentacle), 1);
    }

    #[test]
    fn test_suction_pulls_body_and_swallows_small_fry() {
        let mut reg = EntityRegistry::new();
        let mut whale = make(Archetype::Whale, Vec2::new(600.0, 300.0));
        if let EntityKind::Whale { sucking, .. } = &mut whale.kind {
            *sucking = true;
        }
        reg.push(whale);
        let fry = reg.push(make(Archetype::Fish, Vec2::new(610.0, 340.0)));
        let mut body = PhysicsBody::new(Vec2::new(300.0, 330.0));
        assert!(reg.apply_suction(&mut body));
        assert!(body.vel.x > 0.0);
        assert!(reg.get(fry).is_some_and(|e| e.marked_for_deletion));
    }

    #[test]
    fn test_suction_out_of_range_does_nothing() {
        let mut reg = EntityRegistry::new();
        let mut whale = make(Archetype::Whale, Vec2::new(1000.0, 300.0));
        if let EntityKind::Whale { sucking, .. } = &mut whale.kind {
            *sucking = true;
        }
        reg.push(whale);
        let mut body = PhysicsBody::new(Vec2::new(100.0, 330.0));
        assert!(!reg.apply_suction(&mut body));
        assert_eq!(body.vel, Vec2::ZERO);
    }

    #[test]
    fn test_current_drift_only_inside_band() {
        let mut reg = EntityRegistry::new();
        let inside = reg.push(make(Archetype::SeaUrchin, Vec2::new(500.0, 250.0)));
        let outside = reg.push(make(Archetype::SeaUrchin, Vec2::new(500.0, 450.0)));
        reg.apply_current_drift(300.0, 100.0);
        assert_eq!(reg.get(inside).map(|e| e.pos.x), Some(495.0));
        assert_eq!(reg.get(outside).map(|e| e.pos.x), Some(500.0));
    }

    #[test]
    fn test_collisions_classified() {
        let mut reg = EntityRegistry::new();
        reg.push(make(Archetype::Shark, Vec2::new(310.0, 300.0)));
        reg.push(make(Archetype::Net, Vec2::new(320.0, 290.0)));
        let body = PhysicsBody::new(Vec2::new(300.0, 300.0));
        let hits = reg.collisions(&body);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].1, Contact::Hit(DeathCause::Shark));
        assert_eq!(hits[1].1, Contact::Capture);
    }
}
