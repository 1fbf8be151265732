//! Collectibles

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::PhysicsBody;
use super::collision::circles_overlap;
use super::entity::WorldContext;

/// Generous pickup radius for a stray friend
pub const FRIEND_PICKUP_RADIUS: f32 = 50.0;
/// Garden eels are judged at the head
pub const GARDEN_EEL_HEAD: f32 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Bounces along the seabed
    Pearl { vel: Vec2 },
    /// Rests on the seabed
    TreasureChest,
    Plankton { vel: Vec2, phase: f32 },
    /// Lost companion; grants a life
    FriendShrimp { vel: Vec2, phase: f32 },
    Clownfish { phase: f32 },
    GardenEel,
}

/// What collecting an item grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reward {
    Score(u32),
    /// Extra life, or this many points when lives are full
    LifeOrScore(u32),
    /// Score plus the treasure counter
    Treasure(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub pos: Vec2,
    pub radius: f32,
    pub kind: ItemKind,
}

impl Item {
    pub fn pearl(pos: Vec2) -> Self {
        Self {
            pos,
            radius: 15.0,
            kind: ItemKind::Pearl { vel: Vec2::ZERO },
        }
    }

    pub fn treasure_chest(pos: Vec2) -> Self {
        Self {
            pos,
            radius: 20.0,
            kind: ItemKind::TreasureChest,
        }
    }

    pub fn plankton(pos: Vec2, rng: &mut Pcg32) -> Self {
        Self {
            pos,
            radius: 8.0,
            kind: ItemKind::Plankton {
                vel: Vec2::ZERO,
                phase: rng.random::<f32>() * std::f32::consts::TAU,
            },
        }
    }

    pub fn friend_shrimp(pos: Vec2, rng: &mut Pcg32) -> Self {
        Self {
            pos,
            radius: 14.0,
            kind: ItemKind::FriendShrimp {
                vel: Vec2::ZERO,
                phase: rng.random::<f32>() * std::f32::consts::TAU,
            },
        }
    }

    pub fn clownfish(pos: Vec2) -> Self {
        Self {
            pos,
            radius: 12.0,
            kind: ItemKind::Clownfish { phase: 0.0 },
        }
    }

    pub fn garden_eel(pos: Vec2) -> Self {
        Self {
            pos,
            radius: 10.0,
            kind: ItemKind::GardenEel,
        }
    }

    pub fn reward(&self) -> Reward {
        match self.kind {
            ItemKind::Pearl { .. } => Reward::Score(50),
            ItemKind::TreasureChest => Reward::Treasure(500),
            ItemKind::Plankton { .. } => Reward::Score(10),
            ItemKind::FriendShrimp { .. } => Reward::LifeOrScore(100),
            ItemKind::Clownfish { .. } => Reward::Score(50),
            ItemKind::GardenEel => Reward::Score(30),
        }
    }

    pub fn update(&mut self, ctx: &WorldContext) {
        let speed = ctx.scroll_speed;
        self.pos.x -= speed;
        match &mut self.kind {
            ItemKind::Pearl { vel } => {
                self.pos += *vel;
                *vel *= 0.95;
                let floor = ctx.ground_y(self.pos.x) - self.radius;
                if self.pos.y < floor {
                    vel.y += 0.2;
                } else if self.pos.y > floor {
                    self.pos.y = floor;
                    vel.y = -vel.y * 0.6;
                    if vel.y.abs() < 1.0 {
                        vel.y = 0.0;
                    }
                }
            }
            ItemKind::TreasureChest => {
                self.pos.y = ctx.ground_y(self.pos.x) - 20.0;
            }
            ItemKind::Plankton { vel, phase } | ItemKind::FriendShrimp { vel, phase } => {
                self.pos += *vel;
                *vel *= 0.95;
                *phase += 0.1;
                self.pos.y += phase.sin() * 0.5;
            }
            ItemKind::Clownfish { phase } => {
                *phase += 0.1;
                self.pos.y += phase.sin() * 0.5;
            }
            ItemKind::GardenEel => {}
        }
    }

    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.pos.x < -50.0
    }

    pub fn check_collision(&self, body: &PhysicsBody) -> bool {
        match self.kind {
            ItemKind::FriendShrimp { .. } => circles_overlap(self.pos, FRIEND_PICKUP_RADIUS, body.pos, body.radius),
            ItemKind::GardenEel => circles_overlap(
                self.pos - Vec2::new(0.0, GARDEN_EEL_HEAD),
                self.radius,
                body.pos,
                body.radius,
            ),
            _ => circles_overlap(self.pos, self.radius, body.pos, body.radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Seabed;
    use rand::SeedableRng;

    fn ctx() -> WorldContext<'static> {
        WorldContext {
            scroll_speed: 3.0,
            width: 1000.0,
            height: 600.0,
            score: 0.0,
            player_pos: Vec2::ZERO,
            seabed: Seabed {
                height: 600.0,
                scroll_offset: 0.0,
                terrain: &[],
            },
        }
    }

    #[test]
    fn test_rewards() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(Item::pearl(Vec2::ZERO).reward(), Reward::Score(50));
        assert_eq!(Item::treasure_chest(Vec2::ZERO).reward(), Reward::Treasure(500));
        assert_eq!(Item::plankton(Vec2::ZERO, &mut rng).reward(), Reward::Score(10));
        assert_eq!(Item::friend_shrimp(Vec2::ZERO, &mut rng).reward(), Reward::LifeOrScore(100));
        assert_eq!(Item::clownfish(Vec2::ZERO).reward(), Reward::Score(50));
        assert_eq!(Item::garden_eel(Vec2::ZERO).reward(), Reward::Score(30));
    }

    #[test]
    fn test_pearl_settles_on_floor() {
        let c = ctx();
        let mut pearl = Item::pearl(Vec2::new(800.0, 100.0));
        for _ in 0..400 {
            pearl.update(&c);
        }
        let floor = c.ground_y(pearl.pos.x) - pearl.radius;
        assert!(pearl.pos.y <= floor + 1e-3);
        assert!(pearl.pos.y > floor - 30.0);
    }

    #[test]
    fn test_friend_has_wide_pickup() {
        let mut rng = Pcg32::seed_from_u64(0);
        let friend = Item::friend_shrimp(Vec2::new(100.0, 100.0), &mut rng);
        let mut body = PhysicsBody::new(Vec2::new(160.0, 100.0));
        body.radius = 15.0;
        assert!(friend.check_collision(&body));
        let plankton = Item::plankton(Vec2::new(100.0, 100.0), &mut rng);
        assert!(!plankton.check_collision(&body));
    }

    #[test]
    fn test_garden_eel_judged_at_head() {
        let eel = Item::garden_eel(Vec2::new(100.0, 500.0));
        let mut body = PhysicsBody::new(Vec2::new(100.0, 470.0));
        body.radius = 10.0;
        assert!(eel.check_collision(&body));
        body.pos.y = 515.0;
        assert!(!eel.check_collision(&body));
    }

    #[test]
    fn test_off_screen() {
        let mut chest = Item::treasure_chest(Vec2::new(-49.0, 0.0));
        assert!(!chest.is_off_screen());
        chest.pos.x = -51.0;
        assert!(chest.is_off_screen());
    }
}
