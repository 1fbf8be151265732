//! Ranks and achievements

use serde::{Deserialize, Serialize};

/// Floor time (in half-tick walk units) after which the body counts as strolling
pub const STROLL_THRESHOLD: f32 = 180.0;

/// Title for a depth; a body that has walked the floor for long enough gets
/// the strolling title instead
pub fn rank_for(score: f64, walk_timer: f32) -> &'static str {
    if walk_timer > STROLL_THRESHOLD {
        return "Strolling Shrimp";
    }
    match score {
        s if s < 100.0 => "Lost Shrimp",
        s if s < 300.0 => "Rookie Shrimp",
        s if s < 500.0 => "Adventurer",
        s if s < 1000.0 => "Deep-Sea Traveler",
        s if s < 2000.0 => "Abyss Gazer",
        s if s < 3000.0 => "Lord of the Deep",
        s if s < 5000.0 => "Legendary Shrimp",
        _ => "Ruler of the Deep",
    }
}

/// What an achievement condition looks at
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    pub score: f64,
    pub damage_taken: bool,
    /// A boss is alive and already behind the body
    pub boss_passed: bool,
    pub chests_collected: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Achievement {
    Reach500,
    Reach1000,
    Reach2000,
    NoDamage1000,
    SurviveBoss,
    Collector,
}

impl Achievement {
    pub const ALL: [Achievement; 6] = [
        Achievement::Reach500,
        Achievement::Reach1000,
        Achievement::Reach2000,
        Achievement::NoDamage1000,
        Achievement::SurviveBoss,
        Achievement::Collector,
    ];

    /// Stable id used by the records store
    pub fn as_str(&self) -> &'static str {
        match self {
            Achievement::Reach500 => "reach_500",
            Achievement::Reach1000 => "reach_1000",
            Achievement::Reach2000 => "reach_2000",
            Achievement::NoDamage1000 => "no_damage_1000",
            Achievement::SurviveBoss => "survive_boss",
            Achievement::Collector => "collector",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Achievement::Reach500 => "The Adventure Begins",
            Achievement::Reach1000 => "Into the Deep",
            Achievement::Reach2000 => "Witness of the Abyss",
            Achievement::NoDamage1000 => "Graceful Evasion",
            Achievement::SurviveBoss => "Giant Encounter",
            Achievement::Collector => "Treasure Hunter",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::Reach500 => "Reach 500m",
            Achievement::Reach1000 => "Reach 1000m",
            Achievement::Reach2000 => "Reach 2000m",
            Achievement::NoDamage1000 => "Reach 1000m without taking damage",
            Achievement::SurviveBoss => "Get past a boss",
            Achievement::Collector => "Collect a treasure chest",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Achievement::Reach500 => "🚩",
            Achievement::Reach1000 => "🌊",
            Achievement::Reach2000 => "👁",
            Achievement::NoDamage1000 => "✨",
            Achievement::SurviveBoss => "🐋",
            Achievement::Collector => "💎",
        }
    }

    pub fn is_met(&self, stats: &RunStats) -> bool {
        match self {
            Achievement::Reach500 => stats.score >= 500.0,
            Achievement::Reach1000 => stats.score >= 1000.0,
            Achievement::Reach2000 => stats.score >= 2000.0,
            Achievement::NoDamage1000 => stats.score >= 1000.0 && !stats.damage_taken,
            Achievement::SurviveBoss => stats.boss_passed,
            Achievement::Collector => stats.chests_collected >= 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_bands() {
        assert_eq!(rank_for(0.0, 0.0), "Lost Shrimp");
        assert_eq!(rank_for(99.9, 0.0), "Lost Shrimp");
        assert_eq!(rank_for(100.0, 0.0), "Rookie Shrimp");
        assert_eq!(rank_for(1999.0, 0.0), "Abyss Gazer");
        assert_eq!(rank_for(4999.0, 0.0), "Legendary Shrimp");
        assert_eq!(rank_for(12000.0, 0.0), "Ruler of the Deep");
    }

    #[test]
    fn test_strolling_overrides_depth() {
        assert_eq!(rank_for(4000.0, 181.0), "Strolling Shrimp");
        assert_eq!(rank_for(4000.0, 180.0), "Legendary Shrimp");
    }

    #[test]
    fn test_achievement_ids_round_trip() {
        for a in Achievement::ALL {
            assert_eq!(Achievement::from_str(a.as_str()), Some(a));
        }
        assert_eq!(Achievement::from_str("reach_9000"), None);
    }

    #[test]
    fn test_no_damage_condition() {
        let mut stats = RunStats {
            score: 1000.0,
            ..RunStats::default()
        };
        assert!(Achievement::NoDamage1000.is_met(&stats));
        stats.damage_taken = true;
        assert!(!Achievement::NoDamage1000.is_met(&stats));
        assert!(Achievement::Reach1000.is_met(&stats));
        assert!(!Achievement::Collector.is_met(&stats));
    }
}
