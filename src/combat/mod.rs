//! # Combat Module
//!
//! The dice-driven turn-based combat mode.
//!
//! Three pieces cooperate inside one frame-stepped loop: two
//! [`AnimatedActor`] state machines (player and enemy), a physics-lite
//! [`DiceRoller`], and the [`CombatResolver`] that sequences turns,
//! applies damage, and detects terminal conditions. Within one tick the
//! caller must advance animations before resolution so a just-finished
//! death animation is observed in the same tick it completes; the
//! resolver's `update` preserves that order internally.

pub mod actor;
pub mod dice;
pub mod resolver;

pub use actor::{ActorState, AnimatedActor, AttackOutcome, CombatEnemy, CombatPlayer, FrameSet};
pub use dice::{DiceFrame, DicePhase, DiceRoller};
pub use resolver::{CombatOutcome, CombatPhase, CombatResolver};

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A named enemy configuration bundle: stats plus animation frame set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyArchetype {
    Slime,
    Skeleton,
    Zombie,
    /// Final-floor enemy; takes half damage from every hit
    Boss,
}

impl EnemyArchetype {
    /// Maximum health for this archetype.
    pub fn max_health(self) -> i32 {
        match self {
            EnemyArchetype::Slime => 30,
            EnemyArchetype::Skeleton => 45,
            EnemyArchetype::Zombie => 60,
            EnemyArchetype::Boss => 80,
        }
    }

    /// Inclusive base-damage range rolled once at combat entry.
    pub fn damage_range(self) -> (i32, i32) {
        match self {
            EnemyArchetype::Slime => (3, 7),
            EnemyArchetype::Skeleton => (10, 14),
            EnemyArchetype::Zombie => (7, 12),
            EnemyArchetype::Boss => (12, 16),
        }
    }

    /// Inclusive gold-reward range rolled once at combat entry.
    pub fn reward_range(self) -> (u32, u32) {
        match self {
            EnemyArchetype::Slime => (10, 15),
            EnemyArchetype::Skeleton => (15, 20),
            EnemyArchetype::Zombie => (20, 25),
            EnemyArchetype::Boss => (20, 25),
        }
    }

    /// Minimum delay between this enemy's actions, in milliseconds.
    ///
    /// Heavier archetypes counter-attack more slowly, pacing difficulty
    /// and keeping the two attack animations from overlapping.
    pub fn attack_cooldown_ms(self) -> u64 {
        match self {
            EnemyArchetype::Slime => 1500,
            EnemyArchetype::Skeleton => 2000,
            EnemyArchetype::Zombie => 2500,
            EnemyArchetype::Boss => 3000,
        }
    }

    /// Whether incoming damage is halved (rounded down).
    pub fn halves_damage(self) -> bool {
        matches!(self, EnemyArchetype::Boss)
    }

    /// Per-state animation frame counts, matching this archetype's art.
    pub fn frame_set(self) -> FrameSet {
        match self {
            EnemyArchetype::Slime => FrameSet::new(2, 4, 3, 4),
            EnemyArchetype::Skeleton | EnemyArchetype::Boss => FrameSet::new(4, 13, 3, 13),
            EnemyArchetype::Zombie => FrameSet::new(8, 7, 4, 8),
        }
    }

    /// Frames in the looping overworld animation, for exploration mode.
    pub fn overworld_frames(self) -> usize {
        match self {
            EnemyArchetype::Slime => 2,
            EnemyArchetype::Skeleton => 4,
            EnemyArchetype::Zombie => 4,
            EnemyArchetype::Boss => 1,
        }
    }

    /// Display name, also used in log lines.
    pub fn name(self) -> &'static str {
        match self {
            EnemyArchetype::Slime => "slime",
            EnemyArchetype::Skeleton => "skeleton",
            EnemyArchetype::Zombie => "zombie",
            EnemyArchetype::Boss => "boss",
        }
    }
}

/// Rolls one plain six-sided die. No face bonus applies here.
pub(crate) fn roll_d6(rng: &mut StdRng) -> i32 {
    rng.gen_range(1..=6)
}
