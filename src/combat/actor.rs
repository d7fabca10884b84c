//! # Animated Actors
//!
//! The per-entity finite state machine shared by the combat player and
//! combat enemies.
//!
//! An actor is always in one of four states. Idle loops forever; Attack
//! and Hurt run one pass and automatically return to Idle; Death is
//! absorbing. A transition requested mid-pass is queued and committed by
//! an explicit step when the active pass reaches its final frame; the
//! commit never re-enters frame advancement within the same update.

use crate::combat::{roll_d6, EnemyArchetype};
use crate::config;
use crate::{TowerError, TowerResult};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Animation state of a combat actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorState {
    /// Looping rest animation; the only state that never finishes
    Idle,
    /// One-shot swing animation
    Attack,
    /// One-shot flinch animation
    Hurt,
    /// Terminal: no transition ever leaves this state
    Death,
}

impl ActorState {
    /// All states, for exhaustive frame-table validation.
    pub const ALL: [ActorState; 4] = [
        ActorState::Idle,
        ActorState::Attack,
        ActorState::Hurt,
        ActorState::Death,
    ];
}

/// Per-state animation frame counts for one piece of actor art.
///
/// The renderer maps `(archetype, state, frame_index)` to a sprite; this
/// crate only tracks how many frames each state has. Every state must
/// have at least one frame: a missing sequence is an archetype
/// configuration error caught when the actor is built, never during
/// animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSet {
    idle: usize,
    attack: usize,
    hurt: usize,
    death: usize,
}

impl FrameSet {
    /// Creates a frame table from per-state counts.
    pub fn new(idle: usize, attack: usize, hurt: usize, death: usize) -> Self {
        Self {
            idle,
            attack,
            hurt,
            death,
        }
    }

    /// Number of frames in the given state's sequence.
    pub fn frames_for(&self, state: ActorState) -> usize {
        match state {
            ActorState::Idle => self.idle,
            ActorState::Attack => self.attack,
            ActorState::Hurt => self.hurt,
            ActorState::Death => self.death,
        }
    }

    fn validate(&self) -> TowerResult<()> {
        for state in ActorState::ALL {
            if self.frames_for(state) == 0 {
                return Err(TowerError::InvalidArchetype(format!(
                    "state {state:?} has no animation frames"
                )));
            }
        }
        Ok(())
    }
}

/// The finite state machine driving one actor's animation.
#[derive(Debug, Clone)]
pub struct AnimatedActor {
    frames: FrameSet,
    state: ActorState,
    frame_index: usize,
    frame_timer: u64,
    frame_delay: u64,
    finished: bool,
    queued: Option<ActorState>,
    attack_interrupts: bool,
}

impl AnimatedActor {
    /// Builds an actor in Idle, failing fast on an empty frame sequence.
    ///
    /// `attack_interrupts` lets an Attack request pre-empt a non-idle
    /// animation mid-pass; the player variant uses it so a queued swing
    /// never feels sluggish.
    pub fn new(frames: FrameSet, frame_delay: u64, attack_interrupts: bool) -> TowerResult<Self> {
        frames.validate()?;
        Ok(Self {
            frames,
            state: ActorState::Idle,
            frame_index: 0,
            frame_timer: 0,
            frame_delay,
            finished: true,
            queued: None,
            attack_interrupts,
        })
    }

    /// Current animation state.
    pub fn state(&self) -> ActorState {
        self.state
    }

    /// Frame to draw for the current state.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Whether the active one-shot pass has reached its final frame.
    /// Idle counts as always finished since it loops.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The transition waiting for the active pass to complete, if any.
    pub fn queued_state(&self) -> Option<ActorState> {
        self.queued
    }

    /// Whether a new action (attack, flinch) may start right now.
    pub fn can_act(&self) -> bool {
        self.state == ActorState::Idle || self.finished
    }

    /// Requests a transition; returns whether it committed immediately.
    ///
    /// Death is absorbing. A commit resets the frame index and timer and
    /// queues Idle behind any one-shot state so the actor returns to
    /// rest on its own. A request that cannot commit is stored and
    /// replayed when the active pass finishes.
    pub fn change_state(&mut self, new_state: ActorState, now: u64) -> bool {
        if self.state == ActorState::Death {
            return false;
        }
        let interrupt = self.attack_interrupts && new_state == ActorState::Attack;
        if self.finished || self.state == ActorState::Idle || interrupt {
            log::debug!("actor: {:?} -> {:?}", self.state, new_state);
            self.commit(new_state, now);
            true
        } else {
            log::debug!("actor: queued {:?} behind {:?}", new_state, self.state);
            self.queued = Some(new_state);
            false
        }
    }

    /// Commits Death regardless of animation progress.
    ///
    /// A lethal hit pre-empts any in-flight Hurt or Attack pass.
    pub fn kill(&mut self, now: u64) {
        if self.state != ActorState::Death {
            log::debug!("actor: {:?} -> Death", self.state);
            self.commit(ActorState::Death, now);
        }
    }

    fn commit(&mut self, new_state: ActorState, now: u64) {
        self.state = new_state;
        self.frame_index = 0;
        self.frame_timer = now;
        self.finished = new_state == ActorState::Idle;
        self.queued = match new_state {
            ActorState::Idle | ActorState::Death => None,
            _ => Some(ActorState::Idle),
        };
    }

    /// Advances the animation by at most one frame.
    ///
    /// When a one-shot pass runs past its last frame the frame index
    /// clamps, the finished latch sets, and the queued transition (if
    /// any) commits as a single explicit step. Returns the state entered
    /// by that step, or `None` when no transition occurred this tick.
    pub fn animate(&mut self, now: u64) -> Option<ActorState> {
        if now.saturating_sub(self.frame_timer) <= self.frame_delay {
            return None;
        }
        self.frame_index += 1;
        self.frame_timer = now;

        let len = self.frames.frames_for(self.state);
        if self.frame_index < len {
            return None;
        }
        if self.state == ActorState::Idle {
            self.frame_index = 0;
            return None;
        }
        self.frame_index = len - 1;
        self.finished = true;

        let next = self.queued.take()?;
        if self.change_state(next, now) {
            Some(next)
        } else {
            None
        }
    }
}

/// The result of an attack that actually fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Total damage applied to the target
    pub damage: i32,
    /// Reward released by a killing blow, at most once per enemy
    pub reward: Option<u32>,
}

/// An enemy participant in combat.
///
/// Base damage and reward are rolled from the archetype's ranges once,
/// at combat entry; the participant is discarded at combat exit.
#[derive(Debug, Clone)]
pub struct CombatEnemy {
    archetype: EnemyArchetype,
    max_health: i32,
    current_health: i32,
    damage: i32,
    reward: u32,
    defeated: bool,
    actor: AnimatedActor,
}

impl CombatEnemy {
    /// Creates a combat enemy from its archetype.
    pub fn new(archetype: EnemyArchetype, rng: &mut StdRng) -> TowerResult<Self> {
        let (dmg_lo, dmg_hi) = archetype.damage_range();
        let (reward_lo, reward_hi) = archetype.reward_range();
        Ok(Self {
            archetype,
            max_health: archetype.max_health(),
            current_health: archetype.max_health(),
            damage: rng.gen_range(dmg_lo..=dmg_hi),
            reward: rng.gen_range(reward_lo..=reward_hi),
            defeated: false,
            actor: AnimatedActor::new(archetype.frame_set(), config::FRAME_DELAY_MS, false)?,
        })
    }

    pub fn archetype(&self) -> EnemyArchetype {
        self.archetype
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn current_health(&self) -> i32 {
        self.current_health
    }

    /// Base damage rolled for this combat.
    pub fn damage(&self) -> i32 {
        self.damage
    }

    /// Health at or below zero counts as defeated even though the raw
    /// value may be negative.
    pub fn is_defeated(&self) -> bool {
        self.current_health <= 0
    }

    pub fn actor(&self) -> &AnimatedActor {
        &self.actor
    }

    /// Advances this enemy's animation one tick.
    pub fn animate(&mut self, now: u64) -> Option<ActorState> {
        self.actor.animate(now)
    }

    /// Applies incoming damage and returns the reward on the killing blow.
    ///
    /// The boss archetype takes half damage, rounded down. A surviving
    /// enemy flinches when its animation allows; a lethal hit commits
    /// Death unconditionally. The reward is released exactly once.
    pub fn take_damage(&mut self, amount: i32, now: u64) -> Option<u32> {
        let applied = if self.archetype.halves_damage() {
            amount / 2
        } else {
            amount
        };
        self.current_health -= applied;
        log::debug!(
            "{} takes {} damage, {} health left",
            self.archetype.name(),
            applied,
            self.current_health
        );

        if self.current_health > 0 {
            if self.actor.can_act() {
                self.actor.change_state(ActorState::Hurt, now);
            }
            None
        } else {
            self.actor.kill(now);
            if self.defeated {
                None
            } else {
                self.defeated = true;
                log::info!("{} defeated, reward {}", self.archetype.name(), self.reward);
                Some(self.reward)
            }
        }
    }

    /// Swings at the player for base damage plus the dice roll.
    ///
    /// Silently does nothing while an animation is mid-pass; returns the
    /// outcome when the swing fired.
    pub fn attack(&mut self, player: &mut CombatPlayer, roll: i32, now: u64) -> Option<AttackOutcome> {
        if !self.actor.can_act() {
            return None;
        }
        let total = self.damage + roll;
        self.actor.change_state(ActorState::Attack, now);
        log::debug!("{} attacks for {}", self.archetype.name(), total);
        player.take_damage(total, now);
        Some(AttackOutcome {
            damage: total,
            reward: None,
        })
    }
}

/// The player participant in combat.
///
/// Built at combat entry from the long-lived player state; residual
/// health is written back by the caller at combat exit.
#[derive(Debug, Clone)]
pub struct CombatPlayer {
    max_health: i32,
    current_health: i32,
    damage: i32,
    actor: AnimatedActor,
}

impl CombatPlayer {
    /// Creates the combat player with the knight frame set.
    pub fn new(max_health: i32, current_health: i32, damage: i32) -> TowerResult<Self> {
        Ok(Self {
            max_health,
            current_health,
            damage,
            // idle 4, attack 5, hurt 2, death 6: the knight sheets
            actor: AnimatedActor::new(FrameSet::new(4, 5, 2, 6), config::FRAME_DELAY_MS, true)?,
        })
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn current_health(&self) -> i32 {
        self.current_health
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn is_defeated(&self) -> bool {
        self.current_health <= 0
    }

    pub fn actor(&self) -> &AnimatedActor {
        &self.actor
    }

    /// Advances the player's animation one tick.
    pub fn animate(&mut self, now: u64) -> Option<ActorState> {
        self.actor.animate(now)
    }

    /// Applies incoming damage: flinch while alive, Death at zero.
    pub fn take_damage(&mut self, amount: i32, now: u64) {
        self.current_health -= amount;
        log::debug!(
            "player takes {} damage, {} health left",
            amount,
            self.current_health
        );
        if self.current_health > 0 {
            if self.actor.can_act() {
                self.actor.change_state(ActorState::Hurt, now);
            }
        } else {
            self.actor.kill(now);
            log::info!("player has fallen");
        }
    }

    /// Swings at the enemy with the dice roll plus lucky-die bonuses.
    ///
    /// Each owned lucky die adds one freshly rolled d6. Does nothing
    /// while the swing is gated; on a killing blow the outcome carries
    /// the enemy's reward.
    pub fn attack(
        &mut self,
        enemy: &mut CombatEnemy,
        roll: i32,
        lucky_dice: u32,
        rng: &mut StdRng,
        now: u64,
    ) -> Option<AttackOutcome> {
        if !self.actor.can_act() {
            return None;
        }
        let bonus: i32 = (0..lucky_dice).map(|_| roll_d6(rng)).sum();
        let total = self.damage + roll + bonus;
        self.actor.change_state(ActorState::Attack, now);
        log::debug!("player attacks for {total} (roll {roll}, bonus {bonus})");
        let reward = enemy.take_damage(total, now);
        Some(AttackOutcome {
            damage: total,
            reward,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const DELAY: u64 = 250;

    fn actor() -> AnimatedActor {
        AnimatedActor::new(FrameSet::new(2, 4, 3, 4), DELAY, false).unwrap()
    }

    fn tick(actor: &mut AnimatedActor, now: &mut u64) -> Option<ActorState> {
        *now += DELAY + 1;
        actor.animate(*now)
    }

    #[test]
    fn test_empty_frame_sequence_is_rejected() {
        let err = AnimatedActor::new(FrameSet::new(2, 0, 3, 4), DELAY, false);
        assert!(matches!(err, Err(TowerError::InvalidArchetype(_))));
    }

    #[test]
    fn test_idle_loops_forever() {
        let mut a = actor();
        let mut now = 0;
        for _ in 0..10 {
            tick(&mut a, &mut now);
            assert_eq!(a.state(), ActorState::Idle);
            assert!(a.frame_index() < 2);
        }
    }

    #[test]
    fn test_one_shot_clamps_and_returns_to_idle() {
        let mut a = actor();
        let mut now = 0;
        assert!(a.change_state(ActorState::Attack, now));
        assert!(!a.is_finished());
        assert_eq!(a.queued_state(), Some(ActorState::Idle));

        // Three ticks walk the four-frame pass to its last frame.
        for _ in 0..3 {
            assert_eq!(tick(&mut a, &mut now), None);
        }
        assert_eq!(a.state(), ActorState::Attack);
        // The next tick clamps, latches finished, and commits the queue.
        assert_eq!(tick(&mut a, &mut now), Some(ActorState::Idle));
        assert_eq!(a.state(), ActorState::Idle);
        assert_eq!(a.frame_index(), 0);
    }

    #[test]
    fn test_transition_queues_behind_active_pass() {
        let mut a = actor();
        let mut now = 0;
        a.change_state(ActorState::Attack, now);
        assert!(!a.change_state(ActorState::Hurt, now));
        assert_eq!(a.state(), ActorState::Attack);
        assert_eq!(a.queued_state(), Some(ActorState::Hurt));

        for _ in 0..3 {
            tick(&mut a, &mut now);
        }
        assert_eq!(tick(&mut a, &mut now), Some(ActorState::Hurt));
        assert_eq!(a.state(), ActorState::Hurt);
        assert_eq!(a.frame_index(), 0);
    }

    #[test]
    fn test_death_is_absorbing() {
        let mut a = actor();
        let mut now = 0;
        a.kill(now);
        assert_eq!(a.state(), ActorState::Death);
        assert!(!a.change_state(ActorState::Idle, now));
        assert!(!a.change_state(ActorState::Attack, now));
        for _ in 0..10 {
            tick(&mut a, &mut now);
            assert_eq!(a.state(), ActorState::Death);
        }
        // Clamped on the last death frame, no queued exit.
        assert_eq!(a.frame_index(), 3);
        assert_eq!(a.queued_state(), None);
    }

    #[test]
    fn test_attack_interrupt_variant() {
        let mut a = AnimatedActor::new(FrameSet::new(2, 4, 3, 4), DELAY, true).unwrap();
        let now = 0;
        a.change_state(ActorState::Hurt, now);
        assert!(!a.is_finished());
        // Attack pre-empts the in-flight hurt pass for this variant.
        assert!(a.change_state(ActorState::Attack, now));
        assert_eq!(a.state(), ActorState::Attack);
        assert_eq!(a.frame_index(), 0);
    }

    #[test]
    fn test_enemy_damage_and_single_reward() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut enemy = CombatEnemy::new(EnemyArchetype::Slime, &mut rng).unwrap();
        // Survivable hit: flinch, no reward.
        assert_eq!(enemy.take_damage(10, 0), None);
        assert_eq!(enemy.current_health(), 20);
        assert_eq!(enemy.actor().state(), ActorState::Hurt);

        // Lethal hit: health may go negative, Death commits, reward once.
        let reward = enemy.take_damage(25, 100);
        assert!(reward.is_some());
        assert_eq!(enemy.current_health(), -5);
        assert!(enemy.is_defeated());
        assert_eq!(enemy.actor().state(), ActorState::Death);
        assert_eq!(enemy.take_damage(5, 200), None);
    }

    #[test]
    fn test_boss_halves_incoming_damage() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut boss = CombatEnemy::new(EnemyArchetype::Boss, &mut rng).unwrap();
        assert_eq!(boss.current_health(), 80);
        boss.take_damage(14, 0);
        assert_eq!(boss.current_health(), 73);
    }

    #[test]
    fn test_player_attack_formula() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut player = CombatPlayer::new(150, 150, 10).unwrap();
        let mut enemy = CombatEnemy::new(EnemyArchetype::Slime, &mut rng).unwrap();

        let outcome = player.attack(&mut enemy, 4, 0, &mut rng, 0).unwrap();
        assert_eq!(outcome.damage, 14);
        assert_eq!(enemy.current_health(), 30 - 14);
        assert_eq!(player.actor().state(), ActorState::Attack);
    }

    #[test]
    fn test_lucky_dice_add_bonus_rolls() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut player = CombatPlayer::new(150, 150, 10).unwrap();
        let mut enemy = CombatEnemy::new(EnemyArchetype::Zombie, &mut rng).unwrap();

        let outcome = player.attack(&mut enemy, 3, 2, &mut rng, 0).unwrap();
        // Two bonus d6: total damage in [10+3+2, 10+3+12].
        assert!(outcome.damage >= 15 && outcome.damage <= 25);
    }

    #[test]
    fn test_enemy_attack_gated_mid_animation() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut player = CombatPlayer::new(150, 150, 10).unwrap();
        let mut enemy = CombatEnemy::new(EnemyArchetype::Skeleton, &mut rng).unwrap();

        assert!(enemy.attack(&mut player, 2, 0).is_some());
        // Mid-swing: the second attempt is a silent no-op.
        assert!(enemy.attack(&mut player, 2, 0).is_none());
    }

    #[test]
    fn test_cumulative_damage_kills_exactly_once() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut enemy = CombatEnemy::new(EnemyArchetype::Zombie, &mut rng).unwrap();
        let mut rewards = 0;
        let mut now = 0;
        for _ in 0..20 {
            if enemy.take_damage(7, now).is_some() {
                rewards += 1;
            }
            now += 1000;
        }
        assert_eq!(rewards, 1);
        assert_eq!(enemy.actor().state(), ActorState::Death);
    }
}
