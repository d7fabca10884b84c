//! # Combat Resolution
//!
//! The turn sequencer coordinating the dice, the player, and the enemy.
//!
//! One combat runs until a terminal condition: the player triggers a
//! dice roll, the landed value is consumed exactly once and fed into the
//! player's attack, and the enemy counters only once both animations
//! have finished and its archetype cooldown has elapsed. Terminal states
//! hold for a fixed delay so the death animation plays out before
//! control returns to exploration.

use crate::combat::{roll_d6, CombatEnemy, CombatPlayer, DiceRoller, EnemyArchetype};
use crate::config;
use crate::session::PlayerState;
use crate::TowerResult;
use rand::rngs::StdRng;

/// Where the die rests on the combat screen.
const DICE_REST_POSITION: (i32, i32) = (640, 420);

/// Sequencing phase of one combat encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatPhase {
    /// Waiting for the player's dice roll to land and be spent
    PlayerTurn,
    /// Waiting out the enemy's cooldown before its counter-attack
    EnemyTurn,
    /// Enemy defeated; holding for the exit delay
    Victory,
    /// Player defeated; holding for the exit delay
    Defeat,
}

/// How a finished combat reports back to the exploration loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatOutcome {
    /// A regular enemy fell: credit the reward, mark the manifest entry
    EnemyDefeated { reward: u32 },
    /// The boss fell: the run is won, no floor progression follows
    BossDefeated { reward: u32 },
    /// The player fell: no reward, exploration does not resume
    PlayerDefeated,
}

/// Drives one combat encounter tick by tick.
///
/// Escape is handled by the caller simply dropping the resolver; no
/// combat-local state survives.
#[derive(Debug)]
pub struct CombatResolver {
    player: CombatPlayer,
    enemy: CombatEnemy,
    dice: DiceRoller,
    phase: CombatPhase,
    lucky_dice: u32,
    roll_consumed: bool,
    enemy_last_action: u64,
    exit_deadline: Option<u64>,
    pending_reward: u32,
    outcome_emitted: bool,
}

impl CombatResolver {
    /// Builds an encounter from the enemy archetype and the long-lived
    /// player state. Stats are rolled here, once, for this combat.
    pub fn new(
        archetype: EnemyArchetype,
        player_state: &PlayerState,
        now: u64,
        rng: &mut StdRng,
    ) -> TowerResult<Self> {
        let player = CombatPlayer::new(
            player_state.max_health,
            player_state.current_health,
            config::PLAYER_BASE_DAMAGE,
        )?;
        let enemy = CombatEnemy::new(archetype, rng)?;
        log::info!(
            "combat entered: {} ({} hp) vs player ({} hp)",
            archetype.name(),
            enemy.max_health(),
            player.current_health()
        );
        Ok(Self {
            player,
            enemy,
            dice: DiceRoller::new(DICE_REST_POSITION.0, DICE_REST_POSITION.1),
            phase: CombatPhase::PlayerTurn,
            lucky_dice: player_state.lucky_die_amount,
            roll_consumed: true,
            enemy_last_action: now,
            exit_deadline: None,
            pending_reward: 0,
            outcome_emitted: false,
        })
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn player(&self) -> &CombatPlayer {
        &self.player
    }

    pub fn enemy(&self) -> &CombatEnemy {
        &self.enemy
    }

    pub fn dice(&self) -> &DiceRoller {
        &self.dice
    }

    /// Forwards a roll request to the die.
    ///
    /// Ignored outside the player's turn or while the die is airborne,
    /// the same debounce-by-state-check policy as everywhere else in
    /// the combat layer.
    pub fn request_roll(&mut self) {
        if self.phase != CombatPhase::PlayerTurn {
            return;
        }
        self.dice.roll_start();
        if !self.dice.has_landed() {
            self.roll_consumed = false;
        }
    }

    /// Advances the whole encounter one tick.
    ///
    /// Animation updates run first, then turn resolution, then terminal
    /// checks, so a death animation finishing this tick is observed this
    /// tick. Returns the outcome exactly once, after the exit delay.
    pub fn update(&mut self, now: u64, rng: &mut StdRng) -> Option<CombatOutcome> {
        self.player.animate(now);
        self.enemy.animate(now);
        self.dice.update(rng);

        match self.phase {
            CombatPhase::PlayerTurn => self.resolve_player_turn(now, rng),
            CombatPhase::EnemyTurn => self.resolve_enemy_turn(now, rng),
            CombatPhase::Victory | CombatPhase::Defeat => {}
        }
        self.emit_outcome(now)
    }

    fn resolve_player_turn(&mut self, now: u64, rng: &mut StdRng) {
        if self.roll_consumed || !self.player.actor().can_act() {
            return;
        }
        let Some(value) = self.dice.roll_value() else {
            return;
        };
        self.roll_consumed = true;

        let outcome = self
            .player
            .attack(&mut self.enemy, value as i32, self.lucky_dice, rng, now);
        let reward = outcome.and_then(|o| o.reward);

        if let Some(reward) = reward {
            self.pending_reward = reward;
            self.enter_terminal(CombatPhase::Victory, now);
        } else {
            self.phase = CombatPhase::EnemyTurn;
        }
    }

    fn resolve_enemy_turn(&mut self, now: u64, rng: &mut StdRng) {
        let both_settled = self.player.actor().can_act() && self.enemy.actor().can_act();
        let cooled_down = now.saturating_sub(self.enemy_last_action)
            >= self.enemy.archetype().attack_cooldown_ms();
        if !both_settled || !cooled_down {
            return;
        }

        // The enemy's counter uses a plain internal d6, no jackpot face.
        let roll = roll_d6(rng);
        self.enemy.attack(&mut self.player, roll, now);
        self.enemy_last_action = now;

        if self.player.is_defeated() {
            self.enter_terminal(CombatPhase::Defeat, now);
        } else {
            self.phase = CombatPhase::PlayerTurn;
        }
    }

    fn enter_terminal(&mut self, phase: CombatPhase, now: u64) {
        self.phase = phase;
        self.exit_deadline = Some(now + config::COMBAT_EXIT_DELAY_MS);
    }

    fn emit_outcome(&mut self, now: u64) -> Option<CombatOutcome> {
        let deadline = self.exit_deadline?;
        if self.outcome_emitted || now < deadline {
            return None;
        }
        self.outcome_emitted = true;

        // Defeat outranks victory if both were somehow reached.
        let outcome = if self.phase == CombatPhase::Defeat {
            CombatOutcome::PlayerDefeated
        } else if self.enemy.archetype() == EnemyArchetype::Boss {
            CombatOutcome::BossDefeated {
                reward: self.pending_reward,
            }
        } else {
            CombatOutcome::EnemyDefeated {
                reward: self.pending_reward,
            }
        };
        log::info!("combat finished: {outcome:?}");
        Some(outcome)
    }
}
