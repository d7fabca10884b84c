//! # Dice Roller
//!
//! A physics-lite projectile simulator producing the combat randomizer.
//!
//! The die jumps, falls under unit gravity with a small decaying
//! horizontal drift, bounces once, and lands. While airborne it tumbles
//! through angled sprite frames; while falling it blurs through random
//! front faces. Only once it has landed does it expose a value, and a
//! landed six pays double, mapping to twelve.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Upward impulse applied on roll start.
const JUMP_STRENGTH: i32 = 20;

/// Smaller impulse applied on the single bounce.
const REBOUND_STRENGTH: i32 = 15;

/// Per-tick decrease of the horizontal drift.
const DRIFT_STEP: f32 = 0.1;

/// Number of angled tumble sprites the renderer owns.
const ANGLED_FRAME_COUNT: usize = 9;

/// Ticks between random front-face blur frames.
const BLUR_INTERVAL: u64 = 5;

/// Flight phase of the die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DicePhase {
    /// At rest, never rolled or re-armed after a read
    Resting,
    /// First arc after the jump impulse
    Rising,
    /// Second, smaller arc after hitting the ground once
    Bouncing,
    /// On the ground holding its final face
    Landed,
}

/// What the renderer should draw for the die this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiceFrame {
    /// Tumbling: one of the angled sprites
    Angled(usize),
    /// Spin blur: a random front face
    Blur(u8),
    /// Settled on its final face
    Face(u8),
}

/// The dice state machine. All motion is integer-stepped per tick.
#[derive(Debug, Clone)]
pub struct DiceRoller {
    start_x: i32,
    start_y: i32,
    x: f32,
    y: i32,
    velocity: i32,
    drift: f32,
    ground_level: i32,
    phase: DicePhase,
    frame_counter: u64,
    angled_index: usize,
    frame: DiceFrame,
    landed_face: Option<u8>,
}

impl DiceRoller {
    /// Creates a die resting at `(x, y)`; `y` is also the ground level.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            start_x: x,
            start_y: y,
            x: x as f32,
            y,
            velocity: 0,
            drift: 0.0,
            ground_level: y,
            phase: DicePhase::Resting,
            frame_counter: 0,
            angled_index: 0,
            frame: DiceFrame::Face(6),
            landed_face: None,
        }
    }

    /// Current flight phase.
    pub fn phase(&self) -> DicePhase {
        self.phase
    }

    /// Position for the renderer.
    pub fn position(&self) -> (i32, i32) {
        (self.x as i32, self.y)
    }

    /// Sprite to draw this tick.
    pub fn current_frame(&self) -> DiceFrame {
        self.frame
    }

    /// The face the die settled on, if it has landed.
    pub fn landed_face(&self) -> Option<u8> {
        self.landed_face
    }

    /// Whether the die has landed and holds a readable value.
    pub fn has_landed(&self) -> bool {
        self.phase == DicePhase::Landed
    }

    /// Launches a roll. Only effective at rest at ground level; a roll
    /// requested mid-flight is a silent no-op.
    pub fn roll_start(&mut self) {
        let at_rest = matches!(self.phase, DicePhase::Resting | DicePhase::Landed);
        if !at_rest || self.y != self.ground_level {
            return;
        }
        self.x = self.start_x as f32;
        self.y = self.start_y;
        self.drift = 0.0;
        self.velocity = -JUMP_STRENGTH;
        self.phase = DicePhase::Rising;
        self.landed_face = None;
        log::debug!("dice roll started");
    }

    /// Advances the die one tick: gravity, drift, then frame selection.
    pub fn update(&mut self, rng: &mut StdRng) {
        self.frame_counter += 1;
        self.apply_gravity(rng);
        self.select_frame(rng);
    }

    fn apply_gravity(&mut self, rng: &mut StdRng) {
        if matches!(self.phase, DicePhase::Rising | DicePhase::Bouncing) {
            self.velocity += 1;
            self.y += self.velocity;
            self.drift -= DRIFT_STEP;
            self.x += self.drift;
        }

        if self.y >= self.ground_level {
            self.y = self.ground_level;
            match self.phase {
                DicePhase::Rising => {
                    self.velocity = -REBOUND_STRENGTH;
                    self.drift = 0.0;
                    self.phase = DicePhase::Bouncing;
                }
                DicePhase::Bouncing => {
                    self.velocity = 0;
                    self.drift = 0.0;
                    self.phase = DicePhase::Landed;
                    self.landed_face = Some(rng.gen_range(1..=6));
                }
                _ => {}
            }
        }
    }

    fn select_frame(&mut self, rng: &mut StdRng) {
        if self.y < self.ground_level && self.frame_counter % 2 == 0 {
            self.angled_index = (self.angled_index + 1) % ANGLED_FRAME_COUNT;
            self.frame = DiceFrame::Angled(self.angled_index);
        } else if matches!(self.phase, DicePhase::Rising | DicePhase::Bouncing) {
            if self.frame_counter % BLUR_INTERVAL == 0 {
                self.frame = DiceFrame::Blur(rng.gen_range(1..=6));
            }
        } else if let Some(face) = self.landed_face {
            self.frame = DiceFrame::Face(face);
        }
    }

    /// Reads the roll result once the die has landed.
    ///
    /// A landed six is the jackpot face and pays double, returning 12;
    /// every other face returns its own value. `None` until landed.
    pub fn roll_value(&self) -> Option<u32> {
        match (self.phase, self.landed_face) {
            (DicePhase::Landed, Some(6)) => Some(12),
            (DicePhase::Landed, Some(face)) => Some(face as u32),
            _ => None,
        }
    }
}
