//! # Exploration Module
//!
//! Grid movement, contact checks, and door gating for the overworld.
//!
//! The exploration screen owns the event pump and rendering; this module
//! holds the rules it consults every tick: which tiles the player may
//! step onto, when an enemy contact hands off to combat, and when the
//! exit door lets the run descend a floor.

use crate::combat::EnemyArchetype;
use crate::config;
use crate::dungeon::{Position, TileGrid};
use serde::{Deserialize, Serialize};

/// A movement input, already mapped from raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The tile offset this direction moves by.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Attempts one step; succeeds only onto floor, corridor, or trapdoor.
///
/// Walls, doors, the merchant tile, and the trimmed void all block.
pub fn try_move(pos: Position, direction: Direction, grid: &TileGrid) -> Option<Position> {
    let (dx, dy) = direction.delta();
    let target = Position::new(pos.x + dx, pos.y + dy);
    grid.is_walkable(target).then_some(target)
}

/// Whether two tiles are 4-directionally adjacent (Manhattan distance 1).
pub fn is_adjacent(a: Position, b: Position) -> bool {
    a.manhattan_distance(b) == 1
}

/// An enemy wandering-in-place on the overworld.
///
/// Carries just enough to draw it and detect contact; the combat stats
/// are rolled fresh when an encounter actually starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorationEnemy {
    x: i32,
    y: i32,
    archetype: EnemyArchetype,
    frame_index: usize,
    frame_timer: u64,
}

impl ExplorationEnemy {
    /// Places an enemy of `archetype` at tile `(x, y)`.
    pub fn new(x: i32, y: i32, archetype: EnemyArchetype) -> Self {
        Self {
            x,
            y,
            archetype,
            frame_index: 0,
            frame_timer: 0,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn archetype(&self) -> EnemyArchetype {
        self.archetype
    }

    /// Frame of the looping overworld animation to draw.
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Advances the looping animation.
    pub fn animate(&mut self, now: u64) {
        if now.saturating_sub(self.frame_timer) > config::FRAME_DELAY_MS {
            self.frame_timer = now;
            self.frame_index = (self.frame_index + 1) % self.archetype.overworld_frames();
        }
    }

    /// Whether this enemy triggers combat against a player at
    /// `player_pos`: direct overlap always does, adjacency only when the
    /// interact input was pressed this tick.
    pub fn check_contact(&self, player_pos: Position, interacted: bool) -> bool {
        if self.position() == player_pos {
            return true;
        }
        interacted && is_adjacent(self.position(), player_pos)
    }
}

/// Whether the merchant can be talked to from `player_pos`.
pub fn can_talk_to_merchant(merchant: Position, player_pos: Position) -> bool {
    is_adjacent(merchant, player_pos)
}

/// What interacting with the exit door did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorOutcome {
    /// The player is not standing next to the door
    NotAdjacent,
    /// Live enemies block the descent
    EnemiesRemain,
    /// The floor is cleared: descend
    Advance,
}

/// Resolves an interact input aimed at the exit door.
///
/// Descending requires standing on one of the door's four neighboring
/// tiles with every enemy on the floor defeated.
pub fn door_interact(door: Position, player_pos: Position, live_enemies: usize) -> DoorOutcome {
    if !is_adjacent(door, player_pos) {
        return DoorOutcome::NotAdjacent;
    }
    if live_enemies > 0 {
        return DoorOutcome::EnemiesRemain;
    }
    DoorOutcome::Advance
}
