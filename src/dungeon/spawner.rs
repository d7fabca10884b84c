//! # Entity Spawning
//!
//! Places the trapdoor, door, merchant, and enemies on a trimmed grid,
//! and rebuilds a floor from its saved manifest after combat.
//!
//! All placements draw without replacement, so no two entities share a
//! tile. The manifest produced here is the only state that survives the
//! exploration → combat → exploration round trip.

use crate::combat::EnemyArchetype;
use crate::dungeon::{GenerationConfig, Position, TileGrid, TileKind};
use crate::exploration::ExplorationEnemy;
use crate::{TowerError, TowerResult};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One enemy's saved position and kill-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Tile column
    pub x: i32,
    /// Tile row
    pub y: i32,
    /// Which enemy stands here
    pub archetype: EnemyArchetype,
    /// Whether the player has defeated this enemy
    pub killed: bool,
    /// Whether the player has already respawned on this enemy's tile
    pub spawned: bool,
}

impl EnemySpawn {
    /// The spawn's tile position.
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Positions of every placed entity on a floor.
///
/// Serializable: this is the "saved dungeon" snapshot handed back to
/// [`load_dungeon`] when exploration resumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityManifest {
    /// The player's arrival tile
    pub trapdoor: Position,
    /// The exit to the next floor, set into a wall
    pub door: Position,
    /// The merchant's tile
    pub merchant: Position,
    /// Every enemy placed on this floor
    pub enemies: Vec<EnemySpawn>,
}

impl EntityManifest {
    /// Marks the merchant's tile on a (re)loaded grid.
    ///
    /// The saved grid never carries the merchant mark, so this runs each
    /// time exploration (re)starts a floor.
    pub fn apply_merchant(&self, grid: &mut TileGrid) {
        grid.set(self.merchant.x, self.merchant.y, TileKind::Merchant);
    }

    /// Flips the kill flag of the enemy standing at `(x, y)`.
    pub fn mark_killed(&mut self, x: i32, y: i32) {
        for enemy in &mut self.enemies {
            if enemy.x == x && enemy.y == y {
                enemy.killed = true;
            }
        }
    }

    /// How many enemies are still alive on this floor.
    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| !e.killed).count()
    }
}

fn draw_without_replacement(pool: &mut Vec<Position>, rng: &mut StdRng) -> Position {
    let index = rng.gen_range(0..pool.len());
    pool.swap_remove(index)
}

/// Places all floor entities and returns the player spawn plus manifest.
///
/// The trapdoor doubles as the player's arrival tile; the door is set
/// into a straight (non-corner) wall tile. On the final floor the sole
/// spawn is the boss; otherwise one enemy per room draw, with the
/// archetype drawn uniformly from `roster`. Fails when the grid has no
/// floor or no straight wall tiles, or too few floor tiles for the
/// required entity count; the caller should regenerate.
pub fn spawn_entities(
    grid: &mut TileGrid,
    roster: &[EnemyArchetype],
    config: &GenerationConfig,
    floor_number: u32,
    rng: &mut StdRng,
) -> TowerResult<(Position, EntityManifest)> {
    let census = grid.census();
    let mut floors = census.floors;
    // The door goes on a straight wall run; corners stay door-free so
    // the rotated door sprite always has a flat backing tile.
    let mut walls = census.walls;

    if floors.is_empty() {
        return Err(TowerError::GenerationFailed("no floor tiles to spawn on".into()));
    }
    if walls.is_empty() {
        return Err(TowerError::GenerationFailed(
            "no straight wall tiles for the door".into(),
        ));
    }
    if roster.is_empty() && floor_number != config.final_floor {
        return Err(TowerError::InvalidArchetype("empty enemy roster".into()));
    }

    let enemy_count = if floor_number == config.final_floor {
        1
    } else {
        config.room_draws as usize
    };
    // trapdoor + merchant + enemies all come from the floor pool
    if floors.len() < enemy_count + 2 {
        return Err(TowerError::GenerationFailed(format!(
            "{} floor tiles cannot host {} entities",
            floors.len(),
            enemy_count + 2
        )));
    }

    let trapdoor = draw_without_replacement(&mut floors, rng);
    grid.set(trapdoor.x, trapdoor.y, TileKind::Trapdoor);

    let door = draw_without_replacement(&mut walls, rng);
    grid.set(door.x, door.y, TileKind::Door);

    let merchant = draw_without_replacement(&mut floors, rng);

    let mut enemies = Vec::with_capacity(enemy_count);
    for _ in 0..enemy_count {
        let pos = draw_without_replacement(&mut floors, rng);
        let archetype = if floor_number == config.final_floor {
            EnemyArchetype::Boss
        } else {
            roster[rng.gen_range(0..roster.len())]
        };
        enemies.push(EnemySpawn {
            x: pos.x,
            y: pos.y,
            archetype,
            killed: false,
            spawned: false,
        });
    }

    let manifest = EntityManifest {
        trapdoor,
        door,
        merchant,
        enemies,
    };
    Ok((trapdoor, manifest))
}

/// Rebuilds a floor's live actors from its saved manifest.
///
/// Enemies that were killed are not reconstructed. The respawn point is
/// the most recently killed enemy that has not yet been used as one; it
/// is marked spawned in the returned manifest so the player reappears
/// there exactly once per kill. Returns `None` for the spawn when every
/// kill has already been consumed (the caller keeps the previous
/// position).
pub fn load_dungeon(
    grid: &TileGrid,
    saved: &EntityManifest,
) -> TowerResult<(Option<Position>, Vec<ExplorationEnemy>, EntityManifest)> {
    if grid.width() == 0 || grid.height() == 0 {
        return Err(TowerError::InvalidState("saved dungeon grid is empty".into()));
    }

    let mut manifest = saved.clone();
    let mut live = Vec::new();
    let mut respawn = None;

    for enemy in &mut manifest.enemies {
        if !enemy.killed {
            live.push(ExplorationEnemy::new(enemy.x, enemy.y, enemy.archetype));
        } else if !enemy.spawned {
            respawn = Some(enemy.position());
            enemy.spawned = true;
        }
    }

    log::debug!(
        "reloaded dungeon: {} live enemies, respawn {:?}",
        live.len(),
        respawn
    );
    Ok((respawn, live, manifest))
}
