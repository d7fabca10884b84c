//! # Floor Generation
//!
//! Room placement by rejection sampling plus L-shaped corridor carving.
//!
//! Rooms are sampled in pixel units inside a one-tile buffer from the
//! floor edges and accepted only when their tile footprint overlaps no
//! previously accepted room. Consecutive accepted rooms are then chained
//! with an L-shaped corridor between their centers. Non-consecutive
//! rooms are *not* guaranteed connected; the chain is the contract.

use crate::combat::EnemyArchetype;
use crate::dungeon::{
    spawn_entities, update_wall_boundaries, EntityManifest, GenerationConfig, Position, Room,
    TileGrid, TileKind,
};
use crate::{TowerError, TowerResult};
use rand::rngs::StdRng;
use rand::Rng;

/// Samples up to `config.room_draws` non-overlapping rooms.
///
/// Each draw picks a width and height in
/// `[min_room_size, max_room_size]` pixels and a top-left corner inside
/// a one-tile buffer from the floor edges. A candidate that overlaps an
/// accepted room is discarded, so fewer rooms than draws is normal on an
/// unlucky seed.
pub fn generate_rooms(config: &GenerationConfig, rng: &mut StdRng) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::new();
    let min_size = config.min_room_size();
    let max_size = config.max_room_size();
    let buffer = config.tile_size;

    for _ in 0..config.room_draws {
        let width = rng.gen_range(min_size..=max_size);
        let height = rng.gen_range(min_size..=max_size);
        let x = rng.gen_range(buffer..=config.floor_width - width - buffer);
        let y = rng.gen_range(buffer..=config.floor_height - height - buffer);
        let candidate = Room::new(x, y, width, height);

        if rooms
            .iter()
            .all(|other| !candidate.overlaps(other, config.tile_size))
        {
            rooms.push(candidate);
        }
    }
    rooms
}

/// Writes every room's tile footprint into the grid as floor.
pub fn carve_rooms(rooms: &[Room], grid: &mut TileGrid, tile_size: u32) {
    for room in rooms {
        let (x0, x1, y0, y1) = room.tile_bounds(tile_size);
        for y in y0..y1 {
            for x in x0..x1 {
                grid.set(x, y, TileKind::Floor);
            }
        }
    }
}

/// Connects consecutive rooms with L-shaped corridors.
///
/// Walks along room A's center row to room B's center column, then down
/// that column to room B's center row, converting only wall tiles to
/// corridor. Floor tiles crossed on the way are left untouched.
pub fn carve_corridors(rooms: &[Room], grid: &mut TileGrid, tile_size: u32) {
    for pair in rooms.windows(2) {
        let a = pair[0].center_tile(tile_size);
        let b = pair[1].center_tile(tile_size);

        for x in a.x.min(b.x)..=a.x.max(b.x) {
            if grid.get(x, a.y) == Some(TileKind::Wall) {
                grid.set(x, a.y, TileKind::Corridor);
            }
        }
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            if grid.get(b.x, y) == Some(TileKind::Wall) {
                grid.set(b.x, y, TileKind::Corridor);
            }
        }
    }
}

/// Everything a fresh floor hands to the exploration loop.
#[derive(Debug, Clone)]
pub struct GeneratedDungeon {
    /// The trimmed, entity-marked tile grid
    pub grid: TileGrid,
    /// The accepted rooms, retained for inspection only
    pub rooms: Vec<Room>,
    /// Where the player appears (the trapdoor tile)
    pub player_spawn: Position,
    /// Positions and kill-state of every placed entity
    pub manifest: EntityManifest,
}

/// Orchestrates the full floor pipeline: carve, trim, spawn.
#[derive(Debug, Clone, Default)]
pub struct DungeonGenerator {
    /// Enemy types eligible for normal floors
    pub roster: Vec<EnemyArchetype>,
}

impl DungeonGenerator {
    /// Creates a generator with the standard enemy roster.
    pub fn new() -> Self {
        Self {
            roster: vec![
                EnemyArchetype::Slime,
                EnemyArchetype::Skeleton,
                EnemyArchetype::Zombie,
            ],
        }
    }

    /// Generates a complete floor.
    ///
    /// Fails with [`TowerError::GenerationFailed`] when no room was
    /// accepted or the trimmed grid cannot host the required entities;
    /// the caller regenerates with a fresh seed rather than proceeding
    /// with a degenerate manifest.
    pub fn generate(
        &self,
        config: &GenerationConfig,
        floor_number: u32,
        rng: &mut StdRng,
    ) -> TowerResult<GeneratedDungeon> {
        config.validate()?;
        let (grid_w, grid_h) = config.grid_size();
        let mut grid = TileGrid::filled(grid_w, grid_h, TileKind::Wall);

        let rooms = generate_rooms(config, rng);
        if rooms.is_empty() {
            return Err(TowerError::GenerationFailed(
                "no rooms accepted after all placement draws".into(),
            ));
        }

        carve_rooms(&rooms, &mut grid, config.tile_size);
        carve_corridors(&rooms, &mut grid, config.tile_size);
        let mut grid = update_wall_boundaries(&grid);

        let (player_spawn, manifest) =
            spawn_entities(&mut grid, &self.roster, config, floor_number, rng)?;

        log::info!(
            "generated floor {}: {} rooms, {} enemies",
            floor_number,
            rooms.len(),
            manifest.enemies.len()
        );

        Ok(GeneratedDungeon {
            grid,
            rooms,
            player_spawn,
            manifest,
        })
    }
}
