//! # Boundary Resolution
//!
//! Trims the solid all-wall canvas down to the walkable region plus a
//! one-tile wall skirt, and classifies wall/door tiles into the sprite
//! rotation the renderer should use.

use crate::dungeon::{TileGrid, TileKind};
use serde::{Deserialize, Serialize};

/// Produces a new grid keeping only the walkable region and its skirt.
///
/// Every floor and corridor tile is copied over; any wall tile in the
/// Moore 8-neighborhood of a copied tile stays a wall; every other cell
/// becomes empty. Must run after carving and before rendering.
/// Idempotent: a second application changes nothing.
pub fn update_wall_boundaries(grid: &TileGrid) -> TileGrid {
    let mut trimmed = TileGrid::filled(grid.width(), grid.height(), TileKind::Empty);

    for (x, y, kind) in grid.cells() {
        if kind != TileKind::Floor && kind != TileKind::Corridor {
            continue;
        }
        trimmed.set(x, y, kind);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if grid.get(x + dx, y + dy) == Some(TileKind::Wall) {
                    trimmed.set(x + dx, y + dy, TileKind::Wall);
                }
            }
        }
    }
    trimmed
}

/// Sprite rotation for a wall or door tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallRotation {
    /// Default orientation
    Straight,
    /// Rotated 90 degrees counter-clockwise
    LeftTurn,
    /// Rotated 90 degrees clockwise
    RightTurn,
}

/// Classifies the rotation of the wall/door tile at `(x, y)`.
///
/// A tile turns when it sits in a vertical wall run (wall-or-door above
/// and below) with open ground to one side: ground on the left is a
/// right turn, ground on the right a left turn. Everything else renders
/// straight. Pure function of the 4-neighborhood; out-of-bounds
/// neighbors count as neither wall nor ground.
pub fn rotate_walls(grid: &TileGrid, x: i32, y: i32) -> WallRotation {
    let wall_like = |x: i32, y: i32| grid.get(x, y).is_some_and(TileKind::is_wall_like);
    let open = |x: i32, y: i32| grid.get(x, y).is_some_and(TileKind::is_open);

    let top = wall_like(x, y - 1);
    let bottom = wall_like(x, y + 1);

    if top && bottom && open(x - 1, y) {
        WallRotation::RightTurn
    } else if top && bottom && open(x + 1, y) {
        WallRotation::LeftTurn
    } else {
        WallRotation::Straight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{
        carve_corridors, carve_rooms, generate_rooms, GenerationConfig, Room,
    };
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn carved_grid(seed: u64) -> TileGrid {
        let config = GenerationConfig::new(seed);
        let (w, h) = config.grid_size();
        let mut grid = TileGrid::filled(w, h, TileKind::Wall);
        let rooms = generate_rooms(&config, &mut StdRng::seed_from_u64(seed));
        carve_rooms(&rooms, &mut grid, config.tile_size);
        carve_corridors(&rooms, &mut grid, config.tile_size);
        grid
    }

    #[test]
    fn test_boundary_keeps_walkable_and_skirt() {
        let grid = carved_grid(21);
        let trimmed = update_wall_boundaries(&grid);

        for (x, y, kind) in trimmed.cells() {
            match kind {
                TileKind::Floor | TileKind::Corridor => {
                    assert_eq!(grid.get(x, y), Some(kind));
                }
                TileKind::Wall => {
                    let touches_walkable = (-1..=1).any(|dy| {
                        (-1..=1).any(|dx| {
                            matches!(
                                trimmed.get(x + dx, y + dy),
                                Some(TileKind::Floor) | Some(TileKind::Corridor)
                            )
                        })
                    });
                    assert!(touches_walkable, "stranded wall at ({x}, {y})");
                }
                TileKind::Empty => {}
                other => panic!("unexpected tile {other:?} after trim"),
            }
        }
    }

    #[test]
    fn test_boundary_is_idempotent() {
        for seed in [3, 17, 99] {
            let once = update_wall_boundaries(&carved_grid(seed));
            let twice = update_wall_boundaries(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_rotation_in_vertical_run() {
        // Vertical wall run at x=1 with floor to the right.
        let mut grid = TileGrid::filled(4, 4, TileKind::Empty);
        for y in 0..4 {
            grid.set(1, y, TileKind::Wall);
            grid.set(2, y, TileKind::Floor);
        }
        assert_eq!(rotate_walls(&grid, 1, 1), WallRotation::LeftTurn);
        assert_eq!(rotate_walls(&grid, 1, 2), WallRotation::LeftTurn);
        // Run ends at the grid edge: no wall above, renders straight.
        assert_eq!(rotate_walls(&grid, 1, 0), WallRotation::Straight);
    }

    #[test]
    fn test_rotation_prefers_left_ground() {
        // Ground on both sides: the left side wins and yields a right turn.
        let mut grid = TileGrid::filled(3, 3, TileKind::Wall);
        grid.set(0, 1, TileKind::Floor);
        grid.set(2, 1, TileKind::Corridor);
        assert_eq!(rotate_walls(&grid, 1, 1), WallRotation::RightTurn);
    }

    #[test]
    fn test_rotation_counts_doors_and_trapdoors() {
        let mut grid = TileGrid::filled(3, 3, TileKind::Empty);
        grid.set(1, 0, TileKind::Door);
        grid.set(1, 1, TileKind::Wall);
        grid.set(1, 2, TileKind::Wall);
        grid.set(2, 1, TileKind::Trapdoor);
        assert_eq!(rotate_walls(&grid, 1, 1), WallRotation::LeftTurn);
    }

    #[test]
    fn test_rotation_horizontal_run_is_straight() {
        let mut grid = TileGrid::filled(3, 3, TileKind::Empty);
        for x in 0..3 {
            grid.set(x, 1, TileKind::Wall);
            grid.set(x, 2, TileKind::Floor);
        }
        assert_eq!(rotate_walls(&grid, 1, 1), WallRotation::Straight);
    }
}
