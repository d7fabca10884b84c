//! # Dungeon Module
//!
//! The tile-grid substrate and everything that writes into it.
//!
//! A floor starts as a solid block of wall tiles. The generator carves
//! rooms and corridors into it, the boundary pass trims the solid canvas
//! down to the walkable region plus a one-tile wall skirt, and the
//! spawner places the trapdoor, door, merchant, and enemies. The
//! resulting grid and manifest are the only state the front end needs to
//! draw and resume a floor.

pub mod boundary;
pub mod generator;
pub mod spawner;

pub use boundary::{rotate_walls, update_wall_boundaries, WallRotation};
pub use generator::{
    carve_corridors, carve_rooms, generate_rooms, DungeonGenerator, GeneratedDungeon,
};
pub use spawner::{load_dungeon, spawn_entities, EnemySpawn, EntityManifest};

use crate::{config, TowerError, TowerResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// A 2D tile coordinate on a dungeon floor.
///
/// # Examples
///
/// ```
/// use treasure_tower::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.cardinal_neighbors().len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the 4 cardinally adjacent positions (no diagonals).
    pub fn cardinal_neighbors(self) -> [Position; 4] {
        [
            Position::new(self.x, self.y - 1),
            Position::new(self.x, self.y + 1),
            Position::new(self.x - 1, self.y),
            Position::new(self.x + 1, self.y),
        ]
    }

    /// Manhattan distance to another position.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }
}

/// The kind of one dungeon tile. Every grid cell holds exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Outside the trimmed dungeon, never drawn or walked
    Empty,
    /// Solid boundary tile
    Wall,
    /// Room interior
    Floor,
    /// Carved connection between rooms
    Corridor,
    /// Exit to the next floor, carved into a wall
    Door,
    /// The tile the player arrives on
    Trapdoor,
    /// The merchant's tile
    Merchant,
}

impl TileKind {
    /// Whether the player can stand on this tile.
    pub fn is_walkable(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Corridor | TileKind::Trapdoor)
    }

    /// Whether this tile renders with the wall sprite family (wall or door).
    pub fn is_wall_like(self) -> bool {
        matches!(self, TileKind::Wall | TileKind::Door)
    }

    /// Whether this tile is open ground for rotation classification.
    pub fn is_open(self) -> bool {
        matches!(self, TileKind::Floor | TileKind::Corridor | TileKind::Trapdoor)
    }
}

/// A rectangular grid of tiles. Always dense: `width * height` cells.
///
/// # Examples
///
/// ```
/// use treasure_tower::{TileGrid, TileKind};
///
/// let grid = TileGrid::filled(10, 8, TileKind::Wall);
/// assert_eq!(grid.get(0, 0), Some(TileKind::Wall));
/// assert_eq!(grid.get(10, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// Creates a grid with every cell set to `kind`.
    pub fn filled(width: u32, height: u32, kind: TileKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![kind; (width * height) as usize],
        }
    }

    /// Grid width in tiles.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Returns the tile at `(x, y)`, or `None` out of bounds.
    pub fn get(&self, x: i32, y: i32) -> Option<TileKind> {
        if self.in_bounds(x, y) {
            Some(self.tiles[(y as u32 * self.width + x as u32) as usize])
        } else {
            None
        }
    }

    /// Sets the tile at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, kind: TileKind) {
        if self.in_bounds(x, y) {
            self.tiles[(y as u32 * self.width + x as u32) as usize] = kind;
        }
    }

    /// Whether the tile at `pos` can be walked on.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.get(pos.x, pos.y).is_some_and(TileKind::is_walkable)
    }

    /// Iterates over `(x, y, kind)` for every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, TileKind)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &kind)| ((i as u32 % width) as i32, (i as u32 / width) as i32, kind))
    }

    /// Counts the cells holding `kind`.
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|&&t| t == kind).count()
    }

    /// Classifies every wall and floor tile for spawning and rendering.
    ///
    /// A wall tile with a wall neighbor both horizontally and vertically
    /// is a corner; other wall tiles are plain walls.
    pub fn census(&self) -> TileCensus {
        let mut census = TileCensus::default();
        for (x, y, kind) in self.cells() {
            match kind {
                TileKind::Wall => {
                    let horizontal = self.get(x - 1, y) == Some(TileKind::Wall)
                        || self.get(x + 1, y) == Some(TileKind::Wall);
                    let vertical = self.get(x, y - 1) == Some(TileKind::Wall)
                        || self.get(x, y + 1) == Some(TileKind::Wall);
                    if horizontal && vertical {
                        census.corners.push(Position::new(x, y));
                    } else {
                        census.walls.push(Position::new(x, y));
                    }
                }
                TileKind::Floor => census.floors.push(Position::new(x, y)),
                _ => {}
            }
        }
        census
    }
}

/// Floor, wall, and corner tile positions sorted out of a grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileCensus {
    pub floors: Vec<Position>,
    pub walls: Vec<Position>,
    pub corners: Vec<Position>,
}

/// An axis-aligned rectangular room in pixel units.
///
/// Rooms only live through generation: once carved into the grid they
/// are no longer consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Room {
    /// Creates a new room from its pixel rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the room in pixel units.
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Center of the room in tile units.
    pub fn center_tile(&self, tile_size: u32) -> Position {
        let (cx, cy) = self.center();
        Position::new((cx / tile_size) as i32, (cy / tile_size) as i32)
    }

    /// The half-open tile-space footprint `(x0..x1, y0..y1)` of this room.
    pub fn tile_bounds(&self, tile_size: u32) -> (i32, i32, i32, i32) {
        (
            (self.x / tile_size) as i32,
            ((self.x + self.width) / tile_size) as i32,
            (self.y / tile_size) as i32,
            ((self.y + self.height) / tile_size) as i32,
        )
    }

    /// Whether two rooms' tile-space footprints overlap.
    ///
    /// Overlap is tested after snapping to tiles so that rooms separated
    /// by less than one tile still count as colliding.
    pub fn overlaps(&self, other: &Room, tile_size: u32) -> bool {
        let (ax0, ax1, ay0, ay1) = self.tile_bounds(tile_size);
        let (bx0, bx1, by0, by1) = other.tile_bounds(tile_size);
        ax0 < bx1 && ax1 > bx0 && ay0 < by1 && ay1 > by0
    }
}

/// Configuration for floor generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible floors
    pub seed: u64,
    /// Floor width in pixels
    pub floor_width: u32,
    /// Floor height in pixels
    pub floor_height: u32,
    /// Side length of one tile in pixels
    pub tile_size: u32,
    /// Number of room placement draws (accepted rooms may be fewer)
    pub room_draws: u32,
    /// Minimum room side in tiles
    pub min_room_tiles: u32,
    /// Maximum room side in tiles
    pub max_room_tiles: u32,
    /// Floor number on which the boss is the sole spawn
    pub final_floor: u32,
}

impl GenerationConfig {
    /// Creates the standard configuration with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            floor_width: config::FLOOR_WIDTH,
            floor_height: config::FLOOR_HEIGHT,
            tile_size: config::TILE_SIZE,
            room_draws: config::NUM_ROOMS,
            min_room_tiles: 3,
            max_room_tiles: 5,
            final_floor: config::FINAL_FLOOR,
        }
    }

    /// Minimum room side in pixels.
    pub fn min_room_size(&self) -> u32 {
        self.min_room_tiles * self.tile_size
    }

    /// Maximum room side in pixels.
    pub fn max_room_size(&self) -> u32 {
        self.max_room_tiles * self.tile_size
    }

    /// Floor dimensions in tiles.
    pub fn grid_size(&self) -> (u32, u32) {
        (
            self.floor_width / self.tile_size,
            self.floor_height / self.tile_size,
        )
    }

    /// Creates a seeded RNG from this configuration.
    pub fn create_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// Rejects configurations that cannot produce a usable floor.
    pub fn validate(&self) -> TowerResult<()> {
        if self.tile_size == 0 {
            return Err(TowerError::GenerationFailed("tile size is zero".into()));
        }
        if self.min_room_tiles < 2 || self.max_room_tiles < self.min_room_tiles {
            return Err(TowerError::GenerationFailed(
                "room size range is degenerate".into(),
            ));
        }
        let needed = (self.max_room_tiles + 2) * self.tile_size;
        if self.floor_width < needed || self.floor_height < needed {
            return Err(TowerError::GenerationFailed(
                "floor too small for buffered room placement".into(),
            ));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_bounds_and_access() {
        let mut grid = TileGrid::filled(4, 3, TileKind::Wall);
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(3, 2));
        assert!(!grid.in_bounds(4, 0));
        assert!(!grid.in_bounds(0, -1));

        grid.set(2, 1, TileKind::Floor);
        assert_eq!(grid.get(2, 1), Some(TileKind::Floor));
        assert_eq!(grid.get(9, 9), None);

        // Out-of-bounds writes must not panic or corrupt the grid.
        grid.set(99, 99, TileKind::Floor);
        assert_eq!(grid.count(TileKind::Floor), 1);
    }

    #[test]
    fn test_walkability() {
        assert!(TileKind::Floor.is_walkable());
        assert!(TileKind::Corridor.is_walkable());
        assert!(TileKind::Trapdoor.is_walkable());
        assert!(!TileKind::Wall.is_walkable());
        assert!(!TileKind::Door.is_walkable());
        assert!(!TileKind::Empty.is_walkable());
        assert!(!TileKind::Merchant.is_walkable());
    }

    #[test]
    fn test_census_classifies_corners() {
        // 3x3 block of walls around a floor: the edge midpoints have a
        // wall neighbor on only one axis, the corners on both.
        let mut grid = TileGrid::filled(3, 3, TileKind::Wall);
        grid.set(1, 1, TileKind::Floor);
        let census = grid.census();

        assert_eq!(census.floors, vec![Position::new(1, 1)]);
        assert_eq!(census.corners.len(), 4);
        assert_eq!(census.walls.len(), 4);
        assert!(census.corners.contains(&Position::new(0, 0)));
        assert!(census.walls.contains(&Position::new(1, 0)));
    }

    #[test]
    fn test_room_geometry() {
        let room = Room::new(32, 32, 64, 48);
        assert_eq!(room.center(), (64, 56));
        assert_eq!(room.center_tile(16), Position::new(4, 3));
        assert_eq!(room.tile_bounds(16), (2, 6, 2, 5));
    }

    #[test]
    fn test_room_overlap_snaps_to_tiles() {
        let a = Room::new(32, 32, 48, 48); // tile columns [2, 5)
        let b = Room::new(79, 32, 48, 48); // starts one pixel into column 4
        let c = Room::new(80, 32, 48, 48); // snaps to column 5, clear of a
        assert!(a.overlaps(&b, 16));
        assert!(!a.overlaps(&c, 16));
    }

    #[test]
    fn test_config_validation() {
        assert!(GenerationConfig::new(7).validate().is_ok());

        let mut tiny = GenerationConfig::new(7);
        tiny.floor_width = 64;
        assert!(tiny.validate().is_err());

        let mut inverted = GenerationConfig::new(7);
        inverted.min_room_tiles = 6;
        assert!(inverted.validate().is_err());
    }
}
