//! # Treasure Tower
//!
//! Core systems for a dice-driven dungeon crawler.
//!
//! ## Architecture Overview
//!
//! The crate is split along the two load-bearing subsystems of the game,
//! with a thin session layer on top:
//!
//! - **Dungeon**: tile-grid substrate, room-and-corridor generation, the
//!   wall-boundary trimming pass, and entity spawning/reloading
//! - **Combat**: the shared animated-actor state machine, the dice roll
//!   simulator, and the turn sequencer that coordinates them
//! - **Session**: the long-lived player state (health, gold, consumables),
//!   the floor counter, and the merchant shop modal
//! - **Exploration**: grid movement, contact checks, and door gating
//!
//! Rendering, audio, and window management live in a separate front end
//! that consumes grids, frame indices, and positions from this crate.
//! Everything here is single-threaded and frame-stepped: callers advance
//! state by passing a monotonically increasing millisecond timestamp into
//! the per-tick update functions.

pub mod combat;
pub mod dungeon;
pub mod exploration;
pub mod session;

pub use combat::{
    ActorState, AnimatedActor, AttackOutcome, CombatEnemy, CombatOutcome, CombatPhase,
    CombatPlayer, CombatResolver, DiceFrame, DicePhase, DiceRoller, EnemyArchetype, FrameSet,
};
pub use dungeon::{
    DungeonGenerator, EnemySpawn, EntityManifest, GeneratedDungeon, GenerationConfig, Position,
    Room, TileCensus, TileGrid, TileKind, WallRotation,
};
pub use exploration::{Direction, DoorOutcome, ExplorationEnemy};
pub use session::{PlayerState, SessionContext, ShopEvent, ShopInput, ShopItem, ShopMenu};

/// Core error type for the Treasure Tower engine.
#[derive(thiserror::Error, Debug)]
pub enum TowerError {
    /// Serialization/deserialization of a dungeon snapshot failed
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A component was driven into an inconsistent state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Dungeon generation produced a degenerate floor
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// An actor archetype is missing required configuration (stats or frames)
    #[error("Invalid archetype: {0}")]
    InvalidArchetype(String),
}

/// Result type used throughout the Treasure Tower codebase.
pub type TowerResult<T> = Result<T, TowerError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Floor width in pixels
    pub const FLOOR_WIDTH: u32 = 500;

    /// Floor height in pixels
    pub const FLOOR_HEIGHT: u32 = 500;

    /// Side length of one square tile in pixels
    pub const TILE_SIZE: u32 = 16;

    /// Number of room placement draws per floor
    pub const NUM_ROOMS: u32 = 5;

    /// Floor on which the boss is the sole spawn
    pub const FINAL_FLOOR: u32 = 10;

    /// Default delay between animation frames in milliseconds
    pub const FRAME_DELAY_MS: u64 = 250;

    /// Default player maximum health
    pub const PLAYER_MAX_HEALTH: i32 = 150;

    /// Player base attack damage before dice
    pub const PLAYER_BASE_DAMAGE: i32 = 10;

    /// Health restored by one potion
    pub const POTION_HEAL: i32 = 50;

    /// Delay after a terminal combat animation before control returns, ms
    pub const COMBAT_EXIT_DELAY_MS: u64 = 2000;

    /// Frames per second target for the front-end loop
    pub const TARGET_FPS: u64 = 60;
}
