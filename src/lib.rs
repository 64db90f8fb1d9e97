//! Cache Crafter - A grid-based geocaching game
//!
//! Core modules:
//! - `sim`: Deterministic world model (cells, luck, overlays, player, crafting)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser DOM helpers and input mapping
//! - `config`: Game configuration (JSON + URL query overrides)

pub mod config;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, GameConfig};

/// Game configuration constants
pub mod consts {
    /// Classroom starting point (Santa Cruz, CA)
    pub const START_LAT: f64 = 36.997936938057016;
    pub const START_LNG: f64 = -122.05703507501151;

    /// Grid origin: cell (0, 0) has its south-west corner here
    pub const NULL_ISLAND_LAT: f64 = 0.0;
    pub const NULL_ISLAND_LNG: f64 = 0.0;

    /// The only zoom level the map allows
    pub const GAME_ZOOM: u8 = 19;
    /// Side length of one cell in degrees
    pub const TILE_DEG: f64 = 1e-4;
    /// Manhattan radius (in cells) the player can interact with
    pub const NEARBY_RADIUS: u32 = 3;
    /// Chance that a cell holds a cache
    pub const CACHE_SPAWN_PROBABILITY: f64 = 0.35;
    /// Crafting a token of this value wins the game
    pub const WIN_THRESHOLD: u32 = 32;
    /// Default luck seed
    pub const LUCK_SEED: &str = "cache-crafter";

    /// Slippy-map tile size in pixels
    pub const MAP_TILE_PX: f64 = 256.0;

    /// Accepted zoom band
    pub const MIN_ZOOM: u8 = 10;
    pub const MAX_ZOOM: u8 = 22;
    /// Smallest cell size in degrees; keeps every on-planet cell index within
    /// a few hundred million, far inside `i32`
    pub const MIN_TILE_DEG: f64 = 1e-6;
    /// Largest cell size in degrees
    pub const MAX_TILE_DEG: f64 = 1.0;
    /// Cells must be at least this many CSS pixels wide, so a 4K canvas
    /// covers at most ~130k of them
    pub const MIN_CELL_PX: f64 = 8.0;
}

/// Pixels per degree at a slippy-map zoom level
#[inline]
pub fn pixels_per_degree(zoom: u8) -> f64 {
    consts::MAP_TILE_PX * f64::from(1u32 << zoom.min(30)) / 360.0
}

/// Manhattan distance between two index pairs
#[inline]
pub fn manhattan(a: (i32, i32), b: (i32, i32)) -> u32 {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}
