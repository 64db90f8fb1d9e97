//! Deterministic world model
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Cache contents are a function of cell indices and the seed only
//! - Stable iteration order (overlays keyed by cell)
//! - No rendering or platform dependencies

pub mod actions;
pub mod cache;
pub mod cell;
pub mod geo;
pub mod luck;
pub mod overlay;
pub mod player;
pub mod preview;
pub mod state;
pub mod view;

pub use actions::{Action, apply};
pub use cache::{CACHE_VALUES, CacheGenerator};
pub use cell::{CellId, CellRange, Grid};
pub use geo::{LatLng, LatLngBounds};
pub use luck::{Luck, luck};
pub use overlay::{Overlay, OverlayRegistry, SyncReport};
pub use player::{Direction, Player};
pub use preview::ascii_map;
pub use state::{GameEvent, GameState, RejectReason};
pub use view::MapView;
