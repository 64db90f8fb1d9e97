//! Session state
//!
//! Everything the game knows lives here: the generated world, the player, the
//! camera, the overlays on screen and the caches the player has changed.
//! Nothing is persisted; a reload starts a fresh session over the same world.

use std::collections::HashMap;

use super::cache::CacheGenerator;
use super::cell::{CellId, Grid};
use super::luck::Luck;
use super::overlay::{OverlayRegistry, SyncReport};
use super::player::{Direction, Player};
use super::view::MapView;
use crate::config::GameConfig;

/// Why an interaction did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Cell is outside the nearby radius
    TooFar,
    /// Nothing held and nothing to pick up
    Empty,
    /// Held token and cache differ in value
    Mismatch { held: u32, found: u32 },
}

/// Things that happened while applying an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlayerMoved { from: CellId, to: CellId },
    ViewSynced(SyncReport),
    Collected { cell: CellId, value: u32 },
    Crafted { cell: CellId, value: u32 },
    Deposited { cell: CellId, value: u32 },
    Rejected { cell: CellId, reason: RejectReason },
    Won { value: u32 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub grid: Grid,
    pub generator: CacheGenerator,
    pub player: Player,
    pub view: MapView,
    pub overlays: OverlayRegistry,
    /// Caches changed by the player this session
    overrides: HashMap<CellId, u32>,
    /// Token in hand
    pub holding: Option<u32>,
    /// Highest token value produced so far
    pub best: u32,
    pub won: bool,
}

impl GameState {
    /// Start a session with a canvas of `width` x `height` CSS pixels
    pub fn new(config: GameConfig, width: f64, height: f64) -> Self {
        let grid = config.grid();
        let player = Player::at(&grid, config.start);
        let view = MapView::new(config.start, config.zoom, width, height);
        let generator =
            CacheGenerator::new(Luck::new(config.seed.clone()), config.spawn_probability);

        let mut state = Self {
            config,
            grid,
            generator,
            player,
            view,
            overlays: OverlayRegistry::new(),
            overrides: HashMap::new(),
            holding: None,
            best: 0,
            won: false,
        };
        state.sync_view();
        state
    }

    /// Current value of a cache, including changes made this session
    pub fn cache_value(&self, cell: CellId) -> u32 {
        self.overrides
            .get(&cell)
            .copied()
            .unwrap_or_else(|| self.generator.value_at(cell))
    }

    pub(crate) fn set_cache_value(&mut self, cell: CellId, value: u32) {
        self.overrides.insert(cell, value);
        self.overlays.set_value(cell, value);
    }

    /// Number of cells changed this session
    pub fn modified_cells(&self) -> usize {
        self.overrides.len()
    }

    pub fn player_cell(&self) -> CellId {
        self.player.cell()
    }

    pub fn is_near(&self, cell: CellId) -> bool {
        cell.is_near(self.player.cell(), self.config.nearby_radius)
    }

    /// Bring the overlays in line with the current view, then restyle
    pub fn sync_view(&mut self) -> SyncReport {
        let range = self.grid.cells_covering(&self.view.bounds());
        let overrides = &self.overrides;
        let generator = &self.generator;
        let report = self.overlays.sync(range, |cell| {
            overrides
                .get(&cell)
                .copied()
                .unwrap_or_else(|| generator.value_at(cell))
        });
        self.restyle();
        log::debug!(
            "View synced: +{} -{} ({} visible)",
            report.added,
            report.removed,
            report.visible
        );
        report
    }

    /// Refresh near/far styling; returns the number of near overlays
    pub fn restyle(&mut self) -> usize {
        self.overlays
            .restyle(self.player.cell(), self.config.nearby_radius)
    }

    pub(crate) fn step_player(&mut self, direction: Direction) -> (CellId, CellId) {
        let from = self.player.cell();
        let to = self.player.step(direction);
        self.restyle();
        (from, to)
    }

    /// One-line status for the HUD
    pub fn status_text(&self) -> String {
        let holding = match self.holding {
            Some(value) => format!("Holding: {}", value),
            None => "Holding: (none)".to_string(),
        };
        if self.won {
            format!("{} | You crafted a {}! You win!", holding, self.best)
        } else {
            holding
        }
    }

    pub(crate) fn record_token(&mut self, value: u32) -> Option<GameEvent> {
        self.best = self.best.max(value);
        if !self.won && value >= self.config.win_threshold {
            self.won = true;
            log::info!("Win threshold reached with a {}", value);
            return Some(GameEvent::Won { value });
        }
        None
    }
}
