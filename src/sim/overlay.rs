//! Overlay registry
//!
//! One overlay per visible cell. A sync replaces the visible range: overlays
//! leaving the range are dropped, overlays entering it are created, and the
//! ones that stay are left untouched.

use std::collections::BTreeMap;

use super::cell::{CellId, CellRange};

/// Visual record of one drawn cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub cell: CellId,
    /// Cache value shown in the label (0 = empty)
    pub value: u32,
    /// Bold outline when near the player
    pub near: bool,
}

/// Outcome of one sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: usize,
    pub removed: usize,
    pub visible: usize,
}

/// All overlays currently on screen, keyed by cell (stable iteration order)
#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    overlays: BTreeMap<CellId, Overlay>,
    range: Option<CellRange>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the registry hold exactly the cells of `range`.
    ///
    /// `value_of` is only called for cells that were not already drawn.
    pub fn sync<F>(&mut self, range: CellRange, mut value_of: F) -> SyncReport
    where
        F: FnMut(CellId) -> u32,
    {
        let before = self.overlays.len();
        self.overlays.retain(|cell, _| range.contains(*cell));
        let removed = before - self.overlays.len();

        let mut added = 0;
        for cell in range.iter() {
            if self.overlays.contains_key(&cell) {
                continue;
            }
            self.overlays.insert(
                cell,
                Overlay {
                    cell,
                    value: value_of(cell),
                    near: false,
                },
            );
            added += 1;
        }

        self.range = Some(range);
        SyncReport {
            added,
            removed,
            visible: self.overlays.len(),
        }
    }

    /// Recompute the near flag of every overlay; returns how many are near
    pub fn restyle(&mut self, player: CellId, radius: u32) -> usize {
        let mut near = 0;
        for overlay in self.overlays.values_mut() {
            overlay.near = overlay.cell.is_near(player, radius);
            if overlay.near {
                near += 1;
            }
        }
        near
    }

    /// Update the label of a drawn cell; no-op if the cell is off screen
    pub fn set_value(&mut self, cell: CellId, value: u32) {
        if let Some(overlay) = self.overlays.get_mut(&cell) {
            overlay.value = value;
        }
    }

    pub fn get(&self, cell: CellId) -> Option<&Overlay> {
        self.overlays.get(&cell)
    }

    pub fn contains(&self, cell: CellId) -> bool {
        self.overlays.contains_key(&cell)
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Range of the last sync
    pub fn range(&self) -> Option<CellRange> {
        self.range
    }

    pub fn keys(&self) -> impl Iterator<Item = CellId> + '_ {
        self.overlays.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.values()
    }
}
