//! Player actions
//!
//! Every input (button, key, click, drag, resize) becomes an `Action`.
//! `apply` is the only way the session changes after creation.

use glam::DVec2;

use super::cell::CellId;
use super::player::Direction;
use super::state::{GameEvent, GameState, RejectReason};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Step the player one tile
    Move(Direction),
    /// Center the map on the player
    Recenter,
    /// Drag the map by a screen delta in CSS pixels
    Pan(DVec2),
    /// Canvas changed size (CSS pixels)
    Resize { width: f64, height: f64 },
    /// Click on a cell
    Interact(CellId),
}

/// Apply one action and report what happened
pub fn apply(state: &mut GameState, action: Action) -> Vec<GameEvent> {
    let mut events = Vec::new();
    match action {
        Action::Move(direction) => {
            let (from, to) = state.step_player(direction);
            log::debug!("Player moved {} to {}", direction.as_str(), to);
            events.push(GameEvent::PlayerMoved { from, to });
        }
        Action::Recenter => {
            state.view.center = state.player.position(&state.grid);
            events.push(GameEvent::ViewSynced(state.sync_view()));
        }
        Action::Pan(delta) => {
            if delta != DVec2::ZERO {
                state.view.pan_by_pixels(delta);
                events.push(GameEvent::ViewSynced(state.sync_view()));
            }
        }
        Action::Resize { width, height } => {
            state.view.resize(width, height);
            events.push(GameEvent::ViewSynced(state.sync_view()));
        }
        Action::Interact(cell) => interact(state, cell, &mut events),
    }
    events
}

fn interact(state: &mut GameState, cell: CellId, events: &mut Vec<GameEvent>) {
    if !state.is_near(cell) {
        events.push(GameEvent::Rejected {
            cell,
            reason: RejectReason::TooFar,
        });
        return;
    }

    let found = state.cache_value(cell);
    match (state.holding, found) {
        (None, 0) => events.push(GameEvent::Rejected {
            cell,
            reason: RejectReason::Empty,
        }),
        (None, value) => {
            state.holding = Some(value);
            state.set_cache_value(cell, 0);
            events.push(GameEvent::Collected { cell, value });
            events.extend(state.record_token(value));
        }
        (Some(held), 0) => {
            state.holding = None;
            state.set_cache_value(cell, held);
            events.push(GameEvent::Deposited { cell, value: held });
        }
        (Some(held), value) if held == value => {
            let crafted = held * 2;
            state.holding = None;
            state.set_cache_value(cell, crafted);
            events.push(GameEvent::Crafted {
                cell,
                value: crafted,
            });
            events.extend(state.record_token(crafted));
        }
        (Some(held), value) => events.push(GameEvent::Rejected {
            cell,
            reason: RejectReason::Mismatch { held, found: value },
        }),
    }
}
