//! Keyboard bindings

use crate::sim::{Action, Direction};

/// Map a `KeyboardEvent.key` value to an action
pub fn action_for_key(key: &str) -> Option<Action> {
    let action = match key {
        "ArrowUp" | "w" | "W" => Action::Move(Direction::North),
        "ArrowDown" | "s" | "S" => Action::Move(Direction::South),
        "ArrowRight" | "d" | "D" => Action::Move(Direction::East),
        "ArrowLeft" | "a" | "A" => Action::Move(Direction::West),
        "c" | "C" | "Home" => Action::Recenter,
        _ => return None,
    };
    Some(action)
}
