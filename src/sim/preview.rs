//! Text rendering of the world around the player
//!
//! Used by the native binary. North is the first line.

use super::state::GameState;

fn glyph(value: u32) -> char {
    match value {
        0 => '.',
        1 => '1',
        2 => '2',
        4 => '4',
        8 => '8',
        _ => '*',
    }
}

/// Square of side `2 * radius + 1` centered on the player.
///
/// `@` marks the player, digits mark caches, `*` marks crafted values above 8.
/// Cells within interaction range are wrapped in brackets.
pub fn ascii_map(state: &GameState, radius: i32) -> String {
    let center = state.player_cell();
    let mut out = String::new();
    for di in (-radius..=radius).rev() {
        for dj in -radius..=radius {
            let cell = center.offset(di, dj);
            let mark = if cell == center {
                '@'
            } else {
                glyph(state.cache_value(cell))
            };
            if state.is_near(cell) {
                out.push('[');
                out.push(mark);
                out.push(']');
            } else {
                out.push(' ');
                out.push(mark);
                out.push(' ');
            }
        }
        out.push('\n');
    }
    out
}
