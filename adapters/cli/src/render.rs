use std::fmt::Write as _;

use mazewright_core::{Grid, GridCoord, WallPlacement};

const WALL: char = '#';
const OPEN: char = ' ';
const START: char = 'S';
const EXIT: char = 'E';

/// Draws the grid with the highest row first so +y points up the screen.
pub(crate) fn ascii(grid: &Grid, start: GridCoord, exit: GridCoord) -> String {
    let size = grid.size();
    let mut out = String::with_capacity((size.width() as usize + 1) * size.height() as usize);
    for y in (0..size.height()).rev() {
        for x in 0..size.width() {
            let cell = GridCoord::new(x, y);
            let glyph = if cell == start {
                START
            } else if cell == exit {
                EXIT
            } else if grid.is_walkable(cell) {
                OPEN
            } else {
                WALL
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// One line per wall placement, in emission order.
pub(crate) fn placements(placements: &[WallPlacement]) -> String {
    let mut out = String::new();
    for placement in placements {
        let position = placement.world_position;
        let _ = writeln!(
            out,
            "wall ({}, {}) at ({:.3}, {:.3}, {:.3}) collider {:?}",
            placement.cell.x(),
            placement.cell.y(),
            position.x,
            position.y,
            position.z,
            placement.collider,
        );
    }
    out
}
