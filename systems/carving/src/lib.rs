#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure maze carving system.
//!
//! Carving runs a randomized depth-first backtracker over the odd "room"
//! cells of a [`Grid`]. Rooms two cells apart are joined by opening the
//! connector cell between them, which yields a spanning tree: every room is
//! reachable from the start and no loops exist. Boundary openings are punched
//! separately so callers can inspect the tree before the entrance and exit are
//! cut into the outer ring.

use mazewright_core::{Grid, GridCoord, GridSize};
use mazewright_system_randomness::RandomSource;

/// Neighbour directions in the order candidates are collected: up, down, left, right.
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];

/// Distance between adjacent room cells.
const ROOM_STRIDE: i32 = 2;

/// Carves a perfect maze over a freshly allocated grid.
///
/// All odd interior cells start walkable, everything else starts as wall.
/// The explicit stack is seeded with the start cell `(1, 1)`. On each pass the
/// top cell either backtracks (no unvisited room two steps away) or opens the
/// connector towards one unvisited neighbour chosen through `rng`.
pub fn carve<R>(size: GridSize, rng: &mut R) -> Grid
where
    R: RandomSource + ?Sized,
{
    let mut grid = Grid::solid(size);
    for room in size.room_cells() {
        grid.set_walkable(room, true);
    }

    let mut visited = Visited::new(size);
    let start = size.start();
    let mut stack = vec![start];
    visited.mark(start);

    let mut candidates: Vec<GridCoord> = Vec::with_capacity(DIRECTIONS.len());
    while let Some(&current) = stack.last() {
        candidates.clear();
        candidates.extend(
            DIRECTIONS
                .iter()
                .filter_map(|&(dx, dy)| current.offset(dx * ROOM_STRIDE, dy * ROOM_STRIDE))
                .filter(|neighbour| size.is_interior(*neighbour) && !visited.contains(*neighbour)),
        );

        if candidates.is_empty() {
            let _ = stack.pop();
            continue;
        }

        let index = rng.pick(candidates.len()).min(candidates.len() - 1);
        let next = candidates[index];
        grid.set_walkable(current.midpoint(next), true);
        visited.mark(next);
        stack.push(next);
    }

    log::debug!(
        "carved {}x{} maze with {} walkable cells",
        size.width(),
        size.height(),
        grid.walkable_count()
    );
    grid
}

/// Forces the entrance `(0, 1)` and exit `(width - 1, height - 2)` open.
pub fn open_boundaries(grid: &mut Grid) {
    let size = grid.size();
    grid.set_walkable(size.entrance_opening(), true);
    grid.set_walkable(size.exit_opening(), true);
}

/// Dense visited set keyed by grid coordinate.
struct Visited {
    width: usize,
    cells: Vec<bool>,
}

impl Visited {
    fn new(size: GridSize) -> Self {
        Self {
            width: size.width() as usize,
            cells: vec![false; size.cell_count()],
        }
    }

    fn index(&self, cell: GridCoord) -> usize {
        cell.y() as usize * self.width + cell.x() as usize
    }

    fn mark(&mut self, cell: GridCoord) {
        let index = self.index(cell);
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = true;
        }
    }

    fn contains(&self, cell: GridCoord) -> bool {
        self.cells.get(self.index(cell)).copied().unwrap_or(false)
    }
}
