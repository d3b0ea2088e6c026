#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Mazewright generator.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that describe the
//! geometry an external scene builder should realise. The grid model and the
//! placement instructions live here so that every crate agrees on them.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest extent, in cells, that a maze grid may have along either axis.
pub const MIN_GRID_EXTENT: u32 = 5;

/// Smallest tile edge accepted when deriving tile geometry from prototype bounds.
pub const MIN_TILE_EDGE: f32 = 0.01;

/// Commands that express all permissible generator mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the maze for the provided difficulty, replacing any previous maze.
    Generate {
        /// Difficulty whose configured dimensions drive the new grid.
        difficulty: Difficulty,
    },
    /// Binds the prototype that wall instances are copied from.
    BindWallPrototype {
        /// Descriptor of the wall tile to instance.
        prototype: WallPrototype,
    },
    /// Releases the bound wall prototype, disabling further generation.
    ReleaseWallPrototype,
    /// Binds the shared floor surface reused by every generated maze.
    BindFloor {
        /// Descriptor of the pre-existing floor.
        floor: FloorSurface,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Signals that every previously generated wall instance must be discarded.
    GeneratedGeometryCleared,
    /// Requests that a wall instance be realised with the provided placement.
    WallPlaced {
        /// Transform and collision volume of the new wall instance.
        placement: WallPlacement,
    },
    /// Confirms that a new maze replaced the previous one.
    MazeGenerated {
        /// Normalised dimensions of the generated grid.
        size: GridSize,
        /// Grid cell the player enters through.
        start: GridCoord,
        /// Grid cell adjacent to the exit opening.
        exit: GridCoord,
        /// Number of wall placements emitted for the maze.
        walls: usize,
    },
    /// Reports that a generation request was rejected.
    GenerationRejected {
        /// Specific reason the generation failed.
        reason: GenerationError,
    },
    /// Reports that a wall prototype was bound and tile geometry re-derived.
    WallPrototypeBound {
        /// Tile extent along the world x axis.
        tile_size_x: f32,
        /// Tile extent along the world z axis.
        tile_size_z: f32,
    },
    /// Reports that the wall prototype was released.
    WallPrototypeReleased,
    /// Reports that the floor lacked a collision volume and one was attached.
    FloorColliderAttached {
        /// Collision volume attached to the floor.
        collider: ColliderShape,
    },
}

/// Difficulty levels selectable by the level controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Small maze used for the first level.
    #[default]
    Simple,
    /// Large maze used for every later level.
    Hard,
}

impl Difficulty {
    /// Maps a one-based level index onto a difficulty.
    ///
    /// Indices of one or lower select [`Difficulty::Simple`]; anything higher
    /// selects [`Difficulty::Hard`].
    #[must_use]
    pub const fn from_level_index(index: i32) -> Self {
        if index <= 1 {
            Self::Simple
        } else {
            Self::Hard
        }
    }
}

/// Location of a single grid cell expressed as x (column) and y (row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    x: u32,
    y: u32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Offsets the coordinate, returning `None` when either axis would go negative.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Self { x, y })
    }

    /// Cell exactly halfway between two coordinates on the same axis.
    #[must_use]
    pub const fn midpoint(self, other: GridCoord) -> Self {
        Self {
            x: (self.x + other.x) / 2,
            y: (self.y + other.y) / 2,
        }
    }

    /// Reports whether both axes are odd, which marks a room cell.
    #[must_use]
    pub const fn is_odd(&self) -> bool {
        self.x % 2 == 1 && self.y % 2 == 1
    }
}

/// Dimensions of a maze grid, always odd and at least [`MIN_GRID_EXTENT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Normalises raw dimensions: clamps to [`MIN_GRID_EXTENT`] and rounds even
    /// values up to the next odd value.
    #[must_use]
    pub const fn normalized(width: u32, height: u32) -> Self {
        Self {
            width: normalize_extent(width),
            height: normalize_extent(height),
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Cell the player starts in.
    #[must_use]
    pub const fn start(&self) -> GridCoord {
        GridCoord::new(1, 1)
    }

    /// Cell adjacent to the exit opening.
    #[must_use]
    pub const fn exit(&self) -> GridCoord {
        GridCoord::new(self.width - 2, self.height - 2)
    }

    /// Boundary cell forced open on the left edge as the entrance.
    #[must_use]
    pub const fn entrance_opening(&self) -> GridCoord {
        GridCoord::new(0, 1)
    }

    /// Boundary cell forced open on the right edge as the exit.
    #[must_use]
    pub const fn exit_opening(&self) -> GridCoord {
        GridCoord::new(self.width - 1, self.height - 2)
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: GridCoord) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Reports whether the coordinate lies strictly inside the boundary ring.
    #[must_use]
    pub const fn is_interior(&self, cell: GridCoord) -> bool {
        cell.x > 0 && cell.x < self.width - 1 && cell.y > 0 && cell.y < self.height - 1
    }

    /// Iterates the odd interior room cells in row-major order.
    pub fn room_cells(&self) -> impl Iterator<Item = GridCoord> {
        let width = self.width;
        (1..self.height - 1)
            .step_by(2)
            .flat_map(move |y| (1..width - 1).step_by(2).map(move |x| GridCoord::new(x, y)))
    }

    /// Number of room cells inside the grid.
    #[must_use]
    pub const fn room_count(&self) -> usize {
        ((self.width as usize - 1) / 2) * ((self.height as usize - 1) / 2)
    }
}

const fn normalize_extent(value: u32) -> u32 {
    let clamped = if value < MIN_GRID_EXTENT {
        MIN_GRID_EXTENT
    } else {
        value
    };
    if clamped % 2 == 0 {
        clamped + 1
    } else {
        clamped
    }
}

/// Configured raw dimensions for every difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSizes {
    /// Requested width of the simple maze.
    pub simple_width: u32,
    /// Requested height of the simple maze.
    pub simple_height: u32,
    /// Requested width of the hard maze.
    pub hard_width: u32,
    /// Requested height of the hard maze.
    pub hard_height: u32,
}

impl Default for LevelSizes {
    fn default() -> Self {
        Self {
            simple_width: 15,
            simple_height: 15,
            hard_width: 31,
            hard_height: 31,
        }
    }
}

impl LevelSizes {
    /// Resolves the normalised grid size for the provided difficulty.
    #[must_use]
    pub const fn size_for(&self, difficulty: Difficulty) -> GridSize {
        match difficulty {
            Difficulty::Simple => GridSize::normalized(self.simple_width, self.simple_height),
            Difficulty::Hard => GridSize::normalized(self.hard_width, self.hard_height),
        }
    }
}

/// Dense walkable/wall grid indexed by [`GridCoord`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: GridSize,
    walkable: Vec<bool>,
}

impl Grid {
    /// Allocates a grid in which every cell is a wall.
    #[must_use]
    pub fn solid(size: GridSize) -> Self {
        Self {
            size,
            walkable: vec![false; size.cell_count()],
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Reports whether the cell is walkable. Cells outside the grid are walls.
    #[must_use]
    pub fn is_walkable(&self, cell: GridCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.walkable.get(index).copied())
            .unwrap_or(false)
    }

    /// Marks the cell as walkable or wall. Cells outside the grid are ignored.
    pub fn set_walkable(&mut self, cell: GridCoord, walkable: bool) {
        if let Some(index) = self.index(cell) {
            self.walkable[index] = walkable;
        }
    }

    /// Iterates every cell with its walkability, row by row from y = 0.
    pub fn cells(&self) -> impl Iterator<Item = (GridCoord, bool)> + '_ {
        let width = self.size.width();
        self.walkable.iter().enumerate().map(move |(index, walkable)| {
            let x = index as u32 % width;
            let y = index as u32 / width;
            (GridCoord::new(x, y), *walkable)
        })
    }

    /// Iterates the cells that remain walls, row by row from y = 0.
    pub fn wall_cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.cells()
            .filter_map(|(cell, walkable)| (!walkable).then_some(cell))
    }

    /// Number of walkable cells.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|walkable| **walkable).count()
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if self.size.contains(cell) {
            let width = usize::try_from(self.size.width()).ok()?;
            let x = usize::try_from(cell.x()).ok()?;
            let y = usize::try_from(cell.y()).ok()?;
            Some(y * width + x)
        } else {
            None
        }
    }
}

/// Collision volume attached to placed geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderShape {
    /// Axis-aligned box matching the instance bounds.
    Box,
    /// Collision volume derived from the render mesh.
    Mesh {
        /// Whether the mesh is treated as a convex hull.
        convex: bool,
    },
}

/// Descriptor of the wall tile that generated walls are copied from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallPrototype {
    /// World-space size of the rendered bounding box, if the prototype renders anything.
    pub bounds: Option<Vec3>,
    /// Local rotation copied onto every instance.
    pub rotation: Quat,
    /// Local scale copied onto every instance.
    pub scale: Vec3,
    /// Collision volume already carried by the prototype.
    pub collider: Option<ColliderShape>,
}

impl Default for WallPrototype {
    fn default() -> Self {
        Self {
            bounds: Some(Vec3::ONE),
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            collider: None,
        }
    }
}

impl WallPrototype {
    /// Creates a prototype with the provided bounds and identity transform.
    #[must_use]
    pub fn with_bounds(bounds: Vec3) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }
}

/// Descriptor of the pre-existing floor surface shared by every maze.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSurface {
    /// Collision volume carried by the floor, if any.
    pub collider: Option<ColliderShape>,
}

/// Placement instruction for a single wall instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallPlacement {
    /// Grid cell the wall occupies.
    pub cell: GridCoord,
    /// Position relative to the maze root frame.
    pub local_position: Vec3,
    /// Position after applying the maze root frame.
    pub world_position: Vec3,
    /// Local rotation copied from the prototype.
    pub rotation: Quat,
    /// Local scale copied from the prototype.
    pub scale: Vec3,
    /// Collision volume the instance must carry.
    pub collider: ColliderShape,
}

/// Externally observable state of the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenerationState {
    /// No maze has been generated yet.
    Empty,
    /// A maze and its placement instructions are available.
    Generated,
}

/// Reasons a generation request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum GenerationError {
    /// No wall prototype is bound, so walls cannot be instanced.
    #[error("no wall prototype is bound; bind one before generating")]
    MissingWallPrototype,
}
