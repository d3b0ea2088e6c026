#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative maze generator state for Mazewright.
//!
//! The [`World`] owns the configuration, the bound wall prototype and floor,
//! the maze root [`Frame`], the injected random source and the most recently
//! generated maze. Adapters mutate it exclusively through [`apply`] and read
//! it through the [`query`] module. Generation is synchronous: a single
//! `Command::Generate` either replaces the previous maze wholesale or is
//! rejected without touching it.

mod collision;
mod frame;

use std::fmt;

use glam::Vec3;
use mazewright_core::{
    Command, Difficulty, Event, FloorSurface, GenerationError, Grid, GridCoord, LevelSizes,
    WallPlacement, WallPrototype, MIN_TILE_EDGE,
};
use mazewright_system_carving::{carve, open_boundaries};
use mazewright_system_randomness::RandomSource;
use serde::{Deserialize, Serialize};

pub use frame::Frame;

const DEFAULT_FLOOR_HEIGHT: f32 = 13.75;

/// Tunable generator parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Raw dimensions requested for each difficulty.
    pub sizes: LevelSizes,
    /// Vertical placement plane used when `place_at_ground` is disabled.
    pub floor_height: f32,
    /// Places walls on the local `y = 0` plane, ignoring `floor_height`.
    pub place_at_ground: bool,
    /// Offset of grid cell `(0, 0)` relative to the maze root frame.
    pub local_origin: Vec3,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sizes: LevelSizes::default(),
            floor_height: DEFAULT_FLOOR_HEIGHT,
            place_at_ground: true,
            local_origin: Vec3::ZERO,
        }
    }
}

impl GeneratorConfig {
    /// Vertical plane walls and anchors are placed on.
    #[must_use]
    pub fn floor_y(&self) -> f32 {
        if self.place_at_ground {
            0.0
        } else {
            self.floor_height
        }
    }
}

/// World-space extent of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileSize {
    x: f32,
    z: f32,
}

impl Default for TileSize {
    fn default() -> Self {
        Self { x: 1.0, z: 1.0 }
    }
}

impl TileSize {
    /// Creates a tile size, clamping each edge to the minimum tile edge.
    #[must_use]
    pub fn new(x: f32, z: f32) -> Self {
        Self {
            x: x.max(MIN_TILE_EDGE),
            z: z.max(MIN_TILE_EDGE),
        }
    }

    /// Derives the tile size from a prototype's rendered bounds.
    ///
    /// Prototypes without bounds keep the unit tile.
    #[must_use]
    pub fn from_prototype(prototype: &WallPrototype) -> Self {
        prototype
            .bounds
            .map_or_else(Self::default, |bounds| Self::new(bounds.x, bounds.z))
    }

    /// Extent along the world x axis.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Extent along the world z axis.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }
}

/// Represents the authoritative maze generator state.
pub struct World {
    config: GeneratorConfig,
    root: Frame,
    prototype: Option<WallPrototype>,
    floor: Option<FloorSurface>,
    tile_size: TileSize,
    rng: Box<dyn RandomSource>,
    maze: Option<Maze>,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("root", &self.root)
            .field("prototype", &self.prototype)
            .field("floor", &self.floor)
            .field("tile_size", &self.tile_size)
            .field("maze", &self.maze)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Maze {
    difficulty: Difficulty,
    grid: Grid,
    start: GridCoord,
    exit: GridCoord,
    tile_size: TileSize,
    placements: Vec<WallPlacement>,
}

impl Maze {
    fn local_point(&self, config: &GeneratorConfig, cell: GridCoord, y_offset: f32) -> Vec3 {
        lattice_point(config, self.tile_size, cell, y_offset)
    }
}

/// Local position of `cell` on the tile lattice, raised by `y_offset` above the floor plane.
fn lattice_point(
    config: &GeneratorConfig,
    tile: TileSize,
    cell: GridCoord,
    y_offset: f32,
) -> Vec3 {
    config.local_origin
        + Vec3::new(
            cell.x() as f32 * tile.x(),
            config.floor_y() + y_offset,
            cell.y() as f32 * tile.z(),
        )
}

impl World {
    /// Creates an empty generator placed under `root`, drawing from `rng`.
    ///
    /// No prototype or floor is bound yet; bind them with
    /// [`Command::BindWallPrototype`] and [`Command::BindFloor`].
    #[must_use]
    pub fn new(config: GeneratorConfig, root: Frame, rng: Box<dyn RandomSource>) -> Self {
        Self {
            config,
            root,
            prototype: None,
            floor: None,
            tile_size: TileSize::default(),
            rng,
            maze: None,
        }
    }

    /// Anchors sit on the lattice recorded when `maze` was built.
    fn anchor(&self, maze: &Maze, cell: GridCoord, y_offset: f32) -> Vec3 {
        self.root.transform_point(maze.local_point(&self.config, cell, y_offset))
    }

    fn placement_for(&self, cell: GridCoord, prototype: &WallPrototype) -> WallPlacement {
        let local_position = lattice_point(&self.config, self.tile_size, cell, 0.0);
        WallPlacement {
            cell,
            local_position,
            world_position: self.root.transform_point(local_position),
            rotation: prototype.rotation,
            scale: prototype.scale,
            collider: collision::wall_collider(prototype),
        }
    }

    fn generate(&mut self, difficulty: Difficulty, out_events: &mut Vec<Event>) {
        let Some(prototype) = self.prototype else {
            let reason = GenerationError::MissingWallPrototype;
            log::error!("maze generation for {difficulty:?} aborted: {reason}");
            out_events.push(Event::GenerationRejected { reason });
            return;
        };

        let size = self.config.sizes.size_for(difficulty);
        log::debug!(
            "generating {difficulty:?} maze at {}x{}",
            size.width(),
            size.height()
        );

        out_events.push(Event::GeneratedGeometryCleared);

        let mut grid = carve(size, self.rng.as_mut());
        open_boundaries(&mut grid);

        let placements: Vec<WallPlacement> = grid
            .wall_cells()
            .map(|cell| self.placement_for(cell, &prototype))
            .collect();
        for placement in &placements {
            out_events.push(Event::WallPlaced {
                placement: *placement,
            });
        }

        let start = size.start();
        let exit = size.exit();
        out_events.push(Event::MazeGenerated {
            size,
            start,
            exit,
            walls: placements.len(),
        });
        log::info!(
            "generated {difficulty:?} maze {}x{} with {} walls",
            size.width(),
            size.height(),
            placements.len()
        );

        self.maze = Some(Maze {
            difficulty,
            grid,
            start,
            exit,
            tile_size: self.tile_size,
            placements,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Generate { difficulty } => world.generate(difficulty, out_events),
        Command::BindWallPrototype { prototype } => {
            world.tile_size = TileSize::from_prototype(&prototype);
            world.prototype = Some(prototype);
            out_events.push(Event::WallPrototypeBound {
                tile_size_x: world.tile_size.x(),
                tile_size_z: world.tile_size.z(),
            });
        }
        Command::ReleaseWallPrototype => {
            if world.prototype.take().is_some() {
                out_events.push(Event::WallPrototypeReleased);
            }
        }
        Command::BindFloor { mut floor } => {
            if let Some(collider) = collision::ensure_floor_collider(&mut floor) {
                out_events.push(Event::FloorColliderAttached { collider });
            }
            world.floor = Some(floor);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec3;
    use mazewright_core::{
        Difficulty, FloorSurface, GenerationState, Grid, GridCoord, WallPlacement, WallPrototype,
    };

    use super::{Frame, GeneratorConfig, TileSize, World};

    /// Reports whether a maze has been generated.
    #[must_use]
    pub fn state(world: &World) -> GenerationState {
        if world.maze.is_some() {
            GenerationState::Generated
        } else {
            GenerationState::Empty
        }
    }

    /// World-space anchor of the start cell raised by `y_offset`.
    ///
    /// Returns `None` until the first successful generation.
    #[must_use]
    pub fn start_world_position(world: &World, y_offset: f32) -> Option<Vec3> {
        world
            .maze
            .as_ref()
            .map(|maze| world.anchor(maze, maze.start, y_offset))
    }

    /// World-space anchor of the exit cell raised by `y_offset`.
    ///
    /// Returns `None` until the first successful generation.
    #[must_use]
    pub fn exit_world_position(world: &World, y_offset: f32) -> Option<Vec3> {
        world
            .maze
            .as_ref()
            .map(|maze| world.anchor(maze, maze.exit, y_offset))
    }

    /// Walkable grid of the current maze.
    #[must_use]
    pub fn grid(world: &World) -> Option<&Grid> {
        world.maze.as_ref().map(|maze| &maze.grid)
    }

    /// Difficulty the current maze was generated for.
    #[must_use]
    pub fn difficulty(world: &World) -> Option<Difficulty> {
        world.maze.as_ref().map(|maze| maze.difficulty)
    }

    /// Start cell of the current maze.
    #[must_use]
    pub fn start_cell(world: &World) -> Option<GridCoord> {
        world.maze.as_ref().map(|maze| maze.start)
    }

    /// Exit cell of the current maze.
    #[must_use]
    pub fn exit_cell(world: &World) -> Option<GridCoord> {
        world.maze.as_ref().map(|maze| maze.exit)
    }

    /// Wall placements of the current maze, in emission order.
    #[must_use]
    pub fn wall_placements(world: &World) -> &[WallPlacement] {
        world
            .maze
            .as_ref()
            .map(|maze| maze.placements.as_slice())
            .unwrap_or(&[])
    }

    /// Tile geometry derived from the bound prototype.
    #[must_use]
    pub fn tile_size(world: &World) -> TileSize {
        world.tile_size
    }

    /// Vertical placement plane.
    #[must_use]
    pub fn floor_y(world: &World) -> f32 {
        world.config.floor_y()
    }

    /// Bound floor surface, including any collider attached on binding.
    #[must_use]
    pub fn floor(world: &World) -> Option<&FloorSurface> {
        world.floor.as_ref()
    }

    /// Bound wall prototype.
    #[must_use]
    pub fn wall_prototype(world: &World) -> Option<&WallPrototype> {
        world.prototype.as_ref()
    }

    /// Frame the maze is placed under.
    #[must_use]
    pub fn root_frame(world: &World) -> &Frame {
        &world.root
    }

    /// Generator configuration.
    #[must_use]
    pub fn config(world: &World) -> &GeneratorConfig {
        &world.config
    }
}
