#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level director that rebuilds the maze and moves the player to its start.

use glam::{Quat, Vec3};
use mazewright_core::{Command, Difficulty, Event, GenerationError};
use mazewright_world::{self as world, query, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SPAWN_Y_OFFSET: f32 = 0.6;

/// Capability handle used to reposition the player.
///
/// Implementations are responsible for suspending any movement controller
/// that would otherwise resist the jump.
pub trait PlayerMover {
    /// Places the player at `position` facing `rotation`.
    fn teleport(&mut self, position: Vec3, rotation: Quat);
}

/// Configuration parameters required to construct the level director.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Difficulty loaded by [`LevelDirector::start`].
    pub start_difficulty: Difficulty,
    /// Height added to the start anchor so the player clears the floor.
    pub spawn_y_offset: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            start_difficulty: Difficulty::Simple,
            spawn_y_offset: DEFAULT_SPAWN_Y_OFFSET,
        }
    }
}

/// Reasons a level could not be loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The world rejected the generation request.
    #[error("maze generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// The world accepted the request but exposes no start anchor.
    #[error("generated maze has no start anchor")]
    MissingStart,
}

/// Loads levels by difficulty or index and spawns the player at the start.
#[derive(Clone, Debug, Default)]
pub struct LevelDirector {
    config: LevelConfig,
    current: Option<Difficulty>,
}

impl LevelDirector {
    /// Creates a director using the supplied configuration.
    #[must_use]
    pub const fn new(config: LevelConfig) -> Self {
        Self {
            config,
            current: None,
        }
    }

    /// Difficulty of the most recently loaded level.
    #[must_use]
    pub const fn current_difficulty(&self) -> Option<Difficulty> {
        self.current
    }

    /// Loads the configured starting difficulty.
    pub fn start<M>(
        &mut self,
        world: &mut World,
        mover: &mut M,
        out_events: &mut Vec<Event>,
    ) -> Result<Vec3, LevelError>
    where
        M: PlayerMover + ?Sized,
    {
        self.load_level(world, self.config.start_difficulty, mover, out_events)
    }

    /// Loads the level with the provided one-based index.
    pub fn load_level_index<M>(
        &mut self,
        world: &mut World,
        index: i32,
        mover: &mut M,
        out_events: &mut Vec<Event>,
    ) -> Result<Vec3, LevelError>
    where
        M: PlayerMover + ?Sized,
    {
        self.load_level(world, Difficulty::from_level_index(index), mover, out_events)
    }

    /// Regenerates the maze for `difficulty` and teleports the player to its start.
    ///
    /// World events produced by the generation are appended to `out_events`
    /// so adapters can realise the new geometry. On rejection the player is
    /// left where it is and the previous level stays current.
    pub fn load_level<M>(
        &mut self,
        world: &mut World,
        difficulty: Difficulty,
        mover: &mut M,
        out_events: &mut Vec<Event>,
    ) -> Result<Vec3, LevelError>
    where
        M: PlayerMover + ?Sized,
    {
        let first = out_events.len();
        world::apply(world, Command::Generate { difficulty }, out_events);

        let rejection = out_events[first..].iter().find_map(|event| match event {
            Event::GenerationRejected { reason } => Some(*reason),
            _ => None,
        });
        if let Some(reason) = rejection {
            return Err(reason.into());
        }

        let target = query::start_world_position(world, self.config.spawn_y_offset)
            .ok_or(LevelError::MissingStart)?;
        mover.teleport(target, Quat::IDENTITY);
        self.current = Some(difficulty);
        log::info!("loaded {difficulty:?} level; player spawned at {target}");
        Ok(target)
    }
}
