#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates Mazewright mazes.

mod config;
mod maze_transfer;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glam::{Quat, Vec3};
use mazewright_core::{Command, Difficulty, Event};
use mazewright_system_level::{LevelDirector, PlayerMover};
use mazewright_system_randomness::RandomMode;
use mazewright_world::{self as world, query, World};

use crate::config::Settings;
use crate::maze_transfer::MazeSnapshot;

/// Generates perfect mazes and the wall placements needed to build them.
#[derive(Parser, Debug)]
#[command(name = "mazewright", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<CliCommand>,

    /// TOML file with generator, prototype, root, level and random settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Difficulty to generate
    #[arg(long, value_enum, conflicts_with = "level")]
    difficulty: Option<DifficultyArg>,

    /// One-based level index; 1 is simple, anything higher is hard
    #[arg(long)]
    level: Option<i32>,

    /// Random seed; drawn from the thread RNG when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Random source driving the carving
    #[arg(long, value_enum)]
    random: Option<RandomArg>,

    /// Output produced after generation
    #[arg(long, value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Prints a maze transfer string as ASCII
    Decode {
        /// String produced by `--format transfer`
        encoded: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Simple,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Simple => Difficulty::Simple,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RandomArg {
    Seeded,
    Entropy,
    ShuffleBag,
}

impl From<RandomArg> for RandomMode {
    fn from(value: RandomArg) -> Self {
        match value {
            RandomArg::Seeded => RandomMode::Seeded,
            RandomArg::Entropy => RandomMode::Entropy,
            RandomArg::ShuffleBag => RandomMode::ShuffleBag,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ascii,
    Placements,
    Transfer,
}

/// Records where the level director placed the player.
#[derive(Debug, Default)]
struct SpawnMarker {
    position: Option<Vec3>,
}

impl PlayerMover for SpawnMarker {
    fn teleport(&mut self, position: Vec3, _rotation: Quat) {
        self.position = Some(position);
    }
}

/// Entry point for the Mazewright command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Some(CliCommand::Decode { encoded }) = &cli.command {
        return decode(encoded);
    }

    let settings = match &cli.config {
        Some(path) => config::load(path)?,
        None => Settings::default(),
    };
    generate(&cli, settings)
}

fn decode(encoded: &str) -> Result<()> {
    let snapshot = MazeSnapshot::decode(encoded).context("failed to decode maze string")?;
    let grid = snapshot.to_grid();
    print!("{}", render::ascii(&grid, snapshot.start, snapshot.exit));
    Ok(())
}

fn generate(cli: &Cli, settings: Settings) -> Result<()> {
    let seed = cli
        .seed
        .or(settings.random.seed)
        .unwrap_or_else(rand::random);
    let mode = cli.random.map_or(settings.random.mode, RandomMode::from);
    log::info!("carving with {mode:?} random source (seed {seed})");

    let mut world = World::new(
        settings.generator.clone(),
        settings.root.frame(),
        mode.build(seed),
    );
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::BindWallPrototype {
            prototype: settings.prototype,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::BindFloor {
            floor: settings.floor,
        },
        &mut events,
    );
    events.clear();

    let mut director = LevelDirector::new(settings.level);
    let mut marker = SpawnMarker::default();
    let loaded = match (cli.difficulty, cli.level) {
        (Some(difficulty), _) => {
            director.load_level(&mut world, difficulty.into(), &mut marker, &mut events)
        }
        (None, Some(index)) => {
            director.load_level_index(&mut world, index, &mut marker, &mut events)
        }
        (None, None) => director.start(&mut world, &mut marker, &mut events),
    };
    let spawned = loaded.context("failed to load level")?;

    let grid = query::grid(&world).context("world reported no maze after loading")?;
    let start = query::start_cell(&world).context("maze has no start cell")?;
    let exit = query::exit_cell(&world).context("maze has no exit cell")?;

    match cli.format {
        OutputFormat::Ascii => print!("{}", render::ascii(grid, start, exit)),
        OutputFormat::Placements => {
            let placed: Vec<_> = events
                .iter()
                .filter_map(|event| match event {
                    Event::WallPlaced { placement } => Some(*placement),
                    _ => None,
                })
                .collect();
            print!("{}", render::placements(&placed));
            if let Some(exit_anchor) =
                query::exit_world_position(&world, settings.level.spawn_y_offset)
            {
                println!("exit anchor at {exit_anchor}");
            }
            if let Some(position) = marker.position {
                println!("player spawned at {position}");
            }
        }
        OutputFormat::Transfer => {
            let encoded = MazeSnapshot::from_grid(grid)
                .encode()
                .context("failed to encode maze")?;
            println!("{encoded}");
        }
    }

    log::debug!("player spawn resolved to {spawned}");
    Ok(())
}
