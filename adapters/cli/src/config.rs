use std::{fs, path::Path};

use anyhow::{Context, Result};
use glam::{Quat, Vec3};
use mazewright_core::{FloorSurface, WallPrototype};
use mazewright_system_level::LevelConfig;
use mazewright_system_randomness::RandomMode;
use mazewright_world::{Frame, GeneratorConfig};
use serde::Deserialize;

/// Settings read from the optional TOML configuration file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) generator: GeneratorConfig,
    pub(crate) prototype: WallPrototype,
    pub(crate) floor: FloorSurface,
    pub(crate) root: RootSettings,
    pub(crate) level: LevelConfig,
    pub(crate) random: RandomSettings,
}

/// Placement of the maze root in world space.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RootSettings {
    pub(crate) translation: Vec3,
    pub(crate) yaw_degrees: f32,
    pub(crate) scale: Vec3,
}

impl Default for RootSettings {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            yaw_degrees: 0.0,
            scale: Vec3::ONE,
        }
    }
}

impl RootSettings {
    pub(crate) fn frame(&self) -> Frame {
        Frame::new(
            self.translation,
            Quat::from_rotation_y(self.yaw_degrees.to_radians()),
            self.scale,
        )
    }
}

/// Random source selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RandomSettings {
    pub(crate) mode: RandomMode,
    pub(crate) seed: Option<u64>,
}

/// Reads and parses the settings file at `path`.
pub(crate) fn load(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse(contents: &str) -> Result<Settings> {
    toml::from_str(contents).context("failed to parse config toml contents")
}
