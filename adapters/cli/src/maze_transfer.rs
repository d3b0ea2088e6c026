use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use mazewright_core::{Grid, GridCoord, GridSize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "maze";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

const WALL_GLYPH: char = '#';
const OPEN_GLYPH: char = '.';

/// Snapshot of a generated maze suitable for copy and paste transfer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MazeSnapshot {
    /// Number of grid columns.
    pub(crate) width: u32,
    /// Number of grid rows.
    pub(crate) height: u32,
    /// Start cell of the maze.
    pub(crate) start: GridCoord,
    /// Exit cell of the maze.
    pub(crate) exit: GridCoord,
    /// Rows from `y = 0` upwards, one glyph per cell.
    pub(crate) rows: Vec<String>,
}

impl MazeSnapshot {
    /// Captures the provided grid.
    #[must_use]
    pub(crate) fn from_grid(grid: &Grid) -> Self {
        let size = grid.size();
        let rows = (0..size.height())
            .map(|y| {
                (0..size.width())
                    .map(|x| {
                        if grid.is_walkable(GridCoord::new(x, y)) {
                            OPEN_GLYPH
                        } else {
                            WALL_GLYPH
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            width: size.width(),
            height: size.height(),
            start: size.start(),
            exit: size.exit(),
            rows,
        }
    }

    /// Rebuilds the walkable grid described by the snapshot.
    #[must_use]
    pub(crate) fn to_grid(&self) -> Grid {
        let mut grid = Grid::solid(GridSize::normalized(self.width, self.height));
        for (y, row) in self.rows.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                if glyph == OPEN_GLYPH {
                    grid.set_walkable(GridCoord::new(x as u32, y as u32), true);
                }
            }
        }
        grid
    }

    /// Encodes the snapshot into a single-line string.
    pub(crate) fn encode(&self) -> Result<String, TransferError> {
        let payload = SerializableSnapshot {
            start: self.start,
            exit: self.exit,
            rows: self.rows.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(TransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!("{SNAPSHOT_HEADER}:{}x{}:{encoded}", self.width, self.height))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, TransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(TransferError::MissingPrefix)?;
        let version = parts.next().ok_or(TransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(TransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(TransferError::MissingPayload)?;
        if let Some(extra) = parts.next() {
            return Err(TransferError::TrailingSegment(extra.to_owned()));
        }

        if domain != SNAPSHOT_DOMAIN {
            return Err(TransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(TransferError::UnsupportedVersion(version.to_owned()));
        }

        let (width, height) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(TransferError::InvalidEncoding)?;
        let decoded: SerializableSnapshot =
            serde_json::from_slice(&bytes).map_err(TransferError::InvalidPayload)?;
        validate_rows(&decoded.rows, width, height)?;
        let size = GridSize::normalized(width, height);
        for anchor in [decoded.start, decoded.exit] {
            if !size.contains(anchor) {
                return Err(TransferError::AnchorOutOfBounds {
                    x: anchor.x(),
                    y: anchor.y(),
                });
            }
        }

        Ok(Self {
            width,
            height,
            start: decoded.start,
            exit: decoded.exit,
            rows: decoded.rows,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSnapshot {
    start: GridCoord,
    exit: GridCoord,
    rows: Vec<String>,
}

/// Errors that can occur while encoding or decoding maze transfer strings.
#[derive(Debug, Error)]
pub(crate) enum TransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("maze string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("maze string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("maze string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    #[error("maze string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("maze string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot carried segments after the payload.
    #[error("unexpected segment '{0}' after the maze payload")]
    TrailingSegment(String),
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("maze prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("maze version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed or are not a valid maze size.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The rows do not match the declared dimensions or contain unknown glyphs.
    #[error("maze rows do not match a {width}x{height} grid")]
    RowMismatch {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// The start or exit cell lies outside the declared grid.
    #[error("anchor ({x}, {y}) lies outside the maze")]
    AnchorOutOfBounds {
        /// Column of the offending anchor.
        x: u32,
        /// Row of the offending anchor.
        y: u32,
    },
    /// The base64 payload could not be decoded.
    #[error("could not decode maze payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not process maze payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), TransferError> {
    let invalid = || TransferError::InvalidDimensions(dimensions.to_owned());
    let (width, height) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;

    let normalized = GridSize::normalized(width, height);
    if normalized.width() != width || normalized.height() != height {
        return Err(invalid());
    }

    Ok((width, height))
}

fn validate_rows(rows: &[String], width: u32, height: u32) -> Result<(), TransferError> {
    let well_formed = rows.len() == height as usize
        && rows.iter().all(|row| {
            row.chars().count() == width as usize
                && row.chars().all(|glyph| glyph == WALL_GLYPH || glyph == OPEN_GLYPH)
        });

    if well_formed {
        Ok(())
    } else {
        Err(TransferError::RowMismatch { width, height })
    }
}
