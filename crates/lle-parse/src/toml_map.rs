//! The TOML map format.
//!
//! Example:
//!
//! ```toml
//! width = 4
//! height = 3
//! world_string = """
//! S0 . . .
//! .  . . .
//! .  . . .
//! """
//! exits = [{ i = 2, j = 3 }]
//! gems  = [{ i = 1, j = 1 }]
//!
//! [[agents]]
//! start_positions = [{ i_min = 0, i_max = 1 }]
//! ```
//!
//! Positions are points `{ i, j }` or inclusive rectangles with any of
//! `i_min`/`i_max`/`j_min`/`j_max`; missing bounds default to 0 and the map
//! edge.  Rectangles are filtered to cells that can legally hold the item
//! (floor for exits and gems, walkable non-void for starts); points must
//! satisfy the constraint outright.

use lle_core::{Position, Tile};
use serde::Deserialize;

use crate::config::WorldConfig;
use crate::error::{ParseError, ParseResult};
use crate::plain::{RawMap, finalize, parse_rows};

// ── Schema ────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MapSpec {
    width: Option<usize>,
    height: Option<usize>,
    world_string: Option<String>,
    #[serde(default)]
    exits: Vec<PositionSpec>,
    #[serde(default)]
    gems: Vec<PositionSpec>,
    #[serde(default)]
    agents: Vec<AgentSpec>,
}

#[derive(Deserialize)]
struct AgentSpec {
    #[serde(default)]
    start_positions: Vec<PositionSpec>,
}

/// A point or a rectangle.  Untagged: `{ i, j }` deserialises as a point,
/// anything else falls through to the rectangle arm.
#[derive(Deserialize)]
#[serde(untagged)]
enum PositionSpec {
    Point {
        i: usize,
        j: usize,
    },
    Rect {
        i_min: Option<usize>,
        i_max: Option<usize>,
        j_min: Option<usize>,
        j_max: Option<usize>,
    },
}

impl PositionSpec {
    /// Expand into concrete cells.  Points are bounds-checked; rectangle
    /// bounds are clamped to the grid.
    fn resolve(&self, height: usize, width: usize) -> ParseResult<Vec<Position>> {
        match *self {
            PositionSpec::Point { i, j } => {
                let pos = Position::new(i, j);
                if i >= height || j >= width {
                    return Err(ParseError::OutOfBounds { pos, height, width });
                }
                Ok(vec![pos])
            }
            PositionSpec::Rect {
                i_min,
                i_max,
                j_min,
                j_max,
            } => {
                let i_lo = i_min.unwrap_or(0);
                let i_hi = i_max.unwrap_or(height - 1).min(height - 1);
                let j_lo = j_min.unwrap_or(0);
                let j_hi = j_max.unwrap_or(width - 1).min(width - 1);
                let mut cells = Vec::new();
                for i in i_lo..=i_hi {
                    for j in j_lo..=j_hi {
                        cells.push(Position::new(i, j));
                    }
                }
                Ok(cells)
            }
        }
    }

    fn is_point(&self) -> bool {
        matches!(self, PositionSpec::Point { .. })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Parse a TOML map into a validated [`WorldConfig`].
pub fn parse_toml(text: &str) -> ParseResult<WorldConfig> {
    let spec: MapSpec = toml::from_str(text)?;

    // ── Base grid: world_string, or an all-floor width × height rectangle ─
    let mut raw = match &spec.world_string {
        Some(world_string) => {
            let raw = parse_rows(world_string)?;
            if let (Some(w), Some(h)) = (spec.width, spec.height)
                && (w != raw.width || h != raw.height)
            {
                return Err(ParseError::DimensionMismatch {
                    height: h,
                    width: w,
                    got_height: raw.height,
                    got_width: raw.width,
                });
            }
            raw
        }
        None => match (spec.width, spec.height) {
            (Some(width), Some(height)) if width > 0 && height > 0 => RawMap {
                width,
                height,
                tiles: vec![Tile::Floor; width * height],
                starts: Default::default(),
                sources: Vec::new(),
                gems: Vec::new(),
                exits: Vec::new(),
            },
            _ => return Err(ParseError::EmptyMap),
        },
    };

    let (height, width) = (raw.height, raw.width);
    let tile_at = |tiles: &[Tile], pos: Position| tiles[pos.i * width + pos.j];

    // ── Declared exits and gems, layered over the world string ────────────
    for item in &spec.exits {
        for pos in item.resolve(height, width)? {
            match tile_at(&raw.tiles, pos) {
                Tile::Floor => {
                    raw.tiles[pos.i * width + pos.j] = Tile::Exit;
                    raw.exits.push(pos);
                }
                Tile::Exit => {}
                _ if item.is_point() => {
                    return Err(ParseError::OccupiedCell {
                        what: "an exit",
                        pos,
                    });
                }
                _ => {}
            }
        }
    }
    for item in &spec.gems {
        for pos in item.resolve(height, width)? {
            match tile_at(&raw.tiles, pos) {
                Tile::Floor => {
                    raw.tiles[pos.i * width + pos.j] = Tile::Gem;
                    raw.gems.push(pos);
                }
                Tile::Gem => {}
                _ if item.is_point() => {
                    return Err(ParseError::OccupiedCell { what: "a gem", pos });
                }
                _ => {}
            }
        }
    }

    // ── Per-agent start sets ──────────────────────────────────────────────
    //
    // `[[agents]]` entry k supplements agent k's `S<k>` tokens.  Point
    // starts must be walkable; rectangle cells that are not (or are void)
    // are filtered out.
    for (agent, agent_spec) in spec.agents.iter().enumerate() {
        let entry = raw.starts.entry(agent).or_default();
        for item in &agent_spec.start_positions {
            for pos in item.resolve(height, width)? {
                let tile = tile_at(&raw.tiles, pos);
                if item.is_point() {
                    if !tile.is_walkable() {
                        return Err(ParseError::OccupiedCell {
                            what: "a start position",
                            pos,
                        });
                    }
                    entry.push(pos);
                } else if tile.is_walkable() && tile != Tile::Void {
                    entry.push(pos);
                }
            }
        }
    }

    finalize(raw, spec.agents.len(), text.to_string())
}
