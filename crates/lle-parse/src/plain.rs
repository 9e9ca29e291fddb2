//! Tokenizer for the plain-string map format.

use std::collections::BTreeMap;

use lle_core::{AgentId, LaserId, Position, Tile};

use crate::config::{SourceConfig, StartSet, WorldConfig};
use crate::error::{ParseError, ParseResult};

/// Intermediate parse product, before agent-count resolution.
///
/// The TOML path reuses this for its `world_string` and then layers its own
/// exits, gems and start sets on top before finalising.
pub(crate) struct RawMap {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Tile>,
    /// Agent number → start cells, in row-major token order.
    pub starts: BTreeMap<usize, Vec<Position>>,
    pub sources: Vec<SourceConfig>,
    pub gems: Vec<Position>,
    pub exits: Vec<Position>,
}

/// Parse a plain-string map into a validated [`WorldConfig`].
pub fn parse_plain(text: &str) -> ParseResult<WorldConfig> {
    let raw = parse_rows(text)?;
    finalize(raw, 0, text.to_string())
}

/// Tokenize rows into tiles, starts and sources.  Laser ids are assigned in
/// row-major declaration order.
pub(crate) fn parse_rows(text: &str) -> ParseResult<RawMap> {
    let mut width = 0;
    let mut tiles = Vec::new();
    let mut starts: BTreeMap<usize, Vec<Position>> = BTreeMap::new();
    let mut sources = Vec::new();
    let mut gems = Vec::new();
    let mut exits = Vec::new();

    let rows: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if rows.is_empty() {
        return Err(ParseError::EmptyMap);
    }

    for (i, row) in rows.iter().enumerate() {
        let tokens: Vec<&str> = row.split_whitespace().collect();
        if i == 0 {
            width = tokens.len();
        } else if tokens.len() != width {
            return Err(ParseError::InconsistentRowLength {
                row: i,
                expected: width,
                got: tokens.len(),
            });
        }

        for (j, token) in tokens.iter().enumerate() {
            let pos = Position::new(i, j);
            let tile = match *token {
                "." => Tile::Floor,
                "@" => Tile::Wall,
                "X" => {
                    exits.push(pos);
                    Tile::Exit
                }
                "G" => {
                    gems.push(pos);
                    Tile::Gem
                }
                "V" => Tile::Void,
                t if t.starts_with('S') => {
                    let agent = parse_agent_number(t, i, j)?;
                    starts.entry(agent).or_default().push(pos);
                    Tile::Floor
                }
                t if t.starts_with('L') => {
                    let laser_id = LaserId(sources.len() as u32);
                    let (colour, direction) = parse_source(t, i, j)?;
                    sources.push(SourceConfig {
                        laser_id,
                        pos,
                        direction,
                        colour,
                    });
                    Tile::LaserSource(laser_id)
                }
                other => {
                    return Err(ParseError::UnknownToken {
                        token: other.to_string(),
                        row: i,
                        col: j,
                    });
                }
            };
            tiles.push(tile);
        }
    }

    Ok(RawMap {
        width,
        height: rows.len(),
        tiles,
        starts,
        sources,
        gems,
        exits,
    })
}

/// Resolve the agent count and run the structural checks.
///
/// `min_agents` lets the TOML path force extra agents that have no `S<n>`
/// token (their starts come from `start_positions` lists instead).
pub(crate) fn finalize(raw: RawMap, min_agents: usize, source: String) -> ParseResult<WorldConfig> {
    let from_tokens = raw.starts.keys().next_back().map_or(0, |&max| max + 1);
    let n_agents = from_tokens.max(min_agents);

    let mut start_sets = vec![StartSet::new(); n_agents];
    for (agent, positions) in raw.starts {
        for pos in positions {
            start_sets[agent].push(pos);
        }
    }

    let config = WorldConfig {
        width: raw.width,
        height: raw.height,
        tiles: raw.tiles,
        sources: raw.sources,
        gems: raw.gems,
        exits: raw.exits,
        start_sets,
        source,
    };
    config.validate()?;
    Ok(config)
}

// ── Token helpers ─────────────────────────────────────────────────────────────

/// `S<n>` → n.
fn parse_agent_number(token: &str, row: usize, col: usize) -> ParseResult<usize> {
    token[1..].parse().map_err(|_| ParseError::UnknownToken {
        token: token.to_string(),
        row,
        col,
    })
}

/// `L<c><d>` → (colour, direction); the direction is the final letter.
fn parse_source(token: &str, row: usize, col: usize) -> ParseResult<(AgentId, lle_core::Direction)> {
    let unknown = || ParseError::UnknownToken {
        token: token.to_string(),
        row,
        col,
    };
    let body = &token[1..];
    if body.len() < 2 || !body.is_char_boundary(body.len() - 1) {
        return Err(unknown());
    }
    let (digits, letter) = body.split_at(body.len() - 1);
    let colour: u32 = digits.parse().map_err(|_| unknown())?;
    let direction = letter.parse().map_err(|_| unknown())?;
    Ok((AgentId(colour), direction))
}
