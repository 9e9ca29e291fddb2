//! `lle-parse` — map parsing for the Laser Learning Environment.
//!
//! Two input formats lower into one output schema, [`WorldConfig`]:
//!
//! ```text
//! plain string ──┐
//!                ├──► WorldConfig ──► lle_world::World
//! TOML table  ───┘
//! ```
//!
//! # Plain-string format
//!
//! Whitespace-separated tokens, one row per line:
//!
//! | Token    | Tile                                         |
//! |----------|----------------------------------------------|
//! | `.`      | floor                                        |
//! | `@`      | wall                                         |
//! | `X`      | exit                                         |
//! | `G`      | gem                                          |
//! | `V`      | void                                         |
//! | `S<n>`   | start position for agent `n`                 |
//! | `L<c><d>`| laser source, colour `c`, direction `d`      |
//!
//! Multiple `S<n>` tokens for the same `n` form a start *set*: the world
//! draws one of them at random on every reset.
//!
//! # TOML format
//!
//! A table with optional `width`/`height`, a `world_string`, and optional
//! `exits`, `gems` and `[[agents]]` lists whose positions are points
//! `{ i, j }` or inclusive rectangles `{ i_min, i_max, j_min, j_max }`.

pub mod config;
pub mod error;
pub mod levels;
pub mod plain;
pub mod toml_map;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{SourceConfig, StartSet, WorldConfig};
pub use error::{ParseError, ParseResult};
pub use levels::{N_LEVELS, level_str};
pub use plain::parse_plain;
pub use toml_map::parse_toml;

use std::path::Path;

/// Parse a map from disk, dispatching on content: the text is tried as a
/// TOML table first and falls back to the plain-string format.
pub fn parse_file(path: impl AsRef<Path>) -> ParseResult<WorldConfig> {
    let text = std::fs::read_to_string(path)?;
    parse_str(&text)
}

/// Parse a map from text, dispatching on content (see [`parse_file`]).
pub fn parse_str(text: &str) -> ParseResult<WorldConfig> {
    if text.parse::<toml::Table>().is_ok() {
        parse_toml(text)
    } else {
        parse_plain(text)
    }
}
