//! Named level presets.
//!
//! Six maps of increasing coordination difficulty, selectable by 1-based
//! index.  Levels 3+ carry lasers; level 6 adds a void chasm that forces
//! both beam-blocking and a detour.

use crate::error::{ParseError, ParseResult};

/// Number of shipped levels.
pub const N_LEVELS: usize = 6;

const LEVEL_1: &str = "\
@ @  @ @ @ @ @
@ S0 . . G . @
@ .  @ @ @ . @
@ G  . . . X @
@ @  @ @ @ @ @
";

const LEVEL_2: &str = "\
@ @  @ @ @ @ @
@ S0 . G . X @
@ .  @ . @ . @
@ S1 . G . X @
@ @  @ @ @ @ @
";

const LEVEL_3: &str = "\
@ @  @ @ @   @
@ S0 . . X   @
@ S1 . . X   @
@ .  . . L0W @
@ G  . . .   @
@ @  @ @ @   @
";

const LEVEL_4: &str = "\
@ @  @   @ @   @ @ @
@ S0 .   . .   . X @
@ S1 .   @ G   . X @
@ .  L0E . .   . . @
@ .  .   . L1N . . @
@ G  .   . .   . . @
@ @  @   @ @   @ @ @
";

const LEVEL_5: &str = "\
@ @  @ @   @ @   @ @ @
@ S0 . .   . G   . X @
@ S1 . @   . .   . X @
@ S2 . L1E . .   . X @
@ .  . .   . L0N . . @
@ .  G .   . .   . . @
@ @  @ @   @ @   @ @ @
";

const LEVEL_6: &str = "\
@ @   @  @ @ @ @ @   @ @ @
@ S0  S1 . . . . .   . G @
@ S2  S3 . @ V @ .   @ . @
@ .   .  . . V . .   . X @
@ L0E .  . . V . .   . X @
@ .   .  G . V . .   . X @
@ .   .  . . V . L1N . X @
@ @   @  @ @ @ @ @   @ @ @
";

/// The plain-string map of level `n` (1-based).
pub fn level_str(n: usize) -> ParseResult<&'static str> {
    match n {
        1 => Ok(LEVEL_1),
        2 => Ok(LEVEL_2),
        3 => Ok(LEVEL_3),
        4 => Ok(LEVEL_4),
        5 => Ok(LEVEL_5),
        6 => Ok(LEVEL_6),
        other => Err(ParseError::InvalidLevel(other)),
    }
}
