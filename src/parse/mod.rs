mod error;
mod grammar;

pub use error::ParseError;

use crate::Formula;

/// Deepest formula tree accepted. Long operator chains fold into deep trees
/// even when nothing is parenthesised, and evaluation recurses per level.
pub const MAX_DEPTH: usize = 256;

/// Parse a formula string (the text between `${` and `}`) into a [`Formula`].
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a valid formula, or if it nests
/// too deeply to evaluate safely.
pub fn parse(input: &str) -> Result<Formula, ParseError> {
    let formula =
        grammar::parse_formula(input).map_err(|message| ParseError::new(input, message))?;
    let depth = formula.depth();
    if depth > MAX_DEPTH {
        return Err(ParseError::new(
            input,
            format!("formula is nested {depth} levels deep, at most {MAX_DEPTH} are allowed"),
        ));
    }
    Ok(formula)
}
