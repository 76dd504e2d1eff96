use thiserror::Error;

use crate::LoadError;

/// Error returned by [`Stylesheet::load_str()`](crate::Stylesheet::load_str)
/// and [`Stylesheet::load_file()`](crate::Stylesheet::load_file).
///
/// Lookups report [`LookupError`](crate::LookupError) and formula compilation
/// reports [`ParseError`](crate::parse::ParseError) directly.
#[derive(Debug, Error)]
pub enum CascadeError {
    #[error(transparent)]
    Load(#[from] LoadError),
}
