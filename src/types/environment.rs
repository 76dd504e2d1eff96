use crate::objects::ObjectRegistry;

use super::symbol_table::SymbolTable;

/// The registries rules are built against: formula names and object
/// factories.
///
/// Each [`Stylesheet`](crate::Stylesheet) owns one. `Default` gives the
/// built-in constants and the `color` / `font` / `animator` / `text`
/// factories.
#[derive(Debug)]
pub struct Environment {
    pub symbols: SymbolTable,
    pub objects: ObjectRegistry,
}

impl Environment {
    #[must_use]
    pub fn new(symbols: SymbolTable, objects: ObjectRegistry) -> Self {
        Self { symbols, objects }
    }

    /// An environment with no constants and no object factories.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(SymbolTable::new(), ObjectRegistry::new())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(SymbolTable::with_defaults(), ObjectRegistry::with_defaults())
    }
}
