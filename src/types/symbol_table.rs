use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::enums::EnumRepresentable;
use super::error::EvaluationError;
use super::expr::Formula;
use crate::evaluate::Scope;
use crate::parse::ParseError;

/// Escape marker that opens a formula string.
const ESCAPE: char = '$';
/// Brackets delimiting the formula body.
const BLOCK: (char, char) = ('{', '}');

/// Recognize the `${...}` formula convention.
///
/// Returns `None` when `text` does not start with `$`, meaning the caller
/// should treat it as a literal string. Otherwise every `$`, `{` and `}` in
/// the string is removed (not just the outer delimiters) and the remainder is
/// returned as the formula text.
///
/// ```
/// assert_eq!(cascade::sanitize("${41 + 1}").as_deref(), Some("41 + 1"));
/// assert_eq!(cascade::sanitize("plain"), None);
/// ```
#[must_use]
pub fn sanitize(text: &str) -> Option<String> {
    if !text.starts_with(ESCAPE) {
        return None;
    }
    Some(
        text.chars()
            .filter(|&c| c != ESCAPE && c != BLOCK.0 && c != BLOCK.1)
            .collect(),
    )
}

/// A zero-argument numeric function evaluated on every lookup, used for
/// runtime state such as the current orientation or screen size.
#[derive(Clone)]
pub struct Symbol(Arc<dyn Fn() -> f64 + Send + Sync>);

impl Symbol {
    pub fn new(f: impl Fn() -> f64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        (self.0)()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Symbol(..)")
    }
}

/// Named constants and computed symbols that formulas are evaluated against.
///
/// Constants are captured by value when an [`Expression`] is built: exporting
/// new constants later does not affect expressions that already exist.
/// Computed symbols are shared and re-evaluated on every evaluation, so the
/// same expression can track live state without being rebuilt.
///
/// # Example
///
/// ```
/// use cascade::SymbolTable;
///
/// let mut table = SymbolTable::new();
/// table.export([("iPhoneSE.width", 320.0)]);
/// table.export_symbol("orientation", || 1.0);
///
/// let expr = table.build("iPhoneSE.width * orientation").unwrap();
/// assert_eq!(expr.evaluate(), Ok(320.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    constants: Arc<HashMap<String, f64>>,
    symbols: Arc<HashMap<String, Symbol>>,
}

impl SymbolTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table pre-populated with the layout keywords and built-in
    /// enum namespaces (see [`defaults`](crate::defaults)).
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        crate::defaults::export_defaults(&mut table);
        table
    }

    /// Merge a batch of constants into the table. The last value exported
    /// for a name wins.
    pub fn export<K: Into<String>>(&mut self, constants: impl IntoIterator<Item = (K, f64)>) {
        let map = Arc::make_mut(&mut self.constants);
        for (name, value) in constants {
            map.insert(name.into(), value);
        }
    }

    /// Register (or replace) a computed symbol.
    pub fn export_symbol(&mut self, name: &str, f: impl Fn() -> f64 + Send + Sync + 'static) {
        Arc::make_mut(&mut self.symbols).insert(name.to_owned(), Symbol::new(f));
    }

    /// Export every variant of an integer-backed enum under its namespace,
    /// e.g. `TextAlignment.right`. Exporting the same enum twice is a no-op.
    pub fn export_enum<T: EnumRepresentable>(&mut self) {
        self.export(T::expression_constants());
    }

    /// Look up a constant by name.
    #[must_use]
    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    /// Whether `name` resolves to a constant or a computed symbol.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constants.contains_key(name) || self.symbols.contains_key(name)
    }

    /// Total number of constants and computed symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constants.len() + self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compile a formula (without the `${}` delimiters) against this table.
    ///
    /// Names are not checked here: an unbound name only surfaces as an
    /// [`EvaluationError`] when the expression is evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the formula is syntactically invalid.
    pub fn build(&self, formula: &str) -> Result<Expression, ParseError> {
        let parsed = crate::parse::parse(formula)?;
        Ok(Expression {
            source: formula.to_owned(),
            formula: Arc::new(parsed),
            constants: Arc::clone(&self.constants),
            symbols: Arc::clone(&self.symbols),
        })
    }

    /// [`sanitize`] `text` and, if it is a `${...}` formula, compile it.
    ///
    /// Returns `None` for literal strings.
    #[must_use]
    pub fn parse_expression(&self, text: &str) -> Option<Result<Expression, ParseError>> {
        sanitize(text).map(|formula| self.build(&formula))
    }
}

/// A compiled formula bound to a constants snapshot and the live symbol map.
#[derive(Clone)]
pub struct Expression {
    source: String,
    formula: Arc<Formula>,
    constants: Arc<HashMap<String, f64>>,
    symbols: Arc<HashMap<String, Symbol>>,
}

impl Expression {
    /// The formula text this expression was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Evaluate against the bound constants and symbols.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] for unbound names, unknown functions or
    /// wrong function arity.
    pub fn evaluate(&self) -> Result<f64, EvaluationError> {
        crate::evaluate::evaluate(&self.formula, &self.scope(None))
    }

    /// Evaluate with extra variables that shadow symbols and constants.
    ///
    /// # Errors
    ///
    /// See [`evaluate()`](Self::evaluate).
    pub fn evaluate_with(&self, variables: &HashMap<String, f64>) -> Result<f64, EvaluationError> {
        crate::evaluate::evaluate(&self.formula, &self.scope(Some(variables)))
    }

    fn scope<'a>(&'a self, variables: Option<&'a HashMap<String, f64>>) -> Scope<'a> {
        Scope {
            variables,
            symbols: &self.symbols,
            constants: &self.constants,
        }
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Expression").field(&self.source).finish()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}}}", self.source)
    }
}
