use std::collections::HashMap;
use std::fmt;

use super::environment::Environment;
use super::error::LookupError;
use super::rule::Rule;
use super::style::{Style, StyleContext};
use super::symbol_table::SymbolTable;
use super::value::ObjectValue;
use crate::import::{document_name, ImportResolver, NoImports};
use crate::objects::ObjectRegistry;

/// Builder for a [`Stylesheet`] with custom registries or an import
/// resolver.
///
/// # Example
///
/// ```
/// use cascade::import::MemoryResolver;
/// use cascade::{Stylesheet, SymbolTable};
///
/// let mut symbols = SymbolTable::with_defaults();
/// symbols.export([("gutter", 8.0)]);
///
/// let mut sheet = Stylesheet::builder()
///     .symbols(symbols)
///     .resolver(MemoryResolver::new().with("base", "Base: {margin: '${gutter * 2}'}"))
///     .build();
/// sheet.load_file("base").unwrap();
/// assert_eq!(sheet.rule("Base", "margin").unwrap().as_number(), 16.0);
/// ```
#[derive(Debug, Default)]
pub struct StylesheetBuilder {
    symbols: Option<SymbolTable>,
    objects: Option<ObjectRegistry>,
    resolver: Option<Box<dyn ImportResolver>>,
}

impl StylesheetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `symbols` instead of [`SymbolTable::with_defaults()`].
    #[must_use]
    pub fn symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = Some(symbols);
        self
    }

    /// Use `objects` instead of [`ObjectRegistry::with_defaults()`].
    #[must_use]
    pub fn objects(mut self, objects: ObjectRegistry) -> Self {
        self.objects = Some(objects);
        self
    }

    /// Resolve `_import` entries and [`Stylesheet::load_file()`] through
    /// `resolver`. Without one, every import fails.
    #[must_use]
    pub fn resolver(mut self, resolver: impl ImportResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    #[must_use]
    pub fn build(self) -> Stylesheet {
        let env = Environment::new(
            self.symbols.unwrap_or_else(SymbolTable::with_defaults),
            self.objects.unwrap_or_else(ObjectRegistry::with_defaults),
        );
        Stylesheet {
            env,
            resolver: self.resolver.unwrap_or_else(|| Box::new(NoImports)),
            styles: HashMap::new(),
            revision: 0,
        }
    }
}

/// A loaded set of styles plus the registries they were built against.
///
/// Loading replaces every style at once: a load that fails leaves the
/// previously loaded styles untouched. A loaded stylesheet is `Send + Sync`
/// and can be shared behind an `Arc` for reading.
///
/// # Example
///
/// ```
/// use cascade::{StyleContext, Stylesheet};
///
/// let mut sheet = Stylesheet::new();
/// sheet
///     .load_str(
///         "Card: {margin: 10}\n\
///          Card/wide: {_breakpoint: '${width > 600}', margin: 24}\n",
///     )
///     .unwrap();
///
/// let ctx = StyleContext::with_breakpoints().variable("width", 800.0);
/// let margin = sheet.property_for("Card", "margin", &ctx).unwrap();
/// assert_eq!(margin.as_number(), 24.0);
/// ```
pub struct Stylesheet {
    env: Environment,
    resolver: Box<dyn ImportResolver>,
    styles: HashMap<String, Style>,
    revision: u64,
}

impl Default for Stylesheet {
    fn default() -> Self {
        StylesheetBuilder::new().build()
    }
}

impl Stylesheet {
    /// A stylesheet with the default registries and no import resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> StylesheetBuilder {
        StylesheetBuilder::new()
    }

    /// Parse `text` and replace the current styles with it.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError`](crate::CascadeError) for malformed documents,
    /// rules that fail to build and imports that cannot be resolved. The
    /// current styles are kept on error.
    pub fn load_str(&mut self, text: &str) -> Result<(), crate::CascadeError> {
        let styles = crate::load::load(text, &self.env, self.resolver.as_ref())?;
        self.styles = styles;
        self.revision += 1;
        Ok(())
    }

    /// Resolve document `name` through the import resolver and load it.
    ///
    /// # Errors
    ///
    /// See [`load_str()`](Self::load_str).
    pub fn load_file(&mut self, name: &str) -> Result<(), crate::CascadeError> {
        let text = self.resolver.resolve(document_name(name))?;
        self.load_str(&text)
    }

    /// Every property of `style` visible under `ctx`. Empty for unknown
    /// styles.
    #[must_use]
    pub fn properties_for(&self, style: &str, ctx: &StyleContext) -> HashMap<&str, &Rule> {
        self.known(style)
            .map(|s| s.properties(ctx))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn property_for(&self, style: &str, property: &str, ctx: &StyleContext) -> Option<&Rule> {
        self.known(style)?.property(property, ctx)
    }

    #[must_use]
    pub fn animator_for(
        &self,
        style: &str,
        property: &str,
        ctx: &StyleContext,
    ) -> Option<&ObjectValue> {
        self.known(style)?.animator(property, ctx)
    }

    /// Strict lookup of a property in a style's default container.
    ///
    /// # Errors
    ///
    /// [`LookupError::UnknownStyle`] or [`LookupError::UnknownProperty`].
    pub fn rule(&self, style: &str, property: &str) -> Result<&Rule, LookupError> {
        let found = self.styles.get(style).ok_or_else(|| LookupError::UnknownStyle {
            style: style.to_owned(),
        })?;
        found
            .property(property, &StyleContext::default())
            .ok_or_else(|| LookupError::UnknownProperty {
                style: style.to_owned(),
                property: property.to_owned(),
            })
    }

    #[must_use]
    pub fn style(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    /// Loaded style names, sorted.
    #[must_use]
    pub fn style_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.styles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of successful loads so far. Hosts can poll this to notice a
    /// reload.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Registries used by the next load. Styles already loaded keep the
    /// constants they were built with.
    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    fn known(&self, style: &str) -> Option<&Style> {
        let found = self.styles.get(style);
        if found.is_none() {
            tracing::warn!(style, "unknown style");
        }
        found
    }
}

impl fmt::Debug for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stylesheet")
            .field("styles", &self.style_names())
            .field("revision", &self.revision)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stylesheet({} styles, revision {})",
            self.styles.len(),
            self.revision
        )
    }
}
