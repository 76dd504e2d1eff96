use std::collections::HashMap;

use super::rule::Rule;
use super::symbol_table::Expression;
use super::value::ObjectValue;

/// Runtime inputs for a style query.
///
/// Breakpoints are skipped unless enabled, so a bare
/// `StyleContext::default()` only sees each style's default container.
///
/// # Example
///
/// ```
/// use cascade::StyleContext;
///
/// let ctx = StyleContext::new()
///     .breakpoints(true)
///     .variable("screen.width", 320.0);
/// assert!(!ctx.skips_breakpoints());
/// ```
#[derive(Debug, Clone)]
pub struct StyleContext {
    skip_breakpoints: bool,
    variables: HashMap<String, f64>,
}

impl Default for StyleContext {
    fn default() -> Self {
        Self {
            skip_breakpoints: true,
            variables: HashMap::new(),
        }
    }
}

impl StyleContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that evaluates breakpoint guards.
    #[must_use]
    pub fn with_breakpoints() -> Self {
        Self::new().breakpoints(true)
    }

    /// Enable or disable breakpoint evaluation.
    #[must_use]
    pub fn breakpoints(mut self, enabled: bool) -> Self {
        self.skip_breakpoints = !enabled;
        self
    }

    /// Bind a variable visible to breakpoint guards. Variables shadow
    /// symbols and constants of the same name.
    #[must_use]
    pub fn variable(mut self, name: &str, value: f64) -> Self {
        self.variables.insert(name.to_owned(), value);
        self
    }

    #[must_use]
    pub fn skips_breakpoints(&self) -> bool {
        self.skip_breakpoints
    }

    #[must_use]
    pub fn variables(&self) -> &HashMap<String, f64> {
        &self.variables
    }
}

/// A set of rules and animators, optionally behind a breakpoint guard.
#[derive(Debug, Clone, Default)]
pub struct Container {
    breakpoint: Option<String>,
    guard: Option<Expression>,
    definitions: HashMap<String, Rule>,
    animators: HashMap<String, ObjectValue>,
}

impl Container {
    fn guarded(name: &str, guard: Expression) -> Self {
        Self {
            breakpoint: Some(name.to_owned()),
            guard: Some(guard),
            ..Self::default()
        }
    }

    /// Breakpoint name, `None` for the default container.
    #[must_use]
    pub fn breakpoint(&self) -> Option<&str> {
        self.breakpoint.as_deref()
    }

    #[must_use]
    pub fn guard(&self) -> Option<&Expression> {
        self.guard.as_ref()
    }

    #[must_use]
    pub fn definitions(&self) -> &HashMap<String, Rule> {
        &self.definitions
    }

    #[must_use]
    pub fn animators(&self) -> &HashMap<String, ObjectValue> {
        &self.animators
    }

    /// Whether this container applies under `ctx`. Unguarded containers are
    /// always active; a guard must evaluate to a positive number.
    #[must_use]
    pub fn is_active(&self, ctx: &StyleContext) -> bool {
        let Some(guard) = &self.guard else {
            return true;
        };
        match guard.evaluate_with(ctx.variables()) {
            Ok(value) => value > 0.0,
            Err(err) => {
                tracing::warn!(
                    breakpoint = self.breakpoint.as_deref().unwrap_or_default(),
                    %guard,
                    error = %err,
                    "breakpoint guard failed, treating as inactive"
                );
                false
            }
        }
    }
}

/// A named style: a default container plus breakpoint overrides in
/// declaration order.
///
/// Every query resolves with one policy: the last active breakpoint that
/// defines a property wins, and the default container is the fallback.
#[derive(Debug, Clone)]
pub struct Style {
    identifier: String,
    default: Container,
    breakpoints: Vec<Container>,
}

impl Style {
    #[must_use]
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_owned(),
            default: Container::default(),
            breakpoints: Vec::new(),
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn default_container(&self) -> &Container {
        &self.default
    }

    #[must_use]
    pub fn breakpoints(&self) -> &[Container] {
        &self.breakpoints
    }

    /// Register a breakpoint. A name that is already registered keeps its
    /// first guard and `false` is returned.
    pub fn add_breakpoint(&mut self, name: &str, guard: Expression) -> bool {
        if self.breakpoint_container(name).is_some() {
            tracing::debug!(style = %self.identifier, breakpoint = name, "breakpoint already registered");
            return false;
        }
        self.breakpoints.push(Container::guarded(name, guard));
        true
    }

    /// Store `rule` under `property` in the default container or the named
    /// breakpoint, replacing any previous rule. Returns `false` (with a
    /// warning) when the breakpoint is not registered.
    pub fn add_rule(&mut self, rule: Rule, property: &str, breakpoint: Option<&str>) -> bool {
        match self.target(breakpoint) {
            Some(container) => {
                container.definitions.insert(property.to_owned(), rule);
                true
            }
            None => false,
        }
    }

    /// Store an animator for `property`, with the same targeting rules as
    /// [`add_rule()`](Self::add_rule).
    pub fn add_animator(
        &mut self,
        animator: ObjectValue,
        property: &str,
        breakpoint: Option<&str>,
    ) -> bool {
        match self.target(breakpoint) {
            Some(container) => {
                container.animators.insert(property.to_owned(), animator);
                true
            }
            None => false,
        }
    }

    /// Resolve a single property under `ctx`.
    #[must_use]
    pub fn property(&self, name: &str, ctx: &StyleContext) -> Option<&Rule> {
        self.resolve(ctx, |c| c.definitions.get(name))
    }

    /// Every property visible under `ctx`: the default container overlaid by
    /// each active breakpoint in declaration order.
    #[must_use]
    pub fn properties(&self, ctx: &StyleContext) -> HashMap<&str, &Rule> {
        let mut out: HashMap<&str, &Rule> = self
            .default
            .definitions
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        if !ctx.skips_breakpoints() {
            for container in self.breakpoints.iter().filter(|c| c.is_active(ctx)) {
                out.extend(container.definitions.iter().map(|(k, v)| (k.as_str(), v)));
            }
        }
        out
    }

    /// Resolve the animator registered for `name` under `ctx`.
    #[must_use]
    pub fn animator(&self, name: &str, ctx: &StyleContext) -> Option<&ObjectValue> {
        self.resolve(ctx, |c| c.animators.get(name))
    }

    /// Active breakpoint containers in declaration order. Empty when the
    /// context skips breakpoints.
    pub fn active_breakpoints<'a>(
        &'a self,
        ctx: &'a StyleContext,
    ) -> impl Iterator<Item = &'a Container> + 'a {
        let candidates = if ctx.skips_breakpoints() {
            &self.breakpoints[..0]
        } else {
            &self.breakpoints[..]
        };
        candidates.iter().filter(move |c| c.is_active(ctx))
    }

    fn resolve<'a, T>(
        &'a self,
        ctx: &StyleContext,
        lookup: impl Fn(&'a Container) -> Option<&'a T>,
    ) -> Option<&'a T> {
        if !ctx.skips_breakpoints() {
            // Guards are only evaluated for containers that define the name.
            for container in self.breakpoints.iter().rev() {
                if let Some(found) = lookup(container) {
                    if container.is_active(ctx) {
                        return Some(found);
                    }
                }
            }
        }
        lookup(&self.default)
    }

    fn breakpoint_container(&self, name: &str) -> Option<usize> {
        self.breakpoints
            .iter()
            .position(|c| c.breakpoint.as_deref() == Some(name))
    }

    fn target(&mut self, breakpoint: Option<&str>) -> Option<&mut Container> {
        let Some(name) = breakpoint else {
            return Some(&mut self.default);
        };
        match self.breakpoint_container(name) {
            Some(idx) => Some(&mut self.breakpoints[idx]),
            None => {
                tracing::warn!(style = %self.identifier, breakpoint = name, "unknown breakpoint, rule dropped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SymbolTable;

    fn guard(formula: &str) -> Expression {
        SymbolTable::new().build(formula).unwrap()
    }

    fn margin_style() -> Style {
        let mut style = Style::new("Test");
        style.add_rule(Rule::new("margin", 10.0), "margin", None);
        assert!(style.add_breakpoint("wide", guard("width > 400")));
        assert!(style.add_breakpoint("huge", guard("width > 800")));
        style.add_rule(Rule::new("margin", 20.0), "margin", Some("wide"));
        style.add_rule(Rule::new("margin", 40.0), "margin", Some("huge"));
        style.add_rule(Rule::new("padding", 4.0), "padding", Some("wide"));
        style
    }

    fn margin(style: &Style, ctx: &StyleContext) -> f64 {
        style.property("margin", ctx).unwrap().as_number()
    }

    #[test]
    fn context_defaults_skip_breakpoints() {
        let ctx = StyleContext::default();
        assert!(ctx.skips_breakpoints());
        assert!(!StyleContext::with_breakpoints().skips_breakpoints());
    }

    #[test]
    fn skipped_breakpoints_use_default_container() {
        let style = margin_style();
        let ctx = StyleContext::new().variable("width", 1000.0);
        assert_eq!(margin(&style, &ctx), 10.0);
        assert!(style.property("padding", &ctx).is_none());
    }

    #[test]
    fn last_active_breakpoint_wins() {
        let style = margin_style();
        let ctx = |w| StyleContext::with_breakpoints().variable("width", w);
        assert_eq!(margin(&style, &ctx(100.0)), 10.0);
        assert_eq!(margin(&style, &ctx(500.0)), 20.0);
        assert_eq!(margin(&style, &ctx(1000.0)), 40.0);
    }

    #[test]
    fn properties_agrees_with_property() {
        let style = margin_style();
        for width in [100.0, 500.0, 1000.0] {
            let ctx = StyleContext::with_breakpoints().variable("width", width);
            let all = style.properties(&ctx);
            for (name, rule) in &all {
                assert_eq!(
                    rule.as_number(),
                    style.property(name, &ctx).unwrap().as_number()
                );
            }
        }
        let wide = StyleContext::with_breakpoints().variable("width", 500.0);
        assert_eq!(style.properties(&wide).len(), 2);
    }

    #[test]
    fn failing_guard_is_inactive() {
        let style = margin_style();
        // `width` is unbound.
        let ctx = StyleContext::with_breakpoints();
        assert_eq!(margin(&style, &ctx), 10.0);
        assert_eq!(style.active_breakpoints(&ctx).count(), 0);
    }

    #[test]
    fn unknown_breakpoint_is_rejected() {
        let mut style = Style::new("Test");
        assert!(!style.add_rule(Rule::new("margin", 1.0), "margin", Some("nope")));
        assert!(style.default_container().definitions().is_empty());
    }

    #[test]
    fn duplicate_breakpoint_keeps_first_guard() {
        let mut style = Style::new("Test");
        assert!(style.add_breakpoint("bp", guard("1")));
        assert!(!style.add_breakpoint("bp", guard("0")));
        assert_eq!(style.breakpoints().len(), 1);
        style.add_rule(Rule::new("x", 5.0), "x", Some("bp"));
        let ctx = StyleContext::with_breakpoints();
        assert_eq!(style.property("x", &ctx).unwrap().as_number(), 5.0);
    }

    #[test]
    fn animators_follow_the_same_policy() {
        use crate::types::{ObjectKind, ObjectValue};

        let mut style = Style::new("Test");
        style.add_breakpoint("on", guard("1"));
        style.add_animator(ObjectValue::new(ObjectKind::Animator, 1_u8), "alpha", None);
        style.add_animator(ObjectValue::new(ObjectKind::Animator, 2_u8), "alpha", Some("on"));

        let skipped = StyleContext::new();
        let active = StyleContext::with_breakpoints();
        assert_eq!(
            style.animator("alpha", &skipped).unwrap().downcast_ref::<u8>(),
            Some(&1)
        );
        assert_eq!(
            style.animator("alpha", &active).unwrap().downcast_ref::<u8>(),
            Some(&2)
        );
        assert!(style.animator("beta", &active).is_none());
    }
}
