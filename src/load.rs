use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Instant;

use serde_yaml::{Mapping, Value as Node};

use crate::import::{document_name, ImportResolver};
use crate::types::{Environment, Expression, ObjectKind, Rule, Style};
use crate::{sanitize, LoadError};

/// Root key listing documents to append.
pub const IMPORT_KEY: &str = "_import";
/// Field holding a breakpoint's guard formula.
pub const BREAKPOINT_KEY: &str = "_breakpoint";
/// YAML merge key used for inheritance.
pub const MERGE_KEY: &str = "<<";
/// Separates a style name from its breakpoint name, as in `Button/compact`.
pub const BREAKPOINT_SEPARATOR: char = '/';
/// Prefixes marking a field as a property animator.
pub const ANIMATOR_PREFIXES: [&str; 2] = ["animator-", "_animator_"];

/// Guard used when a `_breakpoint` value is not a formula.
const INACTIVE_GUARD: &str = "0";

pub(crate) fn load(
    text: &str,
    env: &Environment,
    resolver: &dyn ImportResolver,
) -> Result<HashMap<String, Style>, LoadError> {
    let start = Instant::now();

    let root = parse_root(text)?;
    let imports = imports_of(&root)?;
    let root = if imports.is_empty() {
        root
    } else {
        let mut content = text.to_owned();
        for reference in &imports {
            let name = document_name(reference);
            let imported = resolver.resolve(name)?;
            if imported.trim().is_empty() {
                tracing::warn!(import = name, "imported stylesheet is empty");
                continue;
            }
            tracing::debug!(import = name, bytes = imported.len(), "appending import");
            content.push('\n');
            content.push_str(&without_imports(&imported, name));
        }
        parse_root(&content)?
    };

    let styles = assemble(&root, env)?;
    tracing::debug!(
        styles = styles.len(),
        elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
        "stylesheet loaded"
    );
    Ok(styles)
}

fn parse_root(text: &str) -> Result<Mapping, LoadError> {
    if text.trim().is_empty() {
        return Err(malformed("the stylesheet is empty"));
    }
    match serde_yaml::from_str::<Node>(text)? {
        Node::Mapping(mapping) => Ok(mapping),
        _ => Err(malformed("the root node should be a mapping")),
    }
}

fn imports_of(root: &Mapping) -> Result<Vec<String>, LoadError> {
    match root.get(IMPORT_KEY) {
        None | Some(Node::Null) => Ok(Vec::new()),
        Some(Node::Sequence(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| malformed("'_import' entries should be document names"))
            })
            .collect(),
        Some(_) => Err(malformed("'_import' should be a sequence")),
    }
}

/// Drops the top-level `_import` entry of an imported document, along with
/// its indented or `- ` continuation lines. Imports are one level deep.
fn without_imports<'a>(text: &'a str, name: &str) -> Cow<'a, str> {
    if !text.lines().any(is_import_line) {
        return Cow::Borrowed(text);
    }
    tracing::warn!(import = name, "nested imports are not followed");

    let mut kept = String::with_capacity(text.len());
    let mut skipping = false;
    for line in text.lines() {
        if skipping {
            let continues = line.starts_with([' ', '\t'])
                || line.starts_with("- ")
                || line == "-"
                || line.trim().is_empty();
            if continues {
                continue;
            }
            skipping = false;
        }
        if is_import_line(line) {
            skipping = true;
            continue;
        }
        kept.push_str(line);
        kept.push('\n');
    }
    Cow::Owned(kept)
}

fn is_import_line(line: &str) -> bool {
    line.strip_prefix(IMPORT_KEY)
        .is_some_and(|rest| rest.trim_start().starts_with(':'))
}

fn assemble(root: &Mapping, env: &Environment) -> Result<HashMap<String, Style>, LoadError> {
    let mut styles: HashMap<String, Style> = HashMap::new();

    for (key, node) in root {
        let key = key
            .as_str()
            .ok_or_else(|| malformed("style names should be strings"))?;
        if key == IMPORT_KEY {
            continue;
        }
        let Node::Mapping(definitions) = node else {
            return Err(malformed(&format!("style '{key}' should be a mapping")));
        };

        let (name, breakpoint) = split_key(key);
        let style = styles
            .entry(name.to_owned())
            .or_insert_with(|| Style::new(name));

        if let Some(breakpoint) = breakpoint {
            if let Some(guard) = definitions.get(BREAKPOINT_KEY) {
                let guard = build_guard(key, guard, env)?;
                style.add_breakpoint(breakpoint, guard);
            }
        }

        let mut section = Section {
            key,
            style,
            breakpoint,
            env,
        };
        section.apply(definitions)?;
    }

    Ok(styles)
}

/// `Style/breakpoint` splits only when there is exactly one separator.
fn split_key(key: &str) -> (&str, Option<&str>) {
    let mut parts = key.split(BREAKPOINT_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(breakpoint), None) => (name, Some(breakpoint)),
        _ => (key, None),
    }
}

fn build_guard(key: &str, node: &Node, env: &Environment) -> Result<Expression, LoadError> {
    let formula = match node.as_str().and_then(sanitize) {
        Some(formula) => formula,
        None => {
            tracing::warn!(style = key, "breakpoint guard is not a formula, breakpoint disabled");
            INACTIVE_GUARD.to_owned()
        }
    };
    env.symbols.build(&formula).map_err(|err| LoadError::MalformedRule {
        style: key.to_owned(),
        key: BREAKPOINT_KEY.to_owned(),
        reason: err.to_string(),
    })
}

fn animator_property(field: &str) -> Option<&str> {
    ANIMATOR_PREFIXES
        .iter()
        .find_map(|prefix| field.strip_prefix(prefix))
}

/// One top-level entry being written into its style.
struct Section<'a> {
    key: &'a str,
    style: &'a mut Style,
    breakpoint: Option<&'a str>,
    env: &'a Environment,
}

impl Section<'_> {
    /// Apply inherited fields first so the mapping's own fields override them.
    fn apply(&mut self, definitions: &Mapping) -> Result<(), LoadError> {
        if let Some(parents) = definitions.get(MERGE_KEY) {
            match parents {
                Node::Mapping(parent) => self.apply(parent)?,
                Node::Sequence(items) => {
                    for item in items {
                        let Node::Mapping(parent) = item else {
                            return Err(malformed(&format!(
                                "'<<' in '{}' should only list mappings",
                                self.key
                            )));
                        };
                        self.apply(parent)?;
                    }
                }
                _ => {
                    return Err(malformed(&format!(
                        "'<<' in '{}' should be a mapping",
                        self.key
                    )))
                }
            }
        }

        for (field, node) in definitions {
            let field = field.as_str().ok_or_else(|| LoadError::InvalidKey {
                style: self.key.to_owned(),
            })?;
            if field == MERGE_KEY || field == BREAKPOINT_KEY {
                continue;
            }
            match animator_property(field) {
                Some(property) => self.add_animator(property, node)?,
                None => self.add_rule(field, node)?,
            }
        }
        Ok(())
    }

    fn add_rule(&mut self, field: &str, node: &Node) -> Result<(), LoadError> {
        let rule = Rule::from_node(field, node, self.env)
            .map_err(|err| err.into_load_error(self.key, field))?;
        self.style.add_rule(rule, field, self.breakpoint);
        Ok(())
    }

    fn add_animator(&mut self, property: &str, node: &Node) -> Result<(), LoadError> {
        let rule = Rule::from_node(property, node, self.env)
            .map_err(|err| err.into_load_error(self.key, property))?;
        match rule.object() {
            Some(object) if object.kind() == ObjectKind::Animator => {
                self.style
                    .add_animator(object.clone(), property, self.breakpoint);
                Ok(())
            }
            _ => Err(LoadError::MalformedRule {
                style: self.key.to_owned(),
                key: property.to_owned(),
                reason: format!(
                    "animators should be '_type: animator' objects, found {}",
                    rule.value_type()
                ),
            }),
        }
    }
}

fn malformed(message: &str) -> LoadError {
    LoadError::MalformedStylesheet {
        message: message.to_owned(),
    }
}
