//! Compound values built from `_type` mappings.
//!
//! A mapping such as
//!
//! ```yaml
//! font: {_type: font, name: Menlo, size: 12}
//! ```
//!
//! is handed to the [`ObjectRegistry`], which picks the factory registered
//! for the `_type` discriminator, assigns every other scalar field to a fresh
//! property bag and evaluates the bag into an [`ObjectValue`].

mod animator;
mod color;
mod font;
mod text;

use std::fmt;

use serde_yaml::{Mapping, Value as Node};

pub use animator::{AnimationCurve, Animator};
pub use color::Color;
pub use font::{Font, FontWeight};
pub use text::TextStyle;

use crate::types::{ObjectError, ObjectKind, ObjectValue};

/// Field naming the factory in an object mapping.
pub const TYPE_KEY: &str = "_type";

/// A scalar document value assigned to a property bag field.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Convert a document node. Mappings, sequences, nulls and tagged nodes
    /// have no scalar form.
    #[must_use]
    pub fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Bool(b) => Some(Scalar::Bool(*b)),
            Node::Number(n) => n
                .as_i64()
                .map(Scalar::Int)
                .or_else(|| n.as_f64().map(Scalar::Float)),
            Node::String(s) => Some(Scalar::String(s.clone())),
            _ => None,
        }
    }

    /// Numeric view: ints widen, bools become `1` / `0`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::String(_) => None,
        }
    }

    /// Boolean view: numbers are true when non-zero.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::String(_) => None,
            other => other.as_f64().map(|v| v != 0.0),
        }
    }

    /// String view: numbers are formatted, so `hex: 000000` still reads
    /// as a string after the document parser typed it as an integer.
    #[must_use]
    pub fn as_string(&self) -> Option<String> {
        match self {
            Scalar::String(s) => Some(s.clone()),
            Scalar::Int(i) => Some(i.to_string()),
            Scalar::Float(_) | Scalar::Bool(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// A mutable property bag produced by an [`ObjectFactory`].
///
/// Implementations keep an explicit field table in [`set()`](Self::set):
/// every known field name is matched and its value coerced. Returning
/// `false` means the field is unknown or the value cannot be coerced; the
/// registry skips it and the bag keeps its default.
pub trait ObjectExpr {
    fn set(&mut self, field: &str, value: &Scalar) -> bool;

    /// Build the final value from the assigned fields.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::InvalidField`] when an assigned field holds a
    /// value the bag cannot use (e.g. a malformed color hex).
    fn eval(&self) -> Result<ObjectValue, ObjectError>;
}

type Builder = Box<dyn Fn() -> Box<dyn ObjectExpr> + Send + Sync>;

/// Named constructor for a property bag type.
pub struct ObjectFactory {
    name: String,
    kind: ObjectKind,
    builder: Builder,
}

impl ObjectFactory {
    /// Register a bag type constructed through its `Default` impl.
    #[must_use]
    pub fn new<T>(name: &str, kind: ObjectKind) -> Self
    where
        T: ObjectExpr + Default + 'static,
    {
        Self::with_builder(name, kind, || Box::new(T::default()))
    }

    #[must_use]
    pub fn with_builder(
        name: &str,
        kind: ObjectKind,
        builder: impl Fn() -> Box<dyn ObjectExpr> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            builder: Box::new(builder),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    fn build(&self) -> Box<dyn ObjectExpr> {
        (self.builder)()
    }
}

impl fmt::Debug for ObjectFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectFactory")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Ordered list of object factories, looked up by `_type`.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    factories: Vec<ObjectFactory>,
}

impl ObjectRegistry {
    /// An empty registry: every object mapping fails with
    /// [`ObjectError::UnknownType`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `color`, `font`, `animator` and `text`
    /// factories.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.export(ObjectFactory::new::<color::ColorExpr>(
            "color",
            ObjectKind::Color,
        ));
        registry.export(ObjectFactory::new::<font::FontExpr>("font", ObjectKind::Font));
        registry.export(ObjectFactory::new::<animator::AnimatorExpr>(
            "animator",
            ObjectKind::Animator,
        ));
        registry.export(ObjectFactory::new::<text::TextExpr>("text", ObjectKind::Text));
        registry
    }

    /// Append a factory. When two factories share a name the one exported
    /// first is used.
    pub fn export(&mut self, factory: ObjectFactory) {
        self.factories.push(factory);
    }

    #[must_use]
    pub fn factory(&self, name: &str) -> Option<&ObjectFactory> {
        self.factories.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Evaluate an object mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::MissingType`] when `_type` is absent or not a
    /// string, [`ObjectError::UnknownType`] when no factory matches, and
    /// whatever the bag's [`eval()`](ObjectExpr::eval) reports. The value
    /// always carries the factory's declared [`ObjectKind`].
    pub fn eval(&self, mapping: &Mapping) -> Result<ObjectValue, ObjectError> {
        let name = mapping
            .get(TYPE_KEY)
            .and_then(Node::as_str)
            .ok_or(ObjectError::MissingType)?;
        let factory = self
            .factory(name)
            .ok_or_else(|| ObjectError::UnknownType {
                name: name.to_owned(),
            })?;

        let mut bag = factory.build();
        for (key, node) in mapping {
            let Some(field) = key.as_str() else {
                continue;
            };
            if field == TYPE_KEY {
                continue;
            }
            match Scalar::from_node(node) {
                Some(scalar) => {
                    if !bag.set(field, &scalar) {
                        tracing::trace!(object = name, field, value = %scalar, "skipping field");
                    }
                }
                None => tracing::trace!(object = name, field, "skipping non-scalar field"),
            }
        }

        let value = bag.eval()?;
        if value.kind() != factory.kind {
            tracing::warn!(
                object = name,
                expected = %factory.kind,
                produced = %value.kind(),
                "object produced a different kind than its factory declares, using the declared kind"
            );
        }
        Ok(value.with_kind(factory.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn scalar_from_node() {
        assert_eq!(Scalar::from_node(&Node::from(3)), Some(Scalar::Int(3)));
        assert_eq!(Scalar::from_node(&Node::from(1.5)), Some(Scalar::Float(1.5)));
        assert_eq!(Scalar::from_node(&Node::from(true)), Some(Scalar::Bool(true)));
        assert_eq!(Scalar::from_node(&Node::Null), None);
    }

    #[test]
    fn scalar_coercions() {
        assert_eq!(Scalar::Int(2).as_f64(), Some(2.0));
        assert_eq!(Scalar::Bool(true).as_f64(), Some(1.0));
        assert_eq!(Scalar::Float(0.0).as_bool(), Some(false));
        assert_eq!(Scalar::Int(123_456).as_string().as_deref(), Some("123456"));
        assert_eq!(Scalar::String("x".into()).as_f64(), None);
        assert_eq!(Scalar::Float(1.5).as_string(), None);
    }

    #[test]
    fn eval_requires_type() {
        let registry = ObjectRegistry::with_defaults();
        assert_eq!(
            registry.eval(&mapping("size: 12")).unwrap_err(),
            ObjectError::MissingType
        );
        assert_eq!(
            registry.eval(&mapping("_type: 3")).unwrap_err(),
            ObjectError::MissingType
        );
        assert_eq!(
            registry.eval(&mapping("_type: gradient")).unwrap_err(),
            ObjectError::UnknownType {
                name: "gradient".into()
            }
        );
    }

    #[test]
    fn eval_builds_registered_kind() {
        let registry = ObjectRegistry::with_defaults();
        let value = registry
            .eval(&mapping("{_type: font, size: 12, unknown: 1, nested: {a: 1}}"))
            .unwrap();
        assert_eq!(value.kind(), ObjectKind::Font);
        assert_eq!(value.downcast_ref::<Font>().unwrap().size, 12.0);
    }

    #[derive(Default)]
    struct Pair {
        a: f64,
        b: f64,
    }

    impl ObjectExpr for Pair {
        fn set(&mut self, field: &str, value: &Scalar) -> bool {
            let slot = match field {
                "a" => &mut self.a,
                "b" => &mut self.b,
                _ => return false,
            };
            value.as_f64().map(|v| *slot = v).is_some()
        }

        fn eval(&self) -> Result<ObjectValue, ObjectError> {
            Ok(ObjectValue::new(ObjectKind::Custom("pair"), (self.a, self.b)))
        }
    }

    #[test]
    fn custom_factory_first_registration_wins() {
        let mut registry = ObjectRegistry::new();
        registry.export(ObjectFactory::new::<Pair>("pair", ObjectKind::Custom("pair")));
        registry.export(ObjectFactory::new::<font::FontExpr>("pair", ObjectKind::Font));
        assert_eq!(registry.len(), 2);

        let value = registry.eval(&mapping("{_type: pair, a: 1, b: 2.5}")).unwrap();
        assert_eq!(value.downcast_ref::<(f64, f64)>(), Some(&(1.0, 2.5)));
    }

    #[test]
    fn declared_kind_overrides_the_bag() {
        let mut registry = ObjectRegistry::new();
        registry.export(ObjectFactory::new::<Pair>("twin", ObjectKind::Custom("twin")));

        let value = registry.eval(&mapping("{_type: twin, a: 3}")).unwrap();
        assert_eq!(value.kind(), ObjectKind::Custom("twin"));
        assert_eq!(value.downcast_ref::<(f64, f64)>(), Some(&(3.0, 0.0)));
    }
}
