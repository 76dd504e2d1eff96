use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::symbol_table::Expression;

/// The payload of a [`Rule`](super::Rule).
#[derive(Debug, Clone)]
pub enum Value {
    /// A `${...}` formula, evaluated on every read.
    Expression(Expression),
    Bool(bool),
    Number(f64),
    /// A literal string (anything not starting with `$`).
    String(String),
    /// A compound value built by the [`ObjectRegistry`](crate::ObjectRegistry).
    Object(ObjectValue),
    /// Null, sequence or tagged nodes.
    Undefined,
}

impl Value {
    /// The type tag derived from this payload.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Expression(_) => ValueType::Expression,
            Value::Bool(_) => ValueType::Bool,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Object(object) => ValueType::Object(object.kind()),
            Value::Undefined => ValueType::Undefined,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Expression> for Value {
    fn from(v: Expression) -> Self {
        Value::Expression(v)
    }
}

impl From<ObjectValue> for Value {
    fn from(v: ObjectValue) -> Self {
        Value::Object(v)
    }
}

/// Type tag of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Expression,
    Bool,
    Number,
    String,
    Object(ObjectKind),
    Undefined,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Expression => write!(f, "expression"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Number => write!(f, "number"),
            ValueType::String => write!(f, "string"),
            ValueType::Object(kind) => write!(f, "object({kind})"),
            ValueType::Undefined => write!(f, "undefined"),
        }
    }
}

/// What an object factory produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Color,
    Font,
    Animator,
    Text,
    /// A host-registered kind, named by its factory.
    Custom(&'static str),
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Color => write!(f, "color"),
            ObjectKind::Font => write!(f, "font"),
            ObjectKind::Animator => write!(f, "animator"),
            ObjectKind::Text => write!(f, "text"),
            ObjectKind::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// An evaluated object expression: a kind tag plus a shared, type-erased
/// payload. Use [`downcast_ref()`](Self::downcast_ref) to recover the
/// concrete type.
#[derive(Clone)]
pub struct ObjectValue {
    kind: ObjectKind,
    payload: Arc<dyn Any + Send + Sync>,
}

impl ObjectValue {
    pub fn new<T: Any + Send + Sync>(kind: ObjectKind, payload: T) -> Self {
        Self {
            kind,
            payload: Arc::new(payload),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub(crate) fn with_kind(self, kind: ObjectKind) -> Self {
        Self { kind, ..self }
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectValue")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Borrowed, host-facing view of a rule value returned by
/// [`Rule::as_object()`](super::Rule::as_object).
#[derive(Debug, Clone, Copy)]
pub enum RuleObject<'a> {
    Number(f64),
    String(&'a str),
    Object(&'a ObjectValue),
}
