use serde_yaml::Value as Node;

use super::enums::EnumRepresentable;
use super::environment::Environment;
use super::error::RuleError;
use super::value::{ObjectValue, RuleObject, Value, ValueType};
use crate::objects::{Animator, Color, Font, TextStyle};

/// One style property: a key and its typed value.
///
/// Rules are built from document nodes by [`Rule::from_node()`] and read
/// through total accessors. An accessor asked for the wrong type logs a
/// warning and returns its default rather than failing. The value, and so
/// the rule's type, is fixed once built.
#[derive(Debug, Clone)]
pub struct Rule {
    key: String,
    value: Value,
}

impl Rule {
    #[must_use]
    pub fn new(key: &str, value: impl Into<Value>) -> Self {
        Self {
            key: key.to_owned(),
            value: value.into(),
        }
    }

    /// Build a rule from a document node.
    ///
    /// Booleans and numbers map directly. A string starting with `$` is
    /// compiled as a formula; other strings are literals. A mapping is an
    /// object expression evaluated through the environment's
    /// [`ObjectRegistry`](crate::ObjectRegistry). Anything else is
    /// [`Value::Undefined`].
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] when a formula does not parse or an object
    /// mapping cannot be built.
    pub fn from_node(key: &str, node: &Node, env: &Environment) -> Result<Self, RuleError> {
        let value = match node {
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => n.as_f64().map_or(Value::Undefined, Value::Number),
            Node::String(s) => match env.symbols.parse_expression(s) {
                Some(expression) => Value::Expression(expression?),
                None => Value::String(s.clone()),
            },
            Node::Mapping(mapping) => Value::Object(env.objects.eval(mapping)?),
            Node::Null | Node::Sequence(_) | Node::Tagged(_) => Value::Undefined,
        };
        Ok(Self {
            key: key.to_owned(),
            value,
        })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    /// Numeric value. Formulas are evaluated on every call.
    ///
    /// Returns `0.0` (with a warning) for strings, objects, undefined values
    /// and formulas that fail to evaluate.
    #[must_use]
    pub fn as_number(&self) -> f64 {
        match &self.value {
            Value::Number(v) => *v,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Expression(expression) => expression.evaluate().unwrap_or_else(|err| {
                tracing::warn!(key = %self.key, %expression, error = %err, "formula evaluation failed");
                0.0
            }),
            other => {
                self.mismatch("number", other);
                0.0
            }
        }
    }

    /// [`as_number()`](Self::as_number) truncated toward zero.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn as_integer(&self) -> i64 {
        self.as_number() as i64
    }

    /// `true` when [`as_number()`](Self::as_number) is non-zero.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        self.as_number() != 0.0
    }

    /// The literal string, or `""` for any other type.
    #[must_use]
    pub fn as_string(&self) -> &str {
        match &self.value {
            Value::String(s) => s,
            other => {
                self.mismatch("string", other);
                ""
            }
        }
    }

    /// Read the integer value as an enum, falling back to `T::default()`
    /// for raw values with no variant.
    #[must_use]
    pub fn as_enum<T: EnumRepresentable + Default>(&self) -> T {
        self.as_enum_or(T::default())
    }

    #[must_use]
    pub fn as_enum_or<T: EnumRepresentable>(&self, default: T) -> T {
        let raw = self.as_integer();
        T::from_raw(raw).unwrap_or_else(|| {
            tracing::warn!(key = %self.key, raw, namespace = T::NAMESPACE, "no enum variant for value");
            default
        })
    }

    /// Host-facing view of the value. `None` only for undefined values.
    #[must_use]
    pub fn as_object(&self) -> Option<RuleObject<'_>> {
        match &self.value {
            Value::Number(_) | Value::Bool(_) | Value::Expression(_) => {
                Some(RuleObject::Number(self.as_number()))
            }
            Value::String(s) => Some(RuleObject::String(s)),
            Value::Object(object) => Some(RuleObject::Object(object)),
            Value::Undefined => None,
        }
    }

    /// The evaluated object, if this rule holds one.
    #[must_use]
    pub fn object(&self) -> Option<&ObjectValue> {
        match &self.value {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The object payload as `T`, if this rule holds an object of that type.
    #[must_use]
    pub fn downcast<T: std::any::Any>(&self) -> Option<&T> {
        self.object().and_then(ObjectValue::downcast_ref::<T>)
    }

    /// The color, or black.
    #[must_use]
    pub fn as_color(&self) -> Color {
        self.typed("color")
    }

    /// The font, or the 10pt regular system font.
    #[must_use]
    pub fn as_font(&self) -> Font {
        self.typed("font")
    }

    /// The animator, or a zero-length linear animator.
    #[must_use]
    pub fn as_animator(&self) -> Animator {
        self.typed("animator")
    }

    #[must_use]
    pub fn as_text_style(&self) -> TextStyle {
        self.typed("text")
    }

    fn typed<T: std::any::Any + Clone + Default>(&self, expected: &str) -> T {
        if let Some(v) = self.downcast::<T>() {
            return v.clone();
        }
        self.mismatch(expected, &self.value);
        T::default()
    }

    fn mismatch(&self, expected: &str, found: &Value) {
        tracing::warn!(
            key = %self.key,
            expected,
            found = %found.value_type(),
            "rule type mismatch, using default"
        );
    }
}
