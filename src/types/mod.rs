mod enums;
mod environment;
mod error;
mod expr;
mod rule;
mod style;
mod stylesheet;
mod symbol_table;
mod value;

pub use enums::{
    ContentMode, EnumRepresentable, LineBreakMode, Orientation, SizeClass, TextAlignment,
};
pub use environment::Environment;
pub use error::{EvaluationError, LoadError, LookupError, ObjectError, RuleError};
pub use expr::{num, var, BinaryOp, Formula, UnaryOp};
pub use rule::Rule;
pub use style::{Container, Style, StyleContext};
pub use stylesheet::{Stylesheet, StylesheetBuilder};
pub use symbol_table::{sanitize, Expression, Symbol, SymbolTable};
pub use value::{ObjectKind, ObjectValue, RuleObject, Value, ValueType};
