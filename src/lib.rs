//! YAML stylesheets with typed rules, breakpoint overrides and `${...}`
//! formulas.
//!
//! ```
//! use cascade::{StyleContext, Stylesheet};
//!
//! let mut sheet = Stylesheet::new();
//! sheet
//!     .load_str(
//!         "Title:\n  size: ${iPhoneSE.width / 20}\n  font: {_type: font, size: 12}\n",
//!     )
//!     .unwrap();
//!
//! let title = sheet.properties_for("Title", &StyleContext::default());
//! assert_eq!(title["size"].as_number(), 16.0);
//! assert_eq!(title["font"].as_font().size, 12.0);
//! ```

pub mod defaults;
mod error;
mod evaluate;
pub mod import;
mod load;
pub mod objects;
pub mod parse;
mod types;

pub use error::CascadeError;
pub use load::{ANIMATOR_PREFIXES, BREAKPOINT_KEY, BREAKPOINT_SEPARATOR, IMPORT_KEY, MERGE_KEY};
pub use objects::{
    AnimationCurve, Animator, Color, Font, FontWeight, ObjectExpr, ObjectFactory, ObjectRegistry,
    Scalar, TextStyle,
};
pub use types::{
    num, sanitize, var, BinaryOp, Container, ContentMode, EnumRepresentable, Environment,
    EvaluationError, Expression, Formula, LineBreakMode, LoadError, LookupError, ObjectError,
    ObjectKind, ObjectValue, Orientation, Rule, RuleError, RuleObject, SizeClass, Style,
    StyleContext, Stylesheet, StylesheetBuilder, Symbol, SymbolTable, TextAlignment, UnaryOp,
    Value, ValueType,
};
