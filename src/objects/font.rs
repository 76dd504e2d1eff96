use std::fmt;
use std::str::FromStr;

use super::{ObjectExpr, Scalar};
use crate::types::{ObjectError, ObjectKind, ObjectValue};

/// System font weights with their numeric weight values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    UltraLight,
    Thin,
    Light,
    #[default]
    Regular,
    Medium,
    Semibold,
    Bold,
    Heavy,
    Black,
}

impl FontWeight {
    /// Numeric weight, `0.0` for regular, negative for lighter weights.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            FontWeight::UltraLight => -0.8,
            FontWeight::Thin => -0.6,
            FontWeight::Light => -0.4,
            FontWeight::Regular => 0.0,
            FontWeight::Medium => 0.23,
            FontWeight::Semibold => 0.3,
            FontWeight::Bold => 0.4,
            FontWeight::Heavy => 0.56,
            FontWeight::Black => 0.62,
        }
    }

    fn name(self) -> &'static str {
        match self {
            FontWeight::UltraLight => "ultralight",
            FontWeight::Thin => "thin",
            FontWeight::Light => "light",
            FontWeight::Regular => "regular",
            FontWeight::Medium => "medium",
            FontWeight::Semibold => "semibold",
            FontWeight::Bold => "bold",
            FontWeight::Heavy => "heavy",
            FontWeight::Black => "black",
        }
    }
}

impl FromStr for FontWeight {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ultralight" => FontWeight::UltraLight,
            "thin" => FontWeight::Thin,
            "light" => FontWeight::Light,
            "regular" => FontWeight::Regular,
            "medium" => FontWeight::Medium,
            "semibold" => FontWeight::Semibold,
            "bold" => FontWeight::Bold,
            "heavy" => FontWeight::Heavy,
            "black" => FontWeight::Black,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A font description. `name: None` means the system font at `weight`.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub name: Option<String>,
    pub size: f64,
    pub weight: FontWeight,
}

impl Font {
    pub const DEFAULT_SIZE: f64 = 10.0;

    #[must_use]
    pub fn system(size: f64, weight: FontWeight) -> Self {
        Self {
            name: None,
            size,
            weight,
        }
    }

    #[must_use]
    pub fn named(name: &str, size: f64) -> Self {
        Self {
            name: Some(name.to_owned()),
            size,
            weight: FontWeight::Regular,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::system(Self::DEFAULT_SIZE, FontWeight::Regular)
    }
}

/// Parse a weight name, treating unknown names as regular.
pub(crate) fn weight_or_regular(name: &str) -> FontWeight {
    name.parse().unwrap_or_else(|()| {
        tracing::warn!(weight = name, "unknown font weight, using regular");
        FontWeight::Regular
    })
}

/// Property bag behind `_type: font`.
#[derive(Debug, Clone, Default)]
pub(crate) struct FontExpr {
    font: Font,
}

impl ObjectExpr for FontExpr {
    fn set(&mut self, field: &str, value: &Scalar) -> bool {
        match field {
            "name" => value.as_string().map(|s| self.font.name = Some(s)).is_some(),
            "size" => value.as_f64().map(|v| self.font.size = v).is_some(),
            "weight" => value
                .as_string()
                .map(|s| self.font.weight = weight_or_regular(&s))
                .is_some(),
            _ => false,
        }
    }

    fn eval(&self) -> Result<ObjectValue, ObjectError> {
        Ok(ObjectValue::new(ObjectKind::Font, self.font.clone()))
    }
}
