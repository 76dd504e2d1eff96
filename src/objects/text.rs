use super::color::Color;
use super::font::{weight_or_regular, Font, FontWeight};
use super::{ObjectExpr, Scalar};
use crate::types::{ObjectError, ObjectKind, ObjectValue};

/// A font together with its letter spacing and color.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub kern: f64,
    /// Whether the host should scale the font with the user's text size
    /// preference.
    pub support_dynamic_type: bool,
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: Font::default(),
            kern: 1.0,
            support_dynamic_type: true,
            color: Color::BLACK,
        }
    }
}

/// Property bag behind `_type: text`.
#[derive(Debug, Clone)]
pub(crate) struct TextExpr {
    name: Option<String>,
    size: f64,
    kern: f64,
    weight: FontWeight,
    support_dynamic_type: bool,
    hex: Option<String>,
}

impl Default for TextExpr {
    fn default() -> Self {
        Self {
            name: None,
            size: Font::DEFAULT_SIZE,
            kern: 1.0,
            weight: FontWeight::Regular,
            support_dynamic_type: true,
            hex: None,
        }
    }
}

impl TextExpr {
    fn text_style(&self) -> Result<TextStyle, ObjectError> {
        let color = match &self.hex {
            Some(hex) => Color::from_hex(hex).ok_or_else(|| ObjectError::InvalidField {
                field: "hex".to_owned(),
                reason: format!("'{hex}' is not an RRGGBB or RRGGBBAA color"),
            })?,
            None => Color::BLACK,
        };
        let font = Font {
            name: self.name.clone(),
            size: self.size,
            weight: self.weight,
        };
        Ok(TextStyle {
            font,
            kern: self.kern,
            support_dynamic_type: self.support_dynamic_type,
            color,
        })
    }
}

impl ObjectExpr for TextExpr {
    fn set(&mut self, field: &str, value: &Scalar) -> bool {
        match field {
            "name" => value.as_string().map(|s| self.name = Some(s)).is_some(),
            "size" => value.as_f64().map(|v| self.size = v).is_some(),
            "kern" => value.as_f64().map(|v| self.kern = v).is_some(),
            "weight" => value
                .as_string()
                .map(|s| self.weight = weight_or_regular(&s))
                .is_some(),
            "supportDynamicType" => value
                .as_bool()
                .map(|b| self.support_dynamic_type = b)
                .is_some(),
            "hex" => value.as_string().map(|s| self.hex = Some(s)).is_some(),
            _ => false,
        }
    }

    fn eval(&self) -> Result<ObjectValue, ObjectError> {
        Ok(ObjectValue::new(ObjectKind::Text, self.text_style()?))
    }
}
