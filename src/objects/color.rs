use super::{ObjectExpr, Scalar};
use crate::types::{ObjectError, ObjectKind, ObjectValue};

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with an optional leading `#`.
    ///
    /// ```
    /// use cascade::Color;
    ///
    /// let c = Color::from_hex("#ff000080").unwrap();
    /// assert_eq!(c.red, 1.0);
    /// assert!((c.alpha - 128.0 / 255.0).abs() < 1e-9);
    /// assert!(Color::from_hex("fff").is_none());
    /// ```
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let raw = u32::from_str_radix(digits, 16).ok()?;
        let channel = |shift: u32| f64::from((raw >> shift) & 0xFF) / 255.0;
        match digits.len() {
            6 => Some(Self::rgba(channel(16), channel(8), channel(0), 1.0)),
            8 => Some(Self::rgba(channel(24), channel(16), channel(8), channel(0))),
            _ => None,
        }
    }

    /// Add `percentage / 100` to every RGB channel, capped at `1.0`.
    /// Negative percentages darken, floored at `0.0`.
    #[must_use]
    pub fn adjust(self, percentage: f64) -> Self {
        let delta = percentage / 100.0;
        let shift = |c: f64| (c + delta).clamp(0.0, 1.0);
        Self::rgba(shift(self.red), shift(self.green), shift(self.blue), self.alpha)
    }

    #[must_use]
    pub fn lighter(self, percentage: f64) -> Self {
        self.adjust(percentage.abs())
    }

    #[must_use]
    pub fn darker(self, percentage: f64) -> Self {
        self.adjust(-percentage.abs())
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }
}

/// Property bag behind `_type: color`.
#[derive(Debug, Clone)]
pub(crate) struct ColorExpr {
    hex: Option<String>,
    darken: f64,
    lighten: f64,
    alpha: f64,
}

impl Default for ColorExpr {
    fn default() -> Self {
        Self {
            hex: None,
            darken: 0.0,
            lighten: 0.0,
            alpha: 1.0,
        }
    }
}

impl ColorExpr {
    pub(crate) fn color(&self) -> Result<Color, ObjectError> {
        let mut color = match &self.hex {
            Some(hex) => Color::from_hex(hex).ok_or_else(|| ObjectError::InvalidField {
                field: "hex".to_owned(),
                reason: format!("'{hex}' is not an RRGGBB or RRGGBBAA color"),
            })?,
            None => Color::BLACK,
        };
        if self.darken > 0.0 {
            color = color.darker(self.darken);
        } else if self.lighten > 0.0 {
            color = color.lighter(self.lighten);
        }
        if self.alpha < 1.0 {
            color = color.with_alpha(self.alpha);
        }
        Ok(color)
    }
}

impl ObjectExpr for ColorExpr {
    fn set(&mut self, field: &str, value: &Scalar) -> bool {
        match field {
            "hex" => value.as_string().map(|s| self.hex = Some(s)).is_some(),
            "darken" => value.as_f64().map(|v| self.darken = v).is_some(),
            "lighten" => value.as_f64().map(|v| self.lighten = v).is_some(),
            "alpha" => value.as_f64().map(|v| self.alpha = v).is_some(),
            _ => false,
        }
    }

    fn eval(&self) -> Result<ObjectValue, ObjectError> {
        Ok(ObjectValue::new(ObjectKind::Color, self.color()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn from_hex_six_and_eight_digits() {
        assert_eq!(Color::from_hex("ff0000"), Some(Color::rgba(1.0, 0.0, 0.0, 1.0)));
        let c = Color::from_hex("#00ff0000").unwrap();
        assert_eq!(c, Color::rgba(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(Color::from_hex("000").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
        assert!(Color::from_hex("+12345").is_none());
        assert!(Color::from_hex("").is_none());
    }

    #[test]
    fn adjust_caps_channels() {
        let c = Color::rgba(0.9, 0.5, 0.0, 1.0).lighter(20.0);
        assert!(approx(c.red, 1.0));
        assert!(approx(c.green, 0.7));
        assert!(approx(c.blue, 0.2));

        let d = Color::rgba(0.1, 0.5, 1.0, 1.0).darker(20.0);
        assert!(approx(d.red, 0.0));
        assert!(approx(d.green, 0.3));
        assert!(approx(d.blue, 0.8));
    }

    #[test]
    fn expr_darken_takes_precedence_over_lighten() {
        let mut expr = ColorExpr::default();
        assert!(expr.set("hex", &Scalar::String("808080".into())));
        assert!(expr.set("darken", &Scalar::Int(10)));
        assert!(expr.set("lighten", &Scalar::Int(10)));
        assert!(expr.set("alpha", &Scalar::Float(0.5)));
        let c = expr.color().unwrap();
        assert!(approx(c.red, 128.0 / 255.0 - 0.1));
        assert!(approx(c.alpha, 0.5));
    }

    #[test]
    fn expr_numeric_hex_is_read_as_string() {
        let mut expr = ColorExpr::default();
        assert!(expr.set("hex", &Scalar::Int(112_233)));
        let c = expr.color().unwrap();
        assert!(approx(c.red, f64::from(0x11) / 255.0));
    }

    #[test]
    fn expr_invalid_hex_is_an_error() {
        let mut expr = ColorExpr::default();
        expr.set("hex", &Scalar::String("nope".into()));
        assert!(matches!(
            expr.eval(),
            Err(ObjectError::InvalidField { ref field, .. }) if field == "hex"
        ));
    }

    #[test]
    fn expr_defaults_to_black_and_rejects_unknown_fields() {
        let mut expr = ColorExpr::default();
        assert!(!expr.set("shade", &Scalar::Int(1)));
        assert!(!expr.set("alpha", &Scalar::String("x".into())));
        assert_eq!(expr.color().unwrap(), Color::BLACK);
    }
}
