use super::{ObjectExpr, Scalar};
use crate::types::{ObjectError, ObjectKind, ObjectValue};

/// Timing curve of a curve-based animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationCurve {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl AnimationCurve {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(AnimationCurve::Linear),
            "easeIn" => Some(AnimationCurve::EaseIn),
            "easeOut" => Some(AnimationCurve::EaseOut),
            "easeInOut" => Some(AnimationCurve::EaseInOut),
            _ => None,
        }
    }
}

/// Animation parameters. A spring animation is described by a damping
/// ratio, everything else by a timing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animator {
    Curve { duration: f64, curve: AnimationCurve },
    Spring { duration: f64, damping: f64 },
}

impl Animator {
    #[must_use]
    pub fn duration(&self) -> f64 {
        match self {
            Animator::Curve { duration, .. } | Animator::Spring { duration, .. } => *duration,
        }
    }
}

impl Default for Animator {
    fn default() -> Self {
        Animator::Curve {
            duration: 0.0,
            curve: AnimationCurve::Linear,
        }
    }
}

/// Property bag behind `_type: animator`.
#[derive(Debug, Clone)]
pub(crate) struct AnimatorExpr {
    duration: f64,
    curve: AnimationCurve,
    damping: f64,
}

impl Default for AnimatorExpr {
    fn default() -> Self {
        Self {
            duration: 0.0,
            curve: AnimationCurve::Linear,
            damping: f64::NAN,
        }
    }
}

impl AnimatorExpr {
    fn animator(&self) -> Animator {
        if self.damping.is_normal() {
            Animator::Spring {
                duration: self.duration,
                damping: self.damping,
            }
        } else {
            Animator::Curve {
                duration: self.duration,
                curve: self.curve,
            }
        }
    }
}

impl ObjectExpr for AnimatorExpr {
    fn set(&mut self, field: &str, value: &Scalar) -> bool {
        match field {
            "duration" => value.as_f64().map(|v| self.duration = v).is_some(),
            "damping" => value.as_f64().map(|v| self.damping = v).is_some(),
            "curve" => {
                let Some(name) = value.as_string() else {
                    return false;
                };
                match AnimationCurve::from_name(&name) {
                    Some(curve) => self.curve = curve,
                    None => tracing::warn!(curve = %name, "unknown animation curve, using linear"),
                }
                true
            }
            _ => false,
        }
    }

    fn eval(&self) -> Result<ObjectValue, ObjectError> {
        Ok(ObjectValue::new(ObjectKind::Animator, self.animator()))
    }
}
