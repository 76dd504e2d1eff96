use cascade::{
    CascadeError, Color, LoadError, ObjectError, ObjectExpr, ObjectFactory, ObjectKind,
    ObjectRegistry, ObjectValue, RuleObject, Scalar, StyleContext, Stylesheet, ValueType,
};

/// A host-defined object: a drop shadow.
#[derive(Debug, Clone, PartialEq)]
struct Shadow {
    radius: f64,
    opacity: f64,
    color: Color,
}

#[derive(Default)]
struct ShadowExpr {
    radius: f64,
    opacity: Option<f64>,
    hex: Option<String>,
}

impl ObjectExpr for ShadowExpr {
    fn set(&mut self, field: &str, value: &Scalar) -> bool {
        match field {
            "radius" => value.as_f64().map(|v| self.radius = v).is_some(),
            "opacity" => value.as_f64().map(|v| self.opacity = Some(v)).is_some(),
            "hex" => value.as_string().map(|s| self.hex = Some(s)).is_some(),
            _ => false,
        }
    }

    fn eval(&self) -> Result<ObjectValue, ObjectError> {
        let color = match &self.hex {
            Some(hex) => Color::from_hex(hex).ok_or_else(|| ObjectError::InvalidField {
                field: "hex".into(),
                reason: hex.clone(),
            })?,
            None => Color::BLACK,
        };
        Ok(ObjectValue::new(
            ObjectKind::Custom("shadow"),
            Shadow {
                radius: self.radius,
                opacity: self.opacity.unwrap_or(0.3),
                color,
            },
        ))
    }
}

fn sheet_with_shadows() -> Stylesheet {
    let mut objects = ObjectRegistry::with_defaults();
    objects.export(ObjectFactory::new::<ShadowExpr>(
        "shadow",
        ObjectKind::Custom("shadow"),
    ));
    Stylesheet::builder().objects(objects).build()
}

#[test]
fn custom_factory_builds_host_objects() {
    let mut sheet = sheet_with_shadows();
    sheet
        .load_str("Card:\n  shadow: {_type: shadow, radius: 4, hex: '336699'}\n")
        .unwrap();
    let rule = sheet.rule("Card", "shadow").unwrap();
    assert_eq!(rule.value_type(), ValueType::Object(ObjectKind::Custom("shadow")));

    let shadow = rule.downcast::<Shadow>().unwrap();
    assert_eq!(shadow.radius, 4.0);
    assert_eq!(shadow.opacity, 0.3);
    assert_eq!(shadow.color, Color::from_hex("336699").unwrap());
}

#[test]
fn rule_takes_the_factory_declared_kind() {
    let mut objects = ObjectRegistry::new();
    objects.export(ObjectFactory::new::<ShadowExpr>(
        "glow",
        ObjectKind::Custom("glow"),
    ));
    let mut sheet = Stylesheet::builder().objects(objects).build();
    sheet
        .load_str("Card:\n  halo: {_type: glow, radius: 6}\n")
        .unwrap();

    let rule = sheet.rule("Card", "halo").unwrap();
    assert_eq!(rule.value_type(), ValueType::Object(ObjectKind::Custom("glow")));
    assert_eq!(rule.downcast::<Shadow>().unwrap().radius, 6.0);
}

#[test]
fn custom_factory_errors_fail_the_load() {
    let mut sheet = sheet_with_shadows();
    let err = sheet
        .load_str("Card:\n  shadow: {_type: shadow, hex: purple}\n")
        .unwrap_err();
    assert!(matches!(
        err,
        CascadeError::Load(LoadError::MalformedRule { ref style, ref key, .. })
            if style == "Card" && key == "shadow"
    ));
}

#[test]
fn non_scalar_and_unknown_fields_are_skipped() {
    let mut sheet = Stylesheet::new();
    sheet
        .load_str("Label:\n  font: {_type: font, size: 12, family: [a, b], unknown: 3}\n")
        .unwrap();
    assert_eq!(sheet.rule("Label", "font").unwrap().as_font().size, 12.0);
}

#[test]
fn empty_registry_rejects_every_object() {
    let mut sheet = Stylesheet::builder().objects(ObjectRegistry::new()).build();
    let err = sheet
        .load_str("Label:\n  font: {_type: font, size: 12}\n")
        .unwrap_err();
    assert!(err.to_string().contains("no object factory"), "{err}");
}

#[test]
fn colors_with_adjustments() {
    let mut sheet = Stylesheet::new();
    sheet
        .load_str(
            r##"
Palette:
  accent: {_type: color, hex: "#336699"}
  accentDark: {_type: color, hex: "#336699", darken: 10}
  accentLight: {_type: color, hex: "#336699", lighten: 10}
  overlay: {_type: color, hex: "000000", alpha: 0.4}
  translucent: {_type: color, hex: "ffffff80"}
"##,
        )
        .unwrap();

    let color = |name: &str| sheet.rule("Palette", name).unwrap().as_color();
    let accent = color("accent");
    assert!((color("accentDark").red - (accent.red - 0.1)).abs() < 1e-9);
    assert!((color("accentLight").blue - (accent.blue + 0.1)).abs() < 1e-9);
    assert_eq!(color("overlay").alpha, 0.4);
    assert!((color("translucent").alpha - 128.0 / 255.0).abs() < 1e-9);
}

#[test]
fn as_object_exposes_every_kind() {
    let mut sheet = Stylesheet::new();
    sheet
        .load_str("V: {n: 3, e: '${n + 1}', s: text, o: {_type: color}, u: ~}\n")
        .unwrap();
    let ctx = StyleContext::default();
    let object = |name: &str| sheet.property_for("V", name, &ctx).unwrap().as_object();

    assert!(matches!(object("n"), Some(RuleObject::Number(v)) if v == 3.0));
    // `n` is not a symbol, so the formula falls back to zero.
    assert!(matches!(object("e"), Some(RuleObject::Number(v)) if v == 0.0));
    assert!(matches!(object("s"), Some(RuleObject::String("text"))));
    assert!(matches!(
        object("o"),
        Some(RuleObject::Object(o)) if o.kind() == ObjectKind::Color
    ));
    assert!(object("u").is_none());
}
