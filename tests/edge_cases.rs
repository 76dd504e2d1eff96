use cascade::import::MemoryResolver;
use cascade::{
    CascadeError, LoadError, LookupError, StyleContext, Stylesheet, SymbolTable, ValueType,
};

fn load(text: &str) -> Result<Stylesheet, CascadeError> {
    let mut sheet = Stylesheet::new();
    sheet.load_str(text)?;
    Ok(sheet)
}

#[test]
fn empty_style_mapping() {
    let sheet = load("Empty: {}\n").unwrap();
    assert_eq!(sheet.style_names(), vec!["Empty"]);
    assert!(sheet.properties_for("Empty", &StyleContext::default()).is_empty());
}

#[test]
fn empty_document_is_malformed() {
    assert!(matches!(
        load(""),
        Err(CascadeError::Load(LoadError::MalformedStylesheet { .. }))
    ));
}

#[test]
fn scalar_root_is_malformed() {
    let CascadeError::Load(err) = load("just a string").unwrap_err();
    assert!(matches!(err, LoadError::MalformedStylesheet { .. }));
    assert_eq!(
        err.to_string(),
        "malformed stylesheet: the root node should be a mapping"
    );
}

#[test]
fn null_and_sequence_values_are_undefined() {
    let sheet = load("V: {a: ~, b: [1, 2], c: !tag 3}\n").unwrap();
    for name in ["a", "b", "c"] {
        let rule = sheet.rule("V", name).unwrap();
        assert_eq!(rule.value_type(), ValueType::Undefined, "{name}");
        assert_eq!(rule.as_number(), 0.0);
        assert_eq!(rule.as_string(), "");
    }
}

#[test]
fn literal_strings_are_not_formulas() {
    let sheet = load("V: {price: '4$', note: 'costs ${5}', escaped: '$5'}\n").unwrap();
    assert_eq!(sheet.rule("V", "price").unwrap().as_string(), "4$");
    assert_eq!(sheet.rule("V", "note").unwrap().as_string(), "costs ${5}");
    // A leading `$` always starts a formula, even without braces.
    assert_eq!(sheet.rule("V", "escaped").unwrap().as_number(), 5.0);
}

#[test]
fn braces_inside_formulas_are_stripped() {
    let sheet = load("V: {x: '${ {1} + {2} }'}\n").unwrap();
    assert_eq!(sheet.rule("V", "x").unwrap().as_number(), 3.0);
}

#[test]
fn malformed_formula_fails_the_load() {
    let err = load("V: {x: '${1 +}'}\n").unwrap_err();
    match err {
        CascadeError::Load(LoadError::MalformedRule { style, key, reason }) => {
            assert_eq!(style, "V");
            assert_eq!(key, "x");
            assert!(reason.starts_with("parse error in `1 +`"), "{reason}");
        }
        other => panic!("expected MalformedRule, got {other:?}"),
    }
}

#[test]
fn division_by_zero_is_not_an_error() {
    let sheet = load("V: {x: '${1 / 0}', y: '${0 / 0}'}\n").unwrap();
    assert_eq!(sheet.rule("V", "x").unwrap().as_number(), f64::INFINITY);
    assert!(sheet.rule("V", "y").unwrap().as_number().is_nan());
    assert_eq!(sheet.rule("V", "y").unwrap().as_integer(), 0);
}

#[test]
fn extra_separators_name_a_distinct_style() {
    // Only `Style/breakpoint` splits; `V/x/y` is a style of its own.
    let sheet = load("V: {a: 1}\nV/x/y: {a: 2}\n").unwrap();
    assert_eq!(sheet.rule("V", "a").unwrap().as_number(), 1.0);
    assert_eq!(sheet.rule("V/x/y", "a").unwrap().as_number(), 2.0);
}

#[test]
fn duplicate_root_keys_are_rejected() {
    assert!(matches!(
        load("V: {a: 1}\nV: {a: 2}\n"),
        Err(CascadeError::Load(LoadError::Yaml(_)))
    ));
}

#[test]
fn import_redeclaring_a_style_is_rejected() {
    let mut sheet = Stylesheet::builder()
        .resolver(MemoryResolver::new().with("base", "V: {a: 1}\n"))
        .build();
    assert!(sheet.load_str("_import: [base]\nV: {a: 2}\n").is_err());
    assert_eq!(sheet.revision(), 0);
}

#[test]
fn import_must_be_a_sequence() {
    assert!(matches!(
        load("_import: base\nV: {a: 1}\n"),
        Err(CascadeError::Load(LoadError::MalformedStylesheet { .. }))
    ));
}

#[test]
fn imports_contribute_styles() {
    let resolver = MemoryResolver::new()
        .with("palette", "Palette: {accent: '${gutter}'}\n")
        .with("metrics", "Metrics: {gutter: 8}\n");
    let mut symbols = SymbolTable::with_defaults();
    symbols.export([("gutter", 12.0)]);
    let mut sheet = Stylesheet::builder().symbols(symbols).resolver(resolver).build();
    sheet
        .load_str("_import: [palette.yaml, shared/metrics]\nButton: {margin: 1}\n")
        .unwrap();
    assert_eq!(sheet.style_names(), vec!["Button", "Metrics", "Palette"]);
    assert_eq!(sheet.rule("Palette", "accent").unwrap().as_number(), 12.0);
}

#[test]
fn unknown_style_lookup() {
    let sheet = load("V: {a: 1}\n").unwrap();
    assert_eq!(
        sheet.rule("W", "a").unwrap_err(),
        LookupError::UnknownStyle { style: "W".into() }
    );
}

#[test]
fn breakpoint_keys_are_not_properties() {
    let sheet = load("V/bp: {_breakpoint: '${1}', a: 1}\n").unwrap();
    let ctx = StyleContext::with_breakpoints();
    let all = sheet.properties_for("V", &ctx);
    assert_eq!(all.len(), 1);
    assert!(all.contains_key("a"));
}

fn nested_formula(levels: usize) -> String {
    format!("{}1{}", "(".repeat(levels), ")".repeat(levels))
}

#[test]
fn deeply_nested_formula_fails_the_load() {
    let mut sheet = Stylesheet::new();
    sheet.load_str("A: {x: 1}\n").unwrap();

    for formula in [nested_formula(200), vec!["1"; 5000].join(" + ")] {
        let err = sheet
            .load_str(&format!("A: {{x: '${{{formula}}}'}}\n"))
            .unwrap_err();
        assert!(
            matches!(&err, CascadeError::Load(LoadError::MalformedRule { style, key, .. })
                if style == "A" && key == "x"),
            "{err}"
        );
    }
    assert_eq!(sheet.revision(), 1);
    assert_eq!(sheet.rule("A", "x").unwrap().as_number(), 1.0);
}

#[test]
fn moderately_nested_formula_loads() {
    let sheet = load(&format!(
        "A: {{x: '${{{} + 1}}'}}\n",
        nested_formula(24)
    ))
    .unwrap();
    assert_eq!(sheet.rule("A", "x").unwrap().as_number(), 2.0);
}
