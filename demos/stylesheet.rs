use cascade::import::MemoryResolver;
use cascade::{Animator, StyleContext, Stylesheet, TextAlignment};

const THEME: &str = r##"
Palette:
  accent: {_type: color, hex: "#ff6a00"}
  muted: {_type: color, hex: "#8e8e93"}
"##;

const SCREEN: &str = r##"
_import: [theme]
Base: &base
  margin: 8
  alignment: ${TextAlignment.left}
Title:
  <<: *base
  size: ${iPhoneSE.width / 20}
  font: {_type: font, size: 16, weight: bold}
  animator-alpha: {_type: animator, duration: 0.3, curve: easeOut}
Title/wide:
  _breakpoint: ${width > 600}
  margin: 24
  alignment: ${TextAlignment.center}
"##;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut sheet = Stylesheet::builder()
        .resolver(MemoryResolver::new().with("theme", THEME))
        .build();
    sheet.load_str(SCREEN).expect("failed to load stylesheet");

    println!("{sheet}");
    println!("Styles: {:?}", sheet.style_names());

    let accent = sheet.rule("Palette", "accent").expect("missing accent").as_color();
    println!("Accent: {accent:?}");

    for width in [375.0, 768.0] {
        let ctx = StyleContext::with_breakpoints().variable("width", width);
        let props = sheet.properties_for("Title", &ctx);
        let alignment: TextAlignment = props["alignment"].as_enum();
        let font = props["font"].as_font();
        println!(
            "width {width}: margin {} size {} alignment {alignment:?} font {}pt {}",
            props["margin"].as_integer(),
            props["size"].as_number(),
            font.size,
            font.weight,
        );
    }

    let ctx = StyleContext::default();
    if let Some(animator) = sheet
        .animator_for("Title", "alpha", &ctx)
        .and_then(|a| a.downcast_ref::<Animator>())
    {
        println!("Alpha animator: {animator:?} ({}s)", animator.duration());
    }

    // Unknown styles are logged, not fatal.
    let missing = sheet.properties_for("Subtitle", &ctx);
    println!("Subtitle has {} properties", missing.len());
}
