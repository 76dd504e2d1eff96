/// An integer-backed enumeration that can be exported into a
/// [`SymbolTable`](super::SymbolTable) and read back with
/// [`Rule::as_enum()`](super::Rule::as_enum).
///
/// Implementors list their variants once; the namespaced constants
/// (`TextAlignment.right`) are derived from that list.
pub trait EnumRepresentable: Sized {
    /// Prefix used for the exported constant names.
    const NAMESPACE: &'static str;

    /// Every `(name, raw value)` pair.
    fn variants() -> &'static [(&'static str, i64)];

    /// Build a value from its raw integer representation.
    fn from_raw(raw: i64) -> Option<Self>;

    /// The constants exported by [`SymbolTable::export_enum()`](super::SymbolTable::export_enum).
    #[allow(clippy::cast_precision_loss)]
    fn expression_constants() -> Vec<(String, f64)> {
        Self::variants()
            .iter()
            .map(|(name, raw)| (format!("{}.{name}", Self::NAMESPACE), *raw as f64))
            .collect()
    }
}

macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        $name:ident in $ns:literal {
            $($variant:ident = $raw:literal as $key:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub enum $name {
            #[default]
            $($variant = $raw),+
        }

        impl EnumRepresentable for $name {
            const NAMESPACE: &'static str = $ns;

            fn variants() -> &'static [(&'static str, i64)] {
                &[$(($key, $raw)),+]
            }

            fn from_raw(raw: i64) -> Option<Self> {
                match raw {
                    $($raw => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

int_enum! {
    /// Horizontal alignment of text.
    TextAlignment in "TextAlignment" {
        Left = 0 as "left",
        Center = 1 as "center",
        Right = 2 as "right",
        Justified = 3 as "justified",
        Natural = 4 as "natural",
    }
}

int_enum! {
    /// How text that does not fit is wrapped or truncated.
    LineBreakMode in "LineBreakMode" {
        ByWordWrapping = 0 as "byWordWrapping",
        ByCharWrapping = 1 as "byCharWrapping",
        ByClipping = 2 as "byClipping",
        ByTruncatingHead = 3 as "byTruncatingHead",
        ByTruncatingTail = 4 as "byTruncatingTail",
        ByTruncatingMiddle = 5 as "byTruncatingMiddle",
    }
}

int_enum! {
    /// How content is laid out inside its bounds.
    ContentMode in "ContentMode" {
        ScaleToFill = 0 as "scaleToFill",
        ScaleAspectFit = 1 as "scaleAspectFit",
        ScaleAspectFill = 2 as "scaleAspectFill",
        Redraw = 3 as "redraw",
        Center = 4 as "center",
        Top = 5 as "top",
        Bottom = 6 as "bottom",
        Left = 7 as "left",
        Right = 8 as "right",
        TopLeft = 9 as "topLeft",
        TopRight = 10 as "topRight",
        BottomLeft = 11 as "bottomLeft",
        BottomRight = 12 as "bottomRight",
    }
}

int_enum! {
    /// Screen orientation reported by the host.
    Orientation in "Orientation" {
        Portrait = 1 as "portrait",
        Landscape = 2 as "landscape",
    }
}

int_enum! {
    /// Horizontal or vertical size class reported by the host.
    SizeClass in "SizeClass" {
        Unspecified = 0 as "unspecified",
        Compact = 1 as "compact",
        Regular = 2 as "regular",
    }
}
