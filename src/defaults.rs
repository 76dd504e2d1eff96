//! Constants every [`SymbolTable::with_defaults()`] table starts with.
//!
//! These cover the flexbox layout keywords, orientation and size-class
//! names, the reference device sizes and the namespaces of the built-in
//! enums, so stylesheets can write `${flexStart}`, `${iPhoneX.height}` or
//! `${TextAlignment.center}` without any host setup.

use crate::types::{
    ContentMode, LineBreakMode, Orientation, SizeClass, SymbolTable, TextAlignment,
};

/// Flexbox keywords. Several share a raw value because they belong to
/// different property families (`auto` is an alignment, `flex` a display).
pub const LAYOUT_KEYWORDS: &[(&str, f64)] = &[
    // direction
    ("inherit", 0.0),
    ("ltr", 1.0),
    ("rtl", 2.0),
    // alignment
    ("auto", 0.0),
    ("flexStart", 1.0),
    ("center", 2.0),
    ("flexEnd", 3.0),
    ("stretch", 4.0),
    ("baseline", 5.0),
    ("spaceBetween", 6.0),
    ("spaceAround", 7.0),
    // display
    ("flex", 0.0),
    ("none", 1.0),
    // flex direction
    ("column", 0.0),
    ("columnReverse", 1.0),
    ("row", 2.0),
    ("rowReverse", 3.0),
    // overflow and position
    ("visible", 0.0),
    ("hidden", 1.0),
    ("absolute", 2.0),
    // wrap
    ("noWrap", 0.0),
    ("wrap", 1.0),
    ("wrapReverse", 2.0),
];

/// Reference device screen sizes in points, as `(device, width, height)`.
pub const DEVICE_SIZES: &[(&str, f64, f64)] = &[
    ("iPhoneSE", 320.0, 568.0),
    ("iPhone8", 375.0, 667.0),
    ("iPhone8Plus", 414.0, 736.0),
    ("iPhoneX", 375.0, 812.0),
    ("iPhoneXSMax", 414.0, 896.0),
];

/// Export every default constant into `table`.
pub fn export_defaults(table: &mut SymbolTable) {
    table.export(LAYOUT_KEYWORDS.iter().copied());
    table.export([
        ("portrait", Orientation::Portrait as i64 as f64),
        ("landscape", Orientation::Landscape as i64 as f64),
        ("unspecified", SizeClass::Unspecified as i64 as f64),
        ("compact", SizeClass::Compact as i64 as f64),
        ("regular", SizeClass::Regular as i64 as f64),
    ]);
    table.export(DEVICE_SIZES.iter().flat_map(|(device, width, height)| {
        [
            (format!("{device}.width"), *width),
            (format!("{device}.height"), *height),
        ]
    }));
    table.export_enum::<TextAlignment>();
    table.export_enum::<LineBreakMode>();
    table.export_enum::<ContentMode>();
    table.export_enum::<Orientation>();
    table.export_enum::<SizeClass>();
}
