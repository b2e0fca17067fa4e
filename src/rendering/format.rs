//! Attribute and value formatting for SVG markup
//!
//! Every attribute kind the renderer emits has its own function here so the
//! exact text can be checked in isolation. Values produced by these helpers
//! are safe to place between double quotes.

use std::borrow::Cow;

use crate::Color;

/// Unit suffix used for canvas dimensions
pub const PX: &str = "px";

/// A canvas dimension with its unit, e.g. `400px`
pub fn dimension(value: u32) -> String {
    format!("{}{}", value, PX)
}

/// A plain decimal number. Integral values carry no fraction (`0`, `3`),
/// others use the shortest representation that round-trips (`1.1`).
pub fn number(value: f64) -> String {
    if value == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", value)
}

/// Escape text for use inside a double-quoted attribute value
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// CSS fill declaration for a solid color, e.g. `fill: #ff0000`
pub fn fill_style(color: &Color) -> String {
    format!("fill: {}", color.to_hex_string())
}

/// A single ` name="value"` fragment with the value escaped
pub fn attr(name: &str, value: &str) -> String {
    format!(" {}=\"{}\"", name, escape_attr(value))
}

/// Ordered attribute list rendered as one fragment.
///
/// ```
/// use mapsvg::rendering::format::AttrList;
///
/// let attrs = AttrList::new().int("x", 0).dimension("width", 10);
/// assert_eq!(attrs.render(), r#" x="0" width="10px""#);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrList {
    attrs: Vec<(&'static str, String)>,
}

impl AttrList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn int(self, name: &'static str, value: i64) -> Self {
        self.push(name, value.to_string())
    }

    pub fn dimension(self, name: &'static str, value: u32) -> Self {
        self.push(name, dimension(value))
    }

    pub fn number(self, name: &'static str, value: f64) -> Self {
        self.push(name, number(value))
    }

    /// Literal text value, escaped on render
    pub fn text(self, name: &'static str, value: impl Into<String>) -> Self {
        self.push(name, value.into())
    }

    pub fn fill(self, color: &Color) -> Self {
        self.push("style", fill_style(color))
    }

    fn push(mut self, name: &'static str, value: String) -> Self {
        self.attrs.push((name, value));
        self
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn render(&self) -> String {
        self.attrs
            .iter()
            .map(|(name, value)| attr(name, value))
            .collect()
    }
}
