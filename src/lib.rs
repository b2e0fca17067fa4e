//! mapsvg
//!
//! A streaming SVG renderer for map descriptions. A map (canvas size,
//! optional background color and an ordered list of layers) is walked by a
//! [`MapProcessor`], which drives a [`rendering::MapVisitor`]. The
//! [`SvgRenderer`] visitor writes the document to any `std::io::Write` sink
//! as the callbacks arrive.
//!
//! # Example
//!
//! ```
//! use mapsvg::{Color, Layer, Map};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let map = Map::new(400, 300)
//!     .with_background(Color::rgb(255, 0, 0))
//!     .with_layer(Layer::new("roads"));
//!
//! let svg = mapsvg::render_to_string(&map)?;
//! assert!(svg.starts_with("<?xml"));
//! assert!(svg.contains(r#"style="fill: #ff0000""#));
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod color;
pub mod error;
pub mod processor;
pub mod rendering;

pub use color::Color;
pub use error::{Error, Result};
pub use processor::{render_to_string, render_to_writer, MapProcessor};
pub use rendering::{MapVisitor, RenderEvent, RenderState, SvgRenderer};

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// A map layer. Only the name is used by the renderer, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    /// Inactive layers are skipped by the processor
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Map description consumed by the renderer
///
/// Loaded from JSON with [`Map::from_json`]:
///
/// ```
/// let map = mapsvg::Map::from_json(
///     r##"{ "width": 800, "height": 600, "background": "#ff0000",
///          "layers": [ { "name": "water" } ] }"##,
/// ).unwrap();
/// assert_eq!(map.width, 800);
/// assert_eq!(map.layers[0].name, "water");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Default for Map {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            background: None,
            layers: Vec::new(),
        }
    }
}

impl Map {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Parse a JSON map description. Negative or fractional dimensions and
    /// malformed colors are reported as [`Error::InvalidInput`].
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}
