//! Rendering module: the visitor protocol and the SVG document renderer

pub mod format;
pub mod svg;

use std::fmt;

pub use svg::SvgRenderer;

use crate::{Layer, Map, Result};

/// Lifecycle callbacks a map processor invokes on a renderer.
///
/// Calls arrive in strict nesting order: one `start_map`, any number of
/// non-nested `start_layer`/`end_layer` pairs, then one `end_map`.
pub trait MapVisitor {
    fn start_map(&mut self, map: &Map) -> Result<()>;

    fn end_map(&mut self, map: &Map) -> Result<()>;

    fn start_layer(&mut self, layer: &Layer) -> Result<()>;

    fn end_layer(&mut self, layer: &Layer) -> Result<()>;
}

/// Position of a renderer in the visitor protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing written yet
    Fresh,
    /// Root element open, between layers
    MapOpen,
    /// Inside a layer
    LayerOpen,
    /// Document finished; no further writes
    MapClosed,
    /// A sink write failed; no further writes
    Failed,
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RenderState::Fresh => "fresh",
            RenderState::MapOpen => "map-open",
            RenderState::LayerOpen => "layer-open",
            RenderState::MapClosed => "map-closed",
            RenderState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Lifecycle notification delivered to `on_event` hooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    MapStart { width: u32, height: u32 },
    MapEnd,
    LayerStart(String),
    LayerEnd(String),
}

impl fmt::Display for RenderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderEvent::MapStart { width, height } => {
                write!(f, "start map processing ({}x{})", width, height)
            }
            RenderEvent::MapEnd => f.write_str("end map processing"),
            RenderEvent::LayerStart(name) => write!(f, "start layer processing: {}", name),
            RenderEvent::LayerEnd(name) => write!(f, "end layer processing: {}", name),
        }
    }
}
