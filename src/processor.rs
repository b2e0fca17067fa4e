//! Map processor: walks a map and drives a renderer through the visitor
//! protocol.

use std::io::Write;

use log::warn;

use crate::rendering::{MapVisitor, SvgRenderer};
use crate::{Map, Result};

/// Drives a [`MapVisitor`] over one map.
///
/// Calls `start_map`, then `start_layer`/`end_layer` for each active layer in
/// order, then `end_map`. The first error stops processing and is returned.
pub struct MapProcessor<'a> {
    map: &'a Map,
}

impl<'a> MapProcessor<'a> {
    pub fn new(map: &'a Map) -> Self {
        Self { map }
    }

    pub fn apply<V: MapVisitor + ?Sized>(&self, visitor: &mut V) -> Result<()> {
        visitor.start_map(self.map)?;
        for layer in &self.map.layers {
            if !layer.active {
                warn!("skipping inactive layer: {}", layer.name);
                continue;
            }
            visitor.start_layer(layer)?;
            visitor.end_layer(layer)?;
        }
        visitor.end_map(self.map)
    }
}

/// Render `map` into `sink` and give the sink back
pub fn render_to_writer<W: Write>(map: &Map, sink: W) -> Result<W> {
    let mut renderer = SvgRenderer::new(map, sink);
    MapProcessor::new(map).apply(&mut renderer)?;
    Ok(renderer.into_inner())
}

/// Render `map` into a `String`
pub fn render_to_string(map: &Map) -> Result<String> {
    let buf = render_to_writer(map, Vec::new())?;
    // the renderer only emits UTF-8 text
    String::from_utf8(buf).map_err(|e| crate::Error::InvalidInput(e.to_string()))
}
