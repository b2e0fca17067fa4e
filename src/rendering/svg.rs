//! Streaming SVG renderer.
//!
//! `SvgRenderer` writes the document envelope straight to the sink as the
//! visitor callbacks arrive. It keeps no buffer: only the canvas captured at
//! construction, the protocol state and the sink itself.

use std::io::Write;
use std::sync::Arc;

use log::debug;

use super::format::AttrList;
use super::{MapVisitor, RenderEvent, RenderState};
use crate::{Canvas, Error, Layer, Map, Result};

/// XML declaration opening every document
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" standalone="no"?>"#;
/// Document type declaration for SVG 1.1
pub const SVG_DTD: &str =
    r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#;
pub const SVG_VERSION: f64 = 1.1;
pub const SVG_NAMESPACE_URL: &str = "http://www.w3.org/2000/svg";

type EventHandler = Arc<dyn Fn(&RenderEvent) + Send + Sync>;

/// Renders a map as an SVG document into any `Write` sink.
///
/// # Examples
///
/// ```
/// use mapsvg::rendering::{MapVisitor, SvgRenderer};
/// use mapsvg::Map;
///
/// # fn main() -> mapsvg::Result<()> {
/// let map = Map::new(2, 1);
/// let mut out = Vec::new();
/// let mut renderer = SvgRenderer::new(&map, &mut out);
/// renderer.start_map(&map)?;
/// renderer.end_map(&map)?;
/// assert!(String::from_utf8(out).unwrap().ends_with("\n</svg>"));
/// # Ok(())
/// # }
/// ```
pub struct SvgRenderer<W: Write> {
    sink: W,
    canvas: Canvas,
    state: RenderState,
    on_event: Option<EventHandler>,
}

impl<W: Write> SvgRenderer<W> {
    /// Create a renderer for `map` writing into `sink`. The canvas size is
    /// copied from the map now; later changes to the map do not affect it.
    pub fn new(map: &Map, sink: W) -> Self {
        Self {
            sink,
            canvas: map.canvas(),
            state: RenderState::Fresh,
            on_event: None,
        }
    }

    /// Register a callback invoked at every lifecycle transition.
    /// Hooks observe the render; they never change the emitted bytes.
    pub fn on_event<F>(&mut self, cb: F)
    where
        F: Fn(&RenderEvent) + Send + Sync + 'static,
    {
        self.on_event = Some(Arc::new(cb));
    }

    /// Remove a previously registered event callback if any
    pub fn clear_on_event(&mut self) {
        self.on_event = None;
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Give back the sink. Bytes written so far stay as they are.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn expect_state(&self, expected: RenderState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::Protocol {
                operation,
                state: self.state,
            })
        }
    }

    /// Write to the sink. Any failure leaves the renderer in
    /// `RenderState::Failed`, which rejects every later call.
    fn emit(&mut self, bytes: &[u8], flush: bool) -> Result<()> {
        let res = self.sink.write_all(bytes).and_then(|_| {
            if flush {
                self.sink.flush()
            } else {
                Ok(())
            }
        });
        if let Err(e) = res {
            self.state = RenderState::Failed;
            return Err(e.into());
        }
        Ok(())
    }

    fn notify(&self, event: RenderEvent) {
        debug!("{}", event);
        if let Some(cb) = &self.on_event {
            cb(&event);
        }
    }

    fn document_header(&self, background: Option<&crate::Color>) -> String {
        let Canvas { width, height } = self.canvas;
        let root = AttrList::new()
            .dimension("width", width)
            .dimension("height", height)
            .number("version", SVG_VERSION)
            .text("xmlns", SVG_NAMESPACE_URL);

        let mut out = format!(
            "{}\n{}\n<svg{}>\n",
            XML_DECLARATION,
            SVG_DTD,
            root.render()
        );

        if let Some(color) = background {
            // background spans the whole image
            let rect = AttrList::new()
                .int("x", 0)
                .int("y", 0)
                .dimension("width", width)
                .dimension("height", height)
                .fill(color);
            out.push_str(&format!("<rect{}/>", rect.render()));
        }
        out
    }
}

impl<W: Write> MapVisitor for SvgRenderer<W> {
    fn start_map(&mut self, map: &Map) -> Result<()> {
        self.expect_state(RenderState::Fresh, "start_map")?;

        let header = self.document_header(map.background.as_ref());
        self.emit(header.as_bytes(), false)?;
        self.state = RenderState::MapOpen;

        self.notify(RenderEvent::MapStart {
            width: self.canvas.width,
            height: self.canvas.height,
        });
        Ok(())
    }

    fn end_map(&mut self, _map: &Map) -> Result<()> {
        self.expect_state(RenderState::MapOpen, "end_map")?;

        self.emit(b"\n</svg>", true)?;
        self.state = RenderState::MapClosed;

        self.notify(RenderEvent::MapEnd);
        Ok(())
    }

    fn start_layer(&mut self, layer: &Layer) -> Result<()> {
        self.expect_state(RenderState::MapOpen, "start_layer")?;
        self.notify(RenderEvent::LayerStart(layer.name.clone()));
        self.state = RenderState::LayerOpen;
        Ok(())
    }

    fn end_layer(&mut self, layer: &Layer) -> Result<()> {
        self.expect_state(RenderState::LayerOpen, "end_layer")?;
        self.notify(RenderEvent::LayerEnd(layer.name.clone()));
        self.state = RenderState::MapOpen;
        Ok(())
    }
}
