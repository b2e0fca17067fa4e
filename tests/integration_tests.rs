//! Integration tests for the SVG map renderer

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use mapsvg::{Color, Error, Layer, Map, MapProcessor, MapVisitor, RenderEvent, RenderState, SvgRenderer};

const PROLOG: &str = "<?xml version=\"1.0\" standalone=\"no\"?>\n<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";

// The root tag line ends in a newline and `end_map` writes "\n</svg>", so a
// map without background has an empty line before the closing tag. See the
// "No-background document" entry in DESIGN.md.
fn expected_without_background(w: u32, h: u32) -> String {
    format!(
        "{}<svg width=\"{w}px\" height=\"{h}px\" version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">\n\n</svg>",
        PROLOG
    )
}

fn start_end(map: &Map) -> String {
    let mut out = Vec::new();
    let mut r = SvgRenderer::new(map, &mut out);
    r.start_map(map).unwrap();
    r.end_map(map).unwrap();
    String::from_utf8(out).unwrap()
}

/// Sink that accepts `limit` bytes, then fails every write
struct FailingSink {
    written: Vec<u8>,
    limit: usize,
}

impl FailingSink {
    fn new(limit: usize) -> Self {
        Self { written: Vec::new(), limit }
    }
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = self.limit.saturating_sub(self.written.len());
        if room == 0 {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "device full"));
        }
        let n = room.min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn document_without_background_is_exact() {
    for (w, h) in [(0, 0), (1, 1), (400, 300), (12345, 7), (u32::MAX, 1)] {
        assert_eq!(start_end(&Map::new(w, h)), expected_without_background(w, h));
    }
}

#[test]
fn scenario_one_by_one() {
    let doc = start_end(&Map::new(1, 1));
    assert!(doc.contains(r#"<svg width="1px" height="1px" version="1.1""#));
    assert_eq!(doc.lines().count(), 5);
}

#[test]
fn scenario_800_by_600_red_background() {
    let map = Map::new(800, 600).with_background(Color::rgb(255, 0, 0));
    let expected = format!(
        "{}<svg width=\"800px\" height=\"600px\" version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">\n<rect x=\"0\" y=\"0\" width=\"800px\" height=\"600px\" style=\"fill: #ff0000\"/>\n</svg>",
        PROLOG
    );
    assert_eq!(start_end(&map), expected);
}

#[test]
fn background_rect_present_iff_background() {
    let plain = start_end(&Map::new(30, 40));
    assert!(!plain.contains("<rect"));

    let filled = start_end(&Map::new(30, 40).with_background(Color::rgb(1, 2, 3)));
    assert_eq!(filled.matches("<rect").count(), 1);
    assert!(filled.contains(r#"<rect x="0" y="0" width="30px" height="40px" style="fill: #010203"/>"#));
}

#[test]
fn layer_pairs_do_not_change_output() {
    let base = Map::new(64, 32).with_background(Color::rgb(0, 128, 0));
    let expected = start_end(&base);

    for count in [0usize, 1, 5] {
        let mut map = base.clone();
        for i in 0..count {
            map = map.with_layer(Layer::new(format!("layer<{}>&\"", i)));
        }
        let out = mapsvg::render_to_string(&map).unwrap();
        assert_eq!(out, expected, "{} layers", count);
    }
}

#[test]
fn end_map_before_start_map_writes_nothing() {
    let map = Map::new(10, 10);
    let mut out = Vec::new();
    let mut r = SvgRenderer::new(&map, &mut out);
    let err = r.end_map(&map).unwrap_err();
    assert!(matches!(
        err,
        Error::Protocol { operation: "end_map", state: RenderState::Fresh }
    ));
    assert_eq!(r.state(), RenderState::Fresh);
    drop(r);
    assert!(out.is_empty());
}

#[test]
fn start_map_twice_writes_nothing_more() {
    let map = Map::new(10, 10).with_background(Color::rgb(9, 9, 9));
    let mut out = Vec::new();
    let mut r = SvgRenderer::new(&map, &mut out);
    r.start_map(&map).unwrap();
    let err = r.start_map(&map).unwrap_err();
    assert!(err.is_protocol());
    assert_eq!(r.state(), RenderState::MapOpen);
    drop(r);

    let doc = String::from_utf8(out).unwrap();
    assert_eq!(doc.matches("<?xml").count(), 1);
    assert!(doc.ends_with("/>"));
}

#[test]
fn calls_after_end_map_are_rejected() {
    let map = Map::new(10, 10);
    let layer = Layer::new("late");
    let mut out = Vec::new();
    let mut r = SvgRenderer::new(&map, &mut out);
    r.start_map(&map).unwrap();
    r.end_map(&map).unwrap();

    assert!(r.end_map(&map).unwrap_err().is_protocol());
    assert!(r.start_layer(&layer).unwrap_err().is_protocol());
    assert!(r.start_map(&map).unwrap_err().is_protocol());
    drop(r);
    assert_eq!(String::from_utf8(out).unwrap(), expected_without_background(10, 10));
}

#[test]
fn layers_outside_map_are_rejected() {
    let map = Map::new(10, 10);
    let layer = Layer::new("early");
    let mut r = SvgRenderer::new(&map, Vec::new());
    assert!(r.start_layer(&layer).unwrap_err().is_protocol());
    r.start_map(&map).unwrap();
    assert!(r.end_layer(&layer).unwrap_err().is_protocol());
    assert!(r.into_inner().ends_with(b"\">\n"));
}

#[test]
fn sink_failure_propagates_as_io_error() {
    let map = Map::new(10, 10);
    let mut r = SvgRenderer::new(&map, FailingSink::new(20));
    let err = r.start_map(&map).unwrap_err();
    match err {
        Error::Io(e) => assert_eq!(e.kind(), io::ErrorKind::WriteZero),
        other => panic!("expected I/O error, got {:?}", other),
    }
    // no rollback
    assert_eq!(r.state(), RenderState::Failed);
    assert_eq!(r.into_inner().written.len(), 20);
}

#[test]
fn sink_failure_on_end_map() {
    let map = Map::new(10, 10);
    let header_len = expected_without_background(10, 10).len() - "\n</svg>".len();
    let mut r = SvgRenderer::new(&map, FailingSink::new(header_len));
    r.start_map(&map).unwrap();
    assert!(matches!(r.end_map(&map), Err(Error::Io(_))));
    assert_eq!(r.state(), RenderState::Failed);
}

/// Sink that fails the first write or flush it is asked for after
/// `fail_after` bytes, then accepts everything again
struct FlakySink {
    written: Vec<u8>,
    fail_after: usize,
    fail_flush: bool,
    failed: bool,
}

impl FlakySink {
    fn failing_write(fail_after: usize) -> Self {
        Self { written: Vec::new(), fail_after, fail_flush: false, failed: false }
    }

    fn failing_flush() -> Self {
        Self { written: Vec::new(), fail_after: usize::MAX, fail_flush: true, failed: false }
    }
}

impl Write for FlakySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.failed && self.written.len() >= self.fail_after {
            self.failed = true;
            return Err(io::Error::new(io::ErrorKind::Other, "transient"));
        }
        let room = if self.failed { buf.len() } else { self.fail_after - self.written.len() };
        let n = room.min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.fail_flush && !self.failed {
            self.failed = true;
            return Err(io::Error::new(io::ErrorKind::Other, "transient"));
        }
        Ok(())
    }
}

#[test]
fn end_map_is_not_retried_after_failed_flush() {
    let map = Map::new(10, 10);
    let mut r = SvgRenderer::new(&map, FlakySink::failing_flush());
    r.start_map(&map).unwrap();
    assert!(matches!(r.end_map(&map), Err(Error::Io(_))));

    let err = r.end_map(&map).unwrap_err();
    assert!(matches!(err, Error::Protocol { operation: "end_map", state: RenderState::Failed }));

    let doc = String::from_utf8(r.into_inner().written).unwrap();
    assert_eq!(doc.matches("</svg>").count(), 1);
    assert_eq!(doc, expected_without_background(10, 10));
}

#[test]
fn start_map_is_not_retried_after_partial_write() {
    let map = Map::new(10, 10);
    let layer = Layer::new("roads");
    let mut r = SvgRenderer::new(&map, FlakySink::failing_write(20));
    assert!(matches!(r.start_map(&map), Err(Error::Io(_))));

    assert!(r.start_map(&map).unwrap_err().is_protocol());
    assert!(r.start_layer(&layer).unwrap_err().is_protocol());
    assert!(r.end_map(&map).unwrap_err().is_protocol());
    assert_eq!(r.state(), RenderState::Failed);

    let written = r.into_inner().written;
    assert_eq!(written.len(), 20);
    assert_eq!(String::from_utf8(written).unwrap().matches("<?xml").count(), 1);
}

#[test]
fn failed_start_map_is_not_reported_to_hook() {
    let map = Map::new(10, 10);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let mut r = SvgRenderer::new(&map, FailingSink::new(0));
    r.on_event(move |ev| sink.lock().unwrap().push(ev.clone()));
    assert!(r.start_map(&map).is_err());
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn processor_stops_at_first_error() {
    let map = Map::new(10, 10).with_layer(Layer::new("a"));
    let mut r = SvgRenderer::new(&map, FailingSink::new(0));
    let err = MapProcessor::new(&map).apply(&mut r).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(r.state(), RenderState::Failed);
}

#[test]
fn processor_reports_layer_events() {
    let map = Map::new(10, 10)
        .with_layer(Layer::new("water"))
        .with_layer(Layer::new("hidden").inactive());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let mut r = SvgRenderer::new(&map, Vec::new());
    r.on_event(move |ev| sink.lock().unwrap().push(ev.clone()));
    MapProcessor::new(&map).apply(&mut r).unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(events[1], RenderEvent::LayerStart("water".into()));
    assert_eq!(events[3], RenderEvent::MapEnd);
}

#[test]
fn render_from_json_description() {
    let map = Map::from_json(
        r##"{ "width": 400, "height": 300, "background": "red",
             "layers": [ { "name": "roads" } ] }"##,
    )
    .unwrap();
    let svg = mapsvg::render_to_string(&map).unwrap();
    assert!(svg.contains(r#"style="fill: #ff0000""#));
    assert!(!svg.contains("roads"));
}

#[test]
fn render_to_writer_returns_sink() {
    let map = Map::new(3, 3);
    let buf = mapsvg::render_to_writer(&map, Vec::new()).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), expected_without_background(3, 3));
}
