use std::fs;
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{Level, LevelFilter, Log, Metadata, Record};
use tempfile::NamedTempFile;

use mapsvg::{render_to_writer, Color, Map};

/// Render a JSON map description as an SVG document
#[derive(Parser, Debug)]
#[command(name = "mapsvg", version, about)]
struct Args {
    /// Path to the JSON map description, or `-` for stdin
    map: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the canvas width
    #[arg(long)]
    width: Option<u32>,

    /// Override the canvas height
    #[arg(long)]
    height: Option<u32>,

    /// Override the background color (`#rrggbb`, `rgb(r, g, b)` or a name)
    #[arg(long)]
    background: Option<Color>,

    /// Log lifecycle events to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Writes `log` records to stderr. Warnings and errors are always shown;
/// `--verbose` adds the renderer's debug records.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let level = match record.level() {
                Level::Error => "error",
                Level::Warn => "warn",
                Level::Info => "info",
                Level::Debug => "debug",
                Level::Trace => "trace",
            };
            eprintln!("mapsvg [{}] {}", level, record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn load_map(args: &Args) -> Result<Map> {
    let mut text = String::new();
    if args.map.as_os_str() == "-" {
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read map description from stdin")?;
    } else {
        text = fs::read_to_string(&args.map)
            .with_context(|| format!("failed to read {}", args.map.display()))?;
    }

    let mut map = Map::from_json(&text)
        .with_context(|| format!("invalid map description {}", args.map.display()))?;
    if let Some(w) = args.width {
        map.width = w;
    }
    if let Some(h) = args.height {
        map.height = h;
    }
    if let Some(bg) = args.background {
        map.background = Some(bg);
    }
    Ok(map)
}

/// Write through a uniquely named temp file next to `path` and persist it
/// over `path` on success, so a failed render never leaves a truncated
/// document behind. The temp file is removed on drop if not persisted.
fn render_to_file(map: &Map, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;

    render_to_writer(map, BufWriter::new(tmp.as_file_mut()))
        .with_context(|| format!("failed to render {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = load_map(&args).and_then(|map| match &args.output {
        Some(path) => render_to_file(&map, path),
        None => {
            render_to_writer(&map, io::stdout().lock())?;
            Ok(())
        }
    });

    if let Err(e) = result {
        eprintln!("mapsvg: {:#}", e);
        std::process::exit(1);
    }
}
