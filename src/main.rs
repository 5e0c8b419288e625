//! sdfont: signed distance field atlases from fonts or bilevel images.
//!
//! Example:
//!   cargo run -- assets/fonts/DroidSansMono.ttf maps/cp1252.txt --size 256 --c-header
//!   cargo run -- inspect assets/fonts/DroidSansMono.ttf_sdf.txt

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use sdfont::core::logging::{init_logging, timed, LogTelemetry};
use sdfont::export::{self, parse_metadata, ExportReport};
use sdfont::sdf::image_source::load_bilevel_image;
use sdfont::sdf::{render_image_sdf, ImageSdfOptions};
use sdfont::{render_font, CharMap, FontGlyphSource, SdfConfig, SdfError, SkylinePacker};

#[derive(Parser, Debug)]
#[command(author, version, about = "Signed distance font and image tool", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[command(flatten)]
    build: BuildArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize an existing metadata text file
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Font file, or a bilevel image to convert directly
    input: Option<PathBuf>,
    /// Optional codepage -> unicode mapping file (two hex columns per line)
    map: Option<PathBuf>,
    /// Texture size in pixels (clamped to the configured range)
    #[arg(long)]
    size: Option<u32>,
    /// Highest character code tried when no map is given
    #[arg(long)]
    max_char: Option<u32>,
    #[arg(long)]
    c_header: bool,
    #[arg(long)]
    json: bool,
    /// Image mode: channel holding the shape
    #[arg(long)]
    channel: Option<u32>,
    /// Image mode: values below this are background
    #[arg(long)]
    threshold: Option<u8>,
    /// RON config overlays, applied in order
    #[arg(long = "config")]
    configs: Vec<PathBuf>,
    /// Output path stem; artifacts are named <stem>_sdf.<ext>. Defaults to the input path
    #[arg(long)]
    out_stem: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Args, Debug)]
struct InspectArgs {
    metadata: PathBuf,
}

fn load_config(a: &BuildArgs) -> Result<SdfConfig> {
    let (mut cfg, used, errors) = SdfConfig::load_layered(&a.configs);
    for u in &used {
        info!("config layer {u}");
    }
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("config errors:\n  {}", lines.join("\n  "));
    }
    if let Some(m) = a.max_char {
        cfg.max_char = m;
    }
    cfg.export.c_header |= a.c_header;
    cfg.export.json |= a.json;
    for w in cfg.validate() {
        warn!("config: {w}");
    }
    if cfg.sampling.supersample == 0 || cfg.sampling.search_radius_cells == 0 {
        bail!("sampling.supersample and sampling.search_radius_cells must be non-zero");
    }
    Ok(cfg)
}

fn finish(report: ExportReport) -> Result<()> {
    if report.is_complete() {
        return Ok(());
    }
    for (kind, e) in &report.failures {
        eprintln!("{} export failed: {e}", kind.extension());
    }
    bail!("{} artifact(s) could not be written", report.failures.len())
}

/// Image mode. `None` means the input is not a usable image and should be
/// tried as a font.
fn run_image(
    input: &Path,
    stem: &Path,
    texture_size: u32,
    a: &BuildArgs,
    cfg: &SdfConfig,
) -> Result<Option<ExportReport>> {
    let opts = ImageSdfOptions {
        channel: a.channel,
        threshold: a.threshold,
    };
    let image = match load_bilevel_image(input, opts) {
        Ok(img) => img,
        Err(SdfError::ImageDecode { .. }) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut telemetry = LogTelemetry;
    let rendered = timed(&mut telemetry, "image sdf", || {
        render_image_sdf(&image.grid, texture_size)
    });
    let atlas = match rendered {
        Ok(atlas) => atlas,
        Err(e @ SdfError::ImageTooSmall { .. }) => {
            warn!("{e}; trying the input as a font");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    Ok(Some(export::export_image(&atlas, stem, &cfg.export, &mut telemetry)))
}

fn run_font(
    input: &Path,
    stem: &Path,
    texture_size: u32,
    a: &BuildArgs,
    cfg: &SdfConfig,
) -> Result<ExportReport> {
    let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let mut source = FontGlyphSource::from_bytes(&data)
        .with_context(|| format!("loading font {}", input.display()))?;
    let map = match &a.map {
        Some(p) => {
            Some(CharMap::load(p).with_context(|| format!("reading map {}", p.display()))?)
        }
        None => None,
    };
    let mut telemetry = LogTelemetry;
    let report = render_font(
        &mut source,
        map.as_ref(),
        &mut SkylinePacker,
        cfg,
        texture_size,
        stem,
        &mut telemetry,
    )?;
    Ok(report)
}

fn cmd_build(a: BuildArgs) -> Result<()> {
    init_logging(a.verbose);
    let Some(input) = a.input.clone() else {
        bail!("no input given; pass a font or image path (see --help)");
    };
    let cfg = load_config(&a)?;
    let requested = a.size.unwrap_or(cfg.atlas.texture_size);
    let texture_size = cfg.atlas.clamp_texture_size(requested);
    if texture_size != requested {
        warn!("texture size {requested} clamped to {texture_size}");
    }
    let stem = a.out_stem.clone().unwrap_or_else(|| input.clone());
    if let Some(report) = run_image(&input, &stem, texture_size, &a, &cfg)? {
        return finish(report);
    }
    finish(run_font(&input, &stem, texture_size, &a, &cfg)?)
}

fn cmd_inspect(a: InspectArgs) -> Result<()> {
    let path = &a.metadata;
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let meta = parse_metadata(&text).with_context(|| format!("parsing {}", path.display()))?;
    let (min_id, max_id) = meta
        .glyphs
        .iter()
        .fold((u32::MAX, 0), |(lo, hi), g| (lo.min(g.id), hi.max(g.id)));
    let extent = meta
        .glyphs
        .iter()
        .fold((0, 0), |(w, h), g| (w.max(g.x + g.width), h.max(g.y + g.height)));
    println!("Face:            {}", meta.face);
    println!("Pixel size:      {}", meta.size);
    println!("Ascent/descent:  {} / {}", meta.ascent, meta.descent);
    println!("Glyphs:          {}", meta.count);
    if !meta.glyphs.is_empty() {
        println!("Id range:        {min_id}..={max_id}");
    }
    println!("Used extent:     {}x{}", extent.0, extent.1);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Inspect(a)) => cmd_inspect(a),
        None => cmd_build(cli.build),
    }
}
