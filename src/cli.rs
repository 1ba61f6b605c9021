use crate::config::{load_options, DisplayStyle, HighlightMode, RenderOptions};
use crate::format::{DayMonthYearFormatter, YearsAgeFormatter};
use crate::model::{GenoDocument, GenoMapData};
use crate::render::SvgRenderer;
use crate::text_metrics::{CharTableMetrics, FontMetrics, SystemFontMetrics};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "genor", version, about = "SVG renderer for laid-out genograms")]
pub struct Args {
    /// Input document (JSON) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (single map) or directory. Defaults to stdout for SVG.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "output-format", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Options JSON file overriding the render defaults
    #[arg(short = 'c', long = "config-file")]
    pub config: Option<PathBuf>,

    /// Annotation printed under each individual
    #[arg(long = "display-style", value_enum)]
    pub display_style: Option<DisplayStyle>,

    /// Trace one lineage with stacked ancestry strokes
    #[arg(long = "highlight-mode", value_enum)]
    pub highlight_mode: Option<HighlightMode>,

    /// Draw free-text labels without their fill colors
    #[arg(long = "monochrome-labels")]
    pub monochrome_labels: bool,

    /// Skip labels with this fill color (repeatable)
    #[arg(long = "suppress-label-color")]
    pub suppress_label_colors: Vec<String>,

    /// Font family used for text measurement
    #[arg(long = "font-family")]
    pub font_family: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    let mut options = load_options(args.config.as_deref())?;
    if let Some(style) = args.display_style {
        options.display_style = style;
    }
    if let Some(mode) = args.highlight_mode {
        options.highlight_mode = mode;
    }
    if args.monochrome_labels {
        options.monochrome_labels = true;
    }
    for color in &args.suppress_label_colors {
        options
            .unsupported_label_colors
            .insert(color.to_ascii_lowercase());
    }
    if let Some(family) = &args.font_family {
        options.font_family = family.clone();
    }

    let document = read_document(args.input.as_deref())?;

    let system_metrics = SystemFontMetrics::load(&options.font_family);
    let table_metrics = CharTableMetrics::new();
    let metrics: &dyn FontMetrics = match &system_metrics {
        Some(metrics) => metrics,
        None => {
            log::warn!(
                "font family {} not available, using built-in character metrics",
                options.font_family
            );
            &table_metrics
        }
    };

    let dates = DayMonthYearFormatter;
    let ages = YearsAgeFormatter::from_today();
    let renderer = SvgRenderer::new(metrics, &dates, &ages, &options);

    let maps = exportable_maps(&document)?;

    if let [data] = maps.as_slice() {
        let svg = renderer.render_to_string(data)?;
        let output = resolve_single_output(
            args.output.as_deref(),
            &data.geno_map.id,
            args.output_format.extension(),
        );
        match args.output_format {
            OutputFormat::Svg => write_output_svg(&svg, output.as_deref())?,
            OutputFormat::Png => {
                let output = output
                    .ok_or_else(|| anyhow::anyhow!("output path required for png output"))?;
                write_png(&svg, &output, data, &options)?;
                log::info!("wrote {}", output.display());
            }
        }
        return Ok(());
    }

    let base = args
        .output
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("output path required for documents with several genomaps"))?;

    for data in &maps {
        let svg = renderer.render_to_string(data)?;
        let path = multi_output_path(base, &data.geno_map.id, args.output_format.extension());
        match args.output_format {
            OutputFormat::Svg => write_output_svg(&svg, Some(&path))?,
            OutputFormat::Png => write_png(&svg, &path, data, &options)?,
        }
        log::info!("wrote {}", path.display());
    }

    Ok(())
}

fn read_document(path: Option<&Path>) -> Result<GenoDocument> {
    let text = match path {
        Some(path) if path == Path::new("-") => read_stdin()?,
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => read_stdin()?,
    };
    serde_json::from_str(&text).context("malformed genogram document")
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

// Untitled maps are layout scratch space and are never materialized.
fn exportable_maps(document: &GenoDocument) -> Result<Vec<&GenoMapData>> {
    let maps: Vec<_> = document.titled_maps().collect();
    if maps.is_empty() {
        anyhow::bail!("no titled genomaps in the input document");
    }
    Ok(maps)
}

fn resolve_single_output(output: Option<&Path>, map_id: &str, ext: &str) -> Option<PathBuf> {
    let output = output?;
    if output.is_dir() {
        Some(output.join(format!("{map_id}.{ext}")))
    } else {
        Some(output.to_path_buf())
    }
}

fn multi_output_path(base: &Path, map_id: &str, ext: &str) -> PathBuf {
    if base.is_dir() {
        return base.join(format!("{map_id}.{ext}"));
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("genomap");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{stem}-{map_id}.{ext}"))
}

fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{svg}");
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, data: &GenoMapData, options: &RenderOptions) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = options.font_family.clone();
    let bounds = data.geno_map.boundary_rect;
    if let Some(size) = usvg::Size::from_wh(bounds.width() as f32, bounds.height() as f32) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _data: &GenoMapData, _options: &RenderOptions) -> Result<()> {
    anyhow::bail!("png output was not compiled in; rebuild with the png feature")
}
