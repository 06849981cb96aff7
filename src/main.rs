use clap::{Parser, Subcommand, ValueEnum};
use photoframe::config::{self, Settings};
use photoframe::editor::Editor;
use photoframe::export::{self, DirectoryStore, ExportOutcome, ExportRequest};
use photoframe::imaging::{
    EncodeParams, ImageBackend, OutputFormat, Quality, RustBackend, Surface, is_supported_photo,
};
use photoframe::ratio::{Orientation, RatioSpec};
use photoframe::session::Session;
use photoframe::{color, output, palette};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "photoframe")]
#[command(about = "Frame photos with a border and background, then export them")]
#[command(long_about = "\
Frame photos with a border and background, then export them

Each photo is centered on a canvas of the chosen aspect ratio, inside a
safety margin, optionally wrapped by a solid border. Frames with a background
export as JPEG; with the background disabled they export as transparent PNG.

Settings come from frame.toml (if present), then command-line flags.
Run 'photoframe gen-config' to generate a documented frame.toml.")]
#[command(version)]
struct Cli {
    /// Settings file
    #[arg(long, default_value = "frame.toml", global = true)]
    config: PathBuf,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

/// Frame flags shared by `export` and `preview`. Unset flags keep the
/// value from the settings file.
#[derive(clap::Args, Clone, Default)]
struct FrameArgs {
    /// Aspect ratio, "W:H" or "auto"
    #[arg(long, value_parser = parse_ratio)]
    ratio: Option<RatioSpec>,

    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Pixels on the longer output side
    #[arg(long)]
    long_edge: Option<u32>,

    /// Border thickness at export size (clamped to 0-200)
    #[arg(long, allow_negative_numbers = true)]
    border: Option<i64>,

    /// Zoom percent (clamped to 30-150)
    #[arg(long)]
    zoom: Option<i64>,

    /// Background color, #RRGGBB
    #[arg(long, value_parser = parse_hex)]
    background: Option<String>,

    /// Leave the background transparent (exports PNG)
    #[arg(long)]
    no_background: bool,

    /// Border color, #RRGGBB
    #[arg(long, value_parser = parse_hex)]
    border_color: Option<String>,

    /// Draw no border
    #[arg(long)]
    no_border: bool,

    /// JPEG quality 1-100
    #[arg(long)]
    quality: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Frame every photo and write the results to a directory
    Export {
        /// Photo files or directories (searched recursively)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "framed")]
        out: PathBuf,

        /// Write the export summary as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        frame: FrameArgs,
    },
    /// Render the preview of one photo to a PNG file
    Preview {
        input: PathBuf,

        #[arg(short, long, default_value = "preview.png")]
        out: PathBuf,

        #[command(flatten)]
        frame: FrameArgs,
    },
    /// Print the dominant colors of photos and the resulting presets
    Palette {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Print the color-picker swatch grid
    Swatches,
    /// Print a stock frame.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Export {
            inputs,
            out,
            report,
            frame,
        } => {
            let settings = resolve_settings(&cli.config, &frame)?;
            let images = collect_photos(&inputs);
            let backend = RustBackend::new();
            let mut session = Session::with_decode_capacity(settings.cache.max_decoded_images);
            let mut store = DirectoryStore::new(&out);
            let request = ExportRequest {
                images: &images,
                frame: &settings.frame,
                long_edge: settings.export.long_edge,
                ratio: settings.ratio,
                orientation: settings.orientation,
                quality: Quality::new(settings.export.quality),
            };

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_export_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = export::export_all(&backend, &mut session, &mut store, &request, Some(tx));
            printer.join().ok();
            let summary = result?;

            output::print_export_summary(&summary);
            if let Some(path) = report {
                std::fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
            }
            if summary.outcome() == ExportOutcome::AllFailed {
                return Err("no photo could be exported".into());
            }
        }
        Command::Preview { input, out, frame } => {
            let settings = resolve_settings(&cli.config, &frame)?;
            let backend = RustBackend::new();
            let mut editor = Editor::new(RustBackend::new(), &settings);
            editor.load_images(vec![input], Instant::now());
            editor.redraw_now();

            let params = EncodeParams {
                format: OutputFormat::Png,
                quality: Quality::default(),
            };
            let bytes = backend.encode(editor.preview().pixels(), &params)?;
            std::fs::write(&out, bytes)?;
            let (w, h) = (editor.preview().width(), editor.preview().height());
            println!("{} ({}x{})", out.display(), w, h);
            println!("Presets: {}", editor.color_presets().join(" "));
        }
        Command::Palette { inputs } => {
            let backend = RustBackend::new();
            let mut session = Session::new();
            for path in collect_photos(&inputs) {
                let extracted = palette::extract(&backend, &mut session, &path);
                output::print_palette(&path, &extracted, &palette::color_presets(&extracted));
            }
        }
        Command::Swatches => {
            output::print_swatches(&color::palette_grid());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn parse_ratio(s: &str) -> Result<RatioSpec, String> {
    RatioSpec::try_from(s.to_string())
}

fn parse_hex(s: &str) -> Result<String, String> {
    if color::is_valid_hex(s) {
        Ok(s.to_string())
    } else {
        Err(format!("expected #RRGGBB, got {s:?}"))
    }
}

/// Load the settings file and apply command-line overrides on top.
fn resolve_settings(file: &Path, args: &FrameArgs) -> Result<Settings, config::ConfigError> {
    let mut settings = config::load_config(file)?;
    if let Some(ratio) = args.ratio {
        settings.ratio = ratio;
    }
    if let Some(orientation) = args.orientation {
        settings.orientation = match orientation {
            OrientationArg::Portrait => Orientation::Portrait,
            OrientationArg::Landscape => Orientation::Landscape,
        };
    }
    if let Some(long_edge) = args.long_edge {
        settings.export.long_edge = long_edge;
    }
    if let Some(quality) = args.quality {
        settings.export.quality = quality;
    }
    if let Some(px) = args.border {
        settings.frame.set_border_px(px);
    }
    if let Some(pct) = args.zoom {
        settings.frame.set_zoom_pct(pct);
    }
    if let Some(hex) = &args.background {
        settings.frame.outer_background.set_color(hex);
    }
    if let Some(hex) = &args.border_color {
        settings.frame.inner_border.set_color(hex);
    }
    if args.no_background {
        settings.frame.outer_background.enabled = false;
    }
    if args.no_border {
        settings.frame.inner_border.enabled = false;
    }
    settings.validate()?;
    Ok(settings)
}

/// Expand inputs into photo paths: files are kept as given, directories are
/// searched recursively for supported extensions. Directory results are
/// sorted so exports run in a stable order.
fn collect_photos(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut photos = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            photos.push(input.clone());
            continue;
        }
        let mut found: Vec<PathBuf> = WalkDir::new(input)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_supported_photo(e.path()))
            .map(|e| e.into_path())
            .collect();
        found.sort();
        photos.extend(found);
    }
    photos
}
