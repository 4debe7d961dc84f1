//! sketch-analyze: quantitative metrics and stage frames for a drawing.

use clap::{Args, Parser, Subcommand, ValueEnum};
use sketch_metrics::config::{self, OutputConfig, OutputFormat};
use sketch_metrics::image::io::{write_bytes, write_json_file, FrameFormat};
use sketch_metrics::{AnalysisParams, AnalysisReport, DrawingAnalyzer};
use std::path::{Path, PathBuf};
use std::time::Duration;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "sketch-analyze")]
#[command(about = "Stroke density, edge complexity, corners, contrast and space usage of a drawing")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an image file.
    Analyze(CliAnalyzeArgs),

    /// Write the built-in demo drawing to a PNG file.
    Synth {
        /// Output path.
        #[arg(long, default_value = "demo_drawing.png")]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Path to the input image. Required unless --config is given.
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON runtime config (input, params, output). Flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the full report (JSON, frames as base64).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory to write one image per visualization stage.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// What to print on stdout.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Canny low threshold.
    #[arg(long)]
    low_threshold: Option<f32>,

    /// Canny high threshold.
    #[arg(long)]
    high_threshold: Option<f32>,

    /// Corner cut-off as a fraction of the maximum Harris response.
    #[arg(long)]
    corner_fraction: Option<f32>,

    /// Encode colour frames as JPEG with this quality instead of PNG.
    #[arg(long)]
    jpeg_quality: Option<u8>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
    Both,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Both => OutputFormat::Both,
        }
    }
}

struct Resolved {
    input: PathBuf,
    params: AnalysisParams,
    output: OutputConfig,
    insight_timeout: Duration,
}

fn resolve(args: CliAnalyzeArgs) -> CliResult<Resolved> {
    let mut resolved = match &args.config {
        Some(path) => {
            let cfg = config::load_config(path)?;
            Resolved {
                insight_timeout: cfg.insight_timeout(),
                input: cfg.input,
                params: cfg.params,
                output: cfg.output,
            }
        }
        None => Resolved {
            input: PathBuf::new(),
            params: AnalysisParams::default(),
            output: OutputConfig::default(),
            insight_timeout: Duration::from_secs(30),
        },
    };
    if let Some(image) = args.image {
        resolved.input = image;
    }
    if resolved.input.as_os_str().is_empty() {
        return Err("either --image or --config is required".into());
    }
    if let Some(v) = args.low_threshold {
        resolved.params.edges.low_threshold = v;
    }
    if let Some(v) = args.high_threshold {
        resolved.params.edges.high_threshold = v;
    }
    if let Some(v) = args.corner_fraction {
        resolved.params.corners.response_fraction = v;
    }
    if let Some(quality) = args.jpeg_quality {
        resolved.params.render.frame_format = FrameFormat::Jpeg { quality };
    }
    if let Some(out) = args.out {
        resolved.output.json_out = Some(out);
    }
    if let Some(dir) = args.frames_dir {
        resolved.output.frames_dir = Some(dir);
    }
    if let Some(format) = args.format {
        resolved.output.format = format.into();
    }
    resolved.params.validate()?;
    Ok(resolved)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Synth { out } => {
            let img = sketch_metrics::synthetic::demo_drawing();
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            img.save(&out)?;
            log::info!("Demo drawing written to {}", out.display());
            Ok(())
        }
    }
}

fn run_analyze(args: CliAnalyzeArgs) -> CliResult<()> {
    let resolved = resolve(args)?;
    log::info!("Loading image: {}", resolved.input.display());

    let analyzer = DrawingAnalyzer::new(resolved.params)
        .with_insight_timeout(resolved.insight_timeout);
    let report = analyzer.analyze_path(&resolved.input)?;
    let output = &resolved.output;

    if output.format.includes_text() {
        println!("{}", report.summary());
    }

    if output.format.includes_json() {
        match &output.json_out {
            Some(path) => {
                write_json_file(path, &report)?;
                log::info!("JSON report written to {}", path.display());
            }
            None => println!("{}", serde_json::to_string_pretty(&report)?),
        }
    } else if let Some(path) = &output.json_out {
        write_json_file(path, &report)?;
        log::info!("JSON report written to {}", path.display());
    }

    if let Some(dir) = &output.frames_dir {
        write_frames(dir, &report)?;
        log::info!("Frames written to {}", dir.display());
    }
    Ok(())
}

fn write_frames(dir: &Path, report: &AnalysisReport) -> CliResult<()> {
    for frame in report.visualizations.iter() {
        write_bytes(&dir.join(frame.file_name()), &frame.bytes)?;
    }
    Ok(())
}
