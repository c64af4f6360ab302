use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use copgif::{
    CommandHooks, FileSequenceSource, GifEncoderOpts, GifFileEncoder, ImageSource, RasterGuard,
    RenderConfig, RenderController,
};

#[derive(Parser, Debug)]
#[command(name = "copgif", version)]
struct Cli {
    /// Log per-frame progress.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture a numbered image sequence and write an animated GIF.
    Render(RenderArgs),
    /// Print what one frame of an image sequence resolves to.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// Directory that source patterns are relative to.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Source pattern, e.g. `render/beauty.$F4.png`.
    #[arg(long)]
    source: Option<String>,

    /// Image plane (`C`, `A` or `L`).
    #[arg(long)]
    plane: Option<String>,

    /// Frames per second of the sequence.
    #[arg(long, default_value_t = 24.0)]
    fps: f64,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    src: SourceArgs,

    /// Render config JSON; flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output GIF path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// First frame number.
    #[arg(long, default_value_t = 1)]
    start: i64,

    /// Last frame number (inclusive). Defaults to `--start`.
    #[arg(long)]
    end: Option<i64>,

    /// Repeat count; loops forever when omitted.
    #[arg(long = "loop")]
    loop_count: Option<u16>,

    /// GIF quantizer speed, 1 (best) to 30 (fastest).
    #[arg(long, default_value_t = 10)]
    speed: i32,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    #[command(flatten)]
    src: SourceArgs,

    /// Frame number to inspect.
    #[arg(long, default_value_t = 1)]
    frame: i64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn load_config(args: &RenderArgs) -> anyhow::Result<RenderConfig> {
    let mut cfg = match (&args.config, &args.src.source) {
        (Some(path), _) => RenderConfig::from_path(path)?,
        (None, Some(source)) => RenderConfig::new(source.clone()),
        (None, None) => anyhow::bail!("either --config or --source is required"),
    };
    if let Some(source) = &args.src.source {
        cfg.source_path = source.clone();
    }
    if let Some(plane) = &args.src.plane {
        cfg.plane = plane.clone();
    }
    if let Some(out) = &args.out {
        cfg.output_path = Some(out.clone());
    }
    if args.loop_count.is_some() {
        cfg.loop_count = args.loop_count;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let end = args.end.unwrap_or(args.start);
    if end < args.start {
        anyhow::bail!("--end ({end}) must not be before --start ({})", args.start);
    }

    let source = FileSequenceSource::new(&args.src.root, args.src.fps)?;
    let times: Vec<f64> = (args.start..=end).map(|f| source.time_of_frame(f)).collect();
    let encoder = GifFileEncoder::new(GifEncoderOpts {
        speed: args.speed,
        overwrite: true,
    });
    let hooks = CommandHooks::new(cfg.hooks.clone());

    let mut controller = RenderController::with_hooks(cfg, source, encoder, hooks);
    let summary = controller
        .render_range(&times)
        .with_context(|| format!("render frames {}..={end}", args.start))?;

    if let Some(out) = summary.output {
        eprintln!(
            "wrote {} ({} frames, {}x{})",
            out.display(),
            summary.frames,
            summary.width,
            summary.height
        );
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let pattern = args
        .src
        .source
        .context("--source is required for inspect")?;
    let plane = args.src.plane.unwrap_or_else(|| "C".to_string());

    let mut source = FileSequenceSource::new(&args.src.root, args.src.fps)?;
    let full = source
        .full_path(&pattern)
        .with_context(|| format!("'{pattern}' is not an image sequence path"))?;
    let time = source.time_of_frame(args.frame);
    let raster = RasterGuard::acquire(&mut source, &full, &plane, time)?
        .with_context(|| format!("no '{plane}' raster for frame {}", args.frame))?;

    println!("path:    {full}");
    println!("frame:   {}", args.frame);
    println!("plane:   {plane}");
    println!("size:    {}x{}", raster.width(), raster.height());
    println!("format:  {:?}", raster.format());
    println!("packing: {:?}", raster.packing());
    Ok(())
}
