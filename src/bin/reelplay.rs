use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelplay", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Play the animation headlessly at its frame rate.
    Play(PlayArgs),
    /// Print a scene summary with per-shape raster sizes.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of clock ticks to play; defaults to one pass over the animation.
    #[arg(long)]
    frames: Option<u64>,

    /// Write every drawn frame as `frame_NNNNN.png` into this directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Stop after the last frame instead of wrapping around.
    #[arg(long, default_value_t = false)]
    no_loop: bool,

    /// Override rayon worker threads used for asset decoding.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Play(args) => cmd_play(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn assets_root(in_path: &Path) -> PathBuf {
    in_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf()
}

fn load_player(
    in_path: &Path,
    looping: bool,
    threads: Option<usize>,
) -> anyhow::Result<reelplay::Player> {
    let scene = reelplay::Scene::from_path(in_path)?;
    let opts = reelplay::PlayerOpts {
        assets_root: assets_root(in_path),
        looping,
        asset_threads: threads,
    };
    reelplay::Player::new(scene, opts)
        .with_context(|| format!("prepare scene '{}'", in_path.display()))
}

fn write_png(path: &Path, frame: &reelplay::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut player = load_player(&args.in_path, true, None)?;
    let frame = player.draw_frame(reelplay::FrameIndex(args.frame))?;
    write_png(&args.out, &frame)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut player = load_player(&args.in_path, !args.no_loop, args.threads)?;
    let ticks = args.frames.unwrap_or_else(|| player.scene().frame_count());

    let mut drawn = 0u64;
    let rate = player.play(ticks, |index, frame| {
        drawn += 1;
        if let Some(dir) = &args.out_dir {
            let path = dir.join(format!("frame_{:05}.png", index.0));
            write_png(&path, frame).map_err(reelplay::ReelError::Other)?;
        }
        Ok(())
    })?;

    println!(
        "played {drawn} frames at {rate} fps (target {})",
        player.scene().frame_rate().as_f64()
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let scene = reelplay::Scene::from_path(&args.in_path)?;
    let canvas = scene.canvas();
    println!("size: {}x{}", canvas.width, canvas.height);
    println!("frame rate: {}", scene.frame_rate().as_f64());
    println!("frames: {}", scene.frame_count());
    println!("instances: {}", scene.instances().len());
    for name in scene.bitmap_asset_names() {
        println!("bitmap: {name}");
    }

    let cache = reelplay::ShapeRasterCache::prepare(&scene)?;
    for (index, shape) in cache.iter() {
        let b = shape.bbox;
        println!(
            "shape {index}: box ({}, {}, {}, {}) raster {}x{}",
            b.min_x,
            b.min_y,
            b.max_x,
            b.max_y,
            shape.raster.width(),
            shape.raster.height()
        );
    }
    Ok(())
}
