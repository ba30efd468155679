use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use ledgrid::{
    LoopCount, MatrixOptions, PixelCanvas, StreamReader, StreamWriter, TerminalEmulator, pair,
    play,
};

#[derive(Parser, Debug)]
#[command(name = "ledgrid", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the geometry, frame count and duration of a recorded stream.
    Info(InfoArgs),
    /// Record still images into a content stream, one frame per image.
    Record(RecordArgs),
    /// Replay a content stream in the terminal emulator.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input stream file.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct RecordArgs {
    /// Output stream file.
    #[arg(long)]
    out: PathBuf,

    /// Hold time per frame, in milliseconds.
    #[arg(long, default_value_t = 100)]
    hold_ms: u32,

    /// Matrix options JSON fixing the stream geometry; defaults to the
    /// first image's pixel size.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Input images, in playback order.
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input stream file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Playback loops: a number, or "forever".
    #[arg(long, default_value = "1")]
    loops: LoopCount,

    /// Emulator refresh rate in Hz.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Matrix options JSON (brightness etc.).
    #[arg(long)]
    options: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Record(args) => cmd_record(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn read_options(path: Option<&Path>) -> anyhow::Result<MatrixOptions> {
    let Some(path) = path else {
        return Ok(MatrixOptions::default());
    };
    let file = std::fs::File::open(path)
        .with_context(|| format!("open options '{}'", path.display()))?;
    let opts = MatrixOptions::from_json_reader(std::io::BufReader::new(file))
        .with_context(|| format!("parse options '{}'", path.display()))?;
    Ok(opts)
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let mut reader = StreamReader::open(&args.in_path)
        .with_context(|| format!("open stream '{}'", args.in_path.display()))?;
    let geometry = reader.geometry();

    let mut frame = PixelCanvas::with_geometry(geometry);
    let mut frames = 0u64;
    let mut total_us = 0u64;
    while let Some(hold_time_us) = reader.next_frame(&mut frame)? {
        frames += 1;
        total_us += u64::from(hold_time_us);
    }

    println!(
        "{}: {geometry}, {frames} frames, total hold time {:.3}s",
        args.in_path.display(),
        total_us as f64 / 1_000_000.0
    );
    Ok(())
}

fn cmd_record(args: RecordArgs) -> anyhow::Result<()> {
    let first = image::open(&args.images[0])
        .with_context(|| format!("decode image '{}'", args.images[0].display()))?
        .to_rgb8();

    let geometry = match args.options.as_deref() {
        Some(path) => read_options(Some(path))?.validate()?,
        None => ledgrid::Geometry::new(first.width(), first.height())?,
    };

    let mut writer = StreamWriter::create(&args.out, geometry)
        .with_context(|| format!("create stream '{}'", args.out.display()))?;
    let mut frame = PixelCanvas::with_geometry(geometry);
    let hold_time_us = args.hold_ms.saturating_mul(1000);

    for (i, path) in args.images.iter().enumerate() {
        let rgb = if i == 0 {
            first.clone()
        } else {
            image::open(path)
                .with_context(|| format!("decode image '{}'", path.display()))?
                .to_rgb8()
        };
        let rgb = if (rgb.width(), rgb.height()) == (geometry.width, geometry.height) {
            rgb
        } else {
            image::imageops::resize(
                &rgb,
                geometry.width,
                geometry.height,
                image::imageops::FilterType::Triangle,
            )
        };
        frame.copy_from_bytes(rgb.as_raw())?;
        writer.append_frame(&frame, hold_time_us)?;
    }

    println!(
        "recorded {} frames at {geometry} into '{}'",
        args.images.len(),
        args.out.display()
    );
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut reader = StreamReader::open(&args.in_path)
        .with_context(|| format!("open stream '{}'", args.in_path.display()))?;
    let options = read_options(args.options.as_deref())?;

    let (mut exchange, driver) = pair(reader.geometry());
    exchange.set_brightness(options.display_brightness());
    let emulator = TerminalEmulator::spawn(driver, std::io::stdout(), args.fps);

    let stats = play(&mut reader, &mut exchange, args.loops)?;
    emulator.stop();

    println!(
        "played {} frames ({} loops)",
        stats.frames_shown, stats.loops_completed
    );
    Ok(())
}
