use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use crossbeam_channel::RecvTimeoutError;
use lumamap::{LinkEvent, TickOutcome};

const DEFAULT_SOURCE: &str = "lumamap-still";

#[derive(Parser, Debug)]
#[command(name = "lumamap", version)]
struct Cli {
    /// Log lifecycle details to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the UV table of a point layout as JSON.
    Uv(UvArgs),
    /// Sample an image through a full mapping session and print one color per point.
    Sample(SampleArgs),
}

#[derive(Parser, Debug)]
struct UvArgs {
    /// Point layout JSON: an array of `{x, y, z, index}`.
    #[arg(long)]
    points: PathBuf,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Point layout JSON: an array of `{x, y, z, index}`.
    #[arg(long)]
    points: PathBuf,

    /// Image served as the video source.
    #[arg(long)]
    image: PathBuf,

    /// Session options JSON (retry, receiver, transform).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name the image is announced under.
    #[arg(long)]
    source: Option<String>,

    /// Give up if no frame is sampled within this many milliseconds.
    #[arg(long, default_value_t = 15_000)]
    timeout_ms: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .try_init();

    match cli.cmd {
        Command::Uv(args) => cmd_uv(args),
        Command::Sample(args) => cmd_sample(args),
    }
}

fn read_points(path: &Path) -> anyhow::Result<Vec<lumamap::GeometryPoint>> {
    let f = File::open(path).with_context(|| format!("open points '{}'", path.display()))?;
    let points: Vec<lumamap::GeometryPoint> = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse points JSON '{}'", path.display()))?;
    Ok(points)
}

fn cmd_uv(args: UvArgs) -> anyhow::Result<()> {
    let points = read_points(&args.points)?;
    let table = lumamap::compute_uvs(&points);
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let points = read_points(&args.points)?;
    let mut opts = match &args.config {
        Some(path) => lumamap::SessionOpts::from_path(path)?,
        None => lumamap::SessionOpts::default(),
    };
    let source = args
        .source
        .clone()
        .or_else(|| Some(opts.config.target_source.clone()).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
    opts.config.target_source = source.clone();
    opts.config.auto_connect = true;

    let still = lumamap::load_still(&args.image)?;
    let network = lumamap::LoopbackNetwork::new();
    let feed = network.announce(source);
    feed.push_video(still);

    let buffer_len = points
        .iter()
        .map(|p| p.index.checked_add(1))
        .try_fold(0usize, |len, n| n.map(|n| len.max(n)))
        .context("point index does not fit an output buffer")?;
    let mut colors = Vec::new();
    colors
        .try_reserve_exact(buffer_len)
        .with_context(|| format!("allocating {buffer_len} output colors"))?;
    colors.resize(buffer_len, lumamap::Rgb8::BLACK);
    let geometry = Arc::new(lumamap::StaticGeometry::new(points));
    let mut session = lumamap::MappingSession::new(
        opts,
        Arc::new(network.clone()),
        Arc::new(network),
        geometry,
    )?;
    let events = session.events();
    session.on_activate();

    let deadline = Instant::now() + Duration::from_millis(args.timeout_ms);
    loop {
        let left = deadline.saturating_duration_since(Instant::now());
        match events.recv_timeout(left) {
            Ok(LinkEvent::Connected { .. }) => break,
            Ok(event) => {
                if let Some(err) = event.failure() {
                    return Err(err).context("connect to still source");
                }
            }
            Err(RecvTimeoutError::Timeout) => anyhow::bail!("timed out waiting for a connection"),
            Err(RecvTimeoutError::Disconnected) => anyhow::bail!("session closed unexpectedly"),
        }
    }

    let stats = loop {
        match session.tick(Duration::ZERO, &mut colors) {
            TickOutcome::Sampled(stats) => break stats,
            TickOutcome::NoFrame if Instant::now() < deadline => {
                std::thread::sleep(Duration::from_millis(5));
            }
            TickOutcome::NoFrame => anyhow::bail!("timed out waiting for a frame"),
        }
    };
    session.shutdown();

    tracing::debug!(?stats, "sampled still image");
    let hex: Vec<String> = colors.iter().map(|c| c.to_hex()).collect();
    println!("{}", serde_json::to_string_pretty(&hex)?);
    Ok(())
}
