use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hero_slideshow::sim::{Session, SimulatedPage, SlideChange};
use hero_slideshow::{Layout, Mode, SiteConfig, SlideshowConfig};

#[derive(Parser, Debug)]
#[command(name = "hero-slideshow", version, about = "Headless runner for the hero slideshow")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a simulated page session and print every slide change.
    Simulate(SimulateArgs),
    /// Print a sequence of generated slide positions.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Site config JSON (defaults are used for missing fields).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for slide placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated time to run for.
    #[arg(long, default_value_t = 10_000)]
    until_ms: u64,

    /// Click the document at this time (repeatable).
    #[arg(long = "click-at", value_name = "MS")]
    clicks: Vec<u64>,

    /// Scroll the hero out of view at this time (repeatable).
    #[arg(long = "hide-at", value_name = "MS")]
    hides: Vec<u64>,

    /// Scroll the hero back into view at this time (repeatable).
    #[arg(long = "show-at", value_name = "MS")]
    shows: Vec<u64>,

    /// Start with the hero scrolled out of view.
    #[arg(long)]
    start_hidden: bool,

    /// Simulate a reduced-motion preference.
    #[arg(long)]
    reduced_motion: bool,

    /// Simulate a page without the mobile strip.
    #[arg(long)]
    no_strip: bool,

    /// Time every image takes to load.
    #[arg(long, default_value_t = 0)]
    load_latency_ms: u64,

    /// Override the advance interval.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Override the maximum image size percentage.
    #[arg(long)]
    image_size_pct: Option<f64>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Number of positions to generate.
    #[arg(long, default_value_t = 10)]
    count: usize,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = hero_slideshow::constants::IMAGE_SIZE_PCT)]
    image_size_pct: f64,
}

#[derive(Serialize)]
struct Report<'a> {
    mode: Mode,
    slide_changes: &'a [SlideChange],
    strip_items: usize,
    timers_started: usize,
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
        Command::Simulate(args) => simulate(args),
        Command::Layout(args) => layout(args),
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

fn slideshow_config(args: &SimulateArgs) -> anyhow::Result<SlideshowConfig> {
    let site = match &args.config {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => SiteConfig::default(),
    };
    let mut config = site.slideshow;
    if let Some(interval_ms) = args.interval_ms {
        config.interval_ms = interval_ms;
    }
    if let Some(pct) = args.image_size_pct {
        config.image_size_pct = pct;
    }
    config.validate().context("invalid slideshow settings")?;
    Ok(config)
}

fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = slideshow_config(&args)?;

    let mut builder = SimulatedPage::builder()
        .viewport_ratio(if args.start_hidden { 0.0 } else { 1.0 })
        .load_latency(Duration::from_millis(args.load_latency_ms));
    if args.reduced_motion {
        builder = builder.reduced_motion();
    }
    if args.no_strip {
        builder = builder.without_strip();
    }

    let mut session = Session::start(&config, builder.build(), rng_from(args.seed));
    for &at in &args.clicks {
        session.click_at(Duration::from_millis(at));
    }
    for &at in &args.hides {
        session.scroll_at(Duration::from_millis(at), 0.0);
    }
    for &at in &args.shows {
        session.scroll_at(Duration::from_millis(at), 1.0);
    }
    session.run_until(Duration::from_millis(args.until_ms));

    let page = session.page();
    let report = Report {
        mode: session.controller().mode(),
        slide_changes: page.slide_changes(),
        strip_items: page.strip_items().map_or(0, <[String]>::len),
        timers_started: page.timers_started(),
    };
    info!(changes = report.slide_changes.len(), "simulation finished");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("mode: {:?}", report.mode);
    let layout = config.layout();
    for change in report.slide_changes {
        let index = config
            .slides
            .index_of(&change.src)
            .map_or_else(|| "?".to_string(), |i| i.to_string());
        println!(
            "t={:>6}ms  slide {:>2}  {:<32} left {:>6.2}%  top {:>6.2}%  {}",
            change.at_ms,
            index,
            change.src,
            change.position.left_pct,
            change.position.top_pct,
            layout.quadrant_of(change.position).name(),
        );
    }
    for (src, position) in page.static_images() {
        println!(
            "static  {src} left {:.2}% top {:.2}%",
            position.left_pct, position.top_pct
        );
    }
    Ok(())
}

fn layout(args: LayoutArgs) -> anyhow::Result<()> {
    if !(0.0..=100.0).contains(&args.image_size_pct) {
        anyhow::bail!("image size {} is outside [0, 100]", args.image_size_pct);
    }
    let layout = Layout::new(args.image_size_pct);
    let mut rng = rng_from(args.seed);
    let mut last = None;
    for i in 0..args.count {
        let (position, quadrant) = layout.next_position(&mut rng, last);
        println!(
            "{i:>3}  left {:>6.2}%  top {:>6.2}%  {}",
            position.left_pct,
            position.top_pct,
            quadrant.name()
        );
        last = Some(quadrant);
    }
    Ok(())
}
