//! rdmatop - live RDMA / InfiniBand port bandwidth monitor for the terminal.
//!
//! Samples the port counters under `/sys/class/infiniband/<dev>/ports/<port>/`
//! at a fixed rate and draws receive and transmit throughput as two mirrored
//! bar charts with 1/8-cell resolution, redrawn in place every tick.
//!
//! Logging: set `RDMATOP_LOG` (or `RUST_LOG`), e.g. `RDMATOP_LOG=debug`, and
//! preferably `--log-file` so messages do not land on top of the display.

mod app;
mod color_scheme;
mod config;
mod system;
mod terminal;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use app::App;
use color_scheme::ColorSchemeId;
use config::RdmatopConfig;
use system::collector::Collector;
use system::counters::{CounterSource, Periodic};
use system::csv_export::CsvExporter;
use system::rate::TrackedField;
use terminal::TerminalSink;

/// RDMA bandwidth monitor
#[derive(Parser, Debug)]
#[command(name = "rdmatop")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RDMA device to monitor (e.g. mlx5_0)
    device: String,

    /// Device port [default: 1]
    #[arg(short, long)]
    port: Option<u32>,

    /// Refresh interval in seconds [default: 0.25]
    #[arg(short = 'r', long = "rate", value_name = "SECONDS")]
    interval: Option<f64>,

    /// Export every rate sample to a CSV file
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Base directory of the InfiniBand sysfs class [default: /sys/class/infiniband]
    #[arg(long, value_name = "DIR")]
    sysfs_root: Option<PathBuf>,

    /// Multiplier turning port data counters into bytes [default: 4]
    #[arg(long, value_name = "N")]
    byte_multiplier: Option<f64>,

    /// Disable colors
    #[arg(long)]
    no_color: bool,

    /// Write log output to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save the effective settings to the config file and exit
    #[arg(long)]
    save_config: bool,
}

impl Args {
    /// Command line flags take precedence over the config file.
    fn apply_to(&self, cfg: &mut RdmatopConfig) {
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(interval) = self.interval {
            cfg.interval_secs = config::clamp_interval(interval);
        }
        if let Some(root) = &self.sysfs_root {
            cfg.sysfs_root = root.clone();
        }
        if let Some(multiplier) = self.byte_multiplier {
            cfg.byte_multiplier = multiplier;
        }
        if self.no_color {
            cfg.color_scheme_id = ColorSchemeId::Monochrome;
        }
        if let Some(path) = &self.log_file {
            cfg.log_file = Some(path.clone());
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut cfg = RdmatopConfig::load();
    args.apply_to(&mut cfg);

    if !cfg.interval_secs.is_finite() {
        bail!("refresh interval must be a finite number of seconds");
    }
    if !(cfg.byte_multiplier.is_finite() && cfg.byte_multiplier > 0.0) {
        bail!("byte multiplier must be a positive number");
    }

    if args.save_config {
        let path = cfg
            .save()
            .map_err(anyhow::Error::msg)
            .context("Failed to save configuration")?;
        println!("Saved configuration to {}", path.display());
        return Ok(());
    }

    init_logging(cfg.log_file.as_deref())?;

    // Discover counters before touching the terminal
    let roots = counter_roots(&cfg.sysfs_root, &args.device, cfg.port);
    let source = CounterSource::new(&roots)
        .with_context(|| format!("Failed to discover counters for {} port {}", args.device, cfg.port))?;
    source.require(TrackedField::all().iter().map(|f| f.counter_name()))?;
    info!(counters = source.len(), device = %args.device, port = cfg.port, "counter source ready");

    let csv = match &args.csv {
        Some(path) => Some(CsvExporter::create(path)?),
        None => None,
    };

    let (cols, rows) = terminal::size().context("Failed to read terminal size")?;
    if cols < 2 || rows < 2 {
        bail!("terminal too small ({}x{})", cols, rows);
    }
    debug!(cols, rows, scheme = cfg.color_scheme_id.name(), "terminal size");

    let shutdown = terminal::shutdown_flag().context("Failed to install signal handlers")?;
    terminal::install_panic_hook();

    // Setup terminal
    let mut sink = TerminalSink::start(io::stdout())?;

    let mut app = App::new(&args.device, cfg.port, cols, rows, cfg.color_scheme_id);
    let mut collector = Collector::new(cfg.byte_multiplier, csv);
    let mut ticks = source.periodic(Duration::from_secs_f64(cfg.interval_secs));

    // Run the app
    let result = run_app(&mut app, &mut collector, &mut ticks, &mut sink, &shutdown);

    // Restore terminal
    sink.restore()?;
    drop(sink);

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    if let Some(rows) = collector.finish()? {
        info!(rows, "CSV export closed");
    }

    info!(ticks = app.tick, degraded = ticks.degraded_ticks(), "shutting down");
    Ok(())
}

/// Main sampling loop: one full read → rate → window → render → display pass
/// per tick, until a termination signal arrives or a tick fails.
fn run_app<W: io::Write>(
    app: &mut App,
    collector: &mut Collector,
    ticks: &mut Periodic,
    sink: &mut TerminalSink<W>,
    shutdown: &AtomicBool,
) -> Result<()> {
    for snapshot in ticks {
        if shutdown.load(Ordering::Relaxed) {
            return Ok(());
        }
        let snapshot = snapshot.context("Failed to read port counters")?;
        collector.refresh(app, &snapshot)?;
        let frame = ui::draw(app);
        sink.present(&frame).context("Failed to draw frame")?;
    }
    Ok(())
}

/// `hw_counters` is optional (not every driver exposes it); `counters` is not.
fn counter_roots(sysfs_root: &Path, device: &str, port: u32) -> Vec<PathBuf> {
    let port_dir = sysfs_root
        .join(device)
        .join("ports")
        .join(port.to_string());
    let hw_counters = port_dir.join("hw_counters");

    let mut roots = Vec::with_capacity(2);
    if hw_counters.is_dir() {
        roots.push(hw_counters);
    } else {
        debug!(path = %hw_counters.display(), "no hw_counters directory");
    }
    roots.push(port_dir.join("counters"));
    roots
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env("RDMATOP_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init();
        }
    }
    Ok(())
}
