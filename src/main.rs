use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use swimbots_core::config::AppConfig;
use swimbots_core::init_logging;
use swimbots_lib::{Host, JsonLinesSink, NullSink, SnapshotSink};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Seed for a reproducible run (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop after this many ticks instead of running until interrupted
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Write snapshots and events as JSON lines to this path, or `-` for stdout
    #[arg(long)]
    snapshots: Option<String>,

    /// Pace ticks with the wall clock instead of running as fast as possible
    #[arg(long)]
    realtime: bool,
}

async fn open_sink(target: Option<&str>) -> Result<Box<dyn SnapshotSink>> {
    Ok(match target {
        None => Box::new(NullSink),
        Some("-") => Box::new(JsonLinesSink::new(tokio::io::stdout())),
        Some(path) => {
            let file = tokio::fs::File::create(path)
                .await
                .with_context(|| format!("creating snapshot file {path}"))?;
            Box::new(JsonLinesSink::new(file))
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }
    tracing::info!(
        fingerprint = %config.fingerprint(),
        seed = ?config.world.seed,
        tick_rate_hz = config.host.tick_rate_hz,
        "Starting Swimbots"
    );

    let sink = open_sink(args.snapshots.as_deref()).await?;
    let mut host: Host = Host::new(config, sink)?;

    tokio::select! {
        res = host.run(args.ticks, args.realtime) => res?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(tick = host.world().tick, "Interrupted, shutting down");
        }
    }

    let stats = host.world().stats();
    tracing::info!(
        tick = host.world().tick,
        total = stats.total,
        max_generation = stats.max_generation,
        "Exited clean"
    );
    Ok(())
}
