use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use keyframe_splitter::{
    config::Config,
    error::PlanError,
    plan::{SplitPlan, TieBreak},
    probe::FfprobeProber,
    split::FfmpegSplitter,
    timeline::Timeline,
};

#[derive(Parser)]
#[command(
    name = "keyframe-splitter",
    version,
    about = "Split a video losslessly at the keyframes nearest to the given timestamps",
    long_about = "Keyframe-Splitter probes the keyframes of a video, snaps every requested timestamp to one of them and cuts the file into parts with ffmpeg stream copy, without re-encoding."
)]
struct Cli {
    /// Video file to split
    input: PathBuf,

    /// Timestamps to split at, as seconds (95.5) or HH:MM:SS[.fraction]
    timestamps: Vec<String>,

    /// Always use the keyframe at or before each timestamp
    #[arg(long, conflicts_with = "after")]
    before: bool,

    /// Always use the keyframe at or after each timestamp
    #[arg(long)]
    after: bool,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the ffmpeg commands instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Print the split plan as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn tie_break(&self, configured: TieBreak) -> TieBreak {
        if self.before {
            TieBreak::PreferBefore
        } else if self.after {
            TieBreak::PreferAfter
        } else {
            configured
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for the plan output
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Keyframe-Splitter v{}", env!("CARGO_PKG_VERSION"));

    run(cli)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))
}

async fn run(cli: Cli) -> keyframe_splitter::Result<()> {
    // Fail before the probe, which can take a while on long videos
    if cli.timestamps.is_empty() {
        return Err(PlanError::NoTimestampsProvided.into());
    }

    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };
    config.split.tie_break = cli.tie_break(config.split.tie_break);
    config.validate()?;

    info!("Input: {:?}", cli.input);
    info!("Tie-break: {:?}", config.split.tie_break);

    let frames = FfprobeProber::from_config(&config.tools)
        .probe_frames(&cli.input)
        .await?;
    let timeline = Timeline::from_raw(&frames, true)?;
    info!("Found {} keyframes", timeline.len());

    let plan = SplitPlan::resolve(&timeline, cli.timestamps.as_slice(), config.split.tie_break)?;
    for seconds in plan.split_seconds() {
        info!("Splitting at keyframe {}", seconds);
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&plan)
            .map_err(|e| keyframe_splitter::SplitterError::generic(e.to_string()))?;
        println!("{}", json);
    }

    let splitter = FfmpegSplitter::from_config(&config);
    if cli.dry_run {
        for job in splitter.jobs(&cli.input, &plan) {
            println!("{}", job.command);
        }
        return Ok(());
    }

    let outputs = splitter.split(&cli.input, &plan).await?;
    info!("Split complete! Wrote {} parts", outputs.len());
    Ok(())
}
