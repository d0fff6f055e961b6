//! Worldgen CLI
//!
//! Generate, validate and preview worlds without a renderer attached.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use worldgen_animation::{Clock, ManualClock, MonotonicClock};
use worldgen_core::validate_with_report;
use worldgen_runtime::{render_visible, DrawItem, RenderCapability, WorldGenSession};
use worldgen_service::{handle_generate, MockGenerator, ReplayGenerator};

mod config;

use config::{PreviewConfig, WorldgenConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "worldgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Turn prompts into 3D scene graphs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a scene and print the response
    Generate {
        /// Description of the world
        prompt: String,

        /// Answer with a recorded model completion instead of the canned scenes
        #[arg(long)]
        replay: Option<PathBuf>,
    },

    /// Validate a scene JSON file and print the normalized graph
    Validate {
        /// JSON file to validate
        file: PathBuf,
    },

    /// Run a session until the generated scene has fully appeared
    Preview {
        /// Description of the world
        prompt: String,

        /// Pace frames on the wall clock instead of simulating them
        #[arg(long)]
        realtime: bool,
    },

    /// Write a default worldgen.toml
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Generate { prompt, replay } => cmd_generate(&prompt, replay.as_deref()).await,

        Commands::Validate { file } => cmd_validate(&file),

        Commands::Preview { prompt, realtime } => {
            let config = WorldgenConfig::load(&cli.config)?;
            cmd_preview(&prompt, realtime, config).await
        }

        Commands::Init { force } => cmd_init(&cli.config, force),
    }
}

async fn cmd_generate(prompt: &str, replay: Option<&Path>) -> Result<()> {
    let body = serde_json::json!({ "prompt": prompt });
    let response = match replay {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            handle_generate(&ReplayGenerator::new(text), &body).await
        }
        None => handle_generate(&MockGenerator::new(), &body).await,
    };

    info!("Status {}", response.status);
    println!("{}", serde_json::to_string_pretty(&response.to_json())?);

    if !response.is_success() {
        anyhow::bail!(
            "Generation failed with status {}: {}",
            response.status,
            response.error_message().unwrap_or_default()
        );
    }
    Ok(())
}

fn cmd_validate(file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", file.display()))?;

    let (scene, report) = validate_with_report(&raw);

    if report.is_clean() {
        info!("{} is valid ({} nodes)", file.display(), report.accepted_nodes);
    } else {
        warn!("{} needed repairs", file.display());
        println!("Validation report");
        println!("=================");
        println!("  accepted nodes:    {}", report.accepted_nodes);
        println!("  dropped nodes:     {}", report.dropped_nodes);
        println!("  depth pruned:      {}", report.depth_pruned);
        println!("  coerced types:     {}", report.coerced_types);
        println!("  defaulted vectors: {}", report.defaulted_vectors);
        println!("  clamped colors:    {}", report.clamped_colors);
        println!("  renamed ids:       {}", report.renamed_ids);
        println!("  malformed root:    {}", report.malformed_root);
        println!("  fallback terrain:  {}", report.fallback_terrain);
        println!();
    }

    println!("{}", serde_json::to_string_pretty(&scene)?);
    Ok(())
}

async fn cmd_preview(prompt: &str, realtime: bool, config: WorldgenConfig) -> Result<()> {
    let generator = MockGenerator::new();
    info!(
        "Previewing '{}' at {} fps ({})",
        prompt,
        config.preview.fps,
        if realtime { "realtime" } else { "simulated" }
    );

    let frames = if realtime {
        let mut session = WorldGenSession::new(config.session);
        session.generate_world(prompt, &generator).await?;
        run_realtime(&mut session, &config.preview).await
    } else {
        let clock = ManualClock::new();
        let mut session = WorldGenSession::with_clock(config.session, clock.clone());
        session.generate_world(prompt, &generator).await?;
        run_simulated(&mut session, &clock, &config.preview)
    };

    match frames {
        Some(frames) => info!("Scene settled after {} frames", frames),
        None => warn!(
            "Scene did not settle within {} frames",
            config.preview.max_frames
        ),
    }
    Ok(())
}

/// Fixed-step frames on a manual clock; returns the frame the scene settled on
fn run_simulated(
    session: &mut WorldGenSession<ManualClock>,
    clock: &ManualClock,
    preview: &PreviewConfig,
) -> Option<u64> {
    let step = preview.frame_duration();
    let mut renderer = LogRenderer::default();

    for frame in 1..=preview.max_frames {
        clock.advance(step);
        if run_frame(session, &mut renderer, frame, step) {
            return Some(frame);
        }
    }
    None
}

/// Frames paced by a tokio interval on the monotonic clock
async fn run_realtime(
    session: &mut WorldGenSession<MonotonicClock>,
    preview: &PreviewConfig,
) -> Option<u64> {
    let mut interval = tokio::time::interval(preview.frame_duration());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut renderer = LogRenderer::default();
    let mut last = session.clock().now();

    for frame in 1..=preview.max_frames {
        interval.tick().await;
        let now = session.clock().now();
        let dt = now.saturating_sub(last);
        last = now;

        if run_frame(session, &mut renderer, frame, dt) {
            return Some(frame);
        }
    }
    None
}

fn run_frame<C: Clock>(
    session: &mut WorldGenSession<C>,
    renderer: &mut LogRenderer,
    frame: u64,
    dt: Duration,
) -> bool {
    let report = session.tick(dt.as_secs_f32());

    if report.installed {
        if let Some(scene) = session.scene() {
            info!("Frame {}: installed scene '{}'", frame, scene.id);
        }
    }
    if !report.revealed.is_empty() {
        info!("Frame {}: revealed {}", frame, report.revealed.join(", "));
    }
    if !report.settled.is_empty() {
        debug!("Frame {}: settled {}", frame, report.settled.join(", "));
    }

    renderer.frame = frame;
    let drawn = render_visible(session, renderer);
    if !report.is_empty() {
        debug!("Frame {}: drew {} nodes", frame, drawn);
    }

    session.is_settled()
}

/// Logs draw calls at trace level
#[derive(Default)]
struct LogRenderer {
    frame: u64,
}

impl RenderCapability for LogRenderer {
    fn draw(&mut self, item: &DrawItem<'_>) {
        tracing::trace!(
            "Frame {}: {:indent$}{} [{}] at ({:.2}, {:.2}, {:.2}) scale {:.2}",
            self.frame,
            "",
            item.path,
            item.shape.tag(),
            item.pose.position.x,
            item.pose.position.y,
            item.pose.position.z,
            item.pose.scale.y,
            indent = item.depth * 2
        );
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }

    let content = WorldgenConfig::default().to_toml()?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote {}", path.display());
    Ok(())
}
