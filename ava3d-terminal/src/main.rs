/// AVA3D Terminal - software-rendered avatar viewer
///
/// Controls:
///   - Arrow Keys / WASD: Orbit the camera
///   - +/-: Zoom
///   - Space: Pause animation
///   - Q/ESC: Quit
use anyhow::Context;
use ava3d_core::{SceneDefinition, SurfaceSize};
use ava3d_terminal::{render_snapshot, save_png, TerminalApp};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ava3d-terminal", about = "Software-rendered 3D avatar for the terminal")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate the avatar in the terminal
    View {
        /// Scene definition (JSON)
        #[arg(short, long)]
        scene: Option<PathBuf>,
        /// Target frame rate
        #[arg(long, default_value = "30")]
        fps: u32,
    },
    /// Render a single frame to a PNG file
    Snapshot {
        /// Scene definition (JSON)
        #[arg(short, long)]
        scene: Option<PathBuf>,
        /// Output image path
        #[arg(short, long)]
        out: PathBuf,
        #[arg(long, default_value = "640")]
        width: u32,
        #[arg(long, default_value = "480")]
        height: u32,
        /// Animation time in seconds
        #[arg(short, long, default_value = "0")]
        time: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::View {
        scene: None,
        fps: 30,
    });

    // The viewer owns the terminal, so it only logs when given a file
    let interactive = matches!(command, Commands::View { .. });
    init_logging(cli.verbose, cli.log_file.as_deref(), interactive)?;

    match command {
        Commands::View { scene, fps } => {
            let scene = load_scene(scene.as_deref())?;
            let mut app = TerminalApp::new(scene, fps);
            app.run()?;
        }
        Commands::Snapshot {
            scene,
            out,
            width,
            height,
            time,
        } => {
            let scene = load_scene(scene.as_deref())?;
            let (buffer, stats) = render_snapshot(&scene, SurfaceSize::new(width, height), time);
            save_png(&buffer, &out)?;
            println!(
                "Wrote {} ({}x{}, {} triangles drawn, {} culled)",
                out.display(),
                width,
                height,
                stats.drawn,
                stats.culled
            );
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>, interactive: bool) -> anyhow::Result<()> {
    let filter = if verbose { "debug" } else { "info" };

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(filter))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None if !interactive => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(filter))
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

fn load_scene(path: Option<&Path>) -> anyhow::Result<SceneDefinition> {
    let Some(path) = path else {
        return Ok(SceneDefinition::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scene {}", path.display()))?;
    let scene = SceneDefinition::from_json(&json)?;
    tracing::info!(path = %path.display(), "scene loaded");
    Ok(scene)
}
