#![deny(unsafe_code)]
//! Headless CLI for the canvas-fx animators.
//!
//! Subcommands:
//! - `render <animator>`: run N frames into a software raster, write a PNG
//! - `simulate <animator>`: run N frames without drawing pixels, report state
//! - `list`: print available animators (with param schemas under `--json`)
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=debug`) to see animator logs.

mod error;

use canvas_fx_core::color::parse_css_color;
use canvas_fx_core::theme::ThemeSignal;
use canvas_fx_core::{
    Animator, FrameClock, HostEvent, NullSurface, Raster, Seed, Size, Surface,
};
use canvas_fx_engines::AnimatorKind;
use clap::{Args, Parser, Subcommand};
use error::CliError;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "canvas-fx", about = "Headless runner for the canvas animators")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct RunArgs {
    /// Animator name (trace-field, hero, loader, cursor). Optional with --seed-file.
    animator: Option<String>,

    /// Surface width in CSS pixels.
    #[arg(short = 'W', long, default_value_t = 800.0)]
    width: f64,

    /// Surface height in CSS pixels.
    #[arg(short = 'H', long, default_value_t = 600.0)]
    height: f64,

    /// Number of frames to run at 60 fps.
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Start in light mode instead of dark.
    #[arg(long)]
    light: bool,

    /// Animator parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Read animator, size, params, seed, frames, theme and the load and
    /// theme-toggle schedule from a seed file.
    #[arg(long, conflicts_with = "animator")]
    seed_file: Option<PathBuf>,

    /// Write the effective seed to this file.
    #[arg(long)]
    save_seed: Option<PathBuf>,

    /// Time (ms) at which the page reports the document as complete.
    #[arg(long, default_value_t = 0.0)]
    load_at_ms: f64,

    /// Never report the page as loaded.
    #[arg(long, conflicts_with = "load_at_ms")]
    no_load: bool,

    /// Flip the theme at this frame index.
    #[arg(long)]
    toggle_theme_at: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Run an animator for N frames and write a PNG snapshot of the last one.
    Render {
        #[command(flatten)]
        run: RunArgs,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,

        /// Flatten the image over this CSS color (for transparent canvases).
        #[arg(long)]
        backdrop: Option<String>,
    },
    /// Run an animator for N frames without rendering and report its state.
    Simulate {
        #[command(flatten)]
        run: RunArgs,
    },
    /// List available animators.
    List,
}

/// Builds the seed for a run, from `--seed-file` or from the flags.
fn resolve_seed(run: &RunArgs) -> Result<Seed, CliError> {
    if let Some(path) = &run.seed_file {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CliError::file("read", path, e))?;
        return Seed::from_json(&text)
            .map_err(|e| CliError::Input(format!("{}: {e}", path.display())));
    }
    let animator = run
        .animator
        .as_deref()
        .ok_or_else(|| CliError::Input("an animator name or --seed-file is required".into()))?;
    let params: serde_json::Value = serde_json::from_str(&run.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let mut seed = Seed::new(animator, run.width, run.height, run.seed);
    seed.params = params;
    seed.frames = run.frames;
    seed.dark = !run.light;
    seed.load_at_ms = (!run.no_load).then_some(run.load_at_ms);
    seed.toggle_theme_at = run.toggle_theme_at;
    Ok(seed)
}

/// Drives `animator` for the seed's frame count, feeding the seed's host
/// events the way a page would. Zero frames draws the initial state once.
fn drive(
    animator: &mut AnimatorKind,
    seed: &Seed,
    theme: &ThemeSignal,
    surface: &mut dyn Surface,
) -> Result<(), CliError> {
    if seed.frames == 0 {
        animator.draw(surface);
        return Ok(());
    }
    let mut clock = FrameClock::default();
    let mut load_at_ms = seed.load_at_ms;
    for index in 0..seed.frames {
        let time = clock.tick();
        if load_at_ms.is_some_and(|at| time.now_ms >= at) {
            animator.handle(HostEvent::DocumentComplete);
            load_at_ms = None;
        }
        if seed.toggle_theme_at == Some(index) {
            let dark = theme.toggle();
            log::info!("theme toggled at frame {index}: dark={dark}");
        }
        animator.frame(time, surface)?;
    }
    Ok(())
}

fn prepare(run: &RunArgs) -> Result<(Seed, AnimatorKind, ThemeSignal), CliError> {
    let seed = resolve_seed(run)?;
    if let Some(path) = &run.save_seed {
        std::fs::write(path, serde_json::to_string_pretty(&seed)?)
            .map_err(|e| CliError::file("write", path, e))?;
    }
    let theme = ThemeSignal::new(seed.dark);
    let animator = AnimatorKind::from_seed(&seed, theme.subscribe())?;
    log::info!(
        "running {} at {}x{} for {} frames (seed {}, dark={})",
        seed.animator,
        seed.width,
        seed.height,
        seed.frames,
        seed.seed,
        seed.dark
    );
    Ok((seed, animator, theme))
}

fn run_info(seed: &Seed, animator: &AnimatorKind) -> serde_json::Value {
    serde_json::json!({
        "animator": seed.animator,
        "width": seed.width,
        "height": seed.height,
        "frames": seed.frames,
        "seed": seed.seed,
        "dark": seed.dark,
        "params": animator.params(),
        "summary": animator.summary(),
    })
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let animators = AnimatorKind::list_animators();
            if cli.json {
                let size = Size::new(800.0, 600.0)?;
                let mut schemas = serde_json::Map::new();
                for &name in animators {
                    let theme = ThemeSignal::default();
                    let a = AnimatorKind::from_name(
                        name,
                        size,
                        0,
                        &serde_json::json!({}),
                        theme.subscribe(),
                    )?;
                    schemas.insert(name.to_string(), a.param_schema());
                }
                let info = serde_json::json!({
                    "animators": animators,
                    "params": schemas,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Animators:");
                for name in animators {
                    println!("  {name}");
                }
            }
        }
        Command::Render {
            run,
            output,
            backdrop,
        } => {
            let backdrop = backdrop
                .as_deref()
                .map(parse_css_color)
                .transpose()
                .map_err(|e| CliError::Input(format!("invalid --backdrop: {e}")))?;
            let (seed, mut animator, theme) = prepare(&run)?;
            let mut raster = Raster::new(animator.size())?;
            drive(&mut animator, &seed, &theme, &mut raster)?;
            canvas_fx_engines::snapshot::write_png(&raster, backdrop, &output)?;

            if cli.json {
                let mut info = run_info(&seed, &animator);
                info["output"] = output.display().to_string().into();
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {} frames, seed {}) -> {}",
                    seed.animator,
                    seed.width,
                    seed.height,
                    seed.frames,
                    seed.seed,
                    output.display()
                );
            }
        }
        Command::Simulate { run } => {
            let (seed, mut animator, theme) = prepare(&run)?;
            let mut surface = NullSurface::new(animator.size());
            drive(&mut animator, &seed, &theme, &mut surface)?;

            let info = run_info(&seed, &animator);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "simulated {} ({}x{}, {} frames, seed {}): {}",
                    seed.animator,
                    seed.width,
                    seed.height,
                    seed.frames,
                    seed.seed,
                    info["summary"]
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
