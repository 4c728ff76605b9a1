//! Terminal walkthrough of Winograd F(2x2, 3x3) on one tile.
//!
//! Run with: `cargo run --example walkthrough -- --animate`
//!
//! Prints every step's matrices; with `--animate` plays each step's
//! highlight animation at the configured cadence. `--json` prints the full
//! pipeline as JSON instead.

use std::fs;
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use winograd_viz::config::{Config, RoundingPolicy};
use winograd_viz::matrix::{format_value, Matrix};
use winograd_viz::session::{Frame, Step, StepView, Walkthrough};

#[derive(Parser)]
#[command(name = "walkthrough", about = "Step through Winograd F(2x2, 3x3) on one tile")]
struct Args {
    /// JSON config file (engine rounding, animation cadence)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Randomize input and filter before starting
    #[arg(long)]
    randomize: bool,
    /// Seed for --randomize
    #[arg(long)]
    seed: Option<u64>,
    /// Round only stage outputs instead of every product
    #[arg(long)]
    stage_rounding: bool,
    /// Play highlight animations
    #[arg(long)]
    animate: bool,
    /// Override every animation interval (milliseconds)
    #[arg(long)]
    frame_ms: Option<u64>,
    /// Show a single step (1-7) instead of all of them
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=7))]
    step: Option<u8>,
    /// Print the pipeline as JSON and exit
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            Config::from_json(&text).with_context(|| format!("invalid config {}", path.display()))?
        }
        None => Config::default(),
    };
    if args.stage_rounding {
        config.engine.rounding = RoundingPolicy::StageOutput;
    }
    if let Some(ms) = args.frame_ms {
        config.animation.transform_ms = ms;
        config.animation.elementwise_ms = ms;
        config.animation.convolution_ms = ms;
    }
    Ok(config)
}

fn print_named(name: &str, m: &Matrix) {
    println!("{} ({}):", name, m.shape());
    print!("{}", m);
}

fn print_view(view: &StepView) {
    match view {
        StepView::Originals { input, filter } => {
            print_named("Input", input);
            print_named("Filter", filter);
        }
        StepView::Constants { b, g, a } => {
            print_named("B", b);
            print_named("G", g);
            print_named("A", a);
        }
        StepView::InputTransform(t) => {
            print_named("Input x B^T", &t.intermediate);
            print_named("U = B x Input x B^T", &t.result);
        }
        StepView::FilterTransform(t) => {
            print_named("Filter x G^T", &t.intermediate);
            print_named("V = G x Filter x G^T", &t.result);
        }
        StepView::Elementwise { u, v, m } => {
            print_named("U", u);
            print_named("V", v);
            print_named("M = U (.) V", m);
        }
        StepView::InverseTransform(t) => {
            print_named("M x A^T", &t.intermediate);
            print_named("Output = A x M x A^T", &t.result);
        }
        StepView::DirectConvolution { output, .. } => {
            print_named("Direct convolution", output);
        }
    }
}

fn print_frame(frame: &Frame) {
    let t = frame.target;
    let value = frame.value.map(format_value).unwrap_or_default();
    println!(
        "  [{}] {:?}[{}][{}] = {}  ({} operand cells)",
        frame.label,
        t.slot,
        t.row,
        t.col,
        value,
        frame.operands.len()
    );
}

fn show_step(walk: &mut Walkthrough, animate: bool) -> Result<()> {
    let step = walk.current_step();
    println!("\n=== {} ===", step.title());
    println!("{}\n", step.description());
    print_view(&walk.view()?);

    let wants_animation = animate && step.has_transform_animation();
    if wants_animation {
        walk.animate()?;
    }
    if wants_animation || step == Step::DirectConvolution {
        walk.run_animation(&mut |f: &Frame| print_frame(f), |d| {
            if animate {
                thread::sleep(d)
            }
        });
    }
    Ok(())
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut walk = Walkthrough::new(config);

    if args.randomize {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        walk.randomize(&mut rng)?;
    }

    if args.json {
        let state = walk.state();
        let pipeline = walk.engine().run(state.input(), state.filter())?;
        println!("{}", serde_json::to_string_pretty(&pipeline)?);
        return Ok(());
    }

    match args.step {
        Some(n) => {
            walk.select(usize::from(n - 1))?;
            show_step(&mut walk, args.animate)?;
        }
        None => loop {
            show_step(&mut walk, args.animate)?;
            if walk.current_step() == Step::LAST {
                break;
            }
            walk.next()?;
        },
    }

    let state = walk.state();
    let pipeline = walk.engine().run(state.input(), state.filter())?;
    println!(
        "\nWinograd output matches direct convolution: {}",
        pipeline.matches_direct(1e-3)
    );
    Ok(())
}
