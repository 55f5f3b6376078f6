//! Gridrun - Entry Point
//!
//! Runs the course simulation in one of three modes: headless for a
//! fixed number of ticks, live in the terminal at the configured tick
//! rate, or as an interactive prompt stepping the simulation by hand.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

use gridrun::core::config::SimConfig;
use gridrun::core::error::{GridError, Result};
use gridrun::core::types::EntityKind;
use gridrun::render::term::TermRenderer;
use gridrun::scene::{self, Scene};
use gridrun::schedule::{FixedStep, ManualClock, SystemClock};
use gridrun::simulation::{Controller, SimEvent};

#[derive(Parser, Debug)]
#[command(name = "gridrun")]
#[command(about = "Trigger-driven course simulation")]
struct Args {
    /// Scene file to load instead of the built-in course
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Run headless for this many ticks, then exit
    #[arg(long)]
    ticks: Option<u64>,

    /// Print each tick's events as JSON lines (headless only)
    #[arg(long)]
    events_json: bool,

    /// Draw the board live at the configured tick rate
    #[arg(long)]
    watch: bool,

    /// Override the tick rate (frames per second)
    ///
    /// Interval gates measure wall-clock time, so raising the rate also
    /// tightens the spawn cadence in ticks.
    #[arg(long)]
    fps: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "gridrun=info".to_string()))
        .init();

    let args = Args::parse();
    let mut config = SimConfig::default();
    if let Some(fps) = args.fps {
        config.tick_interval_ms = if fps == 0 { 0 } else { 1000 / fps };
    }
    config.validate().map_err(GridError::Config)?;

    let scene = match &args.scene {
        Some(path) => scene::load_file(path, &config)?,
        None => Scene::standard(&config),
    };

    if let Some(ticks) = args.ticks {
        return run_headless(scene, config, ticks, args.events_json);
    }
    if args.watch {
        return run_watch(scene, config);
    }
    run_repl(scene, config)
}

/// Fixed tick count against a manual clock, so runs are reproducible
fn run_headless(scene: Scene, config: SimConfig, ticks: u64, events_json: bool) -> Result<()> {
    let interval = config.tick_interval_ms;
    let clock = ManualClock::new();
    let mut controller = Controller::new(config).with_clock(Box::new(clock.clone()));
    scene.install(&mut controller);

    let mut spawned = 0usize;
    let mut destroyed = 0usize;
    for _ in 0..ticks {
        clock.advance(interval);
        let events = controller.tick()?;
        for event in &events {
            match event {
                SimEvent::Spawned { .. } => spawned += 1,
                SimEvent::Destroyed { .. } => destroyed += 1,
                _ => {}
            }
            if events_json {
                println!("{}", serde_json::to_string(event)?);
            }
        }
    }

    println!(
        "Ran {} ticks: {} spawned, {} destroyed, {} mobs on the board.",
        ticks,
        spawned,
        destroyed,
        controller.world.count_kind(EntityKind::Mob)
    );
    Ok(())
}

/// Live terminal rendering at the configured tick rate
fn run_watch(scene: Scene, config: SimConfig) -> Result<()> {
    let renderer = TermRenderer::stdout(&config);
    let scheduler = FixedStep::new(config.tick_interval_ms);
    let mut controller = Controller::new(config)
        .with_clock(Box::new(SystemClock::new()))
        .with_scheduler(Box::new(scheduler))
        .with_renderer(Box::new(renderer));
    scene.install(&mut controller);

    tracing::info!("Watching. Interrupt to stop.");
    controller.run()
}

/// Interactive prompt stepping a manual clock
fn run_repl(scene: Scene, config: SimConfig) -> Result<()> {
    let interval = config.tick_interval_ms;
    let clock = ManualClock::new();
    let mut controller = Controller::new(config).with_clock(Box::new(clock.clone()));
    scene.install(&mut controller);

    println!("\n=== GRIDRUN ===");
    println!("Trigger-driven course simulation");
    println!();
    println!("Commands:");
    println!("  tick / t        - Advance simulation by one tick");
    println!("  run <n>         - Run n simulation ticks");
    println!("  status / s      - Show detailed status");
    println!("  quit / q        - Exit");
    println!();

    loop {
        display_status(&controller);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "tick" || input == "t" {
            clock.advance(interval);
            controller.tick()?;
            println!("Tick {} complete.", controller.world.current_tick);
            continue;
        }

        if input == "status" || input == "s" {
            display_detailed_status(&controller);
            continue;
        }

        if input.starts_with("run ") {
            if let Ok(n) = input.strip_prefix("run ").unwrap().parse::<u32>() {
                println!("Running {} ticks...", n);
                for _ in 0..n {
                    clock.advance(interval);
                    controller.tick()?;
                }
                println!(
                    "Completed {} ticks. Now at tick {}.",
                    n, controller.world.current_tick
                );
            } else {
                println!("Usage: run <number>");
            }
            continue;
        }

        println!("Unknown command. Available: tick, run <n>, status, quit");
    }

    println!(
        "\nGoodbye! Final state: {} entities, {} ticks elapsed.",
        controller.world.len(),
        controller.world.current_tick
    );
    Ok(())
}

fn display_status(controller: &Controller) {
    println!(
        "[tick {}] {} zones, {} mobs, {} triggers",
        controller.world.current_tick,
        controller.world.count_kind(EntityKind::Zone),
        controller.world.count_kind(EntityKind::Mob),
        controller.trigger_count()
    );
}

fn display_detailed_status(controller: &Controller) {
    println!("=== Status at tick {} ===", controller.world.current_tick);
    for entity in controller.world.iter() {
        let label = entity.label.as_deref().unwrap_or("-");
        println!(
            "  {:?} {:8} {:?} at ({:.0}, {:.0}), {} bound action(s)",
            entity.kind,
            label,
            entity.id,
            entity.shape.center.x,
            entity.shape.center.y,
            entity.bound_len()
        );
    }
}
