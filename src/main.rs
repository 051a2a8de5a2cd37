//! boss-sim: run the boss attack loop headless and log what happens.
//!
//! Usage:
//!   boss-sim --config configs/arena.json --seconds 30
//!   RUST_LOG=boss_choreography=debug boss-sim --seed 7

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use boss_choreography::{AttackEvent, Arena, BossConfig};

#[derive(Parser)]
#[command(name = "boss-sim")]
#[command(about = "Simulate boss attack choreography against a scripted player")]
struct Args {
    /// JSON boss configuration; defaults are used for anything missing
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 20.0)]
    seconds: f32,

    /// Fixed simulation rate
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Override the controller's attack selection seed
    #[arg(long)]
    seed: Option<u64>,

    /// Serve puffin profiling data on the default port
    #[arg(long)]
    profile: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.fps > 0, "--fps must be positive");
    anyhow::ensure!(args.seconds >= 0.0, "--seconds must not be negative");

    let mut config = match &args.config {
        Some(path) => BossConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BossConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.controller.seed = seed;
    }

    let _server = if args.profile {
        let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
        let server = puffin_http::Server::new(&addr)
            .map_err(|e| anyhow::anyhow!("starting profiler on {addr}: {e}"))?;
        puffin::set_scopes_on(true);
        info!(%addr, "puffin profiler listening");
        Some(server)
    } else {
        None
    };

    let dt = 1.0 / args.fps as f32;
    let frames = (args.seconds * args.fps as f32).round() as u64;
    let mut arena = Arena::new(config);
    info!(frames, dt, "simulation starting");

    for frame in 0..frames {
        for event in arena.advance(dt) {
            log_event(arena.clock.time, &event);
        }
        if args.profile {
            puffin::GlobalProfiler::lock().new_frame();
        }
        if arena.is_over() {
            info!(frame, "player defeated");
            break;
        }
    }

    let stats = arena.stats();
    let health = arena.player_health();
    println!();
    println!("=== SIMULATION SUMMARY ===");
    println!("  Simulated:    {:.2}s", arena.clock.time);
    println!(
        "  Attacks:      {} started, {} finished ({} preempted)",
        stats.attacks_started, stats.attacks_finished, stats.attacks_preempted
    );
    println!("  Player hits:  {} ({} damage)", stats.player_hits, stats.player_damage);
    println!("  Extra spawns: {}", stats.extra_spawns);
    match health {
        Some(h) => println!(
            "  Player HP:    {}/{} ({:.0}%)",
            h.current.max(0),
            h.max,
            h.percentage() * 100.0
        ),
        None => println!("  Player HP:    -"),
    }
    Ok(())
}

fn log_event(time: f32, event: &AttackEvent) {
    match event {
        AttackEvent::AttackStarted { attack } => info!(time, attack = attack.name(), "attack started"),
        AttackEvent::AttackFinished { attack, early } => {
            info!(time, attack = attack.name(), early, "attack finished")
        }
        AttackEvent::DamageApplied { amount, source, .. } => {
            info!(time, amount, ?source, "player hit")
        }
        other => debug!(time, event = ?other),
    }
}
