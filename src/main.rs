use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use roadsim::simulation::config::SimulationConfig;
use roadsim::simulation::controllers::CarPhysicsController;
use roadsim::simulation::error::ConfigError;
use roadsim::simulation::network::NeuronalNetwork;
use roadsim::simulation::scene::Scene;
use roadsim::simulation::scheduler::SimulationScheduler;
use tracing::{info, warn};

/// Headless road simulation of network driven cars.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network to seed the population with
    #[arg(short, long)]
    network: Option<PathBuf>,

    /// Where to write the network of the car that got farthest
    #[arg(long)]
    save_network: Option<PathBuf>,

    /// Overrides the population size
    #[arg(short, long)]
    population: Option<usize>,

    /// Overrides the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the frame limit
    #[arg(long)]
    max_frames: Option<u64>,

    /// Pace frames in wall-clock time instead of running flat out
    #[arg(long)]
    realtime: bool,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn main() -> Result<(), ConfigError> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load_from_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(population) = args.population {
        config.population = population;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(max_frames) = args.max_frames {
        config.max_frames = max_frames;
    }

    let base = args
        .network
        .as_ref()
        .map(NeuronalNetwork::load_from_file)
        .transpose()?;
    let mut scene = Scene::build_with_network(&config, base.as_ref())?;
    let mut scheduler = SimulationScheduler::with_time_scale(config.time_scale)?;
    scheduler.start(&mut scene.graph, true);

    let realtime = args.realtime && scheduler.interval(&scene.graph).is_some();
    if args.realtime && !realtime {
        warn!("time scale is zero, running without pacing");
    }

    let report_every = config.simulation_frequency.max(1.0) as u64;
    let mut faults = 0_usize;
    let mut last = Instant::now();

    while !scene.all_dead() && scene.graph.frame_count() < config.max_frames {
        let reports = if realtime {
            thread::sleep(Duration::from_millis(1));
            let now = Instant::now();
            let reports = scheduler.advance(&mut scene.graph, now - last);
            last = now;
            reports
        } else {
            vec![scheduler.step(&mut scene.graph)]
        };

        for report in &reports {
            faults += usize::from(!report.is_ok());
            if report.frame_count % report_every == 0 {
                info!(
                    frame = report.frame_count,
                    time = report.simulation_time,
                    alive = scene.alive_count(),
                    "progress"
                );
            }
        }
    }
    scheduler.stop();

    info!(
        frames = scene.graph.frame_count(),
        time = scene.graph.simulation_time(),
        alive = scene.alive_count(),
        faults,
        seed = scene.seed(),
        "run finished"
    );

    let Some(best) = scene.best_car() else {
        warn!("no cars were simulated");
        return Ok(());
    };
    if let Some(physics) = scene
        .graph
        .entity(best)
        .and_then(|entity| entity.controller::<CarPhysicsController>())
    {
        info!(
            car = %best,
            distance = physics.distance_traveled(),
            average_speed = physics.average_speed(),
            died_at = ?physics.time_of_death(),
            "best car"
        );
    }

    if let (Some(path), Some(network)) = (&args.save_network, scene.network(best)) {
        network.save_to_file(path)?;
        info!(path = %path.display(), "saved network");
    }

    Ok(())
}
