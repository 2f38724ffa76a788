//! Traffic Scheduler CLI
//!
//! Drives the intersection engine on a tick timer and prints statistics.
//! `run` steps a single policy; `compare` steps all four policies in
//! lockstep against the same arrival stream.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use traffic_scheduler_core::{
    ComparisonMetric, DensityTier, Direction, PerformanceRating, Policy, PolicyComparison,
    Simulation, SimulationConfig, SpeedMultiplier, Statistics, TickDriver,
};

#[derive(Parser)]
#[command(name = "traffic-scheduler")]
#[command(about = "Four-way intersection scheduling simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Options shared by every subcommand
#[derive(clap::Args)]
struct RunArgs {
    /// Arrival density (low, medium, high)
    #[arg(short, long, default_value = "medium")]
    density: String,

    /// Number of ticks to simulate
    #[arg(short, long, default_value = "100")]
    ticks: u64,

    /// RNG seed
    #[arg(short, long, default_value = "12345")]
    seed: u64,

    /// Tick speed multiplier for --realtime, in [0.5, 3.0]
    #[arg(long, default_value = "1.0")]
    speed: f64,

    /// Sleep one tick period between steps
    #[arg(long)]
    realtime: bool,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one scheduling policy
    Run {
        /// Policy (round_robin, priority, sjn, hybrid)
        #[arg(short, long, default_value = "round_robin")]
        policy: String,

        #[command(flatten)]
        args: RunArgs,
    },

    /// Simulate all four policies side by side
    Compare {
        #[command(flatten)]
        args: RunArgs,
    },
}

fn parse_level(s: &str) -> Result<Level> {
    match s {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {}", s),
    }
}

/// Optional wall-clock pacing
fn make_driver(args: &RunArgs) -> Result<Option<TickDriver>> {
    let speed = SpeedMultiplier::new(args.speed)?;
    Ok(args.realtime.then(|| TickDriver::new(speed)))
}

fn print_statistics(stats: &Statistics) {
    let m = &stats.metrics;
    println!("  Throughput:        {:>8.2} veh/min", m.throughput);
    println!("  Avg waiting:       {:>8.2} ticks (max {})", m.avg_waiting_time, m.max_waiting_time);
    println!("  Avg response:      {:>8.2} ticks", m.avg_response_time);
    println!("  Avg turnaround:    {:>8.2} ticks", m.avg_turnaround_time);
    println!("  Emergency delay:   {:>8.2} ticks", m.emergency_delay);
    println!("  Utilization:       {:>8.2} %", m.utilization);
    println!("  Efficiency:        {:>8.2} %", stats.efficiency);
    println!(
        "  Vehicles:          {} generated, {} processed, {} waiting, {} dropped",
        stats.total_generated, stats.total_processed, stats.total_waiting, stats.dropped_on_overflow
    );
    println!("  Direction switches: {}", stats.direction_switches);
}

fn run_single(policy: Policy, density: DensityTier, args: &RunArgs) -> Result<()> {
    let config = SimulationConfig {
        rng_seed: args.seed,
        ..SimulationConfig::default()
    };
    let mut simulation = Simulation::new(config)?;
    let mut driver = make_driver(args)?;

    info!("Running {} at {} density for {} ticks", policy.label(), density, args.ticks);

    for _ in 0..args.ticks {
        if let Some(driver) = driver.as_mut() {
            driver.wait();
        }
        let result = simulation.step(policy, density);
        if args.realtime && !args.json {
            let queues: Vec<String> = Direction::ALL
                .iter()
                .map(|&d| format!("{}={}", d, simulation.state().queue_len(d)))
                .collect();
            println!(
                "t={:>4} green={:<5} left={:>2} {}",
                result.tick,
                result.active_direction,
                result.time_remaining,
                queues.join(" ")
            );
        }
    }

    let report = simulation.export_report();
    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("\n{} ({} density, t={})", policy.label(), density, report.time);
    println!("{:-<60}", "");
    print_statistics(&report.statistics);
    for (direction, processed) in &report.processed {
        println!("  Processed {:<5}:   {}", direction, processed);
    }

    Ok(())
}

fn run_comparison(density: DensityTier, args: &RunArgs) -> Result<()> {
    let config = SimulationConfig {
        rng_seed: args.seed,
        ..SimulationConfig::default()
    };
    let mut comparison = PolicyComparison::new(config)?;
    let mut driver = make_driver(args)?;

    info!("Comparing all policies at {} density for {} ticks", density, args.ticks);

    for _ in 0..args.ticks {
        if let Some(driver) = driver.as_mut() {
            driver.wait();
        }
        comparison.step(density);
    }

    if args.json {
        let reports: Vec<_> = comparison
            .engines()
            .map(|(_, engine)| engine.export_report())
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("\nPolicy comparison ({} density, t={})", density, comparison.time());
    println!("{:-<100}", "");
    print!("{:<22}", "Metric");
    for policy in Policy::ALL {
        print!("{:>20}", policy.label());
    }
    println!();
    println!("{:-<100}", "");

    let statistics = comparison.statistics();
    for metric in ComparisonMetric::ALL {
        print!("{:<22}", metric.label());
        for (_, stats) in &statistics {
            let value = metric.value(stats);
            let cell = format!("{:.2} ({})", value, PerformanceRating::rate(metric, value));
            print!("{:>20}", cell);
        }
        println!();
    }

    println!("{:-<100}", "");
    for metric in ComparisonMetric::ALL {
        println!(
            "Best {:<20} {}",
            format!("{}:", metric.label()),
            comparison.best_performer(metric).label()
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = parse_level(&cli.log_level)?;
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run { policy, args } => {
            let policy: Policy = policy.parse()?;
            let density: DensityTier = args.density.parse()?;
            run_single(policy, density, &args)
        }
        Commands::Compare { args } => {
            let density: DensityTier = args.density.parse()?;
            run_comparison(density, &args)
        }
    }
}
