//! Parses the command line arguments and runs one simulation.
//!
//! Basic usage, ten messages over a fairly hostile channel:
//!
//! ```cargo run -- --messages 10 --loss 0.2 --corrupt 0.2```

use clap::Parser;
use otis_core::{
    sim::{SimConfig, Simulation},
    Config,
};
use std::{
    fs::{create_dir_all, OpenOptions},
    process,
    sync::Arc,
};
use tracing_subscriber::FmtSubscriber;

/// Stores the different command line arguments.
#[derive(Parser)]
#[command(about = "Simulates a sliding-window transfer over an unreliable channel")]
struct Args {
    /// Number of messages the application hands down at the sender.
    #[arg(short, long, default_value_t = 10)]
    messages: u32,
    /// Probability that a transmission is lost in transit.
    #[arg(long, default_value_t = 0.0)]
    loss: f64,
    /// Probability that a transmission is corrupted in transit.
    #[arg(long, default_value_t = 0.0)]
    corrupt: f64,
    /// Mean simulated time between application messages.
    #[arg(long, default_value_t = 50.0)]
    mean_interarrival: f64,
    /// Sender window size; 1 gives stop-and-wait behavior.
    #[arg(short, long, default_value_t = 8)]
    window: u16,
    /// Retransmission timeout.
    #[arg(short, long, default_value_t = 30.0)]
    timeout: f64,
    /// Seed for the run's random source.
    #[arg(short, long, default_value_t = 1234)]
    seed: u64,
    /// Logging flag. Used to turn logging on or off.
    #[arg(short, long)]
    log: bool,
}

/// Parses command line arguments, runs the simulation they describe, and
/// prints the report.
pub fn run() {
    let cli = Args::parse();
    // Capture log flag for turning logging on or off
    if cli.log {
        initialize_logging();
    }

    let config = match Config::new(cli.window, cli.timeout) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };
    let sim = SimConfig {
        messages: cli.messages,
        loss: cli.loss,
        corrupt: cli.corrupt,
        mean_interarrival: cli.mean_interarrival,
        seed: cli.seed,
    };
    let simulation = match Simulation::new(config, sim) {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let summary = simulation.run();
    if summary.delivered != summary.sent {
        eprintln!(
            "warning: only {} of {} messages were delivered",
            summary.delivered.len(),
            summary.sent.len()
        );
    }
    println!("{}", summary.report);
}

/// Initializes logging. Only should be called once when the sim starts.
/// Writes JSON events to a dated log file under ./logs.
fn initialize_logging() {
    let main_path = "./logs";
    create_dir_all(main_path).unwrap();
    let file_path = format!(
        "{}/debug-{}.log",
        main_path,
        chrono::offset::Local::now().format("%y-%m-%d_%H-%M-%S")
    );
    let file = OpenOptions::new()
        .write(true)
        .append(true)
        .create(true)
        .open(file_path)
        .unwrap();
    let subscriber = FmtSubscriber::builder()
        .with_writer(Arc::new(file))
        .json()
        .finish();
    // set the global default so all events/logs go to the same subscriber
    // and subsequently the same file
    tracing::subscriber::set_global_default(subscriber).unwrap()
}
