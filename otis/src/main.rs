//! Command-line driver for OTIS. Parses the run parameters, wires up one
//! simulation, and prints the statistics report.

mod cli;

fn main() {
    cli::run();
}
