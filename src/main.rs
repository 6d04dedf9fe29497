/// Obsbench - load generation and diagram tooling for the observability demo stack.
///
/// A CLI that drives synthetic HTTP traffic against the demo service and
/// renders the architecture diagram of its observability stack.
mod cli;
mod diagram;
mod error;
mod http;
mod loadgen;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
