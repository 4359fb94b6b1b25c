use clap::Parser;
use portfolio_eval::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
