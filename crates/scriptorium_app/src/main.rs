mod app;
mod cli;
mod effects;
mod persistence;
mod render;
mod selection;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    client_logging::initialize(args.log_destination());
    app::run(args)
}
