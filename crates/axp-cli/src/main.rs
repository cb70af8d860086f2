use clap::Parser;

mod cli;
mod env;
mod workflow;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    workflow::run(cli)
}
