use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    demo::{self, DemoArgs},
    view::{self, ViewArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "netview", about = "Partitioned network viewer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// View a network description on a group of simulated ranks.
    View(ViewArgs),
    /// Generate a chain network description.
    Demo(DemoArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::View(args) => view::run(&args),
        Command::Demo(args) => demo::run(&args),
    }
}
