mod anonymize;
mod batch;
mod cli;
mod db;
mod error;
mod fmt;
mod ingest;
mod load;
mod normalize;
mod pipeline;
mod settings;
mod validate;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Run { no_load } => cli::run::run(no_load),
        Commands::Process { record_type } => cli::process::run(&record_type),
        Commands::Load => cli::load::run(),
        Commands::Status => cli::status::run(),
        Commands::Watch { time, every } => cli::watch::run(time, every),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
