use std::time::Instant;

use colored::Colorize;

use crate::cli::process::print_stats;
use crate::error::Result;
use crate::fmt::format_duration;
use crate::load::{run_load, LoadStats};
use crate::pipeline::{run_pipeline, RecordType};
use crate::settings::{load_settings, Settings};

fn print_load(stats: &LoadStats) {
    println!("Load");
    println!("  clients inserted: {}", stats.clients_inserted);
    println!("  cards inserted:   {}", stats.cards_inserted);
    for error in &stats.errors {
        eprintln!("  {}", error.red());
    }
}

/// Full sequence: clients pipeline, cards pipeline, then the load stage.
/// Always prints a summary, even when parts of the run failed.
pub fn execute(settings: &Settings, load: bool) -> Result<()> {
    let started = Instant::now();

    let clients = run_pipeline(RecordType::Clientes, settings)?;
    let cards = run_pipeline(RecordType::Tarjetas, settings)?;

    println!();
    print_stats("Clientes", &clients);
    print_stats("Tarjetas", &cards);

    if load {
        let load_stats = run_load(settings);
        print_load(&load_stats);
    }

    println!("Elapsed: {}", format_duration(started.elapsed().as_secs_f64()));
    Ok(())
}

pub fn run(no_load: bool) -> Result<()> {
    let settings = load_settings()?;
    execute(&settings, !no_load)
}
