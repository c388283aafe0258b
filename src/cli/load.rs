use colored::Colorize;

use crate::error::Result;
use crate::load::run_load;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings()?;
    let stats = run_load(&settings);
    println!("{} clients inserted, {} cards inserted", stats.clients_inserted, stats.cards_inserted);
    for error in &stats.errors {
        eprintln!("{}", error.red());
    }
    Ok(())
}
