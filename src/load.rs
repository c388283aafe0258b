use std::path::Path;

use regex::Regex;

use crate::batch::Batch;
use crate::db;
use crate::error::Result;
use crate::ingest::{discover_files, read_cleaned};
use crate::pipeline::RecordType;
use crate::settings::Settings;

/// Outcome of one load run. Per-file failures are recorded, never fatal:
/// the caller always gets partial results plus the error list.
#[derive(Debug, Default)]
pub struct LoadStats {
    pub clients_inserted: usize,
    pub cards_inserted: usize,
    pub errors: Vec<String>,
}

fn cleaned_pattern(kind: RecordType) -> Regex {
    Regex::new(&format!(
        r"^{}-\d{{4}}-\d{{2}}-\d{{2}}\.cleaned\.csv$",
        kind.name()
    ))
    .expect("static pattern")
}

fn read_nonempty(path: &Path, delimiter: char) -> Result<Option<Batch>> {
    let batch = read_cleaned(path, delimiter)?;
    if batch.is_empty() {
        return Ok(None);
    }
    Ok(Some(batch))
}

/// Load every cleaned artifact into the store. Clients are inserted before
/// any card file; cards are skipped entirely when this run inserted zero
/// clients (referential guard). Inserts are append-only: re-running against
/// the same files duplicates rows unless a uniqueness constraint rejects
/// them, in which case the failure lands in the error list.
pub fn run_load(settings: &Settings) -> LoadStats {
    let mut stats = LoadStats::default();

    let mut conn = match db::get_connection(&settings.db_path()) {
        Ok(conn) => conn,
        Err(e) => {
            stats.errors.push(format!("could not open database: {e}"));
            return stats;
        }
    };
    if !db::probe(&conn) {
        stats.errors.push("database connectivity probe failed".to_string());
        return stats;
    }
    if let Err(e) = db::init_db(&conn) {
        stats.errors.push(format!("could not create tables: {e}"));
        return stats;
    }

    let output_dir = settings.output_dir();
    let client_files = discover_files(&output_dir, &cleaned_pattern(RecordType::Clientes));
    let card_files = discover_files(&output_dir, &cleaned_pattern(RecordType::Tarjetas));

    for file in &client_files {
        let name = file.file_name().and_then(|n| n.to_str()).unwrap_or("?");
        match read_nonempty(file, settings.delimiter)
            .and_then(|batch| match batch {
                Some(batch) => db::insert_clients(&mut conn, &batch),
                None => Ok(0),
            }) {
            Ok(n) => stats.clients_inserted += n,
            Err(e) => stats.errors.push(format!("{name}: {e}")),
        }
    }

    if stats.clients_inserted == 0 {
        return stats;
    }

    for file in &card_files {
        let name = file.file_name().and_then(|n| n.to_str()).unwrap_or("?");
        match read_nonempty(file, settings.delimiter)
            .and_then(|batch| match batch {
                Some(batch) => db::insert_cards(&mut conn, &batch),
                None => Ok(0),
            }) {
            Ok(n) => stats.cards_inserted += n,
            Err(e) => stats.errors.push(format!("{name}: {e}")),
        }
    }

    stats
}
