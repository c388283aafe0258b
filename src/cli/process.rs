use crate::error::{EtlError, Result};
use crate::pipeline::{run_pipeline, RecordType, RunStats};
use crate::settings::load_settings;

pub fn print_stats(label: &str, stats: &RunStats) {
    println!("{label}");
    println!("  files processed: {}", stats.files_processed);
    println!("  rows read:       {}", stats.rows_read);
    println!("  rows processed:  {}", stats.rows_processed);
    println!("  rows rejected:   {}", stats.rows_rejected);
}

pub fn run(record_type: &str) -> Result<()> {
    let kind = RecordType::from_key(record_type)
        .ok_or_else(|| EtlError::UnknownRecordType(record_type.to_string()))?;
    let settings = load_settings()?;
    let stats = run_pipeline(kind, &settings)?;
    print_stats(kind.name(), &stats);
    Ok(())
}
