use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::batch::{Batch, MISSING_TOKENS};
use crate::error::{EtlError, Result};
use crate::normalize::normalize_column_name;

/// List the `.csv` files in `dir` whose names match `pattern`, sorted by
/// name. A missing directory or an empty result is not an error.
pub fn discover_files(dir: &Path, pattern: &Regex) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return found;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.to_lowercase().ends_with(".csv") && pattern.is_match(name) {
            found.push(path);
        }
    }
    found.sort();
    found
}

/// Read one delimited file into a `Batch`. Three on-disk shapes are
/// attempted in order, first success wins:
/// 1. quote-wrapped-per-line recovery (every line wrapped in one `"` pair)
/// 2. UTF-8
/// 3. Latin-1
/// All values are read as text; the missing tokens become null cells.
pub fn read_batch(path: &Path, delimiter: char) -> Result<Batch> {
    let bytes = std::fs::read(path)?;
    let latin1 = encoding_rs::mem::decode_latin1(&bytes);

    if let Some(first) = latin1.lines().next() {
        let first = first.trim();
        if first.len() >= 2 && first.starts_with('"') && first.ends_with('"') {
            let unwrapped: Vec<&str> = latin1
                .lines()
                .map(|line| {
                    let line = line.trim();
                    let line = line.strip_prefix('"').unwrap_or(line);
                    line.strip_suffix('"').unwrap_or(line)
                })
                .collect();
            if let Ok(batch) = parse_delimited(&unwrapped.join("\n"), delimiter) {
                return Ok(batch);
            }
        }
    }

    if let Ok(text) = std::str::from_utf8(&bytes) {
        if let Ok(batch) = parse_delimited(text, delimiter) {
            return Ok(batch);
        }
    }

    parse_delimited(&latin1, delimiter).map_err(|e| EtlError::Unreadable(e.to_string()))
}

fn parse_delimited(text: &str, delimiter: char) -> Result<Batch> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(text.as_bytes());
    let columns: Vec<String> = rdr
        .headers()?
        .iter()
        .map(normalize_column_name)
        .collect();
    let mut batch = Batch::new(columns);
    for result in rdr.records() {
        let record = result?;
        let cells = record
            .iter()
            .map(|v| {
                if MISSING_TOKENS.contains(&v) {
                    None
                } else {
                    Some(v.to_string())
                }
            })
            .collect();
        batch.push_row(cells);
    }
    Ok(batch)
}

/// Read a cleaned artifact back for loading. Cleaned files were written by
/// the pipeline, so this is strict: UTF-8 only, headers taken as-is.
pub fn read_cleaned(path: &Path, delimiter: char) -> Result<Batch> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .from_reader(std::io::BufReader::new(file));
    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut batch = Batch::new(columns);
    for result in rdr.records() {
        let record = result?;
        let cells = record
            .iter()
            .map(|v| {
                if v.is_empty() {
                    None
                } else {
                    Some(v.to_string())
                }
            })
            .collect();
        batch.push_row(cells);
    }
    Ok(batch)
}

pub fn write_batch(path: &Path, batch: &Batch, delimiter: char) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .from_path(path)?;
    wtr.write_record(&batch.columns)?;
    for row in &batch.rows {
        wtr.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

/// First `YYYY-MM-DD` occurrence in a file name, if any.
pub fn extract_file_date(name: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("static pattern"));
    re.find(name).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "Clientes-2026-01-20.csv",
            "Clientes-2026-01-19.csv",
            "Tarjetas-2026-01-19.csv",
            "notas.txt",
            "Clientes-resumen.csv",
        ] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        let re = Regex::new(r"^Clientes-\d{4}-\d{2}-\d{2}\.csv$").unwrap();
        let files = discover_files(dir.path(), &re);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Clientes-2026-01-19.csv", "Clientes-2026-01-20.csv"]);
    }

    #[test]
    fn test_discover_files_missing_dir_is_empty() {
        let re = Regex::new(r".*").unwrap();
        assert!(discover_files(Path::new("/nonexistent/dir"), &re).is_empty());
    }

    #[test]
    fn test_read_batch_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Clientes-2026-01-19.csv");
        std::fs::write(&path, "Cod Cliente;Nombre;DNI\nC001;José;12345678Z\n").unwrap();
        let batch = read_batch(&path, ';').unwrap();
        assert_eq!(batch.columns, vec!["cod_cliente", "nombre", "dni"]);
        assert_eq!(batch.get(0, "nombre"), Some("José"));
    }

    #[test]
    fn test_read_batch_latin1_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.csv");
        // "José" in Latin-1: 0xE9 is not valid UTF-8
        std::fs::write(&path, b"nombre;dni\nJos\xe9;12345678Z\n").unwrap();
        let batch = read_batch(&path, ';').unwrap();
        assert_eq!(batch.get(0, "nombre"), Some("José"));
    }

    #[test]
    fn test_read_batch_quote_wrapped_recovery() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.csv");
        std::fs::write(&path, "\"cod_cliente;nombre\"\n\"C001;Ana\"\n").unwrap();
        let batch = read_batch(&path, ';').unwrap();
        assert_eq!(batch.columns, vec!["cod_cliente", "nombre"]);
        assert_eq!(batch.get(0, "cod_cliente"), Some("C001"));
        assert_eq!(batch.get(0, "nombre"), Some("Ana"));
    }

    #[test]
    fn test_read_batch_null_tokens_become_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.csv");
        std::fs::write(&path, "a;b;c;d;e\nNULL;null;None;NA;;\n").unwrap();
        let batch = read_batch(&path, ';').unwrap();
        for col in ["a", "b", "c", "d", "e"] {
            assert_eq!(batch.get(0, col), None, "column {col}");
        }
    }

    #[test]
    fn test_write_then_read_cleaned_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut batch = Batch::new(vec!["cod_cliente".into(), "correo".into()]);
        batch.push_row(vec![Some("C001".into()), Some("a@b.es".into())]);
        batch.push_row(vec![Some("C002".into()), None]);
        write_batch(&path, &batch, ';').unwrap();
        let back = read_cleaned(&path, ';').unwrap();
        assert_eq!(back.columns, batch.columns);
        assert_eq!(back.get(0, "correo"), Some("a@b.es"));
        assert_eq!(back.get(1, "correo"), None);
    }

    #[test]
    fn test_extract_file_date() {
        assert_eq!(
            extract_file_date("Clientes-2026-01-19.csv").as_deref(),
            Some("2026-01-19")
        );
        assert_eq!(extract_file_date("Clientes.csv"), None);
    }
}
