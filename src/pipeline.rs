use std::path::Path;

use colored::Colorize;
use regex::Regex;

use crate::anonymize::{hash_with_salt, mask_card};
use crate::batch::Batch;
use crate::error::{EtlError, Result};
use crate::ingest::{discover_files, extract_file_date, read_batch, write_batch};
use crate::normalize;
use crate::settings::Settings;
use crate::validate;

/// Counters for one pipeline run. Reset per invocation, never shared.
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub rows_read: usize,
    pub rows_processed: usize,
    pub rows_rejected: usize,
    pub files_processed: usize,
}

// ---------------------------------------------------------------------------
// Record types — enum dispatch with per-type capability tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordType {
    Clientes,
    Tarjetas,
}

type Normalizer = fn(&str) -> String;
type Validator = fn(&str) -> bool;

const CLIENT_NORMALIZERS: &[(&str, Normalizer)] = &[
    ("nombre", normalize::normalize_name),
    ("apellido1", normalize::normalize_surname),
    ("apellido2", normalize::normalize_surname),
    ("dni", normalize::normalize_dni),
    ("correo", normalize::normalize_email),
    ("telefono", normalize::digits_only),
];

// Card normalizers write to `<col>_limpio`; the raw columns stay untouched
// so the export projection can drop them in one place.
const CARD_NORMALIZERS: &[(&str, Normalizer)] = &[
    ("numero_tarjeta", normalize::digits_only),
    ("cvv", normalize::digits_only),
    ("fecha_exp", normalize::normalize_expiry),
];

// (source column, flag column, predicate)
const CLIENT_VALIDATORS: &[(&str, &str, Validator)] = &[
    ("dni", "dni_valido", validate::validate_dni),
    ("telefono", "telefono_valido", validate::validate_phone),
    ("correo", "correo_valido", validate::validate_email),
];

const CARD_VALIDATORS: &[(&str, &str, Validator)] =
    &[("fecha_exp", "fecha_exp_valida", validate::validate_expiry)];

/// Card/CVV columns that must never reach any exported artifact, cleaned
/// or rejected.
const CARD_SENSITIVE: &[&str] = &[
    "numero_tarjeta",
    "numero_tarjeta_limpio",
    "cvv",
    "cvv_limpio",
];

impl RecordType {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "clientes" | "clients" => Some(Self::Clientes),
            "tarjetas" | "cards" => Some(Self::Tarjetas),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Clientes => "Clientes",
            Self::Tarjetas => "Tarjetas",
        }
    }

    pub fn pattern<'a>(&self, settings: &'a Settings) -> &'a str {
        match self {
            Self::Clientes => &settings.clients_pattern,
            Self::Tarjetas => &settings.cards_pattern,
        }
    }

    pub fn mandatory<'a>(&self, settings: &'a Settings) -> &'a [String] {
        match self {
            Self::Clientes => &settings.required_clients,
            Self::Tarjetas => &settings.required_cards,
        }
    }

    fn normalize(&self, batch: &mut Batch) {
        match self {
            Self::Clientes => normalize_in_place(batch, CLIENT_NORMALIZERS),
            Self::Tarjetas => normalize_derived(batch, CARD_NORMALIZERS),
        }
    }

    fn validate(&self, batch: &mut Batch) {
        let table = match self {
            Self::Clientes => CLIENT_VALIDATORS,
            Self::Tarjetas => CARD_VALIDATORS,
        };
        add_flags(batch, table);
    }

    fn anonymize(&self, batch: &mut Batch, salt: &str) {
        match self {
            Self::Clientes => {
                if let Some(src) = batch.col("dni") {
                    let dst = batch.add_column("dni_hash");
                    for row in &mut batch.rows {
                        row[dst] = row[src].as_deref().and_then(|v| hash_with_salt(salt, v));
                    }
                }
            }
            Self::Tarjetas => {
                let card_col = if batch.has_col("numero_tarjeta_limpio") {
                    "numero_tarjeta_limpio"
                } else {
                    "numero_tarjeta"
                };
                if let Some(src) = batch.col(card_col) {
                    let masked = batch.add_column("numero_tarjeta_masked");
                    let hashed = batch.add_column("numero_tarjeta_hash");
                    for row in &mut batch.rows {
                        row[masked] = row[src].as_deref().and_then(mask_card);
                        row[hashed] = row[src].as_deref().and_then(|v| hash_with_salt(salt, v));
                    }
                }
                let cvv_col = if batch.has_col("cvv_limpio") { "cvv_limpio" } else { "cvv" };
                if let Some(src) = batch.col(cvv_col) {
                    let dst = batch.add_column("cvv_hash");
                    for row in &mut batch.rows {
                        row[dst] = row[src].as_deref().and_then(|v| hash_with_salt(salt, v));
                    }
                }
            }
        }
    }

    fn cleaned_drop(&self) -> Vec<&'static str> {
        match self {
            Self::Clientes => vec!["dni_valido", "telefono_valido", "correo_valido", "motivo_rechazo"],
            Self::Tarjetas => {
                let mut cols = CARD_SENSITIVE.to_vec();
                cols.extend(["fecha_exp_valida", "motivo_rechazo"]);
                cols
            }
        }
    }

    fn rejected_drop(&self) -> &'static [&'static str] {
        match self {
            Self::Clientes => &[],
            Self::Tarjetas => CARD_SENSITIVE,
        }
    }
}

fn normalize_in_place(batch: &mut Batch, table: &[(&str, Normalizer)]) {
    for (col, f) in table {
        if let Some(idx) = batch.col(col) {
            for row in &mut batch.rows {
                if let Some(v) = &row[idx] {
                    if !v.is_empty() {
                        row[idx] = Some(f(v));
                    }
                }
            }
        }
    }
}

fn normalize_derived(batch: &mut Batch, table: &[(&str, Normalizer)]) {
    for (col, f) in table {
        if let Some(src) = batch.col(col) {
            let dst = batch.add_column(&format!("{col}_limpio"));
            for row in &mut batch.rows {
                row[dst] = match &row[src] {
                    Some(v) if !v.is_empty() => Some(f(v)),
                    _ => None,
                };
            }
        }
    }
}

fn add_flags(batch: &mut Batch, table: &[(&str, &str, Validator)]) {
    for (src_col, flag_col, pred) in table {
        if let Some(src) = batch.col(src_col) {
            let dst = batch.add_column(flag_col);
            for row in &mut batch.rows {
                let ok = row[src].as_deref().is_some_and(|v| !v.is_empty() && pred(v));
                row[dst] = Some(if ok { "true" } else { "false" }.to_string());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mandatory-field split
// ---------------------------------------------------------------------------

/// Partition a batch by mandatory fields. Every row lands in exactly one
/// side, original order preserved. Rejected rows get a `motivo_rechazo`
/// built from `"<field> vacío"` clauses joined by `"; "` in declaration
/// order. Mandatory columns absent from the file are not checked.
pub fn split_mandatory(mut batch: Batch, fields: &[String]) -> (Batch, Batch) {
    let present: Vec<(usize, String)> = fields
        .iter()
        .filter_map(|f| batch.col(f).map(|i| (i, f.clone())))
        .collect();
    let motivo = batch.add_column("motivo_rechazo");

    let mut valid = Batch::new(batch.columns.clone());
    let mut rejected = Batch::new(batch.columns.clone());
    for mut row in batch.rows {
        let missing: Vec<&str> = present
            .iter()
            .filter(|(i, _)| row[*i].as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(_, f)| f.as_str())
            .collect();
        if missing.is_empty() {
            valid.rows.push(row);
        } else {
            let reason = missing
                .iter()
                .map(|f| format!("{f} vacío"))
                .collect::<Vec<_>>()
                .join("; ");
            row[motivo] = Some(reason);
            rejected.rows.push(row);
        }
    }
    (valid, rejected)
}

// ---------------------------------------------------------------------------
// Per-type pipeline run
// ---------------------------------------------------------------------------

/// Process every input file of one record type: read, clean, normalize,
/// validate, split, anonymize, export. Unreadable files are skipped with a
/// warning; the run never aborts on a single file.
pub fn run_pipeline(kind: RecordType, settings: &Settings) -> Result<RunStats> {
    let pattern = Regex::new(kind.pattern(settings)).map_err(|e| {
        EtlError::Settings(format!("bad file pattern for {}: {e}", kind.name()))
    })?;

    let mut stats = RunStats::default();
    let files = discover_files(&settings.input_dir(), &pattern);
    if files.is_empty() {
        println!("{}", format!("No {} files to process", kind.name()).yellow());
        return Ok(stats);
    }

    for file in &files {
        if let Err(e) = process_file(kind, settings, file, &mut stats) {
            let name = file.file_name().and_then(|n| n.to_str()).unwrap_or("?");
            eprintln!("{}", format!("Skipping {name}: {e}").yellow());
        }
    }
    Ok(stats)
}

fn process_file(
    kind: RecordType,
    settings: &Settings,
    path: &Path,
    stats: &mut RunStats,
) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let mut batch = read_batch(path, settings.delimiter)?;
    if batch.is_empty() {
        eprintln!("{}", format!("{name} is empty, nothing to do").yellow());
        return Ok(());
    }
    stats.rows_read += batch.len();

    batch.trim_cells();
    kind.normalize(&mut batch);
    kind.validate(&mut batch);

    let (mut valid, rejected) = split_mandatory(batch, kind.mandatory(settings));
    stats.rows_rejected += rejected.len();

    kind.anonymize(&mut valid, &settings.hash_salt);

    let date = extract_file_date(&name)
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());

    if !valid.is_empty() {
        std::fs::create_dir_all(settings.output_dir())?;
        let cleaned = valid.without_columns(&kind.cleaned_drop());
        let out = settings
            .output_dir()
            .join(format!("{}-{date}.cleaned.csv", kind.name()));
        write_batch(&out, &cleaned, settings.delimiter)?;
    }
    if !rejected.is_empty() {
        std::fs::create_dir_all(settings.errors_dir())?;
        let audit = rejected.without_columns(kind.rejected_drop());
        let out = settings
            .errors_dir()
            .join(format!("{}-{date}.rejected.csv", kind.name()));
        write_batch(&out, &audit, settings.delimiter)?;
    }

    stats.rows_processed += valid.len();
    stats.files_processed += 1;
    Ok(())
}
