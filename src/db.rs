use std::collections::HashSet;
use std::path::Path;

use rusqlite::Connection;

use crate::batch::Batch;
use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS clients (
    cod_cliente TEXT PRIMARY KEY,
    nombre TEXT,
    apellido1 TEXT,
    apellido2 TEXT,
    dni TEXT UNIQUE,
    dni_hash TEXT,
    correo TEXT,
    telefono TEXT,
    fecha_procesado TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS tarjetas (
    id INTEGER PRIMARY KEY,
    cod_cliente TEXT REFERENCES clients(cod_cliente),
    numero_tarjeta_hash TEXT,
    numero_tarjeta_masked TEXT,
    fecha_exp TEXT,
    cvv_hash TEXT,
    fecha_procesado TEXT DEFAULT (datetime('now'))
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Cheap connectivity probe.
pub fn probe(conn: &Connection) -> bool {
    conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0)).is_ok()
}

/// Business keys already present in `clients`. Defined for callers that
/// want to pre-check; the default load flow does not deduplicate.
#[allow(dead_code)]
pub fn existing_client_codes(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT cod_cliente FROM clients")?;
    let codes = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<HashSet<_>, _>>()?;
    Ok(codes)
}

/// Append one cleaned client batch inside a single transaction. Missing
/// columns insert as NULL; a constraint violation rolls the file back.
pub fn insert_clients(conn: &mut Connection, batch: &Batch) -> Result<usize> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO clients (cod_cliente, nombre, apellido1, apellido2, dni, dni_hash, correo, telefono) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for row in 0..batch.len() {
            stmt.execute(rusqlite::params![
                batch.get(row, "cod_cliente"),
                batch.get(row, "nombre"),
                batch.get(row, "apellido1"),
                batch.get(row, "apellido2"),
                batch.get(row, "dni"),
                batch.get(row, "dni_hash"),
                batch.get(row, "correo"),
                batch.get(row, "telefono"),
            ])?;
        }
    }
    tx.commit()?;
    Ok(batch.len())
}

/// Append one cleaned card batch inside a single transaction. Only the
/// anonymized card representations ever reach the store.
pub fn insert_cards(conn: &mut Connection, batch: &Batch) -> Result<usize> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO tarjetas (cod_cliente, numero_tarjeta_hash, numero_tarjeta_masked, fecha_exp, cvv_hash) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for row in 0..batch.len() {
            stmt.execute(rusqlite::params![
                batch.get(row, "cod_cliente"),
                batch.get(row, "numero_tarjeta_hash"),
                batch.get(row, "numero_tarjeta_masked"),
                batch.get(row, "fecha_exp"),
                batch.get(row, "cvv_hash"),
            ])?;
        }
    }
    tx.commit()?;
    Ok(batch.len())
}
