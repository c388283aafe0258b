use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{EtlError, Result};

/// Everything the pipeline is parameterized by: directories, file-name
/// patterns, delimiter, mandatory fields and the hash salt. Nothing in the
/// pipeline logic itself is hard-coded to these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_clients_pattern")]
    pub clients_pattern: String,
    #[serde(default = "default_cards_pattern")]
    pub cards_pattern: String,
    /// Declaration order is canonical: rejection reasons are joined in it.
    #[serde(default = "default_required_clients")]
    pub required_clients: Vec<String>,
    #[serde(default = "default_required_cards")]
    pub required_cards: Vec<String>,
    #[serde(default = "default_hash_salt")]
    pub hash_salt: String,
    /// Daily run time for `depura watch`, 24h HH:MM.
    #[serde(default = "default_schedule_time")]
    pub schedule_time: String,
}

fn default_delimiter() -> char {
    ';'
}

fn default_clients_pattern() -> String {
    r"^Clientes-\d{4}-\d{2}-\d{2}\.csv$".to_string()
}

fn default_cards_pattern() -> String {
    r"^Tarjetas-\d{4}-\d{2}-\d{2}\.csv$".to_string()
}

fn default_required_clients() -> Vec<String> {
    vec!["cod_cliente".into(), "nombre".into(), "correo".into()]
}

fn default_required_cards() -> Vec<String> {
    vec!["cod_cliente".into(), "numero_tarjeta".into()]
}

fn default_hash_salt() -> String {
    std::env::var("DEPURA_HASH_SALT").unwrap_or_else(|_| "etl_salt_secret".to_string())
}

fn default_schedule_time() -> String {
    "15:00".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            delimiter: default_delimiter(),
            clients_pattern: default_clients_pattern(),
            cards_pattern: default_cards_pattern(),
            required_clients: default_required_clients(),
            required_cards: default_required_cards(),
            hash_salt: default_hash_salt(),
            schedule_time: default_schedule_time(),
        }
    }
}

impl Settings {
    pub fn input_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("input")
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("output")
    }

    pub fn errors_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("errors")
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("depura.db")
    }

    /// The CSV reader takes the delimiter as a single byte, so anything
    /// outside ASCII would be silently truncated and misparse every file.
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(EtlError::Settings(format!(
                "delimiter must be an ASCII character, got {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("depura")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("depura")
}

pub fn load_settings() -> Result<Settings> {
    let path = settings_path();
    let settings: Settings = if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    };
    settings.validate()?;
    Ok(settings)
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| EtlError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
