use std::path::PathBuf;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings()?;
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }

    let base = PathBuf::from(&settings.data_dir);
    for dir in [settings.input_dir(), settings.output_dir(), settings.errors_dir()] {
        std::fs::create_dir_all(dir)?;
    }

    let conn = get_connection(&settings.db_path())?;
    init_db(&conn)?;
    save_settings(&settings)?;

    println!("Initialized {}", base.display());
    println!("  input:    {}", settings.input_dir().display());
    println!("  output:   {}", settings.output_dir().display());
    println!("  errors:   {}", settings.errors_dir().display());
    println!("  database: {}", settings.db_path().display());
    println!();
    println!("Drop Clientes-YYYY-MM-DD.csv / Tarjetas-YYYY-MM-DD.csv files into the input directory and run `depura run`.");
    Ok(())
}
