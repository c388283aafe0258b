use crate::db::{get_connection, init_db, probe};
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings()?;
    let db_path = settings.db_path();

    println!("Data dir:   {}", settings.data_dir);
    println!("Input:      {}", settings.input_dir().display());
    println!("Output:     {}", settings.output_dir().display());
    println!("Errors:     {}", settings.errors_dir().display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let conn = get_connection(&db_path)?;
        println!("Connected:  {}", if probe(&conn) { "yes" } else { "no" });
        init_db(&conn)?;

        let clients: i64 = conn.query_row("SELECT count(*) FROM clients", [], |r| r.get(0))?;
        let cards: i64 = conn.query_row("SELECT count(*) FROM tarjetas", [], |r| r.get(0))?;
        println!();
        println!("Clients:    {clients}");
        println!("Cards:      {cards}");
    } else {
        println!();
        println!("Database not found. Run `depura init` to set up.");
    }

    Ok(())
}
