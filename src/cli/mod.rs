pub mod init;
pub mod load;
pub mod process;
pub mod run;
pub mod status;
pub mod watch;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "depura",
    about = "Clean, validate, anonymize and load customer/card CSV drops."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up depura: choose a data directory and initialize the database.
    Init {
        /// Path for depura data (default: ~/Documents/depura)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Run the full sequence: clients pipeline, cards pipeline, load.
    Run {
        /// Process files but skip the database load
        #[arg(long = "no-load")]
        no_load: bool,
    },
    /// Process one record type: clientes or tarjetas.
    Process {
        /// Record type key (clientes, tarjetas)
        record_type: String,
    },
    /// Load existing cleaned files into the database.
    Load,
    /// Show settings, database size and table counts.
    Status,
    /// Run the full sequence on a schedule until interrupted.
    Watch {
        /// Daily run time, 24h HH:MM (default: settings.schedule_time)
        #[arg(long)]
        time: Option<String>,
        /// Run every N minutes instead of daily
        #[arg(long)]
        every: Option<u64>,
    },
}
