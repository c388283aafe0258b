use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use colored::Colorize;

use crate::cli::run::execute;
use crate::error::{EtlError, Result};
use crate::settings::load_settings;

const TICK: Duration = Duration::from_secs(60);

/// Serialized scheduler loop: one tick at a time, the next check only
/// happens after the previous run finished and the sleep elapsed. Ctrl+C
/// between ticks stops the process; a file is never interrupted mid-row.
pub fn run(time: Option<String>, every: Option<u64>) -> Result<()> {
    let settings = load_settings()?;

    if let Some(minutes) = every {
        println!("Running every {minutes} minutes. Press Ctrl+C to stop.");
        loop {
            tick(&settings);
            std::thread::sleep(Duration::from_secs(minutes.max(1) * 60));
        }
    }

    let at = time.unwrap_or_else(|| settings.schedule_time.clone());
    let target = NaiveTime::parse_from_str(&at, "%H:%M")
        .map_err(|e| EtlError::Settings(format!("bad schedule time {at:?}: {e}")))?;
    println!("Running daily at {at}. Press Ctrl+C to stop.");
    let mut last_run_date: Option<NaiveDate> = None;
    loop {
        let now = chrono::Local::now().naive_local();
        if should_fire(now, target, last_run_date) {
            tick(&settings);
            last_run_date = Some(now.date());
        }
        std::thread::sleep(TICK);
    }
}

/// A run is due once the target time has passed and today's run has not
/// happened yet. `>=` matters: checks happen roughly once a minute but
/// drift with run duration, so a check landing after the target minute
/// must still fire (late) rather than wait for the next day.
fn should_fire(now: NaiveDateTime, at: NaiveTime, last_run_date: Option<NaiveDate>) -> bool {
    now.time() >= at && last_run_date != Some(now.date())
}

fn tick(settings: &crate::settings::Settings) {
    println!("Scheduled run at {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    if let Err(e) = execute(settings, true) {
        eprintln!("{}", format!("Scheduled run failed: {e}").red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn on(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_should_fire_at_or_after_target() {
        assert!(!should_fire(on(19, 14, 59), at(15, 0), None));
        assert!(should_fire(on(19, 15, 0), at(15, 0), None));
        // a check delayed past the target minute still fires that day
        assert!(should_fire(on(19, 15, 1), at(15, 0), None));
        assert!(should_fire(on(19, 16, 7), at(15, 0), None));
    }

    #[test]
    fn test_should_fire_once_per_day() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();
        assert!(!should_fire(on(19, 15, 1), at(15, 0), Some(today)));
        assert!(!should_fire(on(19, 23, 59), at(15, 0), Some(today)));
        // next day is due again
        assert!(should_fire(on(20, 15, 0), at(15, 0), Some(today)));
    }
}
