use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime};

use crate::check;
use crate::config::Config;

const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Runs the check once per day at the configured wall-clock time, polling
/// at coarse granularity in between. Runs never overlap, and a run missed
/// while the process was down is not made up.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        time = %config.schedule_time.format("%H:%M"),
        "price watch scheduler started"
    );

    let mut next_run = next_occurrence(Local::now().naive_local(), config.schedule_time);
    tracing::info!(next = %next_run, "next scheduled check");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("scheduler stopped");
                return Ok(());
            }
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }

        if Local::now().naive_local() < next_run {
            continue;
        }

        if let Err(err) = check::run(config).await {
            tracing::error!(?err, "scheduled price check failed");
        }

        next_run = next_occurrence(Local::now().naive_local(), config.schedule_time);
        tracing::info!(next = %next_run, "next scheduled check");
    }
}

/// First instant at time `at` strictly after `now`.
fn next_occurrence(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike as _};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn nine() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    }

    #[test]
    fn before_the_scheduled_time_runs_today() {
        let next = next_occurrence(at(7, 30, 0), nine());
        assert_eq!(next, at(9, 0, 0));
    }

    #[test]
    fn after_the_scheduled_time_runs_tomorrow() {
        let next = next_occurrence(at(9, 0, 1), nine());
        assert_eq!(next.date(), at(0, 0, 0).date() + chrono::Duration::days(1));
        assert_eq!(next.hour(), 9);
    }

    #[test]
    fn exactly_at_the_scheduled_time_rolls_to_tomorrow() {
        let next = next_occurrence(at(9, 0, 0), nine());
        assert!(next > at(9, 0, 0));
        assert_eq!(next.date(), at(0, 0, 0).date() + chrono::Duration::days(1));
    }
}
