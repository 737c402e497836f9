//! Activity chart data.
//!
//! The dashboard has no activity history to chart, so the series are
//! synthesized. Values are random within fixed bands; only the time axis is
//! real.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use rand::Rng;
use serde::Serialize;

use userdash_core::Timestamp;

use crate::models::UserStats;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One month on the activity chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    /// Short month name (`Jan`..`Dec`).
    pub name: &'static str,
    pub activity: u32,
    pub new_users: u32,
    pub active_users: u32,
    /// Midnight UTC on the first of the month.
    pub timestamp: Timestamp,
}

/// One day on the weekly activity chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub active_users: usize,
    pub total_users: usize,
}

/// Twelve monthly points, oldest first, ending with the month of `now`.
pub fn monthly<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> Vec<MonthlyPoint> {
    let Some(this_month) = now.date_naive().with_day(1) else {
        return Vec::new();
    };

    (0..12u32)
        .rev()
        .filter_map(|back| this_month.checked_sub_months(Months::new(back)))
        .filter_map(|first| {
            let midnight = first.and_hms_opt(0, 0, 0)?.and_utc();
            Some(MonthlyPoint {
                name: MONTH_NAMES.get(first.month0() as usize).copied()?,
                activity: rng.random_range(500..1500),
                new_users: rng.random_range(50..250),
                active_users: rng.random_range(200..1000),
                timestamp: Timestamp::from_datetime(midnight),
            })
        })
        .collect()
}

/// Seven daily points, oldest first, ending with `today`.
///
/// Earlier days are synthesized; `today` reports the live counts from
/// `stats`.
pub fn weekly<R: Rng + ?Sized>(today: NaiveDate, stats: &UserStats, rng: &mut R) -> Vec<DailyPoint> {
    (0..7u64)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            if date == today {
                DailyPoint {
                    date,
                    active_users: stats.active,
                    total_users: stats.total,
                }
            } else {
                DailyPoint {
                    date,
                    active_users: rng.random_range(20..70),
                    total_users: rng.random_range(50..150),
                }
            }
        })
        .collect()
}
