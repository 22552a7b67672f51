// src/schedule/trigger.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use cron::Schedule;

use crate::errors::RefresherError;

/// A parsed calendar expression.
///
/// Accepts the classic five fields (`min hour dom mon dow`), which are run at
/// second zero, as well as six/seven-field expressions with a leading
/// seconds column.
///
/// Note that day-of-week numbers follow the `cron` crate (1 = Sunday);
/// names such as `MON-FRI` are unambiguous and preferred.
#[derive(Debug, Clone)]
pub struct Trigger {
    expression: String,
    schedule: Schedule,
}

impl Trigger {
    /// The expression as written in configuration.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First fire time strictly after `after`, in the same time zone.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.schedule.after(after).next()
    }
}

impl FromStr for Trigger {
    type Err = RefresherError;

    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| RefresherError::InvalidSchedule {
            expression: expression.to_string(),
            reason,
        };

        let fields: Vec<&str> = expression.split_whitespace().collect();
        let normalized = match fields.len() {
            5 => format!("0 {}", fields.join(" ")),
            6 | 7 => fields.join(" "),
            n => {
                return Err(invalid(format!(
                    "expected 5 fields (min hour dom mon dow), got {n}"
                )));
            }
        };

        let schedule = Schedule::from_str(&normalized).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            expression: expression.trim().to_string(),
            schedule,
        })
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

/// The earliest upcoming fire time across `triggers`, together with every
/// trigger due at exactly that instant.
pub fn next_due<'a, Tz: TimeZone>(
    triggers: &'a [Trigger],
    after: &DateTime<Tz>,
) -> Option<(DateTime<Tz>, Vec<&'a Trigger>)> {
    let upcoming: Vec<(DateTime<Tz>, &Trigger)> = triggers
        .iter()
        .filter_map(|t| t.next_after(after).map(|at| (at, t)))
        .collect();

    let earliest = upcoming.iter().map(|(at, _)| at.clone()).min()?;
    let due = upcoming
        .into_iter()
        .filter(|(at, _)| *at == earliest)
        .map(|(_, t)| t)
        .collect();

    Some((earliest, due))
}
