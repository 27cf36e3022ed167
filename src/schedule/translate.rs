// src/schedule/translate.rs

use serde::{Deserialize, Serialize};

use crate::errors::FabdeckError;
use crate::schedule::cron::CronExpr;

/// The job server's structured schedule block.
///
/// Serialization order matches the document shape the server expects:
/// `time`, `month`, `dayofmonth`, `weekday`, `year`. The two day blocks are
/// conditionally present; see [`StructuredSchedule::from_cron`] for the
/// omission rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredSchedule {
    pub time: TimeSpec,
    pub month: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dayofmonth: Option<DaySpec>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub weekday: Option<DaySpec>,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpec {
    pub seconds: String,
    pub minute: String,
    pub hour: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySpec {
    pub day: String,
}

impl StructuredSchedule {
    /// Build the structured block from a parsed cron expression.
    ///
    /// Every field starts at its document default (`minute`/`hour`/`seconds`
    /// "0", `month`/`year` "*", `dayofmonth.day` "1", `weekday.day` "*") and
    /// is overwritten only when the cron field is constrained.
    ///
    /// Day-field omission rules (the server treats a document carrying both
    /// day blocks ambiguously):
    /// - both wildcard: drop `dayofmonth`, keep `weekday` at "*"
    /// - day-of-month wildcard, weekday constrained: drop `dayofmonth`
    /// - day-of-month constrained, weekday wildcard: drop `weekday`
    /// - both constrained: keep only `dayofmonth`
    pub fn from_cron(cron: &CronExpr) -> StructuredSchedule {
        let mut schedule = StructuredSchedule {
            time: TimeSpec {
                seconds: "0".to_string(),
                minute: "0".to_string(),
                hour: "0".to_string(),
            },
            month: "*".to_string(),
            dayofmonth: Some(DaySpec {
                day: "1".to_string(),
            }),
            weekday: Some(DaySpec {
                day: "*".to_string(),
            }),
            year: "*".to_string(),
        };

        if !cron.minute.is_wildcard() {
            schedule.time.minute = cron.minute.as_str().to_string();
        }
        if !cron.hour.is_wildcard() {
            schedule.time.hour = cron.hour.as_str().to_string();
        }
        if !cron.day_of_month.is_wildcard() {
            schedule.dayofmonth = Some(DaySpec {
                day: cron.day_of_month.as_str().to_string(),
            });
        }
        if !cron.month.is_wildcard() {
            schedule.month = cron.month.as_str().to_string();
        }
        if !cron.day_of_week.is_wildcard() {
            schedule.weekday = Some(DaySpec {
                day: cron.day_of_week.as_str().to_string(),
            });
        }
        if !cron.year.is_wildcard() {
            schedule.year = cron.year.as_str().to_string();
        }

        match (
            cron.day_of_month.is_wildcard(),
            cron.day_of_week.is_wildcard(),
        ) {
            // Both "every day": keep only the weekday wildcard.
            (true, true) => schedule.dayofmonth = None,
            (true, false) => schedule.dayofmonth = None,
            (false, true) => schedule.weekday = None,
            // Both constrained: dayofmonth wins, weekday is dropped.
            (false, false) => schedule.weekday = None,
        }

        schedule
    }
}

/// Translate a raw cron string into the structured schedule block.
///
/// Empty or whitespace-only input means "unscheduled" and yields `None`.
pub fn translate(raw: &str) -> Result<Option<StructuredSchedule>, FabdeckError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let cron = CronExpr::parse(raw)?;
    Ok(Some(StructuredSchedule::from_cron(&cron)))
}
