// src/schedule/mod.rs

//! Cron schedule translation.
//!
//! Responsibilities:
//! - Parse cron expressions into classified fields (`cron.rs`).
//! - Translate them into the structured schedule block the job server
//!   expects, including its field-omission rules (`translate.rs`).

pub mod cron;
pub mod translate;

pub use cron::CronExpr;
pub use translate::{DaySpec, StructuredSchedule, TimeSpec, translate};
