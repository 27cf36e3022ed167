// src/schedule/cron.rs

use crate::errors::FabdeckError;

/// One positional field of a cron expression, kept verbatim.
///
/// The only classification the translator needs is wildcard vs. constrained;
/// lists, ranges and step expressions (`1-5`, `*/10`) all count as
/// constrained and are carried through to the job server untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronField(String);

impl CronField {
    fn new(text: &str) -> Self {
        CronField(text.to_string())
    }

    fn wildcard() -> Self {
        CronField("*".to_string())
    }

    /// True when this field matches every tick.
    pub fn is_wildcard(&self) -> bool {
        self.0 == "*"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A parsed 5- or 6-field cron expression.
///
/// The sixth field (year) is optional and defaults to a wildcard, matching
/// the extended cron dialect the original task-automation library accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpr {
    pub minute: CronField,
    pub hour: CronField,
    pub day_of_month: CronField,
    pub month: CronField,
    pub day_of_week: CronField,
    pub year: CronField,
}

impl CronExpr {
    /// Parse a cron expression string.
    ///
    /// `@`-aliases (`@hourly`, `@daily`, `@monthly`, ...) are normalized to
    /// their five-field equivalents first. Anything that is not 5 or 6
    /// whitespace-separated fields is rejected with `InvalidSchedule`.
    pub fn parse(input: &str) -> Result<CronExpr, FabdeckError> {
        let normalized = normalize_alias(input)?;
        let fields: Vec<&str> = normalized.split_whitespace().collect();

        if fields.len() != 5 && fields.len() != 6 {
            return Err(FabdeckError::InvalidSchedule(input.to_string()));
        }
        for field in &fields {
            if !is_valid_field(field) {
                return Err(FabdeckError::InvalidSchedule(input.to_string()));
            }
        }

        Ok(CronExpr {
            minute: CronField::new(fields[0]),
            hour: CronField::new(fields[1]),
            day_of_month: CronField::new(fields[2]),
            month: CronField::new(fields[3]),
            day_of_week: CronField::new(fields[4]),
            year: fields
                .get(5)
                .map(|f| CronField::new(f))
                .unwrap_or_else(CronField::wildcard),
        })
    }
}

/// Expand `@`-aliases into plain five-field expressions.
fn normalize_alias(input: &str) -> Result<String, FabdeckError> {
    let trimmed = input.trim();
    if !trimmed.starts_with('@') {
        return Ok(trimmed.to_string());
    }
    let expanded = match trimmed {
        "@yearly" | "@annually" => "0 0 1 1 *",
        "@monthly" => "0 0 1 * *",
        "@weekly" => "0 0 * * 0",
        "@daily" | "@midnight" => "0 0 * * *",
        "@hourly" => "0 * * * *",
        _ => return Err(FabdeckError::InvalidSchedule(input.to_string())),
    };
    Ok(expanded.to_string())
}

/// Shallow syntactic check on a single field.
///
/// Values, lists, ranges, steps and month/weekday names are all accepted;
/// the job server performs full semantic validation on its side.
fn is_valid_field(field: &str) -> bool {
    !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '*' | ',' | '-' | '/' | '?'))
}
