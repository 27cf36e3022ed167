use fabdeck::errors::FabdeckError;
use fabdeck::schedule::{StructuredSchedule, translate};

fn sched(expr: &str) -> StructuredSchedule {
    translate(expr)
        .expect("valid cron expression")
        .expect("scheduled")
}

#[test]
fn daily_noon_drops_dayofmonth_and_keeps_weekday_wildcard() {
    let s = sched("0 12 * * *");

    assert_eq!(s.time.minute, "0");
    assert_eq!(s.time.hour, "12");
    assert_eq!(s.time.seconds, "0");
    assert_eq!(s.month, "*");
    assert_eq!(s.year, "*");
    assert!(s.dayofmonth.is_none());
    assert_eq!(s.weekday.as_ref().map(|d| d.day.as_str()), Some("*"));
}

#[test]
fn minute_only_schedule_keeps_hour_default() {
    let s = sched("30 * * * *");

    assert_eq!(s.time.minute, "30");
    assert_eq!(s.time.hour, "0");
    assert!(s.dayofmonth.is_none());
}

#[test]
fn constrained_weekday_alone_is_kept() {
    let s = sched("0 0 * * 5");

    assert!(s.dayofmonth.is_none());
    assert_eq!(s.weekday.as_ref().map(|d| d.day.as_str()), Some("5"));
}

#[test]
fn constrained_dayofmonth_alone_is_kept() {
    let s = sched("0 0 15 * *");

    assert!(s.weekday.is_none());
    assert_eq!(s.dayofmonth.as_ref().map(|d| d.day.as_str()), Some("15"));
}

#[test]
fn both_day_fields_constrained_keeps_only_dayofmonth() {
    let s = sched("0 0 15 * 5");

    assert_eq!(s.dayofmonth.as_ref().map(|d| d.day.as_str()), Some("15"));
    assert!(s.weekday.is_none());
}

#[test]
fn monthly_alias_expands_to_first_of_month() {
    let s = sched("@monthly");

    assert_eq!(s.time.minute, "0");
    assert_eq!(s.time.hour, "0");
    assert_eq!(s.dayofmonth.as_ref().map(|d| d.day.as_str()), Some("1"));
    assert!(s.weekday.is_none());
    assert_eq!(s.month, "*");
}

#[test]
fn sixth_field_populates_year() {
    let s = sched("0 0 1 1 * 2030");
    assert_eq!(s.year, "2030");
}

#[test]
fn steps_and_ranges_count_as_constrained() {
    let s = sched("*/10 8-17 * * *");

    assert_eq!(s.time.minute, "*/10");
    assert_eq!(s.time.hour, "8-17");
}

#[test]
fn empty_input_means_unscheduled() {
    assert!(translate("").expect("ok").is_none());
    assert!(translate("   ").expect("ok").is_none());
}

#[test]
fn malformed_expressions_are_rejected() {
    for bad in ["every now and then", "* *", "@fortnightly", "0 12 * * * * *", "0 12 * * $"] {
        let err = translate(bad).expect_err("should reject");
        assert!(
            matches!(err, FabdeckError::InvalidSchedule(_)),
            "unexpected error for {bad:?}: {err}"
        );
    }
}

#[test]
fn serialized_shape_omits_absent_day_blocks() {
    let value = serde_yaml::to_value(sched("0 12 * * *")).expect("serializable");

    assert!(value.get("time").is_some());
    assert!(value.get("weekday").is_some());
    assert!(value.get("dayofmonth").is_none());
}
