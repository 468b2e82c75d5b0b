use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::warn;

use crate::error::{Error, Result};
use crate::timetable::Event;

/// All events live on one fixed reference week; the calendar surface never
/// navigates away from it. Monday of that week:
pub const REFERENCE_YEAR: i32 = 2020;
pub const REFERENCE_MONTH: u32 = 1;
pub const REFERENCE_MONDAY: u32 = 6;

/// Daily scheduling window, matching the calendar's slot range.
pub fn day_start() -> NaiveTime {
    NaiveTime::from_hms_opt(7, 30, 0).expect("valid time")
}

pub fn day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 30, 0).expect("valid time")
}

/// The five business-day dates of the reference week, Monday first.
pub fn week_dates() -> [NaiveDate; 5] {
    let monday = NaiveDate::from_ymd_opt(REFERENCE_YEAR, REFERENCE_MONTH, REFERENCE_MONDAY)
        .expect("valid date");
    [
        monday,
        monday + Duration::days(1),
        monday + Duration::days(2),
        monday + Duration::days(3),
        monday + Duration::days(4),
    ]
}

/// Map a weekday name to its date on the reference week.
///
/// Accepts Portuguese names (with or without accents) and English names,
/// case-insensitively. Unrecognized names fall back to Monday; the form
/// only offers valid names, so an unknown one is a caller bug, not an
/// error worth failing the whole mutation for.
pub fn resolve_weekday(name: &str) -> NaiveDate {
    let dates = week_dates();
    let index = match name.trim().to_lowercase().as_str() {
        "segunda" | "segunda-feira" | "monday" => 0,
        "terça" | "terca" | "terça-feira" | "terca-feira" | "tuesday" => 1,
        "quarta" | "quarta-feira" | "wednesday" => 2,
        "quinta" | "quinta-feira" | "thursday" => 3,
        "sexta" | "sexta-feira" | "friday" => 4,
        other => {
            warn!(weekday = other, "unrecognized weekday, defaulting to Monday");
            0
        }
    };
    dates[index]
}

/// Snap an instant to the nearest half-hour-past-the-hour boundary.
///
/// minute < 15 goes to the previous hour's :30 (hour 0 clamps to 00:30
/// instead of underflowing into the previous day), 15..=44 goes to the
/// current hour's :30, 45+ goes to the next hour's :30. Fixed point for
/// any :30 input, so snapping twice changes nothing.
pub fn snap_to_half_hour(t: NaiveDateTime) -> NaiveDateTime {
    let on_the_half = t
        .date()
        .and_time(NaiveTime::from_hms_opt(t.hour(), 30, 0).expect("valid time"));

    match t.minute() {
        m if m < 15 => {
            if t.hour() == 0 {
                on_the_half
            } else {
                on_the_half - Duration::hours(1)
            }
        }
        m if m < 45 => on_the_half,
        _ => on_the_half + Duration::hours(1),
    }
}

/// Parse a `"HH:MM"` clock string from the event form.
pub fn parse_clock(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| Error::InvalidClock(raw.to_string()))
}

/// Check the single invariant every event must satisfy before it reaches
/// the store: a strictly positive duration, on a business day of the
/// reference week, inside the daily window.
pub fn validate_range(start: NaiveDateTime, end: NaiveDateTime) -> Result<()> {
    if end <= start {
        return Err(Error::Validation(
            "end time must be after start time".to_string(),
        ));
    }
    if !week_dates().contains(&start.date()) || start.date() != end.date() {
        return Err(Error::Validation(
            "events must stay on one business day of the reference week".to_string(),
        ));
    }
    if start.time() < day_start() || end.time() > day_end() {
        return Err(Error::Validation(format!(
            "events must fall between {} and {}",
            day_start().format("%H:%M"),
            day_end().format("%H:%M"),
        )));
    }
    Ok(())
}

/// Optional resource attributes accompanying a new event.
#[derive(Debug, Clone, Default)]
pub struct EventAttributes {
    pub room: Option<String>,
    pub professor: Option<String>,
    pub semester: Option<String>,
    pub cohort: Option<String>,
    pub kind: String,
}

/// Compose a new event from form-level inputs: a weekday name and two
/// clock strings. The weekday resolves to its fixed date, the range is
/// validated, and display colors are derived before the event is returned.
pub fn build_event(
    id: impl Into<String>,
    title: impl Into<String>,
    weekday: &str,
    start_clock: &str,
    end_clock: &str,
    attrs: EventAttributes,
) -> Result<Event> {
    let date = resolve_weekday(weekday);
    let start = date.and_time(parse_clock(start_clock)?);
    let end = date.and_time(parse_clock(end_clock)?);
    validate_range(start, end)?;

    let mut event = Event {
        id: id.into(),
        title: title.into(),
        start,
        end,
        room: attrs.room,
        professor: attrs.professor,
        semester: attrs.semester,
        cohort: attrs.cohort,
        kind: attrs.kind,
        background_color: String::new(),
        border_color: String::new(),
        text_color: String::new(),
    };
    event.apply_colors();
    Ok(event)
}
