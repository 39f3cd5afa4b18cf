//! Calendar-day arithmetic.
//!
//! Every value here is a plain calendar date (year, month, day) with no
//! time-of-day or offset, so results never shift with the host timezone or
//! daylight-saving transitions. Parsing is strict `YYYY-MM-DD`; anything else
//! yields `None` rather than an error.

use chrono::{Datelike, Days, NaiveDate};

/// Something that can be read as a calendar date: a canonical
/// `YYYY-MM-DD` string or an already-normalized [`NaiveDate`].
pub trait DateInput {
    fn to_calendar_date(&self) -> Option<NaiveDate>;
}

impl DateInput for str {
    fn to_calendar_date(&self) -> Option<NaiveDate> {
        parse_canonical(self.trim())
    }
}

impl DateInput for String {
    fn to_calendar_date(&self) -> Option<NaiveDate> {
        self.as_str().to_calendar_date()
    }
}

impl DateInput for NaiveDate {
    fn to_calendar_date(&self) -> Option<NaiveDate> {
        Some(*self)
    }
}

/// Parse a date. Returns `None` on malformed input or a day that does not
/// exist (e.g. `2023-02-30`).
pub fn parse_date<D: DateInput + ?Sized>(input: &D) -> Option<NaiveDate> {
    input.to_calendar_date()
}

/// Format as zero-padded `YYYY-MM-DD`. Inverse of [`parse_date`].
pub fn format_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Whole calendar days from `start` to `end` (negative if `end` is earlier).
/// `None` if either side fails to parse.
pub fn difference_in_days<A, B>(start: &A, end: &B) -> Option<i64>
where
    A: DateInput + ?Sized,
    B: DateInput + ?Sized,
{
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    Some(end.signed_duration_since(start).num_days())
}

/// The date `days` calendar days after `date` (before, if negative).
pub fn shift_date(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let delta = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(delta)
    } else {
        date.checked_sub_days(delta)
    }
}

/// [`shift_date`] over any date input, formatted back to `YYYY-MM-DD`.
pub fn add_days<D: DateInput + ?Sized>(date: &D, days: i64) -> Option<String> {
    parse_date(date)
        .and_then(|d| shift_date(d, days))
        .map(format_date)
}

/// `true` if `a` falls strictly before `b`. Unparseable input is never before anything.
pub fn is_before<A, B>(a: &A, b: &B) -> bool
where
    A: DateInput + ?Sized,
    B: DateInput + ?Sized,
{
    matches!(difference_in_days(a, b), Some(diff) if diff > 0)
}

fn parse_canonical(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return None;
    }

    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[5..7].parse().ok()?;
    let day: u32 = s[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
