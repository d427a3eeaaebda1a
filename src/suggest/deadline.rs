//! Smart completion deadline.

use chrono::{Days, NaiveDate};

use crate::intake::Rof5Form;
use crate::workflow::Priority;

pub const HIGH_DEADLINE_DAYS: u64 = 14;
pub const MEDIUM_DEADLINE_DAYS: u64 = 21;
pub const DEFAULT_DEADLINE_DAYS: u64 = 30;

const LONG_CONDITIONS_CHARS: usize = 100;
const LONG_CONDITIONS_DAYS: u64 = 7;
const SUBLEASE_DAYS: u64 = 5;

/// Days from today until the deadline.
pub fn deadline_days(form: &Rof5Form, priority: Priority) -> u64 {
    let mut days = match priority {
        Priority::High => HIGH_DEADLINE_DAYS,
        Priority::Medium => MEDIUM_DEADLINE_DAYS,
        Priority::Low => DEFAULT_DEADLINE_DAYS,
    };

    if form.special_conditions.chars().count() > LONG_CONDITIONS_CHARS {
        days += LONG_CONDITIONS_DAYS;
    }
    if form.lease_type.trim().eq_ignore_ascii_case("sublease") {
        days += SUBLEASE_DAYS;
    }
    days
}

/// Deadline date for an instruction of `priority`, counted from `today`.
pub fn smart_deadline(form: &Rof5Form, priority: Priority, today: NaiveDate) -> NaiveDate {
    let days = deadline_days(form, priority);
    today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}
