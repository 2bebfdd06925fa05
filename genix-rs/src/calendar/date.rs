//! Date arithmetic and parsing for the calendar.

use std::fmt;
use std::sync::OnceLock;

use chrono::{Datelike, Days, Months, NaiveDate};
use regex::Regex;

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August",
    "September", "October", "November", "December",
];

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    const DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    match month {
        2 if is_leap_year(year) => 29,
        1..=12 => DAYS[month as usize - 1],
        _ => 30,
    }
}

// ── YearMonth ─────────────────────────────────────────────────────────────────

/// The month currently shown by the calendar.  Years before 1 are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if year < 1 {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| YearMonth { first })
    }

    /// The month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        YearMonth { first: date - Days::new(u64::from(date.day0())) }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[self.first.month0() as usize]
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Column of the 1st in a Monday-first week, 0..=6.
    pub fn first_weekday(&self) -> u32 {
        self.first.weekday().num_days_from_monday()
    }

    /// `day` of this month, if it exists.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub fn next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| YearMonth { first })
    }

    pub fn prev(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .filter(|d| d.year() >= 1)
            .map(|first| YearMonth { first })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year())
    }
}

// ── DateParts ─────────────────────────────────────────────────────────────────

/// A `YYYY-MM-DD` date as typed, range-checked but not calendar-checked:
/// `2023-02-30` is accepted here and simply matches no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateParts {
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for DateParts {
    fn from(d: NaiveDate) -> Self {
        DateParts { year: d.year(), month: d.month(), day: d.day() }
    }
}

impl fmt::Display for DateParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

fn date_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([+-]?\d{1,9})-(\d{1,2})-(\d{1,2})").ok())
        .as_ref()
}

/// Parse the leading `YYYY-MM-DD` of `input`.  Trailing text is ignored.
pub fn parse_date(input: &str) -> Option<DateParts> {
    let caps = date_regex()?.captures(input)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    if year < 1 || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(DateParts { year, month, day })
}

/// Month given as `1`..`12` (at most two digits) or any prefix of an
/// English month name, case-insensitive.
pub fn parse_month_token(token: &str) -> Option<u32> {
    if token.is_empty() {
        return None;
    }
    if token.len() <= 2 && token.as_bytes()[0].is_ascii_digit() {
        if let Some(n) = leading_int(token).filter(|n| (1..=12).contains(n)) {
            return Some(n as u32);
        }
    }
    let token = token.to_ascii_lowercase();
    MONTH_NAMES
        .iter()
        .position(|name| name.to_ascii_lowercase().starts_with(&token))
        .map(|i| i as u32 + 1)
}

/// Optional sign and leading digits of `s`, after leading whitespace.
/// `None` when there are no digits.
pub fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (neg, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let n: i64 = rest[..end].parse().ok()?;
    Some(if neg { -n } else { n })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    // -- Month lengths --------------------------------------------------------

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
    }

    // -- YearMonth ------------------------------------------------------------

    #[test]
    fn year_month_basics() {
        let m = ym(2024, 2);
        assert_eq!(m.to_string(), "February 2024");
        assert_eq!(m.days(), 29);
        // 1 Feb 2024 was a Thursday.
        assert_eq!(m.first_weekday(), 3);
        assert_eq!(m.day(30), None);
        assert!(m.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    }

    #[test]
    fn year_month_navigation_wraps_years() {
        assert_eq!(ym(2023, 12).next(), Some(ym(2024, 1)));
        assert_eq!(ym(2024, 1).prev(), Some(ym(2023, 12)));
        assert_eq!(ym(1, 1).prev(), None);
        assert_eq!(YearMonth::new(0, 5), None);
        assert_eq!(YearMonth::new(2024, 13), None);
    }

    #[test]
    fn containing_month() {
        let d = NaiveDate::from_ymd_opt(2024, 7, 19).unwrap();
        assert_eq!(YearMonth::containing(d), ym(2024, 7));
    }

    // -- Parsing --------------------------------------------------------------

    #[test]
    fn date_pattern_compiles() {
        assert!(date_regex().is_some());
    }

    #[test]
    fn parse_date_accepts_loose_input() {
        let p = parse_date("2024-3-5").unwrap();
        assert_eq!(p.to_string(), "2024-03-05");
        assert_eq!(parse_date(" 2024-03-05 trailing"), Some(p));
        assert_eq!(parse_date("2023-02-30").unwrap().to_date(), None);
    }

    #[test]
    fn parse_date_rejects_out_of_range() {
        for bad in ["", "tomorrow", "2024-13-01", "2024-00-10", "2024-01-32", "0-01-01", "2024/01/01"] {
            assert_eq!(parse_date(bad), None, "{bad}");
        }
    }

    #[test]
    fn month_tokens() {
        assert_eq!(parse_month_token("3"), Some(3));
        assert_eq!(parse_month_token("12"), Some(12));
        assert_eq!(parse_month_token("mar"), Some(3));
        assert_eq!(parse_month_token("Sept"), Some(9));
        // Ambiguous prefixes pick the first month in calendar order.
        assert_eq!(parse_month_token("ju"), Some(6));
        assert_eq!(parse_month_token("13"), None);
        assert_eq!(parse_month_token("012"), None);
        assert_eq!(parse_month_token("smarch"), None);
        assert_eq!(parse_month_token(""), None);
    }

    #[test]
    fn leading_int_like_atoi() {
        assert_eq!(leading_int("42"), Some(42));
        assert_eq!(leading_int("  7th"), Some(7));
        assert_eq!(leading_int("-3"), Some(-3));
        assert_eq!(leading_int("x1"), None);
        assert_eq!(leading_int(""), None);
    }
}
