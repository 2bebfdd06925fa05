//! Month grid and event listings.

use std::fmt::Write as _;

use chrono::{Datelike, NaiveDate};

use crate::term::Styler;

use super::date::{DateParts, YearMonth};
use super::store::EventStore;

/// The month grid, Monday first.
///
/// Each day is a two-column number followed by `*` if it has events, else a
/// space.  `today`, when it falls in `month`, is highlighted by `styler`.
pub fn month_grid(
    month: YearMonth,
    store: &EventStore,
    today: Option<NaiveDate>,
    styler: &Styler,
) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "\n{month}");
    s.push_str("Mo Tu We Th Fr Sa Su\n");

    let first = month.first_weekday();
    let total = month.days();
    for _ in 0..first {
        s.push_str("   ");
    }

    for day in 1..=total {
        let date = month.day(day);
        let has_event = date.is_some_and(|d| store.has_event(d));
        let mut cell = format!("{day:2}{}", if has_event { '*' } else { ' ' });
        if has_event {
            cell = styler.event_day(&cell);
        }
        if date.is_some() && date == today {
            cell = styler.today(&cell);
        }
        s.push_str(&cell);

        let weekday = (first + day - 1) % 7;
        s.push(if weekday == 6 || day == total { '\n' } else { ' ' });
    }
    s.push('\n');
    s
}

/// `Events for <Month> <year>:` followed by one line per event.
pub fn month_events(month: YearMonth, store: &EventStore) -> String {
    let mut s = format!("Events for {month}:\n");
    let mut any = false;
    for ev in store.in_month(month) {
        let _ = writeln!(s, "  {:02}: {}", ev.date.day(), ev.description);
        any = true;
    }
    if !any {
        s.push_str("  (no events)\n");
    }
    s
}

/// Events on a single day, as printed by `view`.
pub fn day_events(date: DateParts, store: &EventStore) -> String {
    let indices = date.to_date().map(|d| store.on(d)).unwrap_or_default();
    if indices.is_empty() {
        return format!("No events on {date}.\n");
    }
    let mut s = format!("Events on {date}:\n");
    for ev in indices.iter().filter_map(|&i| store.get(i)) {
        let _ = writeln!(s, "  - {}", ev.description);
    }
    s
}

// ── Tests ─────────────────────────────────────────────────────────────────────
