//! Event storage.
//!
//! Events live in `home/user/events.txt` under the project root, one per
//! line as `YYYY-MM-DD|description`.  Order in the file is the order events
//! were added and is preserved on every save.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::vfs::{self, Vfs};

use super::date::{DateParts, YearMonth};

pub const EVENTS_PATH: &str = "home/user/events.txt";

/// Longest description kept, in characters.
pub const MAX_DESCRIPTION: usize = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub date: NaiveDate,
    pub description: String,
}

impl Event {
    /// Build an event, truncating the description to [`MAX_DESCRIPTION`].
    pub fn new(date: NaiveDate, description: &str) -> Self {
        Event { date, description: clip(description) }
    }
}

fn clip(description: &str) -> String {
    description.chars().take(MAX_DESCRIPTION).collect()
}

fn line_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([+-]?\d+)-([+-]?\d+)-([+-]?\d+)\|(.+)$").ok())
        .as_ref()
}

/// Parse one stored line.
fn parse_line(line: &str) -> Option<Event> {
    let caps = line_regex()?.captures(line)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(Event::new(date, &caps[4]))
}

// ── EventStore ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse file contents.  Malformed lines and impossible dates are
    /// skipped.
    pub fn parse(text: &str) -> Self {
        let mut events = Vec::new();
        for (n, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(ev) => events.push(ev),
                None => warn!(line = n + 1, "skipping malformed event line"),
            }
        }
        EventStore { events }
    }

    /// Load from the project root.  A missing file is an empty store.
    pub fn load(vfs: &Vfs) -> Self {
        match vfs.read(EVENTS_PATH) {
            Ok(text) => {
                let store = EventStore::parse(&text);
                info!(count = store.len(), "events loaded");
                store
            }
            Err(e) => {
                if !e.is_not_found() {
                    warn!(error = %e, "cannot read events");
                }
                EventStore::new()
            }
        }
    }

    pub fn to_text(&self) -> String {
        self.events
            .iter()
            .map(|ev| format!("{}|{}\n", DateParts::from(ev.date), ev.description))
            .collect()
    }

    pub fn save(&self, vfs: &Vfs) -> vfs::Result<()> {
        vfs.write(EVENTS_PATH, &self.to_text())?;
        debug!(count = self.len(), "events saved");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn add(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Storage indices of the events on `date`, in storage order.
    pub fn on(&self, date: NaiveDate) -> Vec<usize> {
        self.events
            .iter()
            .enumerate()
            .filter(|(_, ev)| ev.date == date)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_event(&self, date: NaiveDate) -> bool {
        self.events.iter().any(|ev| ev.date == date)
    }

    pub fn in_month(&self, month: YearMonth) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |ev| month.contains(ev.date))
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// Replace the description of the event at `index`.
    pub fn set_description(&mut self, index: usize, description: &str) -> bool {
        match self.events.get_mut(index) {
            Some(ev) => {
                ev.description = clip(description);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Event> {
        (index < self.events.len()).then(|| self.events.remove(index))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
