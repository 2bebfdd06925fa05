//! Month-view calendar with persistent events.
//!
//! The session shows one month at a time.  `add`, `edit` and `delete` write
//! the event file back through the [`Vfs`](crate::vfs::Vfs) and redraw the
//! month; navigation commands only redraw.

pub mod date;
pub mod render;
pub mod store;

use std::io;

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::term::Console;
use crate::vfs::Vfs;

use date::{leading_int, parse_date, parse_month_token, DateParts, YearMonth};
use store::{Event, EventStore, EVENTS_PATH};

const HELP: &str =
    "Commands: add, edit, delete, view [day], next, prev, goto <month> <year>, help, exit";

/// Run the calendar, starting at the current local month.
pub fn run(vfs: &Vfs, con: &mut Console<'_>) -> io::Result<()> {
    run_on(vfs, con, Local::now().date_naive())
}

/// Run the calendar as if `today` were the current date.
pub fn run_on(vfs: &Vfs, con: &mut Console<'_>, today: NaiveDate) -> io::Result<()> {
    let mut cal = Calendar {
        vfs,
        store: EventStore::load(vfs),
        month: YearMonth::containing(today),
        today,
    };

    writeln!(con.out, "Calendar (type 'help' for commands, 'exit' to return)")?;
    cal.show(con)?;

    loop {
        let Some(line) = con.prompt("calendar> ")? else {
            writeln!(con.out, "\nInput error. Exiting calendar.")?;
            break;
        };
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else { continue };
        let cmd = cmd.to_ascii_lowercase();

        match cmd.as_str() {
            "exit" => {
                writeln!(con.out, "Exiting calendar.")?;
                break;
            }
            "help" => writeln!(con.out, "{HELP}")?,
            "next" | "prev" => {
                let moved = if cmd == "next" { cal.month.next() } else { cal.month.prev() };
                match moved {
                    Some(m) => cal.month = m,
                    None => writeln!(con.out, "Invalid month/year combination.")?,
                }
                cal.show(con)?;
            }
            "goto" => match (words.next(), words.next()) {
                (Some(m), Some(y)) => {
                    let target = parse_month_token(m).and_then(|m| {
                        let y = leading_int(y).and_then(|y| i32::try_from(y).ok())?;
                        YearMonth::new(y, m)
                    });
                    match target {
                        Some(t) => {
                            cal.month = t;
                            cal.show(con)?;
                        }
                        None => writeln!(con.out, "Invalid month/year combination.")?,
                    }
                }
                _ => writeln!(con.out, "Usage: goto <month> <year>")?,
            },
            "add" | "edit" | "delete" => {
                let changed = match cmd.as_str() {
                    "add" => cal.add(con)?,
                    "edit" => cal.edit(con)?,
                    _ => cal.delete(con)?,
                };
                if changed {
                    cal.save(con)?;
                }
                cal.show(con)?;
            }
            "view" => cal.view(words.next(), con)?,
            _ => writeln!(con.out, "Unknown command: {cmd}")?,
        }
    }

    debug!("calendar session closed");
    Ok(())
}

// ── Session ───────────────────────────────────────────────────────────────────

struct Calendar<'v> {
    vfs: &'v Vfs,
    store: EventStore,
    month: YearMonth,
    today: NaiveDate,
}

/// Prompt for a line; on end of input report the cancellation.
fn ask(con: &mut Console<'_>, text: &str) -> io::Result<Option<String>> {
    let answer = con.prompt(text)?;
    if answer.is_none() {
        writeln!(con.out, "Input cancelled.")?;
    }
    Ok(answer)
}

impl Calendar<'_> {
    fn show(&self, con: &mut Console<'_>) -> io::Result<()> {
        let grid = render::month_grid(self.month, &self.store, Some(self.today), &con.styler);
        con.out.write_all(grid.as_bytes())?;
        con.out.write_all(render::month_events(self.month, &self.store).as_bytes())
    }

    fn save(&self, con: &mut Console<'_>) -> io::Result<()> {
        if let Err(e) = self.store.save(self.vfs) {
            warn!(error = %e, "cannot save events");
            writeln!(con.out, "Failed to write events to {EVENTS_PATH}")?;
        }
        Ok(())
    }

    fn add(&mut self, con: &mut Console<'_>) -> io::Result<bool> {
        let prompt = format!(
            "Enter date (YYYY-MM-DD) [default {:04}-{:02}-<day>]: ",
            self.month.year(),
            self.month.month()
        );
        let Some(answer) = ask(con, &prompt)? else { return Ok(false) };

        let date = if answer.is_empty() {
            let Some(day) = ask(con, "Enter day (1-31): ")? else { return Ok(false) };
            let day = leading_int(&day).unwrap_or(0);
            u32::try_from(day).ok().and_then(|d| self.month.day(d))
        } else {
            match parse_date(&answer) {
                Some(parts) => parts.to_date(),
                None => {
                    writeln!(con.out, "Invalid date format.")?;
                    return Ok(false);
                }
            }
        };
        let Some(date) = date else {
            writeln!(con.out, "Invalid day for the specified month/year.")?;
            return Ok(false);
        };

        let Some(description) = ask(con, "Enter description: ")? else { return Ok(false) };
        if description.is_empty() {
            writeln!(con.out, "Description cannot be empty.")?;
            return Ok(false);
        }

        self.store.add(Event::new(date, &description));
        writeln!(con.out, "Event added for {}.", DateParts::from(date))?;
        Ok(true)
    }

    /// Ask for a date and, when several events share it, which one.
    /// Returns the storage index of the chosen event.
    fn pick(&self, con: &mut Console<'_>, verb: &str) -> io::Result<Option<usize>> {
        let prompt = format!("Enter date of event to {verb} (YYYY-MM-DD): ");
        let Some(answer) = ask(con, &prompt)? else { return Ok(None) };
        let Some(parts) = parse_date(&answer) else {
            writeln!(con.out, "Invalid date format.")?;
            return Ok(None);
        };

        let matches = parts.to_date().map(|d| self.store.on(d)).unwrap_or_default();
        match matches.as_slice() {
            [] => {
                writeln!(con.out, "No events found on {parts}.")?;
                Ok(None)
            }
            [only] => Ok(Some(*only)),
            _ => {
                writeln!(con.out, "Select event to {verb}:")?;
                for (n, ev) in matches.iter().filter_map(|&i| self.store.get(i)).enumerate() {
                    writeln!(con.out, "  {}) {}", n + 1, ev.description)?;
                }
                let prompt = format!("Choice (1-{}): ", matches.len());
                let Some(choice) = ask(con, &prompt)? else { return Ok(None) };
                let chosen = leading_int(&choice)
                    .and_then(|n| usize::try_from(n).ok())
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|n| matches.get(n).copied());
                if chosen.is_none() {
                    writeln!(con.out, "Invalid selection.")?;
                }
                Ok(chosen)
            }
        }
    }

    fn edit(&mut self, con: &mut Console<'_>) -> io::Result<bool> {
        if self.store.is_empty() {
            writeln!(con.out, "No events to edit.")?;
            return Ok(false);
        }
        let Some(index) = self.pick(con, "edit")? else { return Ok(false) };
        if let Some(ev) = self.store.get(index) {
            writeln!(con.out, "Current description: {}", ev.description)?;
        }
        let Some(description) = ask(con, "Enter new description: ")? else { return Ok(false) };
        if description.is_empty() {
            writeln!(con.out, "Description cannot be empty.")?;
            return Ok(false);
        }
        self.store.set_description(index, &description);
        writeln!(con.out, "Event updated.")?;
        Ok(true)
    }

    fn delete(&mut self, con: &mut Console<'_>) -> io::Result<bool> {
        if self.store.is_empty() {
            writeln!(con.out, "No events to delete.")?;
            return Ok(false);
        }
        let Some(index) = self.pick(con, "delete")? else { return Ok(false) };
        self.store.remove(index);
        writeln!(con.out, "Event removed.")?;
        Ok(true)
    }

    /// `view`, `view <day>` or `view YYYY-MM-DD`.
    fn view(&self, arg: Option<&str>, con: &mut Console<'_>) -> io::Result<()> {
        let Some(arg) = arg else {
            return con.out.write_all(render::month_events(self.month, &self.store).as_bytes());
        };

        let parts = if let Some(parts) = parse_date(arg) {
            parts
        } else if arg.starts_with(|c: char| c.is_ascii_digit()) {
            let day = leading_int(arg).and_then(|d| u32::try_from(d).ok());
            match day.and_then(|d| self.month.day(d)) {
                Some(date) => DateParts::from(date),
                None => {
                    writeln!(con.out, "Invalid day for the current month.")?;
                    return Ok(());
                }
            }
        } else {
            writeln!(
                con.out,
                "Unrecognized view argument. Use 'view', 'view <day>', or 'view YYYY-MM-DD'."
            )?;
            return Ok(());
        };
        con.out.write_all(render::day_events(parts, &self.store).as_bytes())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
