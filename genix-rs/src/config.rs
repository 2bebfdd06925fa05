//! `.genixrc` configuration file parser.
//!
//! | Directive | Action |
//! |-----------|--------|
//! | `/set <name>=<value>` or `/set <name> <value>` | change a setting |
//! | Lines starting with `;` | comment, ignored |
//! | Any other `/command` | silently skipped |
//!
//! Settings: `root` (project root), `color` (`on`, `off` or `auto`) and
//! `log` (a tracing targets directive such as `genix=debug`).

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::term::ColorMode;

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading a config file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

/// Settings read from the rc file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub root: Option<PathBuf>,
    pub color: ColorMode,
    pub log: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an rc string.
    ///
    /// Returns the config and a list of errors on recognised lines; the
    /// offending lines are ignored and the rest still apply.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            let Some(rest) = line.strip_prefix('/') else { continue };

            let (cmd, args_str) = rest
                .split_once(|c: char| c.is_ascii_whitespace())
                .unwrap_or((rest, ""));

            if cmd == "set" {
                if let Err(message) = config.apply_set(&split_args(args_str.trim())) {
                    errors.push(ConfigError { line: i + 1, message });
                }
            }
        }

        (config, errors)
    }

    /// Read and parse an rc file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }

    /// Apply one setting by name.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), String> {
        match name.to_ascii_lowercase().as_str() {
            "root" => {
                self.root = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "color" | "colour" => {
                self.color = ColorMode::parse(value)
                    .ok_or_else(|| format!("invalid color '{value}' (expected on, off or auto)"))?;
            }
            "log" => {
                self.log = (!value.is_empty()).then(|| value.to_owned());
            }
            _ => return Err(format!("unknown setting '{name}'")),
        }
        Ok(())
    }

    /// `/set name=value`, `/set name value` or `/set name` (empty value).
    fn apply_set(&mut self, tokens: &[String]) -> Result<(), String> {
        let Some(first) = tokens.first() else {
            return Err("set: missing setting name".to_owned());
        };
        let (name, value) = match first.split_once('=') {
            Some((name, inline)) => {
                let mut value = inline.to_owned();
                for extra in &tokens[1..] {
                    value.push(' ');
                    value.push_str(extra);
                }
                (name.to_owned(), value)
            }
            None => (first.clone(), tokens[1..].join(" ")),
        };
        if name.is_empty() {
            return Err("set: missing setting name".to_owned());
        }
        self.set(&name, &value)
    }
}

// ── Argument tokenizer ────────────────────────────────────────────────────────

/// Split `s` into whitespace-delimited tokens, honouring double-quoted strings
/// and `\"` escapes within them.
fn split_args(s: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    cur.push(escaped);
                }
            }
            c if c.is_ascii_whitespace() && !in_quotes => {
                if !cur.is_empty() {
                    args.push(std::mem::take(&mut cur));
                }
            }
            c => cur.push(c),
        }
    }
    if !cur.is_empty() {
        args.push(cur);
    }
    args
}

// ── Tests ─────────────────────────────────────────────────────────────────────
