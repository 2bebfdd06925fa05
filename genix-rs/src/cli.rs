//! Command-line argument parsing.
//!
//! Usage:
//!   genix [-r<root>] [-f[<file>]] [-c<cmd>] [-dq] [<command> [args…]]

use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;

pub const USAGE: &str = "Usage: genix [-r<root>] [-f[<file>]] [-c<cmd>] [-dq] [<command> [args...]]";

// ── Public types ──────────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error("unknown option: -{0}")]
    UnknownOption(char),
    #[error("-{0} requires an argument")]
    MissingValue(char),
}

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Project root override (`-r<dir>`).
    pub root: Option<PathBuf>,
    /// Config-file specification.
    pub config: ConfigFile,
    /// Shell command to run instead of the interactive shell: `-c<cmd>`, or
    /// the positional words joined with spaces.
    pub command: Option<String>,
    /// Debug logging (`-d`).
    pub debug: bool,
    /// Suppress the banner (`-q`).
    pub quiet: bool,
}

/// How to choose the user config file.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum ConfigFile {
    /// Search `~/.genixrc`, `~/genixrc`, `./.genixrc`, `./genixrc` in order.
    #[default]
    Search,
    /// `-f` with no file argument: skip user config.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()`.
pub fn parse_args() -> Result<CliArgs, CliError> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    parse_argv(&raw)
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, CliError> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        if arg == "--" {
            positional.extend(argv[i + 1..].iter().cloned());
            break;
        }

        // The first non-flag word starts the command; everything after it
        // belongs to the command.
        if !arg.starts_with('-') || arg == "-" {
            positional.extend(argv[i..].iter().cloned());
            break;
        }

        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'd' => args.debug = true,
                'q' => args.quiet = true,

                // -f[<file>]
                'f' => {
                    if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        args.config = ConfigFile::Explicit(PathBuf::from(file));
                        j = chars.len();
                    } else {
                        args.config = ConfigFile::Skip;
                    }
                }

                // -c<cmd> / -r<dir>, value attached or in the next word
                flag @ ('c' | 'r') => {
                    let value = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err(CliError::MissingValue(flag));
                    };
                    if flag == 'c' {
                        args.command = Some(value);
                    } else {
                        args.root = Some(PathBuf::from(value));
                    }
                }

                c => return Err(CliError::UnknownOption(c)),
            }
            j += 1;
        }
        i += 1;
    }

    if !positional.is_empty() {
        args.command = Some(positional.join(" "));
    }

    Ok(args)
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Search for the user config file in the standard locations.
/// Returns the first path that exists, or `None`.
pub fn find_user_config() -> Option<PathBuf> {
    let home = std::env::var("HOME").unwrap_or_default();
    [
        format!("{home}/.genixrc"),
        format!("{home}/genixrc"),
        "./.genixrc".to_owned(),
        "./genixrc".to_owned(),
    ]
    .into_iter()
    .map(PathBuf::from)
    .find(|p| p.exists())
}

/// Determine the project root.
///
/// Priority: `-r<dir>` CLI flag → `GENIX_ROOT` env var → `root` setting →
/// the platform data directory → `./GenixFiles`.
pub fn resolve_root(cli_override: Option<&PathBuf>, setting: Option<&PathBuf>) -> PathBuf {
    if let Some(d) = cli_override {
        return d.clone();
    }
    if let Some(d) = std::env::var_os("GENIX_ROOT").filter(|d| !d.is_empty()) {
        return PathBuf::from(d);
    }
    if let Some(d) = setting {
        return d.clone();
    }
    if let Some(dirs) = ProjectDirs::from("", "", "genix") {
        return dirs.data_dir().to_path_buf();
    }
    PathBuf::from("./GenixFiles")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn empty_args() {
        let a = parse_argv(&argv(&[])).unwrap();
        assert!(!a.debug && !a.quiet);
        assert_eq!(a.command, None);
        assert_eq!(a.config, ConfigFile::Search);
    }

    #[test]
    fn positional_words_form_command() {
        let a = parse_argv(&argv(&["pkg", "install", "zlib"])).unwrap();
        assert_eq!(a.command.as_deref(), Some("pkg install zlib"));
    }

    #[test]
    fn flags_after_command_belong_to_it() {
        let a = parse_argv(&argv(&["-q", "ls", "-d"])).unwrap();
        assert!(a.quiet);
        assert!(!a.debug);
        assert_eq!(a.command.as_deref(), Some("ls -d"));
    }

    #[test]
    fn bool_flags() {
        let a = parse_argv(&argv(&["-d", "-q"])).unwrap();
        assert!(a.debug && a.quiet);
        let b = parse_argv(&argv(&["-dq"])).unwrap();
        assert!(b.debug && b.quiet);
    }

    #[test]
    fn root_embedded_and_separate() {
        let a = parse_argv(&argv(&["-r/srv/genix"])).unwrap();
        assert_eq!(a.root, Some(PathBuf::from("/srv/genix")));
        let b = parse_argv(&argv(&["-r", "/srv/genix", "calc"])).unwrap();
        assert_eq!(b.root, Some(PathBuf::from("/srv/genix")));
        assert_eq!(b.command.as_deref(), Some("calc"));
    }

    #[test]
    fn config_skip_and_explicit() {
        let a = parse_argv(&argv(&["-f"])).unwrap();
        assert_eq!(a.config, ConfigFile::Skip);
        let b = parse_argv(&argv(&["-fmy.genixrc"])).unwrap();
        assert_eq!(b.config, ConfigFile::Explicit(PathBuf::from("my.genixrc")));
        // -f does not take a separate word: `calc` is the command.
        let c = parse_argv(&argv(&["-f", "calc"])).unwrap();
        assert_eq!(c.config, ConfigFile::Skip);
        assert_eq!(c.command.as_deref(), Some("calc"));
    }

    #[test]
    fn command_flag() {
        let a = parse_argv(&argv(&["-cls home"])).unwrap();
        assert_eq!(a.command.as_deref(), Some("ls home"));
        let b = parse_argv(&argv(&["-c", "cat notes.txt"])).unwrap();
        assert_eq!(b.command.as_deref(), Some("cat notes.txt"));
    }

    #[test]
    fn double_dash_ends_flags() {
        let a = parse_argv(&argv(&["-q", "--", "-weird", "name"])).unwrap();
        assert_eq!(a.command.as_deref(), Some("-weird name"));
    }

    #[test]
    fn errors() {
        assert_eq!(parse_argv(&argv(&["-z"])).unwrap_err(), CliError::UnknownOption('z'));
        assert_eq!(parse_argv(&argv(&["-c"])).unwrap_err(), CliError::MissingValue('c'));
        assert_eq!(CliError::MissingValue('r').to_string(), "-r requires an argument");
    }

    #[test]
    fn root_override_wins() {
        let flag = PathBuf::from("/from/flag");
        let setting = PathBuf::from("/from/rc");
        assert_eq!(resolve_root(Some(&flag), Some(&setting)), flag);
    }
}
