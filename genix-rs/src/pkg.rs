//! Toy package installer.
//!
//! "Installing" a library only records its name in the registry file
//! `system/lib_registry.txt` under the project root.  Names compare
//! case-insensitively; the spelling used at first install is kept.

use std::io::{self, Write};

use tracing::{info, warn};

use crate::term::Console;
use crate::vfs::Vfs;

/// Registry location, relative to the project root.
pub const REGISTRY_PATH: &str = "system/lib_registry.txt";

const HELP: &str = "Commands: install <name>, remove <name>, list, help, exit";

// ── Registry ──────────────────────────────────────────────────────────────────

/// Installed library names, in install order.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    libraries: Vec<String>,
    dirty: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse registry text: one name per line, blanks skipped, duplicates
    /// collapsed.
    pub fn parse(text: &str) -> Self {
        let mut reg = Registry::new();
        for line in text.lines() {
            let name = line.trim();
            if !name.is_empty() {
                reg.install(name);
            }
        }
        reg.dirty = false;
        reg
    }

    /// Load from the project root.  A missing file is an empty registry.
    pub fn load(vfs: &Vfs) -> Self {
        match vfs.read(REGISTRY_PATH) {
            Ok(text) => {
                let reg = Registry::parse(&text);
                info!(count = reg.len(), "library registry loaded");
                reg
            }
            Err(e) => {
                if !e.is_not_found() {
                    warn!(error = %e, "cannot read library registry");
                }
                Registry::new()
            }
        }
    }

    /// Serialize as one name per line.
    pub fn to_text(&self) -> String {
        self.libraries.iter().map(|n| format!("{n}\n")).collect()
    }

    /// Write the registry back and clear the dirty flag.
    pub fn save(&mut self, vfs: &Vfs) -> crate::vfs::Result<()> {
        vfs.write(REGISTRY_PATH, &self.to_text())?;
        info!(count = self.len(), "library registry saved");
        self.dirty = false;
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.libraries.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Add `name`.  Returns `false` if it was already installed.
    pub fn install(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.libraries.push(name.to_owned());
        self.dirty = true;
        true
    }

    /// Remove `name`.  Returns `false` if it was not installed.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.libraries.iter().position(|n| n.eq_ignore_ascii_case(name)) {
            Some(i) => {
                self.libraries.remove(i);
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.libraries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// `true` if there are changes not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Whether a command runs inside the `pkg>` loop or as a one-shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Interactive,
    OneShot,
}

struct Installer<'v> {
    vfs: &'v Vfs,
    registry: Registry,
}

impl Installer<'_> {
    /// Save immediately in one-shot mode; the interactive loop saves on exit.
    fn commit(&mut self, mode: Mode, out: &mut dyn Write) -> io::Result<()> {
        if mode == Mode::OneShot {
            if let Err(e) = self.registry.save(self.vfs) {
                writeln!(out, "Failed to update registry at {REGISTRY_PATH}: {e}")?;
            }
        }
        Ok(())
    }

    fn execute(&mut self, line: &str, mode: Mode, out: &mut dyn Write) -> io::Result<()> {
        let line = line.trim();
        let (cmd, rest) = line
            .split_once(|c: char| c.is_ascii_whitespace())
            .unwrap_or((line, ""));
        if cmd.is_empty() {
            return Ok(());
        }
        let arg = rest.trim();

        match cmd.to_ascii_lowercase().as_str() {
            "install" => {
                if arg.is_empty() {
                    writeln!(out, "Usage: install <library>")?;
                } else if !self.registry.install(arg) {
                    writeln!(out, "Library '{arg}' is already installed.")?;
                } else {
                    writeln!(out, "Installing library: {arg}\nDone.")?;
                    self.commit(mode, out)?;
                }
            }
            "remove" => {
                if arg.is_empty() {
                    writeln!(out, "Usage: remove <library>")?;
                } else if !self.registry.remove(arg) {
                    writeln!(out, "Library '{arg}' is not installed.")?;
                } else {
                    writeln!(out, "Removed library: {arg}")?;
                    self.commit(mode, out)?;
                }
            }
            "list" => {
                if self.registry.is_empty() {
                    writeln!(out, "No libraries installed.")?;
                } else {
                    writeln!(out, "Installed libraries:")?;
                    for name in self.registry.iter() {
                        writeln!(out, "  - {name}")?;
                    }
                }
            }
            "help" => writeln!(out, "{HELP}")?,
            _ => writeln!(out, "Unknown command: {cmd}")?,
        }
        Ok(())
    }
}

/// Run the package installer.
///
/// With non-empty `args` a single command is executed; otherwise the
/// interactive `pkg>` loop runs until `exit` or end of input.
pub fn run(vfs: &Vfs, args: Option<&str>, con: &mut Console<'_>) -> io::Result<()> {
    let mut inst = Installer { vfs, registry: Registry::load(vfs) };

    if let Some(args) = args.map(str::trim).filter(|a| !a.is_empty()) {
        return inst.execute(args, Mode::OneShot, con.out);
    }

    writeln!(
        con.out,
        "Package Installer (commands: install <name>, remove <name>, list, help, exit)"
    )?;
    loop {
        let Some(line) = con.prompt("pkg> ")? else {
            writeln!(con.out, "\nInput error. Exiting package installer.")?;
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") {
            writeln!(con.out, "Package installer session ended.")?;
            break;
        }
        inst.execute(line, Mode::Interactive, con.out)?;
    }

    if inst.registry.is_dirty() {
        if let Err(e) = inst.registry.save(vfs) {
            writeln!(con.out, "Failed to update registry at {REGISTRY_PATH}: {e}")?;
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Styler;
    use std::io::Cursor;

    fn temp_vfs() -> (tempfile::TempDir, Vfs) {
        let dir = tempfile::tempdir().unwrap();
        let vfs = Vfs::open(dir.path()).unwrap();
        (dir, vfs)
    }

    fn pkg(vfs: &Vfs, args: Option<&str>, input: &str) -> String {
        let mut input = Cursor::new(input.to_owned());
        let (mut out, mut err) = (Vec::new(), Vec::new());
        {
            let mut con = Console::new(&mut input, &mut out, &mut err, Styler::plain());
            run(vfs, args, &mut con).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    // -- Registry -------------------------------------------------------------

    #[test]
    fn parse_skips_blanks_and_duplicates() {
        let reg = Registry::parse("stdio\n\n  math \nSTDIO\n");
        assert_eq!(reg.iter().collect::<Vec<_>>(), ["stdio", "math"]);
        assert!(!reg.is_dirty());
    }

    #[test]
    fn case_insensitive_membership() {
        let mut reg = Registry::new();
        assert!(reg.install("Stdio"));
        assert!(!reg.install("stdio"));
        assert!(reg.contains("STDIO"));
        assert!(reg.remove("sTdIo"));
        assert!(reg.is_empty());
        assert!(!reg.remove("stdio"));
    }

    #[test]
    fn to_text_round_trips() {
        let mut reg = Registry::new();
        reg.install("a");
        reg.install("b");
        assert_eq!(reg.to_text(), "a\nb\n");
        assert_eq!(Registry::parse(&reg.to_text()).len(), 2);
    }

    // -- One-shot -------------------------------------------------------------

    #[test]
    fn one_shot_install_saves_immediately() {
        let (_dir, vfs) = temp_vfs();
        let out = pkg(&vfs, Some("install stdio"), "");
        assert_eq!(out, "Installing library: stdio\nDone.\n");
        assert_eq!(vfs.read(REGISTRY_PATH).unwrap(), "stdio\n");

        let out = pkg(&vfs, Some("install STDIO"), "");
        assert_eq!(out, "Library 'STDIO' is already installed.\n");
    }

    #[test]
    fn one_shot_remove() {
        let (_dir, vfs) = temp_vfs();
        vfs.write(REGISTRY_PATH, "math\nstdio\n").unwrap();
        assert_eq!(pkg(&vfs, Some("remove MATH"), ""), "Removed library: MATH\n");
        assert_eq!(vfs.read(REGISTRY_PATH).unwrap(), "stdio\n");
        assert_eq!(pkg(&vfs, Some("remove math"), ""), "Library 'math' is not installed.\n");
    }

    #[test]
    fn usage_messages() {
        let (_dir, vfs) = temp_vfs();
        assert_eq!(pkg(&vfs, Some("install"), ""), "Usage: install <library>\n");
        assert_eq!(pkg(&vfs, Some("remove"), ""), "Usage: remove <library>\n");
        assert_eq!(pkg(&vfs, Some("frobnicate x"), ""), "Unknown command: frobnicate\n");
        assert_eq!(pkg(&vfs, Some("list"), ""), "No libraries installed.\n");
        assert!(!vfs.exists(REGISTRY_PATH));
    }

    // -- Interactive ----------------------------------------------------------

    #[test]
    fn interactive_saves_on_exit() {
        let (_dir, vfs) = temp_vfs();
        let out = pkg(&vfs, None, "install zlib\n\nINSTALL png\nlist\nexit\n");
        assert!(out.contains("Installed libraries:\n  - zlib\n  - png\n"));
        assert!(out.ends_with("Package installer session ended.\n"));
        assert_eq!(vfs.read(REGISTRY_PATH).unwrap(), "zlib\npng\n");
    }

    #[test]
    fn interactive_help_and_eof() {
        let (_dir, vfs) = temp_vfs();
        let out = pkg(&vfs, Some("   "), "help\n");
        assert!(out.contains(HELP));
        assert!(out.ends_with("Input error. Exiting package installer.\n"));
    }

    #[test]
    fn interactive_without_changes_does_not_write() {
        let (_dir, vfs) = temp_vfs();
        pkg(&vfs, None, "list\nexit\n");
        assert!(!vfs.exists(REGISTRY_PATH));
    }
}
