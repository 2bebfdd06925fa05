//! The `genix>` command dispatcher.

use std::io;

use tracing::debug;

use crate::term::Console;
use crate::vfs::Vfs;
use crate::{calc, calendar, pkg};

const HELP: &str = "\
Commands:
  calc              scientific calculator
  calendar          month calendar with events
  pkg [args]        package installer
  ls [path]         list a directory under the project root
  cat <path>        print a file under the project root
  help              this list
  exit, quit        leave the shell";

/// What the shell loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Shell {
    vfs: Vfs,
}

impl Shell {
    pub fn new(vfs: Vfs) -> Self {
        Shell { vfs }
    }

    pub fn vfs(&self) -> &Vfs {
        &self.vfs
    }

    /// Run one command line.
    pub fn execute(&self, line: &str, con: &mut Console<'_>) -> io::Result<Flow> {
        let line = line.trim();
        let (cmd, rest) = line
            .split_once(|c: char| c.is_ascii_whitespace())
            .unwrap_or((line, ""));
        let rest = rest.trim();
        if cmd.is_empty() {
            return Ok(Flow::Continue);
        }
        debug!(cmd, args = rest, "dispatch");

        match cmd {
            "exit" | "quit" => return Ok(Flow::Exit),
            "help" => writeln!(con.out, "{HELP}")?,
            "calc" => {
                calc::repl::run(con)?;
                writeln!(con.out, "Calculator closed.")?;
            }
            "calendar" => {
                calendar::run(&self.vfs, con)?;
                writeln!(con.out, "Calendar closed.")?;
            }
            "pkg" => {
                let args = (!rest.is_empty()).then_some(rest);
                pkg::run(&self.vfs, args, con)?;
                writeln!(con.out, "Package installer finished.")?;
            }
            "ls" => self.ls(rest, con)?,
            "cat" => self.cat(rest, con)?,
            _ => writeln!(con.out, "{cmd}: command not found")?,
        }
        Ok(Flow::Continue)
    }

    fn ls(&self, path: &str, con: &mut Console<'_>) -> io::Result<()> {
        match self.vfs.list(path) {
            Ok(entries) => {
                for e in entries {
                    let slash = if e.is_dir { "/" } else { "" };
                    writeln!(con.out, "{}{slash}", e.name)?;
                }
                Ok(())
            }
            Err(e) => writeln!(con.out, "ls: {e}"),
        }
    }

    fn cat(&self, path: &str, con: &mut Console<'_>) -> io::Result<()> {
        if path.is_empty() {
            return writeln!(con.out, "cat: missing file operand");
        }
        match self.vfs.read(path) {
            Ok(text) => {
                con.out.write_all(text.as_bytes())?;
                if !text.is_empty() && !text.ends_with('\n') {
                    writeln!(con.out)?;
                }
                Ok(())
            }
            Err(e) => writeln!(con.out, "cat: {e}"),
        }
    }

    /// The interactive `genix>` loop, until `exit`/`quit` or end of input.
    pub fn run(&self, con: &mut Console<'_>) -> io::Result<()> {
        loop {
            let Some(line) = con.prompt("genix> ")? else {
                writeln!(con.out)?;
                break;
            };
            if self.execute(&line, con)? == Flow::Exit {
                break;
            }
        }
        debug!("shell closed");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
