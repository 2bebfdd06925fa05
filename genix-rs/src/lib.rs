//! Genix: a scientific calculator, a month calendar and a toy package
//! registry behind a small shell, with file access sandboxed under a
//! project root.

pub mod calc;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod logging;
pub mod pkg;
pub mod shell;
pub mod term;
pub mod vfs;
