//! Interactive calculator loop.

use std::io;

use tracing::debug;

use crate::term::Console;

use super::{evaluate, format_result};

/// Run the calculator until `exit` or end of input.
///
/// Results go to the output stream as `Result: <value>`; failures go to the
/// error stream as `Error: <message>` and the loop carries on.
pub fn run(con: &mut Console<'_>) -> io::Result<()> {
    writeln!(con.out, "Scientific Calculator (type 'exit' to return)")?;

    loop {
        let Some(line) = con.prompt("Enter expression: ")? else {
            con.error("Input error. Exiting calculator.")?;
            break;
        };

        if line == "exit" {
            writeln!(con.out, "Calculator session ended.")?;
            break;
        }
        if line.is_empty() {
            continue;
        }

        match evaluate(&line) {
            Ok(value) => writeln!(con.out, "Result: {}", format_result(value))?,
            Err(e) => con.error(e)?,
        }
    }

    debug!("calculator session closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Styler;
    use std::io::Cursor;

    fn session(input: &str) -> (String, String) {
        let mut input = Cursor::new(input.to_owned());
        let (mut out, mut err) = (Vec::new(), Vec::new());
        {
            let mut con = Console::new(&mut input, &mut out, &mut err, Styler::plain());
            run(&mut con).unwrap();
        }
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn prints_results_and_exits() {
        let (out, err) = session("2+3*4\n(2+3)*4\nexit\n");
        assert!(out.starts_with("Scientific Calculator (type 'exit' to return)\n"));
        assert!(out.contains("Result: 14.0000\n"));
        assert!(out.contains("Result: 20.0000\n"));
        assert!(out.ends_with("Calculator session ended.\n"));
        assert!(err.is_empty());
    }

    #[test]
    fn errors_go_to_error_stream() {
        let (out, err) = session("1/0\nlog(0)\n5\nexit\n");
        assert_eq!(err, "Error: Division by zero.\nError: Logarithm domain error.\n");
        assert!(out.contains("Result: 5.0000"));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let (out, err) = session("\n\r\n\nexit\n");
        assert_eq!(out.matches("Enter expression: ").count(), 4);
        assert!(!out.contains("Result:"));
        assert!(err.is_empty());
    }

    #[test]
    fn crlf_input() {
        let (out, _) = session("-3!\r\nexit\r\n");
        assert!(out.contains("Result: -6.0000"));
        assert!(out.contains("Calculator session ended."));
    }

    #[test]
    fn end_of_input_leaves_with_error() {
        let (out, err) = session("2+2\n");
        assert!(out.contains("Result: 4.0000"));
        assert_eq!(err, "Error: Input error. Exiting calculator.\n");
    }

    #[test]
    fn exit_must_be_exact() {
        let (_, err) = session(" exit\nexit\n");
        assert!(err.contains("Unknown token 'exit'"));
    }
}
