//! External type-checker watch-output parsing.
//!
//! The compiler does not type-check the source language itself; watch mode
//! delegates to the toolchain's checker running as a long-lived subprocess.
//! Its buffered output is a sequence of compilation cycles: error lines of
//! the form `<file>(<line>,<col>): error TS<code>: <message>`, each cycle
//! terminated by a `Found <N> error(s)` summary line.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};

use crate::diagnostic::CompilerError;

/// One parsed type error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypecheckError {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub code: u32,
    pub message: String,
}

/// One compilation cycle of the checker's watch mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypecheckCycle {
    pub errors: Vec<TypecheckError>,

    /// The error count from the cycle's summary line. Authoritative even
    /// when individual error lines were missed.
    pub reported_errors: usize,
}

impl TypecheckCycle {
    pub fn success(&self) -> bool {
        self.reported_errors == 0
    }
}

/// Parses a `<file>(<line>,<col>): error TS<code>: <message>` line.
pub fn parse_error_line(line: &str) -> Option<TypecheckError> {
    let (location, rest) = line.split_once("): ")?;
    let rest = rest.strip_prefix("error TS")?;
    let (code, message) = rest.split_once(": ")?;
    let code: u32 = code.parse().ok()?;

    let (file, position) = location.split_once('(')?;
    let (line_no, column) = position.split_once(',')?;
    Some(TypecheckError {
        file: PathBuf::from(file),
        line: line_no.trim().parse().ok()?,
        column: column.trim().parse().ok()?,
        code,
        message: message.trim().to_string(),
    })
}

/// Parses a `Found <N> error(s)` cycle terminator, returning N.
pub fn parse_cycle_end(line: &str) -> Option<usize> {
    let rest = line.trim().strip_prefix("Found ")?;
    let (count, tail) = rest.split_once(' ')?;
    if !tail.starts_with("error") {
        return None;
    }
    count.parse().ok()
}

/// A long-lived watch session over the external checker.
///
/// `next_cycle` pulls one compilation cycle at a time. The child process is
/// spawned with `kill_on_drop`, so ending the consuming loop early and
/// dropping the session terminates the checker.
pub struct TypecheckSession {
    _child: Child,
    lines: Lines<BufReader<ChildStdout>>,
}

impl TypecheckSession {
    /// Spawns the checker with its stdout piped into the session.
    pub fn spawn(program: &str, args: &[&str]) -> Result<Self, CompilerError> {
        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CompilerError::TypecheckSpawn {
                program: program.to_string(),
                message: e.to_string(),
            })?;

        let stdout = child.stdout.take().ok_or_else(|| CompilerError::TypecheckSpawn {
            program: program.to_string(),
            message: "stdout was not captured".to_string(),
        })?;

        Ok(Self {
            _child: child,
            lines: BufReader::new(stdout).lines(),
        })
    }

    /// Reads until the next cycle terminator. Returns `None` when the
    /// checker's output stream ends.
    pub async fn next_cycle(&mut self) -> Result<Option<TypecheckCycle>, CompilerError> {
        let mut errors = Vec::new();
        while let Some(line) = self
            .lines
            .next_line()
            .await
            .map_err(|e| CompilerError::TypecheckIo {
                message: e.to_string(),
            })?
        {
            if let Some(error) = parse_error_line(&line) {
                errors.push(error);
                continue;
            }
            if let Some(reported_errors) = parse_cycle_end(&line) {
                return Ok(Some(TypecheckCycle {
                    errors,
                    reported_errors,
                }));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_standard_error_line() {
        let parsed =
            parse_error_line("src/user/user.service.ts(14,5): error TS2304: Cannot find name 'db'.")
                .unwrap();
        assert_eq!(parsed.file, PathBuf::from("src/user/user.service.ts"));
        assert_eq!(parsed.line, 14);
        assert_eq!(parsed.column, 5);
        assert_eq!(parsed.code, 2304);
        assert_eq!(parsed.message, "Cannot find name 'db'.");
    }

    #[test]
    fn non_error_lines_are_ignored() {
        assert_eq!(parse_error_line("Starting compilation in watch mode..."), None);
        assert_eq!(
            parse_error_line("src/a.ts(3,7): warning TS1234: nope"),
            None
        );
        assert_eq!(parse_error_line(""), None);
    }

    #[test]
    fn cycle_end_parses_singular_and_plural() {
        assert_eq!(
            parse_cycle_end("Found 0 errors. Watching for file changes."),
            Some(0)
        );
        assert_eq!(parse_cycle_end("Found 1 error."), Some(1));
        assert_eq!(parse_cycle_end("Found 12 errors."), Some(12));
        assert_eq!(parse_cycle_end("Found nothing"), None);
        assert_eq!(parse_cycle_end("error TS2304"), None);
    }

    #[tokio::test]
    async fn session_pulls_cycles_until_stream_end() {
        let script = concat!(
            "echo 'Starting compilation in watch mode...';",
            "echo \"src/a.ts(3,7): error TS2304: Cannot find name 'x'.\";",
            "echo 'Found 1 error. Watching for file changes.';",
            "echo 'Found 0 errors. Watching for file changes.';",
        );
        let mut session = TypecheckSession::spawn("sh", &["-c", script]).unwrap();

        let first = session.next_cycle().await.unwrap().unwrap();
        assert_eq!(first.reported_errors, 1);
        assert!(!first.success());
        assert_eq!(first.errors.len(), 1);
        assert_eq!(first.errors[0].code, 2304);

        let second = session.next_cycle().await.unwrap().unwrap();
        assert!(second.success());
        assert!(second.errors.is_empty());

        assert_eq!(session.next_cycle().await.unwrap(), None);
    }
}
