//! Deferred help and error reporting.
//!
//! Parsing never prints and never exits. Instead every parse result carries
//! a [`Help`] value that remembers whether `--help` was requested, which
//! usage errors accumulated, and where the help text lives: a `help.txt`
//! file sitting next to the entrypoint. The application decides when to
//! [`Help::invoke`] it, typically right after parsing.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Process-boundary collaborators for [`Help::invoke_on`]: line-oriented
/// console output, the pending exit status, and termination. Tests swap in a
/// recording implementation.
pub trait Host {
    fn stdout(&mut self, line: &str);
    fn stderr(&mut self, line: &str);
    fn exit_status(&self) -> Option<i32>;
    fn set_exit_status(&mut self, status: i32);
    fn exit(&mut self);
}

/// The real process: standard streams plus [`std::process::exit`].
#[derive(Debug, Default)]
pub struct StdHost {
    status: Option<i32>,
}

impl Host for StdHost {
    fn stdout(&mut self, line: &str) {
        println!("{line}");
    }
    fn stderr(&mut self, line: &str) {
        eprintln!("{line}");
    }
    fn exit_status(&self) -> Option<i32> {
        self.status
    }
    fn set_exit_status(&mut self, status: i32) {
        self.status = Some(status);
    }
    fn exit(&mut self) {
        std::process::exit(self.exit_status().unwrap_or(0))
    }
}

/// A single-shot help action, captured at parse time and invoked at most
/// once. Cloning is cheap enough and lets a result be inspected in tests
/// after its help has been spent.
#[derive(Clone)]
pub struct Help {
    help_txt: PathBuf,
    requested: bool,
    errors: Vec<String>,
}

impl Help {
    pub(crate) fn new(help_dir: &Path, requested: bool, errors: &[String]) -> Help {
        Help { help_txt: help_dir.join("help.txt"), requested, errors: errors.to_vec() }
    }

    /// True when invoking would print and terminate the process.
    pub fn needed(&self) -> bool {
        self.requested || !self.errors.is_empty()
    }

    /// [`Help::invoke_on`] against the real process. Does nothing on a clean
    /// parse without `--help`; otherwise prints and does not return.
    pub fn invoke(self) -> io::Result<()> {
        self.invoke_on(&mut StdHost::default())
    }

    /// Prints the sibling `help.txt` and terminates the host.
    ///
    /// On request (`--help`) the text goes to stdout and the pending exit
    /// status is left alone. With usage errors the text goes to stderr
    /// followed by a blank line and one line per error, and a zero or unset
    /// exit status is replaced by `2^n - 1` for `n` errors. The help file is
    /// only read here, not at parse time; a missing file surfaces as the
    /// `Err` and the host is left untouched.
    pub fn invoke_on(self, host: &mut dyn Host) -> io::Result<()> {
        if !self.needed() {
            return Ok(());
        }
        let text = fs::read_to_string(&self.help_txt)?;
        if self.errors.is_empty() {
            host.stdout(&text);
        } else {
            host.stderr(&format!("{text}\n"));
            if host.exit_status().unwrap_or(0) == 0 {
                host.set_exit_status(error_status(self.errors.len()));
            }
            for error in &self.errors {
                host.stderr(error);
            }
        }
        host.exit();
        Ok(())
    }
}

/// The file path is environment-dependent, so `Debug` leaves it out.
impl fmt::Debug for Help {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Help")
            .field("requested", &self.requested)
            .field("errors", &self.errors.len())
            .finish()
    }
}

/// One error exits with 1, two with 3, `n` with `2^n - 1`, saturating at
/// `i32::MAX` once the count no longer fits.
fn error_status(errors: usize) -> i32 {
    if errors >= 31 {
        return i32::MAX;
    }
    (1i32 << errors) - 1
}
