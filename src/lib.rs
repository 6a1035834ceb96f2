//! Declarative command line arguments parser with aggregated error
//! reporting and file-based help.
//!
//! A [`Config`] describes one level of a command line: typed options
//! (booleans with `--no-` negation, strings, enums), a positional-argument
//! policy, and recursively nested subcommands. [`parse`] checks the process
//! arguments against it and reports every usage problem at once instead of
//! aborting on the first:
//!
//! * errors accumulate in [`ParseResult::errors`], and the eventual exit
//!   status encodes their count as `2^n - 1`;
//! * help is a file, not a format string: a `help.txt` sitting next to the
//!   entrypoint, printed verbatim;
//! * parsing itself never prints and never exits. Both are deferred into a
//!   [`Help`] value the application invokes once it is ready.
//!
//! ```no_run
//! use pargs::{Config, OptionSpec, Positionals};
//!
//! fn main() -> pargs::Result<()> {
//!     let config = Config::new()
//!         .option("verbose", OptionSpec::boolean())
//!         .option("level", OptionSpec::one_of(["debug", "info", "warn"]))
//!         .positionals(Positionals::Max(2));
//!
//!     let entrypoint = std::env::current_exe().unwrap();
//!     let result = pargs::parse(&entrypoint, &config)?;
//!     result.help.invoke().unwrap(); // prints and exits, when warranted
//!
//!     let verbose = result.values["verbose"].as_bool().unwrap_or(false);
//!     let _ = (verbose, result.positionals);
//!     Ok(())
//! }
//! ```
//!
//! The `help` option is implicit at every level and reserved: `--help`
//! short-circuits nothing at parse time, it just makes the eventual
//! [`Help::invoke`] print `help.txt` to stdout and exit with 0.

mod config;
mod help;
mod parse;
pub mod tokenize;

pub use crate::config::{Config, ConfigError, OptionSpec, Positionals};
pub use crate::help::{Help, Host, StdHost};
pub use crate::parse::{parse, parse_from, ParseResult, Subcommand};
pub use crate::tokenize::{Token, Value};

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
