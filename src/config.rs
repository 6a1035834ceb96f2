//! What a command line is allowed to look like: the options it takes, its
//! positional-argument policy, and the subcommands it dispatches to.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// How a single named option is typed and defaulted.
///
/// Enum options travel through the tokenizer as plain strings; membership in
/// `choices` is checked after tokenization so that a bad value is reported
/// alongside every other usage error instead of aborting the parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSpec {
    Boolean { default: Option<bool> },
    String { default: Option<String> },
    Enum { choices: Vec<String>, default: Option<String> },
}

impl OptionSpec {
    pub fn boolean() -> OptionSpec {
        OptionSpec::Boolean { default: None }
    }

    pub fn string() -> OptionSpec {
        OptionSpec::String { default: None }
    }

    /// An option restricted to `choices`. Without a default, supplying the
    /// option is effectively mandatory: an absent value is reported the same
    /// way as an out-of-set one.
    pub fn one_of<I>(choices: I) -> OptionSpec
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        OptionSpec::Enum { choices: choices.into_iter().map(Into::into).collect(), default: None }
    }
}

/// Positional-argument policy. `Config::positionals == None` means the
/// tokenizer rejects positionals outright; `Max(n)` admits them and caps the
/// count after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positionals {
    Unlimited,
    Max(usize),
}

/// One level of a command line. Subcommand configurations nest recursively,
/// each level owning its options and its own `help.txt` semantics.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub options: BTreeMap<String, OptionSpec>,
    pub positionals: Option<Positionals>,
    pub subcommands: Option<BTreeMap<String, Config>>,
    /// Pass the raw token stream through to the result.
    pub tokens: bool,
}

impl Config {
    pub fn new() -> Config {
        Config::default()
    }

    pub fn option(mut self, name: impl Into<String>, spec: OptionSpec) -> Config {
        self.options.insert(name.into(), spec);
        self
    }

    pub fn positionals(mut self, positionals: Positionals) -> Config {
        self.positionals = Some(positionals);
        self
    }

    pub fn subcommand(mut self, name: impl Into<String>, config: Config) -> Config {
        self.subcommands.get_or_insert_with(BTreeMap::new).insert(name.into(), config);
        self
    }

    pub fn tokens(mut self, tokens: bool) -> Config {
        self.tokens = tokens;
        self
    }

    /// Checks the invariants that hold independently of any argument vector.
    ///
    /// Validation runs per level: a nested configuration is checked when its
    /// subcommand is dispatched to, not before.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.options.contains_key("help") {
            return Err(ConfigError::HelpReserved);
        }
        if let Some(subcommands) = &self.subcommands {
            if subcommands.is_empty() {
                return Err(ConfigError::EmptySubcommands);
            }
            if self.positionals.is_some() {
                return Err(ConfigError::PositionalsWithSubcommands);
            }
        }
        for (name, spec) in &self.options {
            if matches!(spec, OptionSpec::Enum { choices, .. } if choices.is_empty()) {
                return Err(ConfigError::BadChoices(name.clone()));
            }
        }
        Ok(())
    }
}

/// A broken [`Config`] or an entrypoint that cannot be resolved. These are
/// programmer errors: unlike usage errors they are returned as `Err` and are
/// never folded into a result for `help` to report.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("the `help` option is reserved")]
    HelpReserved,
    #[error("`subcommands` must have at least one entry")]
    EmptySubcommands,
    #[error("`positionals` is not allowed when `subcommands` is defined")]
    PositionalsWithSubcommands,
    #[error("enum `choices` must not be empty; `{0}` is invalid")]
    BadChoices(String),
    #[error("can't resolve entrypoint `{}`: {source}", .path.display())]
    Entrypoint { path: PathBuf, source: io::Error },
}
