//! The parse pipeline: argv filtering, tokenization, accumulated usage
//! checks, and subcommand dispatch.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use crate::config::{Config, ConfigError, OptionSpec, Positionals};
use crate::help::Help;
use crate::tokenize::{self, Decl, Table, Token, TokenizeError, Tokenized, Value};
use crate::Result;

/// Everything one invocation produced.
///
/// Usage problems do not abort the parse; they accumulate in `errors` (and
/// in `help`) while `values` and `positionals` still hold whatever was
/// recovered. `values` always contains a `help` entry. `command` is set only
/// when a configured subcommand actually matched, and then `help` is the
/// matched level's help, not this one's.
#[derive(Debug)]
pub struct ParseResult {
    pub values: BTreeMap<String, Value>,
    pub positionals: Vec<String>,
    pub errors: Vec<String>,
    pub help: Help,
    pub command: Option<Box<Subcommand>>,
    /// The raw token stream, when [`Config::tokens`] asked for it.
    pub tokens: Option<Vec<Token>>,
}

/// A matched subcommand: its name and the nested parse of the remaining
/// arguments.
#[derive(Debug)]
pub struct Subcommand {
    pub name: String,
    pub result: ParseResult,
}

/// Parses the process arguments against `config`.
///
/// `entrypoint` is the file the application considers its own entry point;
/// its directory is where `help.txt` is looked up, and any argument that
/// resolves to it (or to the current executable) is dropped before parsing,
/// so launcher-style argv prefixes never show up as positionals.
pub fn parse(entrypoint: impl AsRef<Path>, config: &Config) -> Result<ParseResult> {
    let argv: Vec<String> =
        env::args_os().skip(1).map(|arg| arg.to_string_lossy().into_owned()).collect();
    parse_from(entrypoint, argv, config)
}

/// [`parse`], but over an explicit argument vector.
pub fn parse_from(
    entrypoint: impl AsRef<Path>,
    argv: Vec<String>,
    config: &Config,
) -> Result<ParseResult> {
    let entrypoint = entrypoint.as_ref();
    let entry = fs::canonicalize(entrypoint)
        .map_err(|source| ConfigError::Entrypoint { path: entrypoint.to_path_buf(), source })?;
    let exe = env::current_exe().ok().and_then(|exe| fs::canonicalize(exe).ok());
    let help_dir = entry.parent().unwrap_or(&entry).to_path_buf();
    let args: Vec<String> = argv
        .into_iter()
        .filter(|arg| match fs::canonicalize(arg) {
            Ok(real) => real != entry && exe.as_deref() != Some(real.as_path()),
            Err(_) => true,
        })
        .collect();
    parse_inner(&help_dir, args, config)
}

fn parse_inner(help_dir: &Path, args: Vec<String>, config: &Config) -> Result<ParseResult> {
    config.validate()?;

    // Enum options travel through the tokenizer as strings; their choice
    // lists are kept aside for the membership check below. `help` is always
    // declared, which is why configurations cannot.
    let mut table = Table::new();
    let mut enums: Vec<(&str, &[String])> = Vec::new();
    for (name, spec) in &config.options {
        match spec {
            OptionSpec::Boolean { default } => table.insert(name, Decl::Flag { default: *default }),
            OptionSpec::String { default } => {
                table.insert(name, Decl::Value { default: default.clone() })
            }
            OptionSpec::Enum { choices, default } => {
                enums.push((name.as_str(), choices.as_slice()));
                table.insert(name, Decl::Value { default: default.clone() });
            }
        }
    }
    table.insert("help", Decl::Flag { default: Some(false) });

    // With subcommands everything past the command name belongs to the
    // nested level, so only the first argument is tokenized here.
    let level_args: &[String] =
        if config.subcommands.is_some() { &args[..args.len().min(1)] } else { args.as_slice() };
    let allow_positionals = config.subcommands.is_some() || config.positionals.is_some();

    let Tokenized { tokens, mut values, positionals } =
        match tokenize::tokenize(level_args, &table, allow_positionals) {
            Ok(tokenized) => tokenized,
            Err(err) => return Ok(failed(help_dir, err)),
        };

    let mut errors = Vec::new();

    for (name, choices) in &enums {
        let valid =
            matches!(values.get(*name), Some(Value::Str(value)) if choices.contains(value));
        if !valid {
            errors.push(format!("Error: Invalid value for option \"{name}\""));
        }
    }

    let cap = match config.positionals {
        Some(Positionals::Max(max)) => Some(max),
        Some(Positionals::Unlimited) => None,
        None if config.subcommands.is_some() => None,
        None => Some(0),
    };
    if let Some(cap) = cap {
        if positionals.len() > cap {
            errors.push(format!(
                "Only {cap} positional arguments allowed; got {}",
                positionals.len()
            ));
        }
    }

    // The remaining checks care about spellings as supplied: `--no-x`
    // counts as `no-x`, not as the `x` it resolved to.
    let mut supplied: Vec<String> = Vec::new();
    for token in &tokens {
        if let Token::Option { name, raw } = token {
            let spelled = match raw.strip_prefix("--no-") {
                Some(base) => format!("no-{base}"),
                None => name.clone(),
            };
            if !supplied.contains(&spelled) {
                supplied.push(spelled);
            }
        }
    }
    let has = |name: &str| supplied.iter().any(|it| it == name);

    for (name, spec) in &config.options {
        if !matches!(spec, OptionSpec::Boolean { .. }) {
            continue;
        }
        let negated = format!("no-{name}");
        if has(name) && has(&negated) {
            errors.push(format!(
                "Error: Arguments `--{name}` and `--no-{name}` are mutually exclusive"
            ));
        }
        values.remove(&negated);
    }

    let mut known: Vec<String> = table.names().map(str::to_string).collect();
    for (name, spec) in &config.options {
        if matches!(spec, OptionSpec::Boolean { .. }) {
            known.push(format!("no-{name}"));
        }
    }
    let unknown: Vec<&String> = supplied.iter().filter(|it| !known.contains(it)).collect();
    if !unknown.is_empty() {
        let list = unknown.iter().map(|it| format!("`{it}`")).collect::<Vec<_>>().join(", ");
        errors.push(format!("Error: Unknown option(s): {list}"));
    }

    let mut command = None;
    if let Some(subcommands) = &config.subcommands {
        match args.first() {
            Some(name) => match subcommands.get(name) {
                Some(nested) => {
                    let result = parse_inner(help_dir, args[1..].to_vec(), nested)?;
                    command = Some(Box::new(Subcommand { name: name.clone(), result }));
                }
                None => errors.push(format!("Error: unknown command \"{name}\"")),
            },
            None => errors.push("Error: unknown command".to_string()),
        }
    }

    let help = match &command {
        Some(sub) => sub.result.help.clone(),
        None => {
            let requested = matches!(values.get("help"), Some(Value::Bool(true)));
            Help::new(help_dir, requested, &errors)
        }
    };

    Ok(ParseResult {
        values,
        positionals,
        errors,
        help,
        command,
        tokens: config.tokens.then_some(tokens),
    })
}

/// Tokenization failures downgrade to a result with a single error, the way
/// every other usage problem is reported. Nothing else is recovered.
fn failed(help_dir: &Path, err: TokenizeError) -> ParseResult {
    let errors = vec![format!("Error: {err}")];
    let help = Help::new(help_dir, false, &errors);
    ParseResult {
        values: BTreeMap::new(),
        positionals: Vec::new(),
        errors,
        help,
        command: None,
        tokens: None,
    }
}
