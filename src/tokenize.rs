//! Strict argv tokenizer.
//!
//! This is the mechanical half of parsing: it walks an argument vector
//! against a flat table of declared options and either produces tokens,
//! values and positionals, or fails fast on the first structural problem.
//! Policy (positional caps, enum membership, negation conflicts, help) is
//! layered on top by the parser.
//!
//! Long options only. `--flag`, `--flag=value`, `--flag value`, `--no-flag`
//! for declared booleans, and `--` to treat everything after it as
//! positional.

use std::collections::BTreeMap;

use thiserror::Error;

/// A declared option, flattened to the two shapes the tokenizer knows:
/// flags take no argument, values take exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Flag { default: Option<bool> },
    Value { default: Option<String> },
}

/// Option declarations keyed by long name, without the leading `--`.
#[derive(Debug, Clone, Default)]
pub struct Table {
    decls: BTreeMap<String, Decl>,
}

impl Table {
    pub fn new() -> Table {
        Table::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, decl: Decl) {
        self.decls.insert(name.into(), decl);
    }

    pub fn get(&self, name: &str) -> Option<&Decl> {
        self.decls.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.decls.keys().map(String::as_str)
    }
}

/// One recognized argument, in the order supplied. `raw` keeps the spelling
/// from the command line (`--no-quiet`), `name` the declared option it
/// resolved to (`quiet`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Option { name: String, raw: String },
    Positional { value: String },
}

/// A parsed option value. Flags yield `Bool`, everything else `Str`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(it) => Some(*it),
            Value::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bool(_) => None,
            Value::Str(it) => Some(it.as_str()),
        }
    }
}

/// Everything a successful tokenization produces. Values carry last-wins
/// semantics for repeated options, with table defaults filled in for options
/// that never appeared.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub values: BTreeMap<String, Value>,
    pub positionals: Vec<String>,
}

/// Structural failures. Each aborts tokenization at the offending argument,
/// so at most one is ever reported per vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("Unknown option `{0}`")]
    UnknownOption(String),
    #[error("Option `{0}` does not take an argument")]
    UnexpectedValue(String),
    #[error("Option `{0}` requires a value")]
    MissingValue(String),
    #[error("Unexpected argument `{0}`")]
    UnexpectedPositional(String),
}

pub fn tokenize(
    args: &[String],
    table: &Table,
    allow_positionals: bool,
) -> Result<Tokenized, TokenizeError> {
    let mut res = Tokenized::default();
    let mut rargs: Vec<&str> = args.iter().rev().map(String::as_str).collect();
    let mut after_double_dash = false;

    while let Some(arg) = rargs.pop() {
        if arg == "--" && !after_double_dash {
            after_double_dash = true;
            continue;
        }
        if after_double_dash || !is_option_like(arg) {
            if !allow_positionals {
                return Err(TokenizeError::UnexpectedPositional(arg.to_string()));
            }
            res.tokens.push(Token::Positional { value: arg.to_string() });
            res.positionals.push(arg.to_string());
            continue;
        }
        let Some(rest) = arg.strip_prefix("--") else {
            // Short options are never declared at this layer.
            return Err(TokenizeError::UnknownOption(arg.to_string()));
        };
        let (word, inline) = match rest.split_once('=') {
            Some((word, value)) => (word, Some(value)),
            None => (rest, None),
        };
        let raw = format!("--{word}");
        // Resolve against the table; `--no-x` negates a declared flag `x`.
        let (name, decl, negated) = match table.get(word) {
            Some(decl) => (word, decl, false),
            None => {
                let negation = word
                    .strip_prefix("no-")
                    .and_then(|base| table.get(base).map(|decl| (base, decl)));
                match negation {
                    Some((base, decl @ Decl::Flag { .. })) => (base, decl, true),
                    _ => return Err(TokenizeError::UnknownOption(raw)),
                }
            }
        };
        match decl {
            Decl::Flag { .. } => {
                if inline.is_some() {
                    return Err(TokenizeError::UnexpectedValue(raw));
                }
                res.values.insert(name.to_string(), Value::Bool(!negated));
            }
            Decl::Value { .. } => {
                let value = match inline {
                    Some(value) => value.to_string(),
                    None => match rargs.last().copied() {
                        Some(next) if !is_option_like(next) => {
                            rargs.pop();
                            next.to_string()
                        }
                        _ => return Err(TokenizeError::MissingValue(raw)),
                    },
                };
                res.values.insert(name.to_string(), Value::Str(value));
            }
        }
        res.tokens.push(Token::Option { name: name.to_string(), raw });
    }

    for (name, decl) in &table.decls {
        if res.values.contains_key(name) {
            continue;
        }
        match decl {
            Decl::Flag { default: Some(it) } => {
                res.values.insert(name.clone(), Value::Bool(*it));
            }
            Decl::Value { default: Some(it) } => {
                res.values.insert(name.clone(), Value::Str(it.clone()));
            }
            Decl::Flag { default: None } | Decl::Value { default: None } => (),
        }
    }

    Ok(res)
}

/// A lone `-` is a positional by convention; anything longer that starts
/// with `-` is treated as an option.
fn is_option_like(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-')
}
