use expect_test::expect;
use pargs::{Config, OptionSpec, Positionals, Value};

use crate::{check, check_errors, fixture};

fn cli() -> Config {
    Config::new()
        .subcommand(
            "build",
            Config::new()
                .option("verbose", OptionSpec::boolean())
                .positionals(Positionals::Unlimited),
        )
        .subcommand("check", Config::new().option("fast", OptionSpec::boolean()))
}

#[test]
fn dispatch_hands_the_rest_down() {
    let f = fixture();
    let res = f.parse_ok("build --verbose x", &cli());
    check(
        &res,
        expect![[r#"
            ParseResult {
                values: {
                    "help": Bool(
                        false,
                    ),
                },
                positionals: [
                    "build",
                ],
                errors: [],
                help: Help {
                    requested: false,
                    errors: 0,
                },
                command: Some(
                    Subcommand {
                        name: "build",
                        result: ParseResult {
                            values: {
                                "help": Bool(
                                    false,
                                ),
                                "verbose": Bool(
                                    true,
                                ),
                            },
                            positionals: [
                                "x",
                            ],
                            errors: [],
                            help: Help {
                                requested: false,
                                errors: 0,
                            },
                            command: None,
                            tokens: None,
                        },
                    },
                ),
                tokens: None,
            }
        "#]],
    );
}

#[test]
fn unknown_command_is_reported_by_name() {
    let f = fixture();
    let res = f.parse_ok("deploy", &cli());
    check_errors(&res, expect![[r#"Error: unknown command "deploy""#]]);
    assert!(res.command.is_none());
}

#[test]
fn missing_command_is_reported_too() {
    let f = fixture();
    let res = f.parse_ok("", &cli());
    check_errors(&res, expect!["Error: unknown command"]);
    assert!(res.command.is_none());
}

#[test]
fn an_option_is_not_a_command() {
    let f = fixture();
    let res = f.parse_ok("--help", &cli());
    check_errors(&res, expect![[r#"Error: unknown command "--help""#]]);
    assert_eq!(res.values["help"], Value::Bool(true));
    assert!(res.help.needed());
}

#[test]
fn nested_usage_errors_stay_nested() {
    let f = fixture();
    let res = f.parse_ok("build --bogus", &cli());
    assert!(res.errors.is_empty());
    let sub = res.command.as_deref().unwrap();
    check_errors(&sub.result, expect!["Error: Unknown option `--bogus`"]);
    // The top-level help is the dispatched level's help.
    assert!(res.help.needed());
}

#[test]
fn nested_help_bubbles_up() {
    let f = fixture();
    let res = f.parse_ok("build --help", &cli());
    let sub = res.command.as_deref().unwrap();
    assert_eq!(sub.result.values["help"], Value::Bool(true));
    assert_eq!(res.values["help"], Value::Bool(false));
    assert!(res.help.needed());
}

#[test]
fn two_levels_deep() {
    let f = fixture();
    let config = Config::new().subcommand(
        "remote",
        Config::new().subcommand("add", Config::new().option("fetch", OptionSpec::boolean())),
    );
    let res = f.parse_ok("remote add --fetch", &config);
    assert_eq!(res.positionals, ["remote"]);
    let remote = res.command.as_deref().unwrap();
    assert_eq!(remote.name, "remote");
    let add = remote.result.command.as_deref().unwrap();
    assert_eq!(add.name, "add");
    assert_eq!(add.result.values["fetch"], Value::Bool(true));
}

#[test]
fn nested_config_is_validated_on_dispatch_only() {
    let f = fixture();
    let config =
        Config::new().subcommand("build", Config::new().option("help", OptionSpec::boolean()));

    // Not dispatched to, never validated.
    let res = f.parse("deploy", &config).unwrap();
    check_errors(&res, expect![[r#"Error: unknown command "deploy""#]]);

    let err = f.parse("build", &config).unwrap_err();
    expect!["the `help` option is reserved"].assert_eq(&err.to_string());
}

#[test]
fn subcommands_exclude_positionals() {
    let f = fixture();
    let config = cli().positionals(Positionals::Unlimited);
    let err = f.parse("build", &config).unwrap_err();
    expect!["`positionals` is not allowed when `subcommands` is defined"]
        .assert_eq(&err.to_string());
}
