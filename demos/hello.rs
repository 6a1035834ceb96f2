use pargs::{Config, OptionSpec};

fn main() {
    let config = Config::new()
        .option("name", OptionSpec::string())
        .option("emoji", OptionSpec::boolean());

    let entrypoint = match std::env::current_exe() {
        Ok(it) => it,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1)
        }
    };

    // `help.txt` is expected next to the executable; `--help` (or a usage
    // error) prints it and exits.
    match pargs::parse(&entrypoint, &config) {
        Ok(result) => {
            if let Err(err) = result.help.invoke() {
                eprintln!("{err}");
                std::process::exit(1)
            }
            let name = result.values.get("name").and_then(|it| it.as_str()).unwrap_or("world");
            let bang = match result.values.get("emoji").and_then(|it| it.as_bool()) {
                Some(true) => "❣️",
                _ => "!",
            };
            println!("Hello {name}{bang}");
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1)
        }
    }
}
