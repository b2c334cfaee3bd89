//! Subcommand splitting with stop words.
//!
//! The global parser stops at the first subcommand name; the leftovers are
//! then handed to a parser built for that subcommand.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p optscan-demos --example subcommands -- --verbose commit -m "first" --amend
//! ```

use optscan_core::{OptionSettings, ParseOutcome, ParsedArgs, Parser, ValueKind};

const SUBCOMMANDS: &[&str] = &["commit", "push"];

fn global_parser() -> Parser {
    let mut parser = Parser::new();
    parser.opt("verbose", "Print more", OptionSettings::new()).unwrap();
    parser
        .opt("dir", "Work tree", OptionSettings::new().short("C").kind(ValueKind::String))
        .unwrap();
    parser.stop_on(SUBCOMMANDS.iter().copied());
    parser
}

fn subcommand_parser(name: &str) -> Option<Parser> {
    let mut parser = Parser::new();
    match name {
        "commit" => {
            parser
                .opt("message", "Commit message", OptionSettings::new().kind(ValueKind::String).required())
                .unwrap();
            parser.opt("amend", "Rewrite the last commit", OptionSettings::new()).unwrap();
        }
        "push" => {
            parser.opt("force", "Overwrite remote history", OptionSettings::new()).unwrap();
            parser
                .opt("remote", "Target remote", OptionSettings::new().with_default("origin"))
                .unwrap();
        }
        _ => return None,
    }
    Some(parser)
}

fn parse_or_exit(parser: &mut Parser, args: &[String]) -> ParsedArgs {
    match parser.parse(args) {
        Ok(ParseOutcome::Values(args)) => args,
        Ok(_) => {
            println!("options: {:?}", parser.specs().map(|s| s.long_switch()).collect::<Vec<_>>());
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("Error: {err}.");
            std::process::exit(1);
        }
    }
}

fn main() {
    let argv: Vec<String> = std::env::args().skip(1).collect();

    let global = parse_or_exit(&mut global_parser(), &argv);
    println!("global: {}", serde_json::to_string(&global).unwrap());

    let Some((name, rest)) = global.leftovers().split_first() else {
        eprintln!("Error: expected one of {SUBCOMMANDS:?}.");
        std::process::exit(1);
    };
    let Some(mut parser) = subcommand_parser(name) else {
        eprintln!("Error: unknown subcommand '{name}'.");
        std::process::exit(1);
    };

    let sub = parse_or_exit(&mut parser, rest);
    println!("{name}: {}", serde_json::to_string(&sub).unwrap());
}
