//! Builder API example.
//!
//! Declares a handful of options, parses the process arguments and prints
//! the typed values.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p optscan-demos --example basic -- -n 3 --ratio -0.25 --tags a b -- file.txt
//! ```

use optscan_core::{OptionSettings, ParseOutcome, Parser, ValueKind};

fn main() {
    let mut parser = Parser::new();
    parser.version("basic 0.1.0");
    parser.banner("Usage: basic [options] <file>...");
    parser
        .opt("count", "Number of passes", OptionSettings::new().short("n").with_default(1))
        .unwrap();
    parser
        .opt("ratio", "Blend ratio", OptionSettings::new().kind_of::<f64>())
        .unwrap();
    parser
        .opt("tags", "Labels to attach", OptionSettings::new().kind(ValueKind::Strings))
        .unwrap();
    parser
        .opt("dry_run", "Only show what would happen", OptionSettings::new())
        .unwrap();

    let args = match parser.parse(std::env::args().skip(1)) {
        Ok(ParseOutcome::Values(args)) => args,
        Ok(ParseOutcome::HelpRequested) => {
            for spec in parser.specs() {
                println!("  {:<12} {}", spec.long_switch(), spec.description);
            }
            return;
        }
        Ok(ParseOutcome::VersionRequested) => {
            println!("{}", parser.version_text().unwrap_or_default());
            return;
        }
        Err(err) => {
            eprintln!("Error: {err}.");
            std::process::exit(1);
        }
    };

    println!("count   = {:?}", args.int("count"));
    println!("ratio   = {:?}", args.float("ratio"));
    println!("tags    = {:?}", args.get("tags"));
    println!("dry run = {:?} (given: {})", args.flag("dry_run"), args.given("dry_run"));
    println!("files   = {:?}", args.leftovers());
}
