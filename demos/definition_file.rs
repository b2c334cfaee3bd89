//! Parser built from a YAML definition.
//!
//! Writes a definition into a temporary directory, loads it with
//! `ParserDefinition::load` and parses a fixed argument vector.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p optscan-demos --example definition_file
//! ```

use optscan_core::{ParseOutcome, ParserDefinition};

const DEFINITION: &str = r#"
version: "report 2.3"
banner:
  - "Usage: report [options] <source>..."
options:
  - name: since
    description: First day to include
    type: date
    default: "2024-01-01"
  - name: format
    description: Output format
    default: table
  - name: exclude
    description: Sources to skip
    type: strings
    multi: true
depends:
  - [exclude, format]
"#;

fn main() {
    let dir = std::env::temp_dir().join("optscan_example_definition");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("report.yml");
    std::fs::write(&path, DEFINITION).unwrap();

    let definition = ParserDefinition::load(&path).unwrap();
    let mut parser = definition.build().unwrap();

    let argv = [
        "db1", "db2", "--since", "Mar 1, 2024", "-f", "json", "-e", "a", "b", "-e", "c",
    ];
    match parser.parse(argv) {
        Ok(ParseOutcome::Values(args)) => {
            for (key, value) in args.iter() {
                println!("{key:<14} {value}");
            }
            println!("{:<14} {:?}", "leftovers", args.leftovers());
        }
        Ok(other) => println!("{other:?}"),
        Err(err) => eprintln!("Error: {err}."),
    }

    std::fs::remove_dir_all(&dir).ok();
}
