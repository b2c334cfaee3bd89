use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const DEFINITION: &str = r#"
version: "greeter 1.4"
banner:
  - "Usage: greeter [options] <name>..."
options:
  - name: times
    description: How many greetings
    default: 1
  - name: loud
    description: Shout
  - name: lang
    type: string
    multi: true
  - name: since
    type: date
  - name: token
    type: string
    required: true
conflicts:
  - [loud, lang]
stop_words: [exec]
"#;

fn write_definition(dir: &TempDir, file_name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(file_name);
    fs::write(&path, contents).expect("failed to write definition");
    path
}

fn optscan(definition: &Path, extra: &[&str], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_optscan"))
        .arg("--spec")
        .arg(definition)
        .args(extra)
        .arg("--")
        .args(args)
        .output()
        .expect("failed to run optscan")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn parses_values_to_json() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "greeter.yml", DEFINITION);

    let output = optscan(
        &definition,
        &[],
        &["ann", "bob", "-t", "3", "--token=abc", "--lang", "en", "--lang", "fi", "--since", "2024-05-01"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["values"]["times"], 3);
    assert_eq!(json["values"]["times_given"], true);
    assert_eq!(json["values"]["loud"], false);
    assert!(json["values"].get("loud_given").is_none());
    assert_eq!(json["values"]["lang"], serde_json::json!(["en", "fi"]));
    assert_eq!(json["values"]["since"], "2024-05-01");
    assert_eq!(json["values"]["token"], "abc");
    assert_eq!(json["leftovers"], serde_json::json!(["ann", "bob"]));
}

#[test]
fn stop_word_leaves_subcommand_unparsed() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "greeter.yaml", DEFINITION);

    let output = optscan(&definition, &[], &["--token", "x", "exec", "--loud", "-z"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["values"]["loud"], false);
    assert_eq!(json["leftovers"], serde_json::json!(["exec", "--loud", "-z"]));
}

#[test]
fn yaml_output() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "greeter.yml", DEFINITION);

    let output = optscan(&definition, &["--format", "yaml"], &["--token", "x"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("token: x"), "stdout: {text}");
    assert!(text.contains("leftovers: []"), "stdout: {text}");
}

#[test]
fn help_exits_zero_with_rendered_options() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "greeter.yml", DEFINITION);

    // Help wins over the missing required option.
    let output = optscan(&definition, &[], &["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("Usage: greeter [options] <name>...\n"));
    assert!(text.contains("--times, -t <i>"));
    assert!(text.contains("How many greetings (default: 1)"));
    assert!(text.contains("--since, -s <date>"));
}

#[test]
fn version_exits_zero() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "greeter.yml", DEFINITION);

    let output = optscan(&definition, &[], &["-v"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "greeter 1.4");
}

#[test]
fn parse_errors_exit_one() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "greeter.yml", DEFINITION);

    let cases: &[(&[&str], &str)] = &[
        (&["--bogus"], "Error: unknown argument '--bogus'."),
        (&["--token", "x", "--loud", "--lang", "en"], "Error: --loud conflicts with --lang."),
        (&[], "Error: option --token must be specified."),
        (&["--token", "x", "-t", "many"], "Error: option '-t' needs an integer."),
    ];
    for (args, message) in cases {
        let output = optscan(&definition, &[], args);
        assert_eq!(output.status.code(), Some(1), "args {args:?}");
        let err = stderr(&output);
        assert!(err.contains(message), "args {args:?}, stderr: {err}");
        assert!(err.contains("Try --help for help."));
        assert!(stdout(&output).is_empty());
    }
}

#[test]
fn json_definitions_are_accepted() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(
        &dir,
        "tool.json",
        r#"{"options": [{"name": "ratio", "type": "floats"}, {"name": "verbose"}], "stop_on_unknown": true}"#,
    );

    let output = optscan(&definition, &[], &["-r", "-1.5", ".5", "-v", "file", "-r", "2"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["values"]["ratio"], serde_json::json!([-1.5, 0.5]));
    assert_eq!(json["values"]["verbose"], true);
    assert_eq!(json["leftovers"], serde_json::json!(["file", "-r", "2"]));
}

#[test]
fn invalid_definition_is_reported() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(
        &dir,
        "bad.yml",
        "options:\n  - name: n\n    type: int\n    default: text\n",
    );

    let output = optscan(&definition, &[], &[]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("error: Invalid definition"), "stderr: {err}");
}

#[test]
fn unsupported_extension_is_reported() {
    let dir = TempDir::new().unwrap();
    let definition = write_definition(&dir, "tool.toml", "");

    let output = optscan(&definition, &[], &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error: Failed to load"));
}
