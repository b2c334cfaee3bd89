//! Help text rendering for a prepared [`Parser`].

use optscan_core::{Entry, OptionSpec, Parser, ShortFlag, Value, ValueKind};

/// Narrowest description column before wrapping gives up on alignment.
const MIN_DESCRIPTION_WIDTH: usize = 20;

/// Renders help text for `parser`, wrapping descriptions to `width` columns.
///
/// Banner text and options appear in declaration order. When the first
/// entry is an option, the version line and an `Options:` header come first.
pub fn render(parser: &Parser, width: usize) -> String {
    let entries = parser.entries();
    let rows: Vec<(&OptionSpec, String)> = parser
        .specs()
        .map(|spec| (spec, format_left(spec)))
        .collect();
    let left_width = rows.iter().map(|(_, left)| left.len()).max().unwrap_or(0);
    let indent = left_width + 4;
    let description_width = width.saturating_sub(indent).max(MIN_DESCRIPTION_WIDTH);

    let mut out = String::new();
    if !matches!(entries.first(), Some(Entry::Text(_))) {
        if let Some(version) = parser.version_text() {
            out.push_str(version);
            out.push('\n');
        }
        out.push_str("Options:\n");
    }

    for entry in entries {
        match entry {
            Entry::Text(text) => {
                out.push_str(text);
                out.push('\n');
            }
            Entry::Option(name) => {
                let Some((spec, left)) = rows.iter().find(|(spec, _)| &spec.name == name) else {
                    continue;
                };
                let lines = wrap(&format_description(spec), description_width);
                let mut lines = lines.iter();
                match lines.next() {
                    Some(first) => {
                        out.push_str(&format!("  {left:left_width$}  {first}\n"));
                    }
                    None => out.push_str(&format!("  {left}\n")),
                }
                for line in lines {
                    out.push_str(&format!("{:indent$}{line}\n", ""));
                }
            }
        }
    }
    out
}

fn placeholder(kind: ValueKind) -> Option<&'static str> {
    match kind {
        ValueKind::Flag => None,
        ValueKind::Int => Some("<i>"),
        ValueKind::Ints => Some("<i+>"),
        ValueKind::String => Some("<s>"),
        ValueKind::Strings => Some("<s+>"),
        ValueKind::Float => Some("<f>"),
        ValueKind::Floats => Some("<f+>"),
        ValueKind::Date => Some("<date>"),
        ValueKind::Dates => Some("<date+>"),
        ValueKind::Io => Some("<file>"),
        ValueKind::Ios => Some("<file+>"),
    }
}

/// `--long, -s <i>`
fn format_left(spec: &OptionSpec) -> String {
    let mut out = spec.long_switch();
    if let ShortFlag::Char(c) = spec.short {
        out.push_str(&format!(", -{c}"));
    }
    if let Some(placeholder) = placeholder(spec.kind) {
        out.push(' ');
        out.push_str(placeholder);
    }
    out
}

fn format_description(spec: &OptionSpec) -> String {
    let description = spec.description.trim();
    let empty_list = matches!(&spec.default, Value::List(items) if items.is_empty());
    if !spec.default.is_truthy() || empty_list {
        return description.to_string();
    }
    let default = &spec.default;
    match description {
        "" => format!("(default: {default})"),
        d if d.ends_with('.') => format!("{d} (Default: {default})"),
        d => format!("{d} (default: {default})"),
    }
}

/// Greedy word wrap; words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
