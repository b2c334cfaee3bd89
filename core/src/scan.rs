//! Argument vector scanning.
//!
//! [`Scanner::scan`] walks the argument vector once, left to right. Each
//! token is classified in this order:
//!
//! 1. a stop word: scanning halts, the stop word and everything after it are
//!    left unconsumed;
//! 2. `--`: scanning halts, everything after it is left unconsumed;
//! 3. `--name=value`: one occurrence with the single parameter `value`;
//! 4. `--name`: one occurrence, followed by the collected parameters;
//! 5. `-xyz`: the short flags `x` and `y` are bare occurrences, `z` gets the
//!    collected parameters;
//! 6. anything else is positional (or halts scanning in stop-on-unknown
//!    mode).
//!
//! Parameters are the tokens following a switch up to the next token that
//! looks like a switch or is a stop word. Negative and leading-dot numbers
//! (`-3`, `-.5`) do not look like switches, so they can be parameters.
//!
//! The scanner knows nothing about option types. It hands every occurrence to
//! a callback that returns how many of the offered parameters it took; the
//! rest are scanned again as ordinary tokens.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::error::ParseError;

static PATTERNS: LazyLock<SwitchPatterns> = LazyLock::new(SwitchPatterns::new);

struct SwitchPatterns {
    // Token shapes
    long_with_value: Regex,
    long: Regex,
    short_cluster: Regex,

    // Tokens that end parameter collection
    switch_like: Regex,

    // Single switches handed to the callback
    single_short: Regex,
    single_long: Regex,
}

impl SwitchPatterns {
    fn new() -> Self {
        Self {
            // --name=value
            long_with_value: Regex::new(r"(?s)^--(\S+?)=(.*)$").expect("static regex must compile"),
            // --name
            long: Regex::new(r"^--(\S+)$").expect("static regex must compile"),
            // -x, -xyz
            short_cluster: Regex::new(r"^-(\S+)$").expect("static regex must compile"),
            // --anything, a trailing "-.", or a dash followed by a non-digit non-dot
            switch_like: Regex::new(r"^-(-|\.$|[^0-9.])").expect("static regex must compile"),
            single_short: Regex::new(r"^-([^-])$").expect("static regex must compile"),
            single_long: Regex::new(r"^--([^-]\S*)$").expect("static regex must compile"),
        }
    }
}

/// A switch as handed to the scan callback, split into its flag text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch<'a> {
    /// `-x`
    Short(char),
    /// `--name` (text without dashes)
    Long(&'a str),
}

impl<'a> Switch<'a> {
    /// Splits a switch token into its flag text.
    ///
    /// # Errors
    ///
    /// [`ParseError::InvalidSyntax`] for tokens such as `---x` or `--` that
    /// are neither a single short nor a long switch.
    pub fn parse(arg: &'a str) -> Result<Self, ParseError> {
        if let Some(caps) = PATTERNS.single_short.captures(arg) {
            if let Some(c) = caps.get(1).and_then(|m| m.as_str().chars().next()) {
                return Ok(Self::Short(c));
            }
        }
        if let Some(m) = PATTERNS.single_long.captures(arg).and_then(|caps| caps.get(1)) {
            return Ok(Self::Long(m.as_str()));
        }
        Err(ParseError::InvalidSyntax(arg.to_string()))
    }
}

/// Single pass tokenizer over an argument vector.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    stop_words: &'a [String],
    stop_on_unknown: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(stop_words: &'a [String], stop_on_unknown: bool) -> Self {
        Self {
            stop_words,
            stop_on_unknown,
        }
    }

    /// Scans `args`, calling `on_switch(switch, params)` for every switch
    /// occurrence, and returns the unconsumed tokens.
    ///
    /// `params` is `None` when no parameter follows the switch. The callback
    /// returns how many of the offered parameters it consumed; the first
    /// error it returns aborts the scan.
    ///
    /// # Examples
    ///
    /// ```
    /// use optscan_core::Scanner;
    ///
    /// let args: Vec<String> = ["-ab", "x", "y", "--", "-c"]
    ///     .iter()
    ///     .map(|s| s.to_string())
    ///     .collect();
    /// let mut seen = Vec::new();
    /// let leftovers = Scanner::new(&[], false)
    ///     .scan(&args, |switch, params| {
    ///         seen.push((switch.to_string(), params.map(|p| p.to_vec())));
    ///         Ok(params.map_or(0, |_| 1))
    ///     })
    ///     .unwrap();
    ///
    /// assert_eq!(seen[0], ("-a".to_string(), None));
    /// assert_eq!(seen[1], ("-b".to_string(), Some(vec!["x".to_string(), "y".to_string()])));
    /// assert_eq!(leftovers, vec!["y", "-c"]);
    /// ```
    pub fn scan<F>(&self, args: &[String], mut on_switch: F) -> Result<Vec<String>, ParseError>
    where
        F: FnMut(&str, Option<&[String]>) -> Result<usize, ParseError>,
    {
        let mut remains = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = args[i].as_str();

            if self.is_stop_word(arg) {
                trace!(token = arg, "Stop word, halting scan");
                remains.extend_from_slice(&args[i..]);
                return Ok(remains);
            }

            if arg == "--" {
                trace!("Argument terminator, halting scan");
                remains.extend_from_slice(&args[i + 1..]);
                return Ok(remains);
            }

            if let Some(caps) = PATTERNS.long_with_value.captures(arg) {
                trace!(token = arg, "Long switch with inline value");
                let switch = format!("--{}", &caps[1]);
                let value = [caps[2].to_string()];
                on_switch(&switch, Some(value.as_slice()))?;
                i += 1;
                continue;
            }

            if PATTERNS.long.is_match(arg) {
                trace!(token = arg, "Long switch");
                i += self.dispatch(args, i, arg, &mut on_switch)?;
                continue;
            }

            if let Some(caps) = PATTERNS.short_cluster.captures(arg) {
                trace!(token = arg, "Short switch cluster");
                let letters: Vec<char> = caps[1].chars().collect();
                if let Some((last, init)) = letters.split_last() {
                    for c in init {
                        on_switch(&format!("-{c}"), None)?;
                    }
                    i += self.dispatch(args, i, &format!("-{last}"), &mut on_switch)?;
                    continue;
                }
            }

            if self.stop_on_unknown {
                trace!(token = arg, "Positional argument, halting scan");
                remains.extend_from_slice(&args[i..]);
                return Ok(remains);
            }

            trace!(token = arg, "Positional argument");
            remains.push(arg.to_string());
            i += 1;
        }

        Ok(remains)
    }

    /// Offers the parameters following `args[at]` to the callback and
    /// returns how many tokens to advance past the switch.
    fn dispatch<F>(
        &self,
        args: &[String],
        at: usize,
        switch: &str,
        on_switch: &mut F,
    ) -> Result<usize, ParseError>
    where
        F: FnMut(&str, Option<&[String]>) -> Result<usize, ParseError>,
    {
        let params = self.collect_parameters(args, at + 1);
        if params.is_empty() {
            on_switch(switch, None)?;
            return Ok(1);
        }
        let taken = on_switch(switch, Some(params))?;
        Ok(1 + taken.min(params.len()))
    }

    /// The run of parameter-shaped tokens starting at `start`.
    fn collect_parameters<'s>(&self, args: &'s [String], start: usize) -> &'s [String] {
        let rest = args.get(start..).unwrap_or_default();
        let len = rest
            .iter()
            .take_while(|arg| !PATTERNS.switch_like.is_match(arg) && !self.is_stop_word(arg))
            .count();
        &rest[..len]
    }

    fn is_stop_word(&self, arg: &str) -> bool {
        self.stop_words.iter().any(|word| word == arg)
    }
}

/// What was given for one option during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Given {
    /// Option name.
    pub name: String,
    /// Switch text of the latest occurrence, as typed (`-n`, `--num`).
    pub arg: String,
    /// One parameter group per occurrence that received parameters.
    pub groups: Vec<Vec<String>>,
}

/// Options given during one parse call, in order of first occurrence.
#[derive(Debug, Clone, Default)]
pub struct GivenArgs {
    given: Vec<Given>,
    index: HashMap<String, usize>,
}

impl GivenArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Given> {
        self.index.get(name).map(|&idx| &self.given[idx])
    }

    /// Records an occurrence of `name` typed as `arg`, returning its entry so
    /// parameters can be attached.
    pub fn record(&mut self, name: &str, arg: &str) -> &mut Given {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.given.push(Given {
                    name: name.to_string(),
                    arg: String::new(),
                    groups: Vec::new(),
                });
                let idx = self.given.len() - 1;
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        let entry = &mut self.given[idx];
        entry.arg = arg.to_string();
        entry
    }

    pub fn iter(&self) -> impl Iterator<Item = &Given> {
        self.given.iter()
    }

    pub fn len(&self) -> usize {
        self.given.len()
    }

    pub fn is_empty(&self) -> bool {
        self.given.is_empty()
    }
}
