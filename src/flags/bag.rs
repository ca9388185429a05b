use crate::flags::schema::{merged_aliases, FlagOptions};
use crate::log::LogLevel;
use std::collections::BTreeMap;

/// Value carried by a single flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    String(String),
    List(Vec<String>),
}

/// Immutable bag of parsed flags.
///
/// Built once from argv by [`parse`] and never mutated afterwards; the
/// [`FlagsReader`](crate::flags::reader::FlagsReader) adds interpretation on
/// top without touching the underlying values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flags {
    values: BTreeMap<String, FlagValue>,
    positional: Vec<String>,
    unexpected: Vec<String>,
    help: bool,
    default_level: Option<LogLevel>,
}

impl Flags {
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.values.get(name)
    }

    /// True when the named flag is present with a boolean `true` value.
    pub fn bool_flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FlagValue::Bool(true)))
    }

    /// Arguments left over after flag parsing, in command-line order.
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Flag names seen on the command line but absent from the declared
    /// schema, de-duplicated in first-seen order.
    pub fn unexpected(&self) -> &[String] {
        &self.unexpected
    }

    pub fn help(&self) -> bool {
        self.help
    }

    pub(crate) fn default_level(&self) -> Option<LogLevel> {
        self.default_level
    }
}

/// Parses process arguments against the declared schema.
///
/// Recognized forms: `--name=value`, `--name value` (string flags only; the
/// next token is consumed unless it looks like another flag), `--name` and
/// `--no-name` for booleans, `-v` short aliases and `-ab` clusters resolved
/// through the alias table, and `--` to stop flag parsing. Repeating a
/// string flag accumulates a [`FlagValue::List`] in argument order.
/// Undeclared flags keep their guessed value and are recorded as unexpected.
///
/// Parsing is deterministic: identical input always yields an identical bag.
pub fn parse(argv: &[String], options: &FlagOptions, default_level: Option<LogLevel>) -> Flags {
    let aliases = merged_aliases(options);
    let booleans = options.boolean_names();
    let strings = options.string_names();
    let canonical =
        |name: &str| -> String { aliases.get(name).cloned().unwrap_or_else(|| name.to_string()) };

    let mut values: BTreeMap<String, FlagValue> = BTreeMap::new();
    let mut positional = Vec::new();
    let mut unexpected: Vec<String> = Vec::new();
    let record_unexpected = |list: &mut Vec<String>, name: &str| {
        if !list.iter().any(|seen| seen == name) {
            list.push(name.to_string());
        }
    };

    let mut iter = argv.iter().peekable();
    let mut flags_done = false;

    while let Some(token) = iter.next() {
        if flags_done {
            positional.push(token.clone());
            continue;
        }
        if token == "--" {
            flags_done = true;
            continue;
        }

        if let Some(rest) = token.strip_prefix("--") {
            let (raw_name, inline) = match rest.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (rest, None),
            };
            let name = canonical(raw_name);

            if booleans.contains(&name) {
                let truthy = !matches!(inline.as_deref(), Some("false") | Some("0"));
                values.insert(name, FlagValue::Bool(truthy));
            } else if let Some(base) = name.strip_prefix("no-").filter(|base| booleans.contains(*base)) {
                values.insert(base.to_string(), FlagValue::Bool(false));
            } else if strings.contains(&name) {
                let value = inline.unwrap_or_else(|| take_value(&mut iter));
                push_string(&mut values, name, value);
            } else {
                record_unexpected(&mut unexpected, &name);
                match inline {
                    Some(value) => push_string(&mut values, name, value),
                    None => {
                        values.insert(name, FlagValue::Bool(true));
                    }
                }
            }
        } else if token.len() > 1 && token.starts_with('-') {
            let shorts: Vec<char> = token.chars().skip(1).collect();
            for (index, short) in shorts.iter().enumerate() {
                let name = canonical(&short.to_string());
                if booleans.contains(&name) {
                    values.insert(name, FlagValue::Bool(true));
                } else if strings.contains(&name) {
                    // Only the trailing short in a cluster may take a value.
                    let value = if index + 1 == shorts.len() {
                        take_value(&mut iter)
                    } else {
                        String::new()
                    };
                    push_string(&mut values, name, value);
                } else {
                    record_unexpected(&mut unexpected, &name);
                    values.insert(name, FlagValue::Bool(true));
                }
            }
        } else {
            positional.push(token.clone());
        }
    }

    for (name, value) in &options.default {
        values.entry(canonical(name)).or_insert_with(|| value.clone());
    }

    let help = matches!(values.get("help"), Some(FlagValue::Bool(true)));
    Flags {
        values,
        positional,
        unexpected,
        help,
        default_level,
    }
}

fn take_value(iter: &mut std::iter::Peekable<std::slice::Iter<'_, String>>) -> String {
    match iter.peek() {
        Some(next) if !next.starts_with('-') => iter.next().cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

fn push_string(values: &mut BTreeMap<String, FlagValue>, name: String, value: String) {
    match values.remove(&name) {
        Some(FlagValue::String(previous)) => {
            values.insert(name, FlagValue::List(vec![previous, value]));
        }
        Some(FlagValue::List(mut list)) => {
            list.push(value);
            values.insert(name, FlagValue::List(list));
        }
        _ => {
            values.insert(name, FlagValue::String(value));
        }
    }
}
