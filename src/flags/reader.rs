use crate::flags::bag::{FlagValue, Flags};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Flag-format error surfaced to the user.
///
/// Every variant is a user-input problem, so the cleanup handler prints the
/// help text alongside the message when one of these reaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagError {
    Unexpected { names: Vec<String> },
    MissingValue { name: String },
    WrongType { name: String, expected: &'static str },
    InvalidNumber { name: String, value: String },
}

impl std::fmt::Display for FlagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagError::Unexpected { names } => {
                write!(f, "Unknown flag(s) \"{}\"", names.join("\", \""))
            }
            FlagError::MissingValue { name } => {
                write!(f, "missing required value for --{name}")
            }
            FlagError::WrongType { name, expected } => {
                write!(f, "expected --{name} to be {expected}")
            }
            FlagError::InvalidNumber { name, value } => {
                write!(f, "unable to parse --{name} value \"{value}\" as a number")
            }
        }
    }
}

impl std::error::Error for FlagError {}

/// Alias-aware typed view over an immutable [`Flags`] bag.
///
/// Resolution tries the queried name directly, then through the alias table
/// in both directions, so callers may use either spelling. The reader never
/// changes the underlying values.
#[derive(Debug, Clone)]
pub struct FlagsReader {
    flags: Arc<Flags>,
    aliases: BTreeMap<String, String>,
}

impl FlagsReader {
    pub fn new(flags: Arc<Flags>, aliases: BTreeMap<String, String>) -> Self {
        Self { flags, aliases }
    }

    fn lookup(&self, name: &str) -> Option<&FlagValue> {
        if let Some(value) = self.flags.get(name) {
            return Some(value);
        }
        if let Some(canonical) = self.aliases.get(name) {
            if let Some(value) = self.flags.get(canonical) {
                return Some(value);
            }
        }
        self.aliases
            .iter()
            .filter(|(_, canonical)| canonical.as_str() == name)
            .find_map(|(alias, _)| self.flags.get(alias))
    }

    /// Canonical name the reader resolves `name` to.
    pub fn resolve(&self, name: &str) -> String {
        self.aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Boolean value of the flag; absent flags read as `false`.
    pub fn boolean(&self, name: &str) -> Result<bool, FlagError> {
        match self.lookup(name) {
            None => Ok(false),
            Some(FlagValue::Bool(value)) => Ok(*value),
            Some(_) => Err(FlagError::WrongType {
                name: name.to_string(),
                expected: "a boolean",
            }),
        }
    }

    pub fn string(&self, name: &str) -> Result<Option<&str>, FlagError> {
        match self.lookup(name) {
            None => Ok(None),
            Some(FlagValue::String(value)) => Ok(Some(value)),
            Some(_) => Err(FlagError::WrongType {
                name: name.to_string(),
                expected: "a single string",
            }),
        }
    }

    pub fn required_string(&self, name: &str) -> Result<&str, FlagError> {
        match self.string(name)? {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(FlagError::MissingValue {
                name: name.to_string(),
            }),
        }
    }

    /// All string values of the flag; a single string lifts to a one-element
    /// list and an absent flag reads as empty.
    pub fn strings(&self, name: &str) -> Result<Vec<String>, FlagError> {
        match self.lookup(name) {
            None => Ok(Vec::new()),
            Some(FlagValue::String(value)) => Ok(vec![value.clone()]),
            Some(FlagValue::List(values)) => Ok(values.clone()),
            Some(FlagValue::Bool(_)) => Err(FlagError::WrongType {
                name: name.to_string(),
                expected: "one or more strings",
            }),
        }
    }

    pub fn number(&self, name: &str) -> Result<Option<i64>, FlagError> {
        match self.string(name)? {
            None => Ok(None),
            Some(value) => value.parse().map(Some).map_err(|_| FlagError::InvalidNumber {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn required_number(&self, name: &str) -> Result<i64, FlagError> {
        self.number(name)?.ok_or_else(|| FlagError::MissingValue {
            name: name.to_string(),
        })
    }

    pub fn path(&self, name: &str) -> Result<Option<PathBuf>, FlagError> {
        Ok(self.string(name)?.map(PathBuf::from))
    }

    pub fn positional(&self) -> &[String] {
        self.flags.positional()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::bag::parse;
    use crate::flags::schema::{merged_aliases, FlagOptions};

    fn reader_for(argv: &[&str], options: &FlagOptions) -> FlagsReader {
        let argv: Vec<String> = argv.iter().map(|token| token.to_string()).collect();
        let flags = Arc::new(parse(&argv, options, None));
        FlagsReader::new(flags, merged_aliases(options))
    }

    #[test]
    fn resolves_alias_and_canonical_spellings() {
        let options = FlagOptions::new().string("output").alias("o", "output");
        let reader = reader_for(&["--output=dist"], &options);
        assert_eq!(reader.string("output").unwrap(), Some("dist"));
        assert_eq!(reader.string("o").unwrap(), Some("dist"));
    }

    #[test]
    fn caller_alias_overrides_builtin_shorthand() {
        let options = FlagOptions::new().string("vivid").alias("v", "vivid");
        let reader = reader_for(&["-v", "teal"], &options);
        assert_eq!(reader.resolve("v"), "vivid");
        assert_eq!(reader.string("vivid").unwrap(), Some("teal"));
    }

    #[test]
    fn absent_boolean_reads_false() {
        let reader = reader_for(&[], &FlagOptions::new());
        assert!(!reader.boolean("force").unwrap());
    }

    #[test]
    fn typed_getters_reject_mismatches() {
        let options = FlagOptions::new().boolean("force").string("from");
        let reader = reader_for(&["--force", "--from=here"], &options);
        assert!(matches!(
            reader.string("force"),
            Err(FlagError::WrongType { .. })
        ));
        assert!(matches!(
            reader.boolean("from"),
            Err(FlagError::WrongType { .. })
        ));
    }

    #[test]
    fn strings_lifts_single_value() {
        let options = FlagOptions::new().string("include");
        let reader = reader_for(&["--include=a"], &options);
        assert_eq!(reader.strings("include").unwrap(), ["a"]);

        let reader = reader_for(&["--include=a", "--include=b"], &options);
        assert_eq!(reader.strings("include").unwrap(), ["a", "b"]);
        assert!(reader.strings("missing").unwrap().is_empty());
    }

    #[test]
    fn numbers_parse_or_fail_clearly() {
        let options = FlagOptions::new().string("count");
        let reader = reader_for(&["--count=12"], &options);
        assert_eq!(reader.number("count").unwrap(), Some(12));
        assert_eq!(reader.required_number("count").unwrap(), 12);

        let reader = reader_for(&["--count=dozen"], &options);
        assert!(matches!(
            reader.number("count"),
            Err(FlagError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn unexpected_error_message_lists_names() {
        let error = FlagError::Unexpected {
            names: vec!["bogus".to_string(), "extra".to_string()],
        };
        assert_eq!(error.to_string(), "Unknown flag(s) \"bogus\", \"extra\"");
    }
}
