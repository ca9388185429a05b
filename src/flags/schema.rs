use crate::flags::bag::FlagValue;
use std::collections::{BTreeMap, BTreeSet};

/// Boolean flags every harness invocation understands, regardless of the
/// declared schema. They control log verbosity and the help short-circuit.
pub const BUILTIN_BOOLEAN_FLAGS: [&str; 5] = ["verbose", "debug", "quiet", "silent", "help"];

/// Built-in alias table applied before caller-supplied aliases.
pub fn default_flag_aliases() -> BTreeMap<String, String> {
    BTreeMap::from([("v".to_string(), "verbose".to_string())])
}

/// Declared flag schema for one command.
///
/// Flags not listed in `boolean` or `string` are recorded as unexpected by
/// the parser; whether that is an error is decided by `allow_unexpected`.
#[derive(Debug, Clone, Default)]
pub struct FlagOptions {
    pub boolean: Vec<String>,
    pub string: Vec<String>,
    pub alias: BTreeMap<String, String>,
    pub default: BTreeMap<String, FlagValue>,
    pub allow_unexpected: bool,
    pub help: Option<String>,
    pub examples: Option<String>,
}

impl FlagOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a boolean flag.
    pub fn boolean(mut self, name: impl Into<String>) -> Self {
        self.boolean.push(name.into());
        self
    }

    /// Declares a string flag. Repeating it on the command line accumulates
    /// a list value.
    pub fn string(mut self, name: impl Into<String>) -> Self {
        self.string.push(name.into());
        self
    }

    /// Maps `alias` to the canonical flag `name`.
    pub fn alias(mut self, alias: impl Into<String>, name: impl Into<String>) -> Self {
        self.alias.insert(alias.into(), name.into());
        self
    }

    /// Default value applied when the flag is absent from argv.
    pub fn default_value(mut self, name: impl Into<String>, value: FlagValue) -> Self {
        self.default.insert(name.into(), value);
        self
    }

    /// Permits flags outside the declared schema instead of failing the run.
    pub fn allow_unexpected(mut self, allow: bool) -> Self {
        self.allow_unexpected = allow;
        self
    }

    /// Extra help text describing the declared flags.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = Some(text.into());
        self
    }

    /// Usage examples rendered at the end of the help text.
    pub fn examples(mut self, text: impl Into<String>) -> Self {
        self.examples = Some(text.into());
        self
    }

    pub(crate) fn boolean_names(&self) -> BTreeSet<String> {
        BUILTIN_BOOLEAN_FLAGS
            .iter()
            .map(|name| name.to_string())
            .chain(self.boolean.iter().cloned())
            .collect()
    }

    pub(crate) fn string_names(&self) -> BTreeSet<String> {
        self.string.iter().cloned().collect()
    }
}

/// Merges the built-in alias table with caller-supplied aliases.
///
/// Caller entries win on key collision, so a schema may repurpose a built-in
/// shorthand like `-v` for its own flag.
pub fn merged_aliases(options: &FlagOptions) -> BTreeMap<String, String> {
    let mut aliases = default_flag_aliases();
    aliases.extend(options.alias.clone());
    aliases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_booleans_always_present() {
        let names = FlagOptions::new().boolean("force").boolean_names();
        for builtin in BUILTIN_BOOLEAN_FLAGS {
            assert!(names.contains(builtin), "missing builtin {builtin}");
        }
        assert!(names.contains("force"));
    }

    #[test]
    fn caller_alias_wins_over_builtin() {
        let options = FlagOptions::new().alias("v", "vivid");
        let aliases = merged_aliases(&options);
        assert_eq!(aliases.get("v").map(String::as_str), Some("vivid"));
    }

    #[test]
    fn builtin_alias_survives_disjoint_caller_aliases() {
        let options = FlagOptions::new().alias("d", "dir");
        let aliases = merged_aliases(&options);
        assert_eq!(aliases.get("v").map(String::as_str), Some("verbose"));
        assert_eq!(aliases.get("d").map(String::as_str), Some("dir"));
    }
}
