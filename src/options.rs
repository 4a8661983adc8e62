//! Backend option parsing.
//!
//! Each backend declares its flags as a static [`OptionSchema`]. Parsing
//! consumes leading flags and stops at the first token that is not a flag;
//! that token and everything after it are positional.
//!
//! ```
//! use lookup::options::{OptionSchema, OptionSpec};
//!
//! const SPECS: &[OptionSpec] = &[OptionSpec::value("l", "selector", "language pair")];
//! let schema = OptionSchema::new(SPECS);
//!
//! let parsed = schema.parse(&["-l", "frde", "sugar"]).unwrap();
//! assert_eq!(parsed.value("l"), Some("frde"));
//! assert_eq!(parsed.positional, vec!["sugar"]);
//! ```

use std::collections::BTreeMap;

use crate::error::ArgumentError;

/// What a flag carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Presence flag (`-v`).
    Bool,
    /// Flag followed by a value (`-l ende` or `-lende`).
    Value,
}

/// Declaration of a single flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Flag name without the leading dash.
    pub name: &'static str,
    pub kind: OptionKind,
    /// Placeholder shown in usage text for value flags.
    pub value_name: &'static str,
    pub help: &'static str,
}

impl OptionSpec {
    #[must_use]
    pub const fn flag(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            kind: OptionKind::Bool,
            value_name: "",
            help,
        }
    }

    #[must_use]
    pub const fn value(name: &'static str, value_name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            kind: OptionKind::Value,
            value_name,
            help,
        }
    }

    /// Usage form, e.g. `-l <selector>`.
    #[must_use]
    pub fn synopsis(&self) -> String {
        match self.kind {
            OptionKind::Bool => format!("-{}", self.name),
            OptionKind::Value => format!("-{} <{}>", self.name, self.value_name),
        }
    }
}

/// Resolved value of a parsed flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Present,
    Value(String),
}

/// Flags a backend accepts.
#[derive(Debug, Clone, Copy)]
pub struct OptionSchema {
    specs: &'static [OptionSpec],
}

impl OptionSchema {
    /// Wrap a static flag table. Flag names must be unique.
    #[must_use]
    pub fn new(specs: &'static [OptionSpec]) -> Self {
        debug_assert!(
            specs
                .iter()
                .enumerate()
                .all(|(i, a)| specs[i + 1..].iter().all(|b| a.name != b.name)),
            "duplicate flag in option schema"
        );
        Self { specs }
    }

    #[must_use]
    pub fn specs(&self) -> &'static [OptionSpec] {
        self.specs
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static OptionSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Apply the schema to raw trailing arguments.
    ///
    /// `--` ends flag parsing and is dropped. A bare `-` or any token not
    /// starting with `-` ends flag parsing and is kept as positional. A value
    /// flag may carry its value attached (`-lfrde`) or as the next token.
    /// When a flag repeats, the last occurrence wins.
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<ParsedOptions, ArgumentError> {
        let mut parsed = ParsedOptions::default();
        let mut i = 0;

        while i < args.len() {
            let token = args[i].as_ref();

            if token == "--" {
                i += 1;
                break;
            }
            let Some(name) = token.strip_prefix('-').filter(|n| !n.is_empty()) else {
                break;
            };

            if let Some(spec) = self.get(name) {
                match spec.kind {
                    OptionKind::Bool => {
                        parsed.options.insert(spec.name.to_string(), OptionValue::Present);
                    }
                    OptionKind::Value => {
                        let value = args
                            .get(i + 1)
                            .ok_or_else(|| ArgumentError::MissingValue(spec.name.to_string()))?;
                        parsed.options.insert(
                            spec.name.to_string(),
                            OptionValue::Value(value.as_ref().to_string()),
                        );
                        i += 1;
                    }
                }
            } else if let Some((spec, value)) = self.attached_value(name) {
                parsed
                    .options
                    .insert(spec.name.to_string(), OptionValue::Value(value.to_string()));
            } else {
                return Err(ArgumentError::UnknownFlag(name.to_string()));
            }
            i += 1;
        }

        parsed.positional = args[i..].iter().map(|a| a.as_ref().to_string()).collect();
        tracing::debug!(
            "parsed {} option(s), {} positional token(s)",
            parsed.options.len(),
            parsed.positional.len()
        );
        Ok(parsed)
    }

    /// Split `lfrde` into the value flag `l` and its attached value `frde`.
    fn attached_value<'a>(&self, name: &'a str) -> Option<(&'static OptionSpec, &'a str)> {
        self.specs
            .iter()
            .filter(|s| s.kind == OptionKind::Value)
            .find_map(|s| {
                name.strip_prefix(s.name)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (s, rest))
            })
    }
}

/// Result of applying an [`OptionSchema`] to raw arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    /// Every key was declared in the schema.
    pub options: BTreeMap<String, OptionValue>,
    /// Leftover tokens in input order.
    pub positional: Vec<String>,
}

impl ParsedOptions {
    /// Value of a string-valued flag, if given.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        match self.options.get(name) {
            Some(OptionValue::Value(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: &[OptionSpec] = &[
        OptionSpec::value("l", "selector", "language pair"),
        OptionSpec::flag("x", "exact match"),
    ];

    fn schema() -> OptionSchema {
        OptionSchema::new(SPECS)
    }

    #[test]
    fn value_flag_then_positionals() {
        let parsed = schema().parse(&["-l", "frde", "brown", "sugar"]).unwrap();
        assert_eq!(parsed.value("l"), Some("frde"));
        assert_eq!(parsed.positional, vec!["brown", "sugar"]);
    }

    #[test]
    fn attached_value() {
        let parsed = schema().parse(&["-lesde", "hola"]).unwrap();
        assert_eq!(parsed.value("l"), Some("esde"));
        assert_eq!(parsed.positional, vec!["hola"]);
    }

    #[test]
    fn bool_flag_is_present() {
        let parsed = schema().parse(&["-x", "word"]).unwrap();
        assert!(parsed.is_set("x"));
        assert_eq!(parsed.value("x"), None);
    }

    #[test]
    fn stops_at_first_non_flag() {
        let parsed = schema().parse(&["word", "-l", "ende"]).unwrap();
        assert!(parsed.options.is_empty());
        assert_eq!(parsed.positional, vec!["word", "-l", "ende"]);
    }

    #[test]
    fn double_dash_ends_flags_and_is_dropped() {
        let parsed = schema().parse(&["-x", "--", "-l", "ende"]).unwrap();
        assert!(parsed.is_set("x"));
        assert_eq!(parsed.positional, vec!["-l", "ende"]);
    }

    #[test]
    fn single_dash_is_positional() {
        let parsed = schema().parse(&["-", "x"]).unwrap();
        assert_eq!(parsed.positional, vec!["-", "x"]);
    }

    #[test]
    fn last_occurrence_wins() {
        let parsed = schema().parse(&["-l", "ende", "-l", "frde"]).unwrap();
        assert_eq!(parsed.value("l"), Some("frde"));
    }

    #[test]
    fn unknown_flag_rejected() {
        let err = schema().parse(&["-q", "word"]).unwrap_err();
        assert_eq!(err, ArgumentError::UnknownFlag("q".into()));
    }

    #[test]
    fn missing_value_rejected() {
        let err = schema().parse(&["-l"]).unwrap_err();
        assert_eq!(err, ArgumentError::MissingValue("l".into()));
    }

    #[test]
    fn empty_args() {
        let parsed = schema().parse::<&str>(&[]).unwrap();
        assert_eq!(parsed, ParsedOptions::default());
    }

    #[test]
    fn synopsis_forms() {
        assert_eq!(SPECS[0].synopsis(), "-l <selector>");
        assert_eq!(SPECS[1].synopsis(), "-x");
    }
}
