//! Style store: per-backend settings resolved by context pattern.
//!
//! Settings live in `~/.config/lookup/styles.toml` as an ordered list of
//! rules. Each rule has a glob `pattern` matched against an invocation
//! [`Context`] and any number of style keys:
//!
//! ```toml
//! [[styles]]
//! pattern = ":lookup:*"
//! browser = "firefox"
//!
//! [[styles]]
//! pattern = ":lookup:leo:*"
//! language = "frde"
//! interface-language = "de"
//! ```
//!
//! For a given key, the most specific matching pattern that defines the key
//! wins. A pattern with more colon-separated components is more specific; at
//! equal length, components are compared left to right with a literal
//! beating a glob and any glob beating a bare `*`. Ties go to the rule
//! defined first.
//!
//! Patterns are compiled when the store is built, so a malformed pattern is
//! reported at load time and [`StyleResolver::resolve`] never fails.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use globset::{GlobBuilder, GlobMatcher};
use serde::Deserialize;

use crate::error::LookupError;

/// Root namespace of every context.
pub const NAMESPACE: &str = "lookup";

/// Refinement used when the caller does not give one.
pub const DEFAULT_REFINEMENT: &str = "default";

/// Lookup key for style resolution: `:lookup:<backend>:<refinement>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Context(String);

impl Context {
    #[must_use]
    pub fn new(backend: &str, refinement: Option<&str>) -> Self {
        let refinement = refinement
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REFINEMENT);
        Self(format!(":{NAMESPACE}:{backend}:{refinement}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A configured style value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl StyleValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StyleValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Str(s.to_string())
    }
}

impl From<bool> for StyleValue {
    fn from(b: bool) -> Self {
        StyleValue::Bool(b)
    }
}

/// Ranking of a pattern; greater is more specific.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Specificity {
    components: usize,
    weights: Vec<u8>,
}

impl Specificity {
    fn of(pattern: &str) -> Self {
        let weights: Vec<u8> = pattern
            .split(':')
            .map(|component| {
                if component == "*" {
                    0
                } else if component.contains(['*', '?', '[', '{']) {
                    1
                } else {
                    2
                }
            })
            .collect();
        Self {
            components: weights.len(),
            weights,
        }
    }
}

/// A compiled context pattern.
#[derive(Debug, Clone)]
pub struct StylePattern {
    source: String,
    matcher: GlobMatcher,
    specificity: Specificity,
}

impl StylePattern {
    /// Compile a shell glob (`*`, `?`, `[...]`, `[!...]`, `{a,b}`).
    pub fn new(pattern: &str) -> Result<Self, LookupError> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map_err(|e| {
                LookupError::Config(format!("invalid pattern '{pattern}': {}", e.kind()))
            })?;
        Ok(Self {
            source: pattern.to_string(),
            matcher: glob.compile_matcher(),
            specificity: Specificity::of(pattern),
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn matches(&self, context: &Context) -> bool {
        self.matcher.is_match(context.as_str())
    }
}

/// One `[[styles]]` entry.
#[derive(Debug, Clone)]
pub struct StyleRule {
    pub pattern: StylePattern,
    pub values: BTreeMap<String, StyleValue>,
}

#[derive(Debug, Deserialize, Default)]
struct StylesFile {
    #[serde(default)]
    styles: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    pattern: String,
    #[serde(flatten)]
    values: BTreeMap<String, StyleValue>,
}

/// Ranked set of style rules.
#[derive(Debug, Clone, Default)]
pub struct StyleStore {
    /// Most specific first; equal specificity keeps definition order.
    rules: Vec<StyleRule>,
}

impl StyleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a style file's contents.
    pub fn from_toml(content: &str) -> Result<Self, LookupError> {
        let file: StylesFile =
            toml::from_str(content).map_err(|e| LookupError::Config(e.to_string()))?;

        let mut store = Self::new();
        for raw in file.styles {
            store.push(StyleRule {
                pattern: StylePattern::new(&raw.pattern)?,
                values: raw.values,
            });
        }
        Ok(store)
    }

    /// Load the style file at `path`.
    ///
    /// Returns an empty store if the file doesn't exist (styles are optional).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("no style file at {}", path.display());
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let store =
            Self::from_toml(&content).with_context(|| format!("in {}", path.display()))?;
        tracing::debug!("loaded {} style rule(s) from {}", store.len(), path.display());
        Ok(store)
    }

    /// Define a single style, like one `zstyle` call.
    pub fn set(
        &mut self,
        pattern: &str,
        key: &str,
        value: impl Into<StyleValue>,
    ) -> Result<&mut Self, LookupError> {
        let mut values = BTreeMap::new();
        values.insert(key.to_string(), value.into());
        self.push(StyleRule {
            pattern: StylePattern::new(pattern)?,
            values,
        });
        Ok(self)
    }

    fn push(&mut self, rule: StyleRule) {
        // Insert after every rule at least as specific so earlier
        // definitions win ties.
        let at = self
            .rules
            .iter()
            .position(|r| r.pattern.specificity < rule.pattern.specificity)
            .unwrap_or(self.rules.len());
        self.rules.insert(at, rule);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Read-only style lookups, as seen by backends.
pub trait StyleResolver {
    /// Value of `key` from the most specific rule matching `context`.
    fn resolve(&self, context: &Context, key: &str) -> Option<&StyleValue>;

    /// String-valued style. Values of another type count as unset.
    fn resolve_str(&self, context: &Context, key: &str) -> Option<&str> {
        self.resolve(context, key).and_then(StyleValue::as_str)
    }

    /// Boolean style. Values of another type count as unset.
    fn resolve_bool(&self, context: &Context, key: &str) -> Option<bool> {
        self.resolve(context, key).and_then(StyleValue::as_bool)
    }
}

impl StyleResolver for StyleStore {
    fn resolve(&self, context: &Context, key: &str) -> Option<&StyleValue> {
        let hit = self.rules.iter().find_map(|rule| {
            rule.values
                .get(key)
                .filter(|_| rule.pattern.matches(context))
                .map(|v| (rule.pattern.as_str(), v))
        });

        match hit {
            Some((pattern, value)) => {
                tracing::debug!("style {key} in {context}: matched '{pattern}'");
                Some(value)
            }
            None => {
                tracing::debug!("style {key} in {context}: not set");
                None
            }
        }
    }
}

/// Return the path to the default style file.
#[must_use]
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(NAMESPACE)
        .join("styles.toml")
}
