//! LEO online dictionary (dict.leo.org).
//!
//! `-l <selector>` picks the language pair; the rest of the arguments form
//! the query. Without `-l`, the `language` style is used, then `ende`. The
//! site's interface language comes from the `interface-language` style,
//! default `en`.
//!
//! ```text
//! lookup leo -l frde sucre
//! → https://dict.leo.org/?lang=en&lp=frde&search=sucre
//! ```

use std::io::{self, Write};

use super::{
    catalog_candidates, lookup_code, write_catalog, write_defaults, write_options, Backend,
    CatalogEntry, Completion, Invocation,
};
use crate::encode::encode;
use crate::error::{LookupError, ValidationError};
use crate::options::{OptionSchema, OptionSpec, ParsedOptions};

/// A supported language pair.
pub type LanguagePair = CatalogEntry;

/// Selector used when neither `-l` nor the `language` style gives one.
pub const DEFAULT_PAIR: &str = "ende";

/// Interface language used when the `interface-language` style is unset.
pub const DEFAULT_INTERFACE_LANGUAGE: &str = "en";

/// Style holding the default selector.
pub const LANGUAGE_STYLE: &str = "language";

/// Style holding the interface language.
pub const INTERFACE_LANGUAGE_STYLE: &str = "interface-language";

/// Language pairs offered by dict.leo.org.
pub const PAIRS: &[LanguagePair] = &[
    LanguagePair {
        code: "ende",
        description: "english german",
    },
    LanguagePair {
        code: "frde",
        description: "french german",
    },
    LanguagePair {
        code: "esde",
        description: "spanish german",
    },
    LanguagePair {
        code: "itde",
        description: "italian german",
    },
    LanguagePair {
        code: "chde",
        description: "chinese german",
    },
    LanguagePair {
        code: "rude",
        description: "russian german",
    },
    LanguagePair {
        code: "ptde",
        description: "portuguese german",
    },
    LanguagePair {
        code: "plde",
        description: "polish german",
    },
];

const OPTIONS: &[OptionSpec] = &[OptionSpec::value(
    "l",
    "selector",
    "language pair to translate between",
)];

/// Check `selector` against the catalog.
pub fn validate(selector: &str) -> Result<&'static LanguagePair, ValidationError> {
    lookup_code(PAIRS, selector)
}

/// Everything needed to build the lookup URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRequest {
    pub interface_language: String,
    pub pair: &'static str,
    /// Already percent-encoded.
    pub query: String,
}

impl TargetRequest {
    #[must_use]
    pub fn uri(&self) -> String {
        format!(
            "https://dict.leo.org/?lang={}&lp={}&search={}",
            encode(&self.interface_language),
            self.pair,
            self.query
        )
    }
}

/// dict.leo.org backend.
pub struct LeoBackend;

impl Backend for LeoBackend {
    fn name(&self) -> &'static str {
        "leo"
    }

    fn describe(&self) -> &'static str {
        "translate words with the LEO online dictionaries (dict.leo.org)"
    }

    fn options(&self) -> OptionSchema {
        OptionSchema::new(OPTIONS)
    }

    fn help(&self, inv: &Invocation<'_>, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "usage: lookup {} [-l <selector>] <query>", self.name())?;
        writeln!(out)?;
        writeln!(out, "Translate a word or phrase with dict.leo.org.")?;
        writeln!(out)?;
        write_options(out, &self.options())?;
        writeln!(out)?;
        write_catalog(out, "Language pairs", PAIRS)?;
        writeln!(out)?;
        write_defaults(
            out,
            inv,
            &[
                (LANGUAGE_STYLE, DEFAULT_PAIR),
                (INTERFACE_LANGUAGE_STYLE, DEFAULT_INTERFACE_LANGUAGE),
            ],
        )?;
        writeln!(out)?;
        writeln!(out, "Examples:")?;
        writeln!(out, "  lookup {} Zucker", self.name())?;
        writeln!(out, "  lookup {} -l frde sucre", self.name())
    }

    fn completions(&self) -> Vec<Completion> {
        vec![Completion {
            option: "l",
            generate: || catalog_candidates(PAIRS),
        }]
    }

    fn execute(&self, inv: &mut Invocation<'_>, parsed: &ParsedOptions) -> Result<i32, LookupError> {
        let selector = parsed
            .value("l")
            .or_else(|| inv.style(LANGUAGE_STYLE))
            .unwrap_or(DEFAULT_PAIR)
            .to_string();

        inv.set_query(&parsed.positional);

        // Both failures force help; only the selector carries a diagnostic.
        let pair = validate(&selector)?;
        if inv.query.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }

        let request = TargetRequest {
            interface_language: inv
                .style(INTERFACE_LANGUAGE_STYLE)
                .unwrap_or(DEFAULT_INTERFACE_LANGUAGE)
                .to_string(),
            pair: pair.code,
            query: inv.query.encoded().into_owned(),
        };
        tracing::debug!("leo: {request:?}");
        inv.launch(request.uri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::Harness;
    use crate::backend::Mode;
    use crate::error::{EXIT_FAILURE, EXIT_SUCCESS};
    use crate::style::StyleStore;

    fn query_of(uri: &str) -> String {
        let url = url::Url::parse(uri).unwrap();
        url.query_pairs()
            .find(|(k, _)| k == "search")
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    #[test]
    fn every_catalog_selector_validates() {
        for pair in PAIRS {
            assert_eq!(validate(pair.code).unwrap().code, pair.code);
        }
    }

    #[test]
    fn unknown_selector_rejected() {
        for bad in ["xx", "", "ENDE", "ende "] {
            assert_eq!(
                validate(bad).unwrap_err(),
                ValidationError::UnknownSelector(bad.to_string())
            );
        }
    }

    #[test]
    fn catalog_codes_are_unique() {
        for (i, a) in PAIRS.iter().enumerate() {
            assert!(PAIRS[i + 1..].iter().all(|b| a.code != b.code));
        }
    }

    #[test]
    fn explicit_selector_builds_uri() {
        let mut h = Harness::new();
        let code = h.run(&LeoBackend, Mode::Execute, &["-l", "frde", "sugar"]);
        assert_eq!(code, EXIT_SUCCESS);
        let opened = h.opened();
        assert_eq!(opened, vec!["https://dict.leo.org/?lang=en&lp=frde&search=sugar"]);
        assert_eq!(query_of(&opened[0]), "sugar");
    }

    #[test]
    fn default_selector_is_ende() {
        let mut h = Harness::new();
        h.run(&LeoBackend, Mode::Execute, &["house"]);
        assert_eq!(
            h.opened(),
            vec!["https://dict.leo.org/?lang=en&lp=ende&search=house"]
        );
    }

    #[test]
    fn styles_supply_defaults() {
        let mut store = StyleStore::new();
        store.set(":lookup:leo:*", LANGUAGE_STYLE, "esde").unwrap();
        store.set(":lookup:*", INTERFACE_LANGUAGE_STYLE, "de").unwrap();
        let mut h = Harness::with_styles(store);
        h.run(&LeoBackend, Mode::Execute, &["casa"]);
        assert_eq!(
            h.opened(),
            vec!["https://dict.leo.org/?lang=de&lp=esde&search=casa"]
        );
    }

    #[test]
    fn flag_beats_style() {
        let mut store = StyleStore::new();
        store.set(":lookup:leo:*", LANGUAGE_STYLE, "esde").unwrap();
        let mut h = Harness::with_styles(store);
        h.run(&LeoBackend, Mode::Execute, &["-l", "itde", "casa"]);
        assert_eq!(
            h.opened(),
            vec!["https://dict.leo.org/?lang=en&lp=itde&search=casa"]
        );
    }

    #[test]
    fn multi_word_query_is_encoded() {
        let mut h = Harness::new();
        h.run(&LeoBackend, Mode::Execute, &["brown", "sugar", "&", "salt"]);
        let opened = h.opened();
        assert_eq!(
            opened,
            vec!["https://dict.leo.org/?lang=en&lp=ende&search=brown%20sugar%20%26%20salt"]
        );
        assert_eq!(query_of(&opened[0]), "brown sugar & salt");
    }

    #[test]
    fn unknown_selector_forces_help() {
        let mut h = Harness::new();
        let code = h.run(&LeoBackend, Mode::Execute, &["-l", "xx", "hello"]);
        assert_eq!(code, EXIT_FAILURE);
        assert_eq!(h.stderr(), "leo: unknown language selector: xx\n");
        assert!(h.stdout().starts_with("usage: lookup leo"));
        assert!(h.opened().is_empty());
    }

    #[test]
    fn unknown_style_selector_forces_help() {
        let mut store = StyleStore::new();
        store.set(":lookup:leo:*", LANGUAGE_STYLE, "klingon").unwrap();
        let mut h = Harness::with_styles(store);
        assert_eq!(h.run(&LeoBackend, Mode::Execute, &["hello"]), EXIT_FAILURE);
        assert!(h.stderr().contains("klingon"));
        assert!(h.opened().is_empty());
    }

    #[test]
    fn empty_query_forces_help() {
        let mut h = Harness::new();
        let code = h.run(&LeoBackend, Mode::Execute, &["-l", "ende"]);
        assert_eq!(code, EXIT_FAILURE);
        assert!(h.stderr().is_empty());
        assert!(h.stdout().contains("Language pairs:"));
        assert!(h.opened().is_empty());
    }

    #[test]
    fn missing_selector_value_forces_help() {
        let mut h = Harness::new();
        assert_eq!(h.run(&LeoBackend, Mode::Execute, &["-l"]), EXIT_FAILURE);
        assert_eq!(h.stderr(), "leo: missing argument for option: -l\n");
        assert!(h.stdout().starts_with("usage:"));
    }

    #[test]
    fn launcher_failure_passes_through() {
        let mut h = Harness::new();
        h.launcher.status = 3;
        assert_eq!(h.run(&LeoBackend, Mode::Execute, &["sugar"]), 3);
        assert_eq!(h.opened().len(), 1);
    }

    #[test]
    fn describe_is_pure() {
        let mut h = Harness::new();
        assert_eq!(h.run(&LeoBackend, Mode::Describe, &["-l", "xx"]), EXIT_SUCCESS);
        assert!(!h.stdout().is_empty());
        assert!(!h.stdout().ends_with('\n'));
        assert_eq!(h.styles.lookups.get(), 0);
        assert!(h.opened().is_empty());
    }

    #[test]
    fn help_lists_each_pair_once() {
        let mut h = Harness::new();
        assert_eq!(h.run(&LeoBackend, Mode::Help, &[]), EXIT_SUCCESS);
        let text = h.stdout();
        for pair in PAIRS {
            let line = format!("  {:>8}  {}", pair.code, pair.description);
            assert_eq!(text.lines().filter(|l| *l == line).count(), 1, "{line}");
        }
        assert!(text.contains("-l <selector>"));
        assert!(text.contains("lookup leo -l frde sucre"));
    }

    #[test]
    fn help_shows_configured_defaults() {
        let mut store = StyleStore::new();
        store.set(":lookup:leo:*", LANGUAGE_STYLE, "frde").unwrap();
        let mut h = Harness::with_styles(store);
        h.run(&LeoBackend, Mode::Help, &[]);
        let text = h.stdout();
        assert!(text.contains("Defaults (:lookup:leo:default):"));
        assert!(text.contains("language            frde (style)"));
        assert!(text.contains("interface-language  en\n"));
    }

    #[test]
    fn complete_lists_catalog() {
        let mut h = Harness::new();
        assert_eq!(h.run(&LeoBackend, Mode::Complete, &[]), EXIT_SUCCESS);
        let text = h.stdout();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("-l"));
        assert_eq!(lines.next(), Some("ende:english german"));
        assert_eq!(text.lines().count(), PAIRS.len() + 1);
        assert!(h.opened().is_empty());
    }
}
