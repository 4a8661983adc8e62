//! Wikipedia full-text search.
//!
//! `-l <edition>` picks the language edition (the `edition` style, then
//! `en`, when absent). Opens the edition's search page, which redirects
//! straight to the article on an exact title match.

use std::io::{self, Write};

use super::{
    catalog_candidates, lookup_code, write_catalog, write_defaults, write_options, Backend,
    CatalogEntry, Completion, Invocation,
};
use crate::error::{LookupError, ValidationError};
use crate::options::{OptionSchema, OptionSpec, ParsedOptions};

/// Edition used when neither `-l` nor the `edition` style gives one.
pub const DEFAULT_EDITION: &str = "en";

/// Style holding the default edition.
pub const EDITION_STYLE: &str = "edition";

/// Language editions offered for completion and validation.
pub const EDITIONS: &[CatalogEntry] = &[
    CatalogEntry {
        code: "en",
        description: "english",
    },
    CatalogEntry {
        code: "de",
        description: "german",
    },
    CatalogEntry {
        code: "fr",
        description: "french",
    },
    CatalogEntry {
        code: "es",
        description: "spanish",
    },
    CatalogEntry {
        code: "it",
        description: "italian",
    },
    CatalogEntry {
        code: "nl",
        description: "dutch",
    },
    CatalogEntry {
        code: "pl",
        description: "polish",
    },
    CatalogEntry {
        code: "pt",
        description: "portuguese",
    },
    CatalogEntry {
        code: "ru",
        description: "russian",
    },
    CatalogEntry {
        code: "ja",
        description: "japanese",
    },
    CatalogEntry {
        code: "zh",
        description: "chinese",
    },
    CatalogEntry {
        code: "fi",
        description: "finnish",
    },
    CatalogEntry {
        code: "sv",
        description: "swedish",
    },
];

const OPTIONS: &[OptionSpec] = &[OptionSpec::value("l", "edition", "language edition to search")];

/// Wikipedia search backend.
pub struct WikipediaBackend;

impl Backend for WikipediaBackend {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    fn describe(&self) -> &'static str {
        "search Wikipedia in any of its language editions"
    }

    fn options(&self) -> OptionSchema {
        OptionSchema::new(OPTIONS)
    }

    fn help(&self, inv: &Invocation<'_>, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "usage: lookup {} [-l <edition>] <query>", self.name())?;
        writeln!(out)?;
        write_options(out, &self.options())?;
        writeln!(out)?;
        write_catalog(out, "Editions", EDITIONS)?;
        writeln!(out)?;
        write_defaults(out, inv, &[(EDITION_STYLE, DEFAULT_EDITION)])?;
        writeln!(out)?;
        writeln!(out, "Examples:")?;
        writeln!(out, "  lookup {} Rust programming language", self.name())?;
        writeln!(out, "  lookup {} -l fi Sibelius", self.name())
    }

    fn completions(&self) -> Vec<Completion> {
        vec![Completion {
            option: "l",
            generate: || catalog_candidates(EDITIONS),
        }]
    }

    fn execute(&self, inv: &mut Invocation<'_>, parsed: &ParsedOptions) -> Result<i32, LookupError> {
        let edition = parsed
            .value("l")
            .or_else(|| inv.style(EDITION_STYLE))
            .unwrap_or(DEFAULT_EDITION)
            .to_string();

        inv.set_query(&parsed.positional);
        let edition = lookup_code(EDITIONS, &edition)?;
        if inv.query.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }

        let uri = format!(
            "https://{}.wikipedia.org/w/index.php?search={}",
            edition.code,
            inv.query.encoded()
        );
        inv.launch(uri)
    }
}
