//! Lookup backends and the invocation contract they share.
//!
//! A backend answers the dispatcher in exactly one [`Mode`] per call:
//!
//! 1. **Guard**: a caller that did not come through the dispatcher gets
//!    [`LookupError::Permission`]'s exit code and no output, whatever the mode.
//! 2. **Describe**: one line of capability text, no trailing newline. No
//!    option parsing, style lookups or launches.
//! 3. **Help**: full usage text.
//! 4. **Complete**: candidate lists from the backend's generators.
//! 5. **Execute**: parse options, resolve styles, validate, build the
//!    target URI and hand it to the launcher.
//!
//! Failures on the execute path are reported by [`run`]: a one-line
//! diagnostic on stderr where there is one, then the help text, then a
//! non-zero status. Launcher statuses pass through unchanged.
//!
//! # Example
//!
//! ```rust,no_run
//! use lookup::dispatch::Dispatcher;
//! use lookup::backend::{Mode, Streams};
//! use lookup::style::StyleStore;
//!
//! let dispatcher = Dispatcher::new(StyleStore::new());
//! let mut out = std::io::stdout();
//! let mut err = std::io::stderr();
//! let args = vec!["-l".to_string(), "frde".to_string(), "sucre".to_string()];
//! let status = dispatcher.dispatch(
//!     "leo",
//!     Mode::Execute,
//!     None,
//!     &args,
//!     &mut Streams::new(&mut out, &mut err),
//! );
//! std::process::exit(status);
//! ```

pub mod leo;
pub mod wikipedia;

use std::io::{self, Write};

use crate::dispatch::Guard;
use crate::encode::Query;
use crate::error::{LookupError, ValidationError, EXIT_FAILURE, EXIT_SUCCESS};
use crate::hooks::HookRegistry;
use crate::launcher::Launcher;
use crate::options::{OptionKind, OptionSchema, ParsedOptions};
use crate::style::{Context, StyleResolver};

/// How the dispatcher wants a backend to respond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Describe,
    Help,
    Complete,
    #[default]
    Execute,
}

/// A completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub value: String,
    pub description: String,
}

/// Candidate generator for one option. Must be pure.
#[derive(Debug, Clone, Copy)]
pub struct Completion {
    /// Flag name without the leading dash.
    pub option: &'static str,
    pub generate: fn() -> Vec<Candidate>,
}

/// One entry of a backend's fixed selector catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub description: &'static str,
}

/// Column width selector codes are right-aligned to in help output.
pub const CATALOG_COLUMN: usize = 8;

/// Find `code` in `catalog`.
pub fn lookup_code(
    catalog: &'static [CatalogEntry],
    code: &str,
) -> Result<&'static CatalogEntry, ValidationError> {
    catalog
        .iter()
        .find(|entry| entry.code == code)
        .ok_or_else(|| ValidationError::UnknownSelector(code.to_string()))
}

/// Catalog as completion candidates, in catalog order.
#[must_use]
pub fn catalog_candidates(catalog: &[CatalogEntry]) -> Vec<Candidate> {
    catalog
        .iter()
        .map(|entry| Candidate {
            value: entry.code.to_string(),
            description: entry.description.to_string(),
        })
        .collect()
}

/// Everything a backend may touch during one call.
pub struct Invocation<'a> {
    pub backend: &'static str,
    pub context: Context,
    pub styles: &'a dyn StyleResolver,
    pub hooks: &'a HookRegistry,
    pub launcher: &'a dyn Launcher,
    pub guard: &'a dyn Guard,
    /// Published to hooks as [`crate::encode::QUERY`].
    pub query: Query,
}

impl<'a> Invocation<'a> {
    #[must_use]
    pub fn new(
        backend: &'static str,
        refinement: Option<&str>,
        styles: &'a dyn StyleResolver,
        hooks: &'a HookRegistry,
        launcher: &'a dyn Launcher,
        guard: &'a dyn Guard,
    ) -> Self {
        Self {
            backend,
            context: Context::new(backend, refinement),
            styles,
            hooks,
            launcher,
            guard,
            query: Query::default(),
        }
    }

    /// String style for this invocation's context.
    #[must_use]
    pub fn style(&self, key: &str) -> Option<&str> {
        self.styles.resolve_str(&self.context, key)
    }

    /// Join `words` into the query and run the query hooks on it.
    pub fn set_query<S: AsRef<str>>(&mut self, words: &[S]) {
        self.query = Query::from_words(words);
        self.hooks.run_query(self.backend, &mut self.query);
    }

    /// Run the URI hooks, then open the result.
    pub fn launch(&self, uri: String) -> Result<i32, LookupError> {
        let mut uri = uri;
        self.hooks.run_uri(self.backend, &mut uri);
        tracing::debug!("{}: opening {uri}", self.backend);
        match self.launcher.open(&uri) {
            EXIT_SUCCESS => Ok(EXIT_SUCCESS),
            code => Err(LookupError::Launch(code)),
        }
    }
}

/// Output streams of one call.
pub struct Streams<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

impl<'a> Streams<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { out, err }
    }
}

/// A lookup backend.
pub trait Backend {
    /// Unique name the dispatcher selects the backend by.
    fn name(&self) -> &'static str;

    /// One-line capability text.
    fn describe(&self) -> &'static str;

    /// Flags accepted in execute mode.
    fn options(&self) -> OptionSchema;

    /// Write usage text: synopsis, flags, catalogs, configured defaults and
    /// examples.
    fn help(&self, inv: &Invocation<'_>, out: &mut dyn Write) -> io::Result<()>;

    /// One generator per option with dynamic candidates.
    fn completions(&self) -> Vec<Completion> {
        Vec::new()
    }

    /// Build the target and launch it. Runs after option parsing.
    fn execute(&self, inv: &mut Invocation<'_>, parsed: &ParsedOptions) -> Result<i32, LookupError>;
}

/// Answer one dispatcher call. Returns the exit status.
pub fn run<S: AsRef<str>>(
    backend: &dyn Backend,
    mode: Mode,
    args: &[S],
    inv: &mut Invocation<'_>,
    streams: &mut Streams<'_>,
) -> i32 {
    if !inv.guard.is_called_through_dispatcher() {
        let err = LookupError::Permission;
        tracing::debug!("{}: {err}", backend.name());
        return err.exit_code();
    }

    match run_mode(backend, mode, args, inv, streams) {
        Ok(code) => code,
        Err(e) => {
            tracing::warn!("{}: failed to write output: {e}", backend.name());
            EXIT_FAILURE
        }
    }
}

fn run_mode<S: AsRef<str>>(
    backend: &dyn Backend,
    mode: Mode,
    args: &[S],
    inv: &mut Invocation<'_>,
    streams: &mut Streams<'_>,
) -> io::Result<i32> {
    match mode {
        Mode::Describe => {
            write!(streams.out, "{}", backend.describe())?;
            Ok(EXIT_SUCCESS)
        }
        Mode::Help => {
            backend.help(inv, streams.out)?;
            Ok(EXIT_SUCCESS)
        }
        Mode::Complete => {
            write_completions(backend, streams.out)?;
            Ok(EXIT_SUCCESS)
        }
        Mode::Execute => execute(backend, args, inv, streams),
    }
}

fn execute<S: AsRef<str>>(
    backend: &dyn Backend,
    args: &[S],
    inv: &mut Invocation<'_>,
    streams: &mut Streams<'_>,
) -> io::Result<i32> {
    let result = backend
        .options()
        .parse(args)
        .map_err(LookupError::from)
        .and_then(|parsed| backend.execute(inv, &parsed));

    let err = match result {
        Ok(code) => return Ok(code),
        Err(err) => err,
    };
    tracing::debug!("{}: {err:?}", backend.name());

    match &err {
        LookupError::Launch(_) => {
            writeln!(streams.err, "{}: {err}", backend.name())?;
            return Ok(err.exit_code());
        }
        LookupError::Validation(ValidationError::EmptyQuery) => {}
        _ => writeln!(streams.err, "{}: {err}", backend.name())?,
    }
    backend.help(inv, streams.out)?;
    Ok(err.exit_code().max(EXIT_FAILURE))
}

fn write_completions(backend: &dyn Backend, out: &mut dyn Write) -> io::Result<()> {
    for completion in backend.completions() {
        writeln!(out, "-{}", completion.option)?;
        for candidate in (completion.generate)() {
            writeln!(out, "{}:{}", candidate.value, candidate.description)?;
        }
    }
    Ok(())
}

/// Write the `Options:` section for `schema`.
pub fn write_options(out: &mut dyn Write, schema: &OptionSchema) -> io::Result<()> {
    writeln!(out, "Options:")?;
    let width = schema
        .specs()
        .iter()
        .map(|s| s.synopsis().len())
        .max()
        .unwrap_or(0);
    for spec in schema.specs() {
        let kind = match spec.kind {
            OptionKind::Bool => "",
            OptionKind::Value => " (string)",
        };
        writeln!(out, "  {:<width$}  {}{kind}", spec.synopsis(), spec.help)?;
    }
    Ok(())
}

/// Write a catalog, codes right-aligned to [`CATALOG_COLUMN`].
pub fn write_catalog(out: &mut dyn Write, title: &str, catalog: &[CatalogEntry]) -> io::Result<()> {
    writeln!(out, "{title}:")?;
    for entry in catalog {
        writeln!(out, "  {:>CATALOG_COLUMN$}  {}", entry.code, entry.description)?;
    }
    Ok(())
}

/// Write the configured-defaults summary: each key with its effective value
/// and whether it came from a style or the built-in default.
pub fn write_defaults(
    out: &mut dyn Write,
    inv: &Invocation<'_>,
    defaults: &[(&str, &str)],
) -> io::Result<()> {
    writeln!(out, "Defaults ({}):", inv.context)?;
    let width = defaults.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, fallback) in defaults {
        match inv.style(key) {
            Some(value) => writeln!(out, "  {key:<width$}  {value} (style)")?,
            None => writeln!(out, "  {key:<width$}  {fallback}")?,
        }
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::error::EXIT_PERMISSION;
    use crate::options::OptionSpec;

    const SPECS: &[OptionSpec] = &[OptionSpec::flag("x", "exact")];
    const COLORS: &[CatalogEntry] = &[
        CatalogEntry {
            code: "r",
            description: "red",
        },
        CatalogEntry {
            code: "g",
            description: "green",
        },
    ];

    struct Echo;

    impl Backend for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn describe(&self) -> &'static str {
            "echo the query"
        }

        fn options(&self) -> OptionSchema {
            OptionSchema::new(SPECS)
        }

        fn help(&self, _inv: &Invocation<'_>, out: &mut dyn Write) -> io::Result<()> {
            writeln!(out, "usage: echo [-x] <query>")
        }

        fn completions(&self) -> Vec<Completion> {
            vec![Completion {
                option: "x",
                generate: || catalog_candidates(COLORS),
            }]
        }

        fn execute(
            &self,
            inv: &mut Invocation<'_>,
            parsed: &ParsedOptions,
        ) -> Result<i32, LookupError> {
            inv.set_query(&parsed.positional);
            if inv.query.is_empty() {
                return Err(ValidationError::EmptyQuery.into());
            }
            let uri = format!("https://example.com/?q={}", inv.query.encoded());
            inv.launch(uri)
        }
    }

    #[test]
    fn guard_failure_is_silent_in_every_mode() {
        for mode in [Mode::Describe, Mode::Help, Mode::Complete, Mode::Execute] {
            let mut h = Harness::new();
            let code = h.run_guarded(&Echo, mode, &["word"], &Deny);
            assert_eq!(code, EXIT_PERMISSION);
            assert!(h.out.is_empty() && h.err.is_empty());
            assert!(h.opened().is_empty());
        }
    }

    #[test]
    fn describe_has_no_trailing_newline() {
        let mut h = Harness::new();
        assert_eq!(h.run(&Echo, Mode::Describe, &["-q"]), EXIT_SUCCESS);
        assert_eq!(h.stdout(), "echo the query");
        assert_eq!(h.styles.lookups.get(), 0);
    }

    #[test]
    fn complete_lists_generator_output() {
        let mut h = Harness::new();
        assert_eq!(h.run(&Echo, Mode::Complete, &[]), EXIT_SUCCESS);
        assert_eq!(h.stdout(), "-x\nr:red\ng:green\n");
        assert!(h.opened().is_empty());
    }

    #[test]
    fn execute_launches_once() {
        let mut h = Harness::new();
        assert_eq!(h.run(&Echo, Mode::Execute, &["a", "b"]), EXIT_SUCCESS);
        assert_eq!(h.opened(), vec!["https://example.com/?q=a%20b"]);
        assert!(h.stdout().is_empty());
    }

    #[test]
    fn unknown_flag_forces_help() {
        let mut h = Harness::new();
        assert_eq!(h.run(&Echo, Mode::Execute, &["-q", "a"]), EXIT_FAILURE);
        assert_eq!(h.stderr(), "echo: unknown option: -q\n");
        assert!(h.stdout().starts_with("usage: echo"));
        assert!(h.opened().is_empty());
    }

    #[test]
    fn empty_query_forces_help_without_diagnostic() {
        let mut h = Harness::new();
        assert_eq!(h.run(&Echo, Mode::Execute, &["-x"]), EXIT_FAILURE);
        assert!(h.stderr().is_empty());
        assert!(h.stdout().starts_with("usage: echo"));
    }

    #[test]
    fn launcher_status_passes_through() {
        let mut h = Harness::new();
        h.launcher.status = 42;
        assert_eq!(h.run(&Echo, Mode::Execute, &["a"]), 42);
        assert_eq!(h.stderr(), "echo: launcher exited with status 42\n");
        assert!(h.stdout().is_empty());
    }

    #[test]
    fn hooks_see_query_and_uri() {
        let mut h = Harness::new();
        h.hooks.on_query(|_, q| q.set("rewritten"));
        h.hooks.on_uri(|_, uri| uri.push_str("&src=hook"));
        h.run(&Echo, Mode::Execute, &["a"]);
        assert_eq!(
            h.opened(),
            vec!["https://example.com/?q=rewritten&src=hook"]
        );
    }

    #[test]
    fn catalog_lookup() {
        assert_eq!(lookup_code(COLORS, "g").unwrap().description, "green");
        assert_eq!(
            lookup_code(COLORS, "b").unwrap_err(),
            ValidationError::UnknownSelector("b".into())
        );
    }

    #[test]
    fn catalog_is_right_aligned() {
        let mut out = Vec::new();
        write_catalog(&mut out, "Colors", COLORS).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Colors:\n         r  red\n         g  green\n");
    }

    #[test]
    fn options_section_lists_schema() {
        let mut out = Vec::new();
        write_options(&mut out, &OptionSchema::new(SPECS)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Options:\n  -x  exact\n");
    }
}
