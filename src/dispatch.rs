//! Backend registry and dispatch.
//!
//! The dispatcher owns the collaborators shared by every call (style store,
//! hook registry, launcher choice), selects a backend by name and runs it
//! in the requested [`Mode`]. The backend's status is returned unchanged.

use std::io::{self, Write};

use crate::backend::{self, leo, wikipedia, Backend, Invocation, Mode, Streams};
use crate::error::LookupError;
use crate::hooks::HookRegistry;
use crate::launcher::{BrowserLauncher, CommandLauncher, Launcher};
use crate::style::{Context, StyleResolver};

/// Style naming the command used to open URIs.
pub const BROWSER_STYLE: &str = "browser";

/// Tells a backend whether it was entered through the dispatcher.
pub trait Guard {
    fn is_called_through_dispatcher(&self) -> bool;
}

/// Guard handed out by [`Dispatcher::dispatch`]. Only this module can
/// construct one.
struct Dispatched(());

impl Guard for Dispatched {
    fn is_called_through_dispatcher(&self) -> bool {
        true
    }
}

/// Guard for calls that bypass the dispatcher; always refuses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Direct;

impl Guard for Direct {
    fn is_called_through_dispatcher(&self) -> bool {
        false
    }
}

/// Routes calls to registered backends.
///
/// Backends are kept in registration order. Names are unique; registering
/// a second backend under an existing name replaces the first.
pub struct Dispatcher {
    backends: Vec<Box<dyn Backend>>,
    styles: Box<dyn StyleResolver>,
    hooks: HookRegistry,
    launcher: Option<Box<dyn Launcher>>,
}

impl Dispatcher {
    /// Create a dispatcher with all built-in backends.
    #[must_use]
    pub fn new(styles: impl StyleResolver + 'static) -> Self {
        let mut dispatcher = Self::empty(styles);
        dispatcher.register(Box::new(leo::LeoBackend));
        dispatcher.register(Box::new(wikipedia::WikipediaBackend));
        dispatcher
    }

    /// Create a dispatcher with no backends.
    #[must_use]
    pub fn empty(styles: impl StyleResolver + 'static) -> Self {
        Self {
            backends: Vec::new(),
            styles: Box::new(styles),
            hooks: HookRegistry::new(),
            launcher: None,
        }
    }

    pub fn register(&mut self, backend: Box<dyn Backend>) {
        if let Some(slot) = self.backends.iter_mut().find(|b| b.name() == backend.name()) {
            tracing::warn!("replacing backend {}", backend.name());
            *slot = backend;
        } else {
            self.backends.push(backend);
        }
    }

    /// Use `launcher` for every call instead of the `browser` style or the
    /// platform opener.
    #[must_use]
    pub fn with_launcher(mut self, launcher: Box<dyn Launcher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    #[must_use]
    pub fn styles(&self) -> &dyn StyleResolver {
        &*self.styles
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Backend> {
        self.backends
            .iter()
            .find(|b| b.name() == name)
            .map(|b| &**b)
    }

    /// Registered backend names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.backends.iter().map(|b| b.name())
    }

    /// Invoke backend `name` in `mode` with raw trailing `args`.
    pub fn dispatch<S: AsRef<str>>(
        &self,
        name: &str,
        mode: Mode,
        refinement: Option<&str>,
        args: &[S],
        streams: &mut Streams<'_>,
    ) -> i32 {
        let Some(backend) = self.get(name) else {
            let err = LookupError::UnknownBackend(name.to_string());
            if let Err(e) = writeln!(streams.err, "lookup: {err}") {
                tracing::warn!("failed to write diagnostic: {e}");
            }
            return err.exit_code();
        };
        tracing::debug!("dispatching {name} in {mode:?} mode");

        // Only the execute path may consult styles for the launcher.
        let configured = match (&self.launcher, mode) {
            (None, Mode::Execute) => {
                let context = Context::new(backend.name(), refinement);
                self.styles
                    .resolve_str(&context, BROWSER_STYLE)
                    .map(CommandLauncher::new)
            }
            _ => None,
        };
        let launcher: &dyn Launcher = match (&self.launcher, &configured) {
            (Some(launcher), _) => &**launcher,
            (None, Some(command)) => command as &dyn Launcher,
            (None, None) => &BrowserLauncher as &dyn Launcher,
        };

        let guard = Dispatched(());
        let mut inv = Invocation::new(
            backend.name(),
            refinement,
            &*self.styles,
            &self.hooks,
            launcher,
            &guard,
        );
        backend::run(backend, mode, args, &mut inv, streams)
    }

    /// Write one line per backend: padded name, then its description.
    pub fn list(&self, out: &mut dyn Write) -> io::Result<()> {
        let width = self.names().map(str::len).max().unwrap_or(0);
        for backend in &self.backends {
            writeln!(out, "{:<width$}  {}", backend.name(), backend.describe())?;
        }
        Ok(())
    }
}
