//! Named extension points on the execute path.
//!
//! Callers register callbacks per [`HookPoint`]; backends run them at fixed
//! points through [`crate::backend::Invocation`]. Callbacks in one slot run
//! in registration order, each seeing the previous one's edits. An empty
//! slot is a no-op.

use std::fmt;

use crate::encode::{Query, QUERY};

/// Extension points a backend invokes while executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// After positional tokens are joined into the query, before validation.
    Query,
    /// After the target URI is built, before it goes to the launcher.
    Uri,
}

impl HookPoint {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HookPoint::Query => "query",
            HookPoint::Uri => "uri",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rewrites the query. Receives the backend name.
pub type QueryHook = Box<dyn Fn(&str, &mut Query) + Send + Sync>;

/// Rewrites the target URI. Receives the backend name.
pub type UriHook = Box<dyn Fn(&str, &mut String) + Send + Sync>;

/// Registered callbacks, one ordered list per hook point.
#[derive(Default)]
pub struct HookRegistry {
    query: Vec<QueryHook>,
    uri: Vec<UriHook>,
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_query(&mut self, hook: impl Fn(&str, &mut Query) + Send + Sync + 'static) {
        self.query.push(Box::new(hook));
    }

    pub fn on_uri(&mut self, hook: impl Fn(&str, &mut String) + Send + Sync + 'static) {
        self.uri.push(Box::new(hook));
    }

    /// Number of callbacks registered at `point`.
    #[must_use]
    pub fn len(&self, point: HookPoint) -> usize {
        match point {
            HookPoint::Query => self.query.len(),
            HookPoint::Uri => self.uri.len(),
        }
    }

    pub fn run_query(&self, backend: &str, query: &mut Query) {
        for hook in &self.query {
            hook(backend, query);
        }
        if !self.query.is_empty() {
            tracing::debug!("{} hook(s) ran for {backend}: {QUERY}={query:?}", HookPoint::Query);
        }
    }

    pub fn run_uri(&self, backend: &str, uri: &mut String) {
        for hook in &self.uri {
            hook(backend, uri);
        }
        if !self.uri.is_empty() {
            tracing::debug!("{} hook(s) ran for {backend}: {uri}", HookPoint::Uri);
        }
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("query", &self.query.len())
            .field("uri", &self.uri.len())
            .finish()
    }
}
