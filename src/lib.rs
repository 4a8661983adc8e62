//! `lookup` - route a query to a pluggable backend and open the result
//!
//! # Features
//!
//! - **Backends**: uniform describe / help / complete / execute contract
//! - **Styles**: per-backend settings matched by context pattern, most
//!   specific pattern wins
//! - **Hooks**: rewrite the query or the final URI at fixed points
//! - **Launchers**: platform opener, configured browser command, or print
//!
//! # Example
//!
//! ```rust,no_run
//! use lookup::backend::{Mode, Streams};
//! use lookup::dispatch::Dispatcher;
//! use lookup::style::{self, StyleStore};
//!
//! fn main() -> anyhow::Result<()> {
//!     let styles = StyleStore::load(&style::default_path())?;
//!     let dispatcher = Dispatcher::new(styles);
//!
//!     let mut out = std::io::stdout();
//!     let mut err = std::io::stderr();
//!     let status = dispatcher.dispatch(
//!         "leo",
//!         Mode::Execute,
//!         None,
//!         &["-l", "frde", "sucre"],
//!         &mut Streams::new(&mut out, &mut err),
//!     );
//!     std::process::exit(status);
//! }
//! ```

pub mod backend;
pub mod dispatch;
pub mod encode;
pub mod error;
pub mod hooks;
pub mod launcher;
pub mod options;
pub mod style;

pub use backend::{Backend, Invocation, Mode, Streams};
pub use dispatch::{Dispatcher, Guard};
pub use encode::{Query, QUERY};
pub use error::{LookupError, Result};
pub use hooks::{HookPoint, HookRegistry};
pub use launcher::{BrowserLauncher, CommandLauncher, Launcher, PrintLauncher};
pub use options::{OptionKind, OptionSchema, OptionSpec, ParsedOptions};
pub use style::{Context, StyleResolver, StyleStore, StyleValue};

/// Version of lookup
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
