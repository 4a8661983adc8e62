//! URI launchers
//!
//! Hands a finished URI to whatever opens it. Launching is fire-and-forget:
//! the viewer is spawned and never waited on. The returned status is
//! opaque to backends, which pass it through as their own.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::EXIT_SUCCESS;

/// The URI could not be parsed.
pub const STATUS_INVALID_URI: i32 = 65;

/// The opener was found but could not be started.
pub const STATUS_CANNOT_EXECUTE: i32 = 126;

/// No opener was found.
pub const STATUS_NOT_FOUND: i32 = 127;

/// Opens a URI in the user's preferred viewer.
pub trait Launcher {
    /// Open `uri`; 0 on success.
    fn open(&self, uri: &str) -> i32;
}

/// Opens URIs with the platform's default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserLauncher;

impl Launcher for BrowserLauncher {
    fn open(&self, uri: &str) -> i32 {
        if !is_valid_uri(uri) {
            return STATUS_INVALID_URI;
        }
        let Some((program, args)) = detect_opener() else {
            tracing::warn!("no URI opener found in PATH");
            return STATUS_NOT_FOUND;
        };
        spawn_with_uri(program, &args, uri)
    }
}

/// Opens URIs with a user-configured command (the `browser` style).
///
/// The command is split with shell quoting rules, so a quoted program path
/// may contain spaces. A `%s` argument is replaced by the URI; without one,
/// the URI is appended.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    command: String,
}

impl CommandLauncher {
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Launcher for CommandLauncher {
    fn open(&self, uri: &str) -> i32 {
        if !is_valid_uri(uri) {
            return STATUS_INVALID_URI;
        }
        let Some(words) = shlex::split(&self.command) else {
            tracing::warn!("browser style has unbalanced quotes: {}", self.command);
            return STATUS_CANNOT_EXECUTE;
        };
        let Some((program, args)) = words.split_first() else {
            tracing::warn!("browser style is empty");
            return STATUS_NOT_FOUND;
        };

        let mut args = args.to_vec();
        if let Some(slot) = args.iter_mut().find(|a| a.as_str() == "%s") {
            *slot = uri.to_string();
            return spawn(program, &args);
        }
        spawn_with_uri(program, &args, uri)
    }
}

/// Writes the URI to stdout instead of opening it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintLauncher;

impl Launcher for PrintLauncher {
    fn open(&self, uri: &str) -> i32 {
        let mut stdout = std::io::stdout().lock();
        match writeln!(stdout, "{uri}") {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                tracing::warn!("failed to print URI: {e}");
                STATUS_CANNOT_EXECUTE
            }
        }
    }
}

fn is_valid_uri(uri: &str) -> bool {
    match url::Url::parse(uri) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("refusing to open invalid URI {uri}: {e}");
            false
        }
    }
}

/// Platform opener and the arguments that precede the URI.
///
/// The URI goes to the opener as a single argument and never through a
/// shell, so `&` in a query string stays part of the URI.
fn detect_opener() -> Option<(&'static str, Vec<String>)> {
    #[cfg(target_os = "macos")]
    {
        Some(("open", Vec::new()))
    }

    #[cfg(target_os = "windows")]
    {
        Some(("rundll32", vec!["url.dll,FileProtocolHandler".to_string()]))
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        ["xdg-open", "sensible-browser", "x-www-browser", "www-browser"]
            .into_iter()
            .find(|name| which::which(name).is_ok())
            .map(|name| (name, Vec::new()))
    }
}

fn spawn_with_uri(program: &str, args: &[String], uri: &str) -> i32 {
    let mut args = args.to_vec();
    args.push(uri.to_string());
    spawn(program, &args)
}

fn spawn(program: &str, args: &[String]) -> i32 {
    tracing::debug!("launching {program} {args:?}");
    match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(_child) => EXIT_SUCCESS,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("{program} not found");
            STATUS_NOT_FOUND
        }
        Err(e) => {
            tracing::warn!("failed to launch {program}: {e}");
            STATUS_CANNOT_EXECUTE
        }
    }
}
