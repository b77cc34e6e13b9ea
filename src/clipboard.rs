// Best-effort copy with three fallbacks: terminal clipboard, file export,
// then printing the text for the user to copy by hand.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ClipboardConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CopyMethod {
    /// OSC 52 escape understood by most modern terminals
    TerminalEscape,
    /// Written to a file the user can open
    FileExport,
    /// Printed with a prompt to copy manually
    ManualSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyOutcome {
    pub success: bool,
    pub method: Option<CopyMethod>,
    pub message: Option<String>,
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("stdout is not a terminal")]
    NotATerminal,
    #[error("clipboard output lock poisoned")]
    Poisoned,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait ClipboardBackend: Send + Sync {
    fn method(&self) -> CopyMethod;

    /// Copies `text`, optionally returning a note for the user.
    fn copy(&self, text: &str) -> Result<Option<String>, ClipboardError>;
}

/// Sets the terminal's clipboard through an OSC 52 sequence on stdout.
#[derive(Debug, Default)]
pub struct TerminalClipboard;

impl ClipboardBackend for TerminalClipboard {
    fn method(&self) -> CopyMethod {
        CopyMethod::TerminalEscape
    }

    fn copy(&self, text: &str) -> Result<Option<String>, ClipboardError> {
        let mut stdout = std::io::stdout();
        if !stdout.is_terminal() {
            return Err(ClipboardError::NotATerminal);
        }
        write!(stdout, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        stdout.flush()?;
        Ok(None)
    }
}

#[derive(Debug)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ClipboardBackend for FileClipboard {
    fn method(&self) -> CopyMethod {
        CopyMethod::FileExport
    }

    fn copy(&self, text: &str) -> Result<Option<String>, ClipboardError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, text)?;
        Ok(Some(format!("Text saved to {}", self.path.display())))
    }
}

/// Last resort: show the text and ask the user to copy it.
pub struct ManualCopy<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> ManualCopy<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> Option<W> {
        self.out.into_inner().ok()
    }
}

impl ManualCopy<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ClipboardBackend for ManualCopy<W> {
    fn method(&self) -> CopyMethod {
        CopyMethod::ManualSelection
    }

    fn copy(&self, text: &str) -> Result<Option<String>, ClipboardError> {
        let mut out = self.out.lock().map_err(|_| ClipboardError::Poisoned)?;
        writeln!(out, "----- copy below -----")?;
        writeln!(out, "{text}")?;
        writeln!(out, "----- copy above -----")?;
        out.flush()?;
        Ok(Some(
            "Text shown above - select it and press Ctrl+C (Cmd+C on Mac) to copy".to_string(),
        ))
    }
}

/// Ordered fallback chain. Never fails to the caller.
pub struct ClipboardChain {
    backends: Vec<Box<dyn ClipboardBackend>>,
}

impl ClipboardChain {
    pub fn new(backends: Vec<Box<dyn ClipboardBackend>>) -> Self {
        Self { backends }
    }

    pub fn from_config(config: &ClipboardConfig) -> Self {
        let mut backends: Vec<Box<dyn ClipboardBackend>> = Vec::new();
        if config.terminal_escape {
            backends.push(Box::new(TerminalClipboard));
        }
        backends.push(Box::new(FileClipboard::new(&config.fallback_path)));
        backends.push(Box::new(ManualCopy::stdout()));
        Self::new(backends)
    }

    pub fn copy_text(&self, text: &str) -> CopyOutcome {
        for backend in &self.backends {
            match backend.copy(text) {
                Ok(message) => {
                    debug!(method = ?backend.method(), "Copied text");
                    return CopyOutcome {
                        success: true,
                        method: Some(backend.method()),
                        message,
                    };
                }
                Err(e) => {
                    warn!(method = ?backend.method(), error = %e, "Copy method failed, trying fallback");
                }
            }
        }

        CopyOutcome {
            success: false,
            method: None,
            message: Some("Copy failed - please copy the text manually".to_string()),
        }
    }
}
