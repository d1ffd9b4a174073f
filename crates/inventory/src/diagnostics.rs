//! Diagnostic side channel for the engine.
//!
//! The engine never logs directly: every per-row warning and informational
//! message goes through a [`Diagnostics`] sink handed in by the caller.

use serde::Serialize;

/// Indentation used for tabular listings under a heading.
pub const INDENT: &str = "   ";

pub trait Diagnostics {
    fn info(&mut self, message: &str);

    fn warn(&mut self, message: &str);

    fn info_indented(&mut self, message: &str) {
        self.info(&format!("{INDENT}{message}"));
    }

    fn warn_indented(&mut self, message: &str) {
        self.warn(&format!("{INDENT}{message}"));
    }
}

/// Forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn warn(&mut self, message: &str) {
        log::warn!("{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Info,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub level: Level,
    pub indented: bool,
    pub message: String,
}

/// Keeps every message in emission order.
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnostics {
    pub entries: Vec<Entry>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: Level, indented: bool, message: &str) {
        self.entries.push(Entry {
            level,
            indented,
            message: message.to_string(),
        });
    }

    pub fn messages(&self, level: Level) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.level == level && !e.indented)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn indented(&self, level: Level) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.level == level && e.indented)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn infos(&self) -> Vec<&str> {
        self.messages(Level::Info)
    }

    pub fn warnings(&self) -> Vec<&str> {
        self.messages(Level::Warn)
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn info(&mut self, message: &str) {
        self.push(Level::Info, false, message);
    }

    fn warn(&mut self, message: &str) {
        self.push(Level::Warn, false, message);
    }

    fn info_indented(&mut self, message: &str) {
        self.push(Level::Info, true, message);
    }

    fn warn_indented(&mut self, message: &str) {
        self.push(Level::Warn, true, message);
    }
}

/// One line of an `equipment : amount` listing.
pub fn format_count_line(identifier: &str, amount: impl std::fmt::Display) -> String {
    format!("{identifier:<13} : {amount:>5}")
}
