//! Leveled progress output for tree growth.

use std::fmt;

/// Verbosity level for training output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Warnings only.
    Warning,
    /// Progress and tree summaries.
    Info,
    /// Per-node decisions.
    Debug,
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verbosity::Silent => "silent",
            Verbosity::Warning => "warning",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        };
        f.write_str(s)
    }
}

/// Writes messages to stderr when the configured verbosity allows.
#[derive(Debug, Clone)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    prefix: String,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            prefix: String::new(),
        }
    }

    /// Logger whose messages start with `[prefix]`.
    pub fn with_prefix(verbosity: Verbosity, prefix: impl Into<String>) -> Self {
        Self {
            verbosity,
            prefix: prefix.into(),
        }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Whether messages at `level` are emitted.
    #[inline]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub fn warn(&self, msg: &str) {
        self.emit(Verbosity::Warning, msg);
    }

    pub fn info(&self, msg: &str) {
        self.emit(Verbosity::Info, msg);
    }

    pub fn debug(&self, msg: &str) {
        self.emit(Verbosity::Debug, msg);
    }

    fn emit(&self, level: Verbosity, msg: &str) {
        if !self.enabled(level) {
            return;
        }
        if self.prefix.is_empty() {
            eprintln!("[{level}] {msg}");
        } else {
            eprintln!("[{level}] [{}] {msg}", self.prefix);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(Verbosity::Silent < Verbosity::Warning);
        assert!(Verbosity::Info < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Silent);
    }

    #[test]
    fn enabled_respects_level() {
        let logger = TrainingLogger::new(Verbosity::Info);
        assert!(logger.enabled(Verbosity::Warning));
        assert!(logger.enabled(Verbosity::Info));
        assert!(!logger.enabled(Verbosity::Debug));

        let silent = TrainingLogger::new(Verbosity::Silent);
        assert!(!silent.enabled(Verbosity::Warning));
        assert!(!silent.enabled(Verbosity::Silent));
    }
}
