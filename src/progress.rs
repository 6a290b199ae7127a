//! Status lines on stderr while commands run.
//!
//! In verbose mode output is suppressed since tracing covers the same events.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::session::{BatchReport, Outcome};

/// Progress reporter for user-facing output
pub struct Progress {
    writer: Box<dyn Write>,
    /// When true, all output is suppressed (verbose mode uses tracing instead)
    silent: bool,
    colors_enabled: bool,
}

/// Check if we should use colors in output
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    io::stderr().is_terminal()
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    pub fn new() -> Self {
        Self::new_with_ui(false, should_use_colors())
    }

    /// When `verbose` is set, output is suppressed (tracing handles it)
    pub fn new_with_ui(verbose: bool, colors_enabled: bool) -> Self {
        Self {
            writer: Box::new(io::stderr()),
            silent: verbose,
            colors_enabled,
        }
    }

    #[cfg(test)]
    pub fn with_writer(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            silent: false,
            colors_enabled: false,
        }
    }

    #[allow(dead_code)]
    pub fn silent() -> Self {
        Self {
            writer: Box::new(io::sink()),
            silent: true,
            colors_enabled: false,
        }
    }

    /// One line per attempted item of a finished batch
    pub fn batch_items(&mut self, report: &BatchReport) {
        let total = report.items.len();
        for (i, item) in report.items.iter().enumerate() {
            let from = item.source_name();
            let to = item.target_name();
            match &item.outcome {
                Outcome::Done => self.item_progress(i + 1, total, &from, to.as_deref()),
                Outcome::Unchanged => self.item_note(i + 1, total, &from, "unchanged"),
                Outcome::Failed(_) => self.item_note(i + 1, total, &from, "failed"),
                Outcome::Skipped => self.item_note(i + 1, total, &from, "skipped"),
            }
        }
    }

    pub fn item_progress(&mut self, current: usize, total: usize, from: &str, to: Option<&str>) {
        if self.silent {
            return;
        }
        let counter = format!("[{}/{}]", current, total);
        match (to, self.colors_enabled) {
            (Some(to), true) => {
                let _ = writeln!(
                    self.writer,
                    "{} {} {} {}",
                    counter.cyan(),
                    from.dimmed(),
                    "→".cyan(),
                    to
                );
            }
            (Some(to), false) => {
                let _ = writeln!(self.writer, "{} {} -> {}", counter, from, to);
            }
            (None, true) => {
                let _ = writeln!(self.writer, "{} {}", counter.cyan(), from);
            }
            (None, false) => {
                let _ = writeln!(self.writer, "{} {}", counter, from);
            }
        }
    }

    fn item_note(&mut self, current: usize, total: usize, name: &str, note: &str) {
        if self.silent {
            return;
        }
        let counter = format!("[{}/{}]", current, total);
        if self.colors_enabled {
            let note = if note == "failed" {
                note.red().bold()
            } else {
                note.dimmed()
            };
            let _ = writeln!(self.writer, "{} {} ({})", counter.cyan(), name.dimmed(), note);
        } else {
            let _ = writeln!(self.writer, "{} {} ({})", counter, name, note);
        }
    }

    /// Report an error during operation (non-fatal)
    pub fn warn(&mut self, message: &str) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "!".yellow().bold(), message.yellow());
        } else {
            let _ = writeln!(self.writer, "Warning: {}", message);
        }
    }

    pub fn rules_saved(&mut self, path: &Path) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{} {}",
                "✓".green().bold(),
                format!("Rules saved to: {}", path.display()).green()
            );
        } else {
            let _ = writeln!(self.writer, "Rules saved to: {}", path.display());
        }
    }

    /// Report session state written
    pub fn state_written(&mut self, path: &Path) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{}",
                format!("Undo history saved to: {}", path.display()).dimmed()
            );
        } else {
            let _ = writeln!(self.writer, "Undo history saved to: {}", path.display());
        }
    }
}
