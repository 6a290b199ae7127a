use crate::config::RawRules;
use crate::history::OperationRecord;
use crate::scanner::FileEntry;
use crate::session::{BatchReport, Outcome, PasteMode, RenameEntry};
use std::io::{self, Write};

/// Display a directory listing as name / type columns
pub fn display_listing(entries: &[FileEntry], writer: &mut impl Write) -> io::Result<()> {
    if entries.is_empty() {
        writeln!(writer, "No entries.")?;
        return Ok(());
    }

    let width = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
    for entry in entries {
        writeln!(writer, "{:<width$}  {}", entry.name, entry.file_type, width = width)?;
    }
    Ok(())
}

/// Display the planned names of the selected entries
pub fn display_preview(
    entries: &[RenameEntry],
    dry_run: bool,
    writer: &mut impl Write,
) -> io::Result<()> {
    let selected: Vec<&RenameEntry> = entries.iter().filter(|e| e.selected).collect();
    let changed = selected.iter().filter(|e| e.is_changed()).count();

    writeln!(writer)?;
    writeln!(writer, "========================================")?;
    if dry_run {
        writeln!(writer, "              DRY RUN")?;
    } else {
        writeln!(writer, "              PREVIEW")?;
    }
    writeln!(writer, "========================================")?;
    writeln!(writer)?;

    if selected.is_empty() {
        writeln!(writer, "No entries selected.")?;
        return Ok(());
    }

    writeln!(writer, "Planned changes:")?;
    writeln!(writer)?;

    for (i, entry) in selected.iter().enumerate() {
        writeln!(writer, "  {}. {}", i + 1, entry.original_name)?;
        if entry.is_changed() {
            writeln!(writer, "     To:   {}", entry.computed_name)?;
        } else {
            writeln!(writer, "     [=] Name unchanged")?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "----------------------------------------")?;
    writeln!(writer, "Summary:")?;
    writeln!(writer, "  {} of {} entries would be renamed", changed, selected.len())?;

    if dry_run {
        writeln!(writer)?;
        writeln!(writer, "Run without --dry to apply these changes.")?;
    }

    Ok(())
}

/// Display the outcome of a rename, paste or delete batch
pub fn display_batch_report(report: &BatchReport, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "Successfully {} {} of {} entries.",
        report.kind.past_tense(),
        report.done_count(),
        report.items.len()
    )?;

    let unchanged = report.unchanged_count();
    if unchanged > 0 {
        writeln!(writer, "  {} entries were already in place.", unchanged)?;
    }

    if let Some(item) = report.failure() {
        if let Outcome::Failed(err) = &item.outcome {
            writeln!(writer, "  Failed: {} ({})", item.source_name(), err)?;
        }
    }

    let skipped = report.skipped_count();
    if skipped > 0 {
        writeln!(writer, "  {} entries were not attempted.", skipped)?;
    }

    Ok(())
}

/// Display the operation an undo reverted
pub fn display_undo(record: &OperationRecord, writer: &mut impl Write) -> io::Result<()> {
    let message = match record {
        OperationRecord::Rename { from, to } | OperationRecord::Move { from, to } => {
            format!("Restored {} from {}", from.display(), to.display())
        }
        OperationRecord::Copy { to, .. } => format!("Removed copy {}", to.display()),
        OperationRecord::Delete { path } => format!("Cannot restore {}", path.display()),
    };
    writeln!(writer, "Undone {}: {}", record.kind(), message)
}

/// Display clipboard contents after a copy or cut
pub fn display_clipboard(count: usize, mode: PasteMode, writer: &mut impl Write) -> io::Result<()> {
    let action = match mode {
        PasteMode::Copy => "copy",
        PasteMode::Move => "move",
    };
    writeln!(writer, "{} path(s) on the clipboard; paste will {} them.", count, action)
}

/// Display a rule set as `key: value` lines, empty keys included
pub fn display_rules(raw: &RawRules, writer: &mut impl Write) -> io::Result<()> {
    let fields = [
        ("prefix", &raw.prefix),
        ("suffix", &raw.suffix),
        ("remove_start", &raw.remove_start),
        ("remove_end", &raw.remove_end),
        ("extension", &raw.extension),
        ("regex_find", &raw.regex_find),
        ("regex_replace", &raw.regex_replace),
        ("date_format", &raw.date_format),
    ];
    for (key, value) in fields {
        writeln!(writer, "{:<14} {}", format!("{}:", key), value)?;
    }
    Ok(())
}
