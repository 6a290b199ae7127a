use clap::Parser;
use renamr::cli::{Args, Command, ConfigCommand, ListArgs, RuleArgs, SelectArgs};
use renamr::clipboard::{Clipboard, FileClipboard, MemoryClipboard};
use renamr::config::{load_config, read_raw_rules, save_config, RawRules};
use renamr::error::AppError;
use renamr::filesystem::{DeleteMode, FileSystem, RealFileSystem};
use renamr::logging;
use renamr::output::{
    display_batch_report, display_clipboard, display_listing, display_preview, display_rules,
    display_undo,
};
use renamr::progress::{should_use_colors, Progress};
use renamr::rules::RuleConfiguration;
use renamr::scanner::{scan_directory, ListOptions};
use renamr::session::{
    absolutize, read_session, write_session, BatchReport, Context, Outcome, Session, SessionFile,
    StateDir,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

type CliSession = Session<RealFileSystem, FileClipboard>;

fn main() {
    let args = Args::parse();

    logging::init(args.verbose);

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("\nError: {}", e.detailed_message());
        std::process::exit(e.exit_code().into());
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let state = args
        .state_dir
        .map(StateDir::new)
        .unwrap_or_else(StateDir::default_location);
    debug!(state_dir = ?state.root(), "Using state directory");

    let mut progress = Progress::new_with_ui(args.verbose > 0, should_use_colors());

    match args.command {
        Command::List { dir, listing } => list(&dir, &listing),
        Command::Preview {
            dir,
            rules,
            selection,
            listing,
        } => preview(&dir, &rules, &selection, &listing, false),
        Command::Rename {
            dir,
            rules,
            selection,
            listing,
            dry: true,
        } => preview(&dir, &rules, &selection, &listing, true),
        Command::Rename {
            dir,
            rules,
            selection,
            listing,
            dry: false,
        } => rename(&state, &dir, &rules, &selection, &listing, &mut progress),
        Command::Copy { paths } => to_clipboard(&state, &paths, false, &mut progress),
        Command::Cut { paths } => to_clipboard(&state, &paths, true, &mut progress),
        Command::Paste { dir } => paste(&state, &dir, &mut progress),
        Command::Delete { paths, permanent } => delete(&state, &paths, permanent, &mut progress),
        Command::Undo => undo(&state, &mut progress),
        Command::Config { action } => match action {
            ConfigCommand::Save { file, rules } => {
                let rules = build_rules(&rules)?;
                save_config(&rules, &file)?;
                progress.rules_saved(&file);
                Ok(())
            }
            ConfigCommand::Show { file } => {
                // Validate before showing so a broken pattern is reported
                let rules = load_config(&file)?;
                display_rules(&RawRules::from_rules(&rules), &mut io::stdout()).map_err(output_error)
            }
        },
    }
}

fn list(dir: &Path, listing: &ListArgs) -> Result<(), AppError> {
    let entries = scan_directory(&absolutize(dir), &listing.to_options())?;
    info!("Found {} entries", entries.len());
    display_listing(&entries, &mut io::stdout()).map_err(output_error)
}

fn preview(
    dir: &Path,
    rule_args: &RuleArgs,
    selection: &SelectArgs,
    listing: &ListArgs,
    dry_run: bool,
) -> Result<(), AppError> {
    let rules = build_rules(rule_args)?;
    let mut session = Session::open(
        RealFileSystem::default(),
        MemoryClipboard::default(),
        resolve_dir(dir)?,
        listing.to_options(),
    )?;
    apply_selection(&mut session, selection)?;

    let entries = session.preview(&rules);
    display_preview(entries, dry_run, &mut io::stdout()).map_err(output_error)
}

fn rename(
    state: &StateDir,
    dir: &Path,
    rule_args: &RuleArgs,
    selection: &SelectArgs,
    listing: &ListArgs,
    progress: &mut Progress,
) -> Result<(), AppError> {
    let rules = build_rules(rule_args)?;
    let mut session = open_session(state, DeleteMode::default(), resolve_dir(dir)?, listing.to_options())?;
    apply_selection(&mut session, selection)?;

    let report = session.rename_selected(&rules);
    finish_batch(state, &session, &report, progress)
}

fn to_clipboard(
    state: &StateDir,
    paths: &[PathBuf],
    cut: bool,
    progress: &mut Progress,
) -> Result<(), AppError> {
    let mut existing = Vec::new();
    for path in paths.iter().map(|p| absolutize(p)) {
        if path.exists() {
            existing.push(path);
        } else {
            progress.warn(&format!("{} does not exist", path.display()));
        }
    }
    if existing.is_empty() {
        return Err(AppError::Other("None of the given paths exist".to_string()));
    }

    let mut session = load_session(state, DeleteMode::default(), current_context())?;
    let count = if cut {
        session.cut_paths(&existing)?
    } else {
        session.copy_paths(&existing)?
    };
    save_state(state, &session, progress)?;

    display_clipboard(count, session.paste_mode(), &mut io::stdout()).map_err(output_error)
}

fn paste(state: &StateDir, dir: &Path, progress: &mut Progress) -> Result<(), AppError> {
    let mut session = load_session(state, DeleteMode::default(), resolve_dir(dir)?)?;
    let report = session.paste()?;
    finish_batch(state, &session, &report, progress)
}

fn delete(
    state: &StateDir,
    paths: &[PathBuf],
    permanent: bool,
    progress: &mut Progress,
) -> Result<(), AppError> {
    let mode = if permanent {
        DeleteMode::Permanent
    } else {
        DeleteMode::Trash
    };
    let paths: Vec<PathBuf> = paths.iter().map(|p| absolutize(p)).collect();

    let mut session = load_session(state, mode, current_context())?;
    let report = session.delete_paths(&paths);
    finish_batch(state, &session, &report, progress)
}

fn undo(state: &StateDir, progress: &mut Progress) -> Result<(), AppError> {
    let mut session = load_session(state, DeleteMode::default(), current_context())?;
    if session.undo_stack().is_empty() {
        return Err(AppError::NothingToUndo);
    }

    let result = session.undo();
    // The entry is consumed whether or not the undo succeeded
    save_state(state, &session, progress)?;

    let record = result?;
    display_undo(&record, &mut io::stdout()).map_err(output_error)
}

/// Rules from `--config` with the rule flags applied on top
fn build_rules(args: &RuleArgs) -> Result<RuleConfiguration, AppError> {
    let base = match &args.config {
        Some(path) => read_raw_rules(path)?,
        None => RawRules::default(),
    };
    Ok(args.overlay(base).to_rules()?)
}

/// Select the named entries, or everything listed when no names are given
fn apply_selection<F: FileSystem, C: Clipboard>(
    session: &mut Session<F, C>,
    selection: &SelectArgs,
) -> Result<(), AppError> {
    if selection.names.is_empty() {
        session.select_all();
        return Ok(());
    }

    let unknown = session.select(&selection.names);
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(AppError::UnknownEntries { names: unknown })
    }
}

fn resolve_dir(dir: &Path) -> Result<Context, AppError> {
    let path = absolutize(dir);
    if !path.exists() {
        return Err(AppError::DirectoryNotFound { path });
    }
    if !path.is_dir() {
        return Err(AppError::NotADirectory { path });
    }
    Ok(Context::new(path))
}

fn current_context() -> Context {
    Context::new(absolutize(Path::new(".")))
}

fn load_session(state: &StateDir, mode: DeleteMode, context: Context) -> Result<CliSession, AppError> {
    let saved = read_state(state)?;
    Ok(Session::new(
        RealFileSystem::new(mode),
        FileClipboard::new(state.clipboard_path()),
        context,
    )
    .with_state(saved))
}

fn open_session(
    state: &StateDir,
    mode: DeleteMode,
    context: Context,
    options: ListOptions,
) -> Result<CliSession, AppError> {
    let saved = read_state(state)?;
    let session = Session::open(
        RealFileSystem::new(mode),
        FileClipboard::new(state.clipboard_path()),
        context,
        options,
    )?;
    Ok(session.with_state(saved))
}

fn read_state(state: &StateDir) -> Result<SessionFile, AppError> {
    let path = state.session_path();
    read_session(&path).map_err(|e| AppError::State {
        path: Some(path),
        message: e.to_string(),
    })
}

fn save_state(state: &StateDir, session: &CliSession, progress: &mut Progress) -> Result<(), AppError> {
    let path = state.session_path();
    write_session(&session.to_state(), &path).map_err(|e| AppError::State {
        path: Some(path.clone()),
        message: e.to_string(),
    })?;
    progress.state_written(&path);
    Ok(())
}

/// Report a finished batch, persist what it recorded, and turn a failed
/// item into the command's error.
fn finish_batch(
    state: &StateDir,
    session: &CliSession,
    report: &BatchReport,
    progress: &mut Progress,
) -> Result<(), AppError> {
    progress.batch_items(report);
    save_state(state, session, progress)?;
    display_batch_report(report, &mut io::stdout()).map_err(output_error)?;

    match report.failure() {
        Some(item) => {
            let message = match &item.outcome {
                Outcome::Failed(e) => e.to_string(),
                _ => String::new(),
            };
            Err(AppError::OperationFailed {
                action: report.kind.verb().to_string(),
                from: item.source.display().to_string(),
                to: item.target.as_ref().map(|p| p.display().to_string()),
                message,
                completed: report.done_count(),
                skipped: report.skipped_count(),
            })
        }
        None => Ok(()),
    }
}

fn output_error(e: io::Error) -> AppError {
    AppError::Other(format!("Failed to display output: {}", e))
}
