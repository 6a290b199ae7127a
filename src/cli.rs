use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::RawRules;
use crate::scanner::ListOptions;

#[derive(Parser, Debug)]
#[command(name = "renamr")]
#[command(author, version, about, long_about = None)]
#[command(about = "Batch rename files by rules, with clipboard file operations and undo")]
pub struct Args {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the undo history and clipboard between runs
    #[arg(long, value_name = "DIR", env = "RENAMR_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the entries of a directory
    List {
        dir: PathBuf,

        #[command(flatten)]
        listing: ListArgs,
    },

    /// Show the names the rules would produce, without renaming
    Preview {
        dir: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,

        #[command(flatten)]
        selection: SelectArgs,

        #[command(flatten)]
        listing: ListArgs,
    },

    /// Rename the selected entries of a directory
    Rename {
        dir: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,

        #[command(flatten)]
        selection: SelectArgs,

        #[command(flatten)]
        listing: ListArgs,

        /// Simulate changes without modifying the filesystem
        #[arg(short, long)]
        dry: bool,
    },

    /// Put paths on the clipboard for a later paste
    Copy {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Put paths on the clipboard; the next paste moves them
    Cut {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Copy or move the clipboard paths into a directory
    Paste { dir: PathBuf },

    /// Send paths to the trash
    Delete {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Remove instead of moving to the trash
        #[arg(long)]
        permanent: bool,
    },

    /// Revert the most recent operation
    Undo,

    /// Save or show rule files
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write the given rules to a file
    Save {
        file: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Print the rules stored in a file
    Show { file: PathBuf },
}

/// Rule flags. Each given flag overrides the matching key of `--config`.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct RuleArgs {
    /// Rule file to start from
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Text added before the name
    #[arg(long, allow_hyphen_values = true)]
    pub prefix: Option<String>,

    /// Text added after the name, before the extension
    #[arg(long, allow_hyphen_values = true)]
    pub suffix: Option<String>,

    /// Characters to drop from the start of the name
    #[arg(long, value_name = "COUNT", allow_hyphen_values = true)]
    pub remove_start: Option<String>,

    /// Characters to drop from the end of the name
    #[arg(long, value_name = "COUNT", allow_hyphen_values = true)]
    pub remove_end: Option<String>,

    /// Extension to append, dot included (e.g. ".bak")
    #[arg(long, allow_hyphen_values = true)]
    pub extension: Option<String>,

    /// Regular expression; its first match in the name is replaced
    #[arg(long, value_name = "PATTERN", allow_hyphen_values = true)]
    pub regex_find: Option<String>,

    /// Literal replacement for the regex match
    #[arg(long, value_name = "TEXT", allow_hyphen_values = true)]
    pub regex_replace: Option<String>,

    /// strftime format for the first date found in the name
    #[arg(long, value_name = "FORMAT", allow_hyphen_values = true)]
    pub date_format: Option<String>,
}

impl RuleArgs {
    /// Apply the given flags on top of `base`
    pub fn overlay(&self, mut base: RawRules) -> RawRules {
        let fields = [
            (&self.prefix, &mut base.prefix),
            (&self.suffix, &mut base.suffix),
            (&self.remove_start, &mut base.remove_start),
            (&self.remove_end, &mut base.remove_end),
            (&self.extension, &mut base.extension),
            (&self.regex_find, &mut base.regex_find),
            (&self.regex_replace, &mut base.regex_replace),
            (&self.date_format, &mut base.date_format),
        ];
        for (flag, field) in fields {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
        base
    }
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct SelectArgs {
    /// Entry to operate on (repeatable); all listed entries when omitted
    #[arg(short = 's', long = "select", value_name = "NAME")]
    pub names: Vec<String>,
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct ListArgs {
    /// Include directories
    #[arg(long)]
    pub dirs: bool,

    /// Include hidden entries
    #[arg(long)]
    pub hidden: bool,

    /// Only entries of this type (extension, "Directory" or "Unknown")
    #[arg(long = "type", value_name = "TYPE")]
    pub type_filter: Option<String>,
}

impl ListArgs {
    pub fn to_options(&self) -> ListOptions {
        ListOptions {
            show_directories: self.dirs,
            show_hidden: self.hidden,
            type_filter: self.type_filter.clone(),
        }
    }
}
