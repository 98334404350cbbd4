//! Command-line interface definitions.
//!
//! Arguments are parsed with `clap`'s derive API. Dates stay as strings here
//! and are parsed by the caller, which knows the current time.

use crate::constants::{APP_DESCRIPTION, APP_NAME};
use crate::export::ExportFormat;
use crate::journal_core::{parse_date_string, SortOrder};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// A private diary with search, statistics and export
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION, author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// What to do; lists entries when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a new entry
    Add(AddArgs),

    /// Change an existing entry
    Edit(EditArgs),

    /// Delete an entry permanently
    Delete {
        /// Entry id or a unique prefix of it
        id: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show one entry in full
    Show {
        /// Entry id or a unique prefix of it
        id: String,
    },

    /// List entries grouped by month
    List(ListArgs),

    /// Show entry count, character count and writing streak
    Stats {
        /// Only count entries matching this text or date
        #[arg(short = 's', long)]
        search: Option<String>,
    },

    /// Export a date range to a file
    Export(ExportArgs),

    /// Lock the diary now so the next command asks for the passphrase
    Lock,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Entry title
    #[arg(short = 't', long)]
    pub title: String,

    /// Entry text; read from stdin when omitted
    #[arg(short = 'c', long)]
    pub content: Option<String>,

    /// Diary date (YYYY-MM-DD, YYYYMMDD or "YYYY-MM-DD HH:MM"); defaults to now
    #[arg(short = 'd', long)]
    pub date: Option<String>,

    /// Image file to attach
    #[arg(short = 'i', long)]
    pub image: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Entry id or a unique prefix of it
    pub id: String,

    /// New title
    #[arg(short = 't', long)]
    pub title: Option<String>,

    /// New entry text
    #[arg(short = 'c', long)]
    pub content: Option<String>,

    /// New diary date (YYYY-MM-DD, YYYYMMDD or "YYYY-MM-DD HH:MM")
    #[arg(short = 'd', long)]
    pub date: Option<String>,

    /// Replace the attached image
    #[arg(short = 'i', long, conflicts_with = "remove_image")]
    pub image: Option<PathBuf>,

    /// Remove the attached image
    #[arg(long)]
    pub remove_image: bool,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only list entries matching this text or date
    #[arg(short = 's', long)]
    pub search: Option<String>,

    /// Sort order (newest or oldest)
    #[arg(long, value_enum, ignore_case = true, default_value_t = SortOrder::Newest)]
    pub sort: SortOrder,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// First day to include (YYYY-MM-DD or YYYYMMDD); defaults to one month ago
    #[arg(long)]
    pub from: Option<String>,

    /// Last day to include (YYYY-MM-DD or YYYYMMDD); defaults to today
    #[arg(long)]
    pub to: Option<String>,

    /// Document format
    #[arg(short = 'f', long, value_enum, default_value_t = ExportFormat::Markdown)]
    pub format: ExportFormat,

    /// File to write
    #[arg(short = 'o', long)]
    pub output: PathBuf,
}

impl ExportArgs {
    /// Parses `--from` and `--to`, if given.
    pub fn parse_range(
        &self,
    ) -> Result<(Option<NaiveDate>, Option<NaiveDate>), chrono::ParseError> {
        let from = self.from.as_deref().map(parse_date_string).transpose()?;
        let to = self.to.as_deref().map(parse_date_string).transpose()?;
        Ok((from, to))
    }
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        <CliArgs as Parser>::parse()
    }

    /// The requested command; a bare invocation lists entries.
    pub fn command_or_default(self) -> Commands {
        self.command
            .unwrap_or_else(|| Commands::List(ListArgs::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(vec!["daybook"]);
        assert!(!args.verbose);
        assert_eq!(args.log_format, LogFormat::Text);
        assert!(args.command.is_none());

        match args.command_or_default() {
            Commands::List(list) => {
                assert!(list.search.is_none());
                assert_eq!(list.sort, SortOrder::Newest);
            }
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(vec!["daybook", "stats", "-v", "--log-format", "json"]);
        assert!(args.verbose);
        assert_eq!(args.log_format, LogFormat::Json);
        assert!(matches!(args.command, Some(Commands::Stats { search: None })));
    }

    #[test]
    fn test_add_args() {
        let args = CliArgs::parse_from(vec![
            "daybook", "add", "--title", "여행", "-c", "바다", "--date", "2025-07-04 21:30",
        ]);

        match args.command {
            Some(Commands::Add(add)) => {
                assert_eq!(add.title, "여행");
                assert_eq!(add.content.as_deref(), Some("바다"));
                assert_eq!(add.date.as_deref(), Some("2025-07-04 21:30"));
                assert!(add.image.is_none());
            }
            other => panic!("Expected add, got {:?}", other),
        }
    }

    #[test]
    fn test_add_requires_title() {
        assert!(CliArgs::try_parse_from(vec!["daybook", "add", "-c", "text"]).is_err());
    }

    #[test]
    fn test_edit_image_flags_conflict() {
        let result = CliArgs::try_parse_from(vec![
            "daybook",
            "edit",
            "abc",
            "--image",
            "photo.jpg",
            "--remove-image",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_sort_parsing() {
        let args = CliArgs::parse_from(vec!["daybook", "list", "--sort", "Oldest", "-s", "7월"]);
        match args.command {
            Some(Commands::List(list)) => {
                assert_eq!(list.sort, SortOrder::Oldest);
                assert_eq!(list.search.as_deref(), Some("7월"));
            }
            other => panic!("Expected list, got {:?}", other),
        }

        assert!(CliArgs::try_parse_from(vec!["daybook", "list", "--sort", "random"]).is_err());
    }

    #[test]
    fn test_delete_confirmation_flag() {
        let args = CliArgs::parse_from(vec!["daybook", "delete", "1a2b", "-y"]);
        assert!(matches!(
            args.command,
            Some(Commands::Delete { ref id, yes: true }) if id == "1a2b"
        ));
    }

    #[test]
    fn test_export_args_and_range() {
        let args = CliArgs::parse_from(vec![
            "daybook", "export", "--from", "20250701", "--to", "2025-07-31", "-f", "json", "-o",
            "out.json",
        ]);

        match args.command {
            Some(Commands::Export(export)) => {
                assert_eq!(export.format, ExportFormat::Json);
                assert_eq!(export.output, PathBuf::from("out.json"));

                let (from, to) = export.parse_range().unwrap();
                assert_eq!(from.unwrap().day(), 1);
                assert_eq!(to.unwrap().day(), 31);
            }
            other => panic!("Expected export, got {:?}", other),
        }
    }

    #[test]
    fn test_export_requires_output() {
        assert!(CliArgs::try_parse_from(vec!["daybook", "export"]).is_err());
    }

    #[test]
    fn test_export_invalid_date() {
        let args = CliArgs::parse_from(vec!["daybook", "export", "--from", "soon", "-o", "x.md"]);
        match args.command {
            Some(Commands::Export(export)) => assert!(export.parse_range().is_err()),
            other => panic!("Expected export, got {:?}", other),
        }
    }

    #[test]
    fn test_lock_command() {
        let args = CliArgs::parse_from(vec!["daybook", "lock"]);
        assert!(matches!(args.command, Some(Commands::Lock)));
    }
}
