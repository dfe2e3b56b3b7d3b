//! Command line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TidyFlix - Keep a movie collection tidy
#[derive(Parser, Debug)]
#[command(name = "tidyflix")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find and manage duplicate movie directories with quality scoring
    Dedup {
        /// Directories to scan for duplicates (default: current directory)
        #[arg(value_name = "DIR", default_values_os_t = vec![PathBuf::from(".")])]
        directories: Vec<PathBuf>,

        /// Comma-separated language codes to show in subtitle lists (e.g. EN,FR)
        #[arg(short = 'l', long, value_name = "LANG")]
        languages: Option<String>,
    },

    /// Normalize directory names into a canonical dotted form
    Normalize {
        /// Directories whose subdirectories get renamed (default: current directory)
        #[arg(value_name = "DIR", default_values_os_t = vec![PathBuf::from(".")])]
        directories: Vec<PathBuf>,

        /// Show what would be changed without renaming anything
        #[arg(long)]
        dry_run: bool,

        /// Show the individual rewrite steps applied to each name
        #[arg(short = 'e', long)]
        explain: bool,
    },

    /// Delete unwanted files (.txt, .exe, .url) recursively
    Clean {
        /// Directories to clean (default: current directory)
        #[arg(value_name = "DIR", default_values_os_t = vec![PathBuf::from(".")])]
        directories: Vec<PathBuf>,

        /// Show what would be deleted without deleting anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Move loose media files into per-title subdirectories
    Organize {
        /// Directories to organize (default: current directory)
        #[arg(value_name = "DIR", default_values_os_t = vec![PathBuf::from(".")])]
        directories: Vec<PathBuf>,

        /// Show what would be moved without moving anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Verify that every subdirectory contains at least one media file
    Verify {
        /// Directories to verify (default: current directory)
        #[arg(value_name = "DIR", default_values_os_t = vec![PathBuf::from(".")])]
        directories: Vec<PathBuf>,

        /// Delete subdirectories without media files
        #[arg(long)]
        delete: bool,
    },

    /// Rename main media files to match their parent directory names
    Filenames {
        /// Directories to process (default: current directory)
        #[arg(value_name = "DIR", default_values_os_t = vec![PathBuf::from(".")])]
        directories: Vec<PathBuf>,

        /// Show what would be renamed without renaming anything
        #[arg(long)]
        dry_run: bool,
    },
}

/// Parse a `-l EN,FR` style argument into uppercased language codes.
pub fn parse_language_filter(raw: Option<&str>) -> Option<Vec<String>> {
    raw.map(|value| {
        value
            .split(',')
            .map(|lang| lang.trim().to_uppercase())
            .filter(|lang| !lang.is_empty())
            .collect()
    })
    .filter(|langs: &Vec<String>| !langs.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_filter() {
        assert_eq!(parse_language_filter(None), None);
        assert_eq!(
            parse_language_filter(Some("en")),
            Some(vec!["EN".to_string()])
        );
        assert_eq!(
            parse_language_filter(Some("EN, fr ,es")),
            Some(vec!["EN".to_string(), "FR".to_string(), "ES".to_string()])
        );
        assert_eq!(parse_language_filter(Some(" , ")), None);
    }
}
