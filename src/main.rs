//! TidyFlix CLI
//!
//! A command-line tool for keeping a movie collection tidy: duplicate
//! detection with quality scoring, name normalization and filesystem
//! housekeeping.

use clap::Parser;
use tidyflix::cli::{
    args::{self, Cli, Commands},
    commands::{clean, dedup, filenames, normalize, organize, verify},
};
use tidyflix::utils::ui::Palette;

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let palette = Palette::from_env(cli.no_color);

    // Run the appropriate command
    let success = match cli.command {
        Commands::Dedup {
            directories,
            languages,
        } => {
            let language_filter = args::parse_language_filter(languages.as_deref());
            dedup::run(&directories, language_filter, palette)?
        }

        Commands::Normalize {
            directories,
            dry_run,
            explain,
        } => normalize::run(&directories, dry_run, explain, palette)?,

        Commands::Clean {
            directories,
            dry_run,
        } => clean::run(&directories, dry_run)?,

        Commands::Organize {
            directories,
            dry_run,
        } => organize::run(&directories, dry_run, palette)?,

        Commands::Verify {
            directories,
            delete,
        } => verify::run(&directories, delete, palette)?,

        Commands::Filenames {
            directories,
            dry_run,
        } => filenames::run(&directories, dry_run, palette)?,
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("tidyflix=debug")
    } else {
        EnvFilter::new("tidyflix=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
