//! Duplicate detection and interactive resolution command.

use crate::cli::commands;
use crate::core::{deletion, grouper, resolver};
use crate::utils::ui::Palette;
use crate::Result;
use std::path::PathBuf;

/// Run the full pipeline: discovery, background analysis, interactive
/// resolution and the final deletion confirmation.
pub fn run(
    directories: &[PathBuf],
    language_filter: Option<Vec<String>>,
    palette: Palette,
) -> Result<bool> {
    let target_dirs = commands::validate_directories(directories)?;

    if target_dirs.len() == 1 && target_dirs[0] == PathBuf::from(".") {
        println!(
            "{}",
            palette.cyan(&format!(
                "Processing directory: {}",
                commands::display_path(&target_dirs[0]).display()
            ))
        );
    } else {
        let joined = target_dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}", palette.cyan(&format!("Processing directories: {}", joined)));
    }

    if let Some(languages) = &language_filter {
        println!(
            "{}",
            palette.bold_blue(&format!("Language filter: {}", languages.join(", ")))
        );
    }

    println!(
        "\n{}",
        palette.cyan("Phase 1: Discovering directories and identifying duplicates...")
    );
    let map = grouper::discover_duplicates(&target_dirs)?;
    tracing::debug!(
        "discovery: {} directories, {} duplicate groups",
        map.total_dirs,
        map.group_count()
    );

    if map.groups.is_empty() {
        println!(
            "\n{}",
            palette.green("No duplicates found. All directories appear to be unique.")
        );
        return Ok(true);
    }

    println!(
        "Found {} duplicate groups ({} directories) out of {} directories total.",
        map.group_count(),
        map.member_count(),
        map.total_dirs
    );
    println!(
        "{}",
        palette.cyan("Starting background analysis and interactive processing...")
    );

    let to_delete = resolver::process_with_background_scan(map, language_filter, palette)?;
    deletion::confirm_and_delete(&to_delete, palette)?;
    Ok(true)
}
