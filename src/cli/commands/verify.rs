//! Media presence verification command.

use crate::cli::commands;
use crate::utils::fs as fsutil;
use crate::utils::ui::Palette;
use crate::Result;
use std::path::{Path, PathBuf};

/// Verify that every immediate subdirectory contains at least one media
/// file somewhere in its tree. With `delete`, directories that fail the
/// check are removed, unless they hold archive files that might still
/// be extracted.
pub fn run(directories: &[PathBuf], delete: bool, palette: Palette) -> Result<bool> {
    let target_dirs = commands::validate_directories(directories)?;

    let mut total_checked = 0usize;
    let mut total_empty = 0usize;
    let mut total_warnings = 0usize;

    for target_dir in &target_dirs {
        let resolved = commands::display_path(target_dir);
        println!(
            "\n{}",
            palette.cyan(&format!("Verifying directory: {}", resolved.display()))
        );

        let (checked, empty, warnings) = verify_one_root(target_dir, delete, palette);
        total_checked += checked;
        total_empty += empty;
        total_warnings += warnings;
    }

    println!("\n{}", palette.bold_blue("Summary:"));
    println!("  Directories checked: {}", total_checked);
    if total_empty == 0 {
        println!(
            "  {}",
            palette.green("All directories contain media files")
        );
    } else if delete {
        println!(
            "  {}",
            palette.red(&format!("{} directories deleted", total_empty))
        );
    } else {
        println!(
            "  {}",
            palette.red(&format!("{} directories without media files", total_empty))
        );
    }
    if total_warnings > 0 {
        println!(
            "  {}",
            palette.yellow(&format!(
                "{} directories contain archive files (rar, par2)",
                total_warnings
            ))
        );
    }

    Ok(total_empty == 0)
}

/// Check the immediate subdirectories of one root. Returns
/// (checked, empty, warnings) counts.
fn verify_one_root(root: &Path, delete: bool, palette: Palette) -> (usize, usize, usize) {
    let mut subdirs: Vec<(String, PathBuf)> = Vec::new();
    match std::fs::read_dir(root) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    subdirs.push((entry.file_name().to_string_lossy().to_string(), path));
                }
            }
        }
        Err(_) => {
            println!("  {}", palette.red("Cannot access directory"));
            return (0, 0, 0);
        }
    }

    if subdirs.is_empty() {
        println!("  {}", palette.yellow("No subdirectories found"));
        return (0, 0, 0);
    }
    subdirs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut checked = 0usize;
    let mut empty = 0usize;
    let mut warnings = 0usize;

    for (name, path) in subdirs {
        checked += 1;

        let has_archives = fsutil::has_archive_files_recursive(&path);
        let has_media = fsutil::has_media_files_recursive(&path);

        if has_archives {
            println!(
                "  {}",
                palette.yellow(&format!("Contains archive files: {}", name))
            );
            warnings += 1;
        }
        if has_media {
            continue;
        }

        // Archives may still be extracted into media; never auto-delete.
        if delete && !has_archives {
            match std::fs::remove_dir_all(&path) {
                Ok(()) => println!("  {}", palette.red(&format!("Deleted: {}", name))),
                Err(e) => println!(
                    "  {}",
                    palette.red(&format!("Failed to delete {}: {}", name, e))
                ),
            }
        } else if has_archives {
            println!(
                "  {}",
                palette.yellow(&format!(
                    "No media files (protected due to archives): {}",
                    name
                ))
            );
        } else {
            println!("  {}", palette.red(&format!("No media files: {}", name)));
        }
        empty += 1;
    }

    (checked, empty, warnings)
}
