//! Media file organization command.

use crate::cli::commands;
use crate::utils::fs as fsutil;
use crate::utils::ui::Palette;
use crate::Result;
use std::path::{Path, PathBuf};

/// Move each loose media file into a subdirectory named after the file
/// (stem with spaces replaced by dots).
pub fn run(directories: &[PathBuf], dry_run: bool, palette: Palette) -> Result<bool> {
    let target_dirs = commands::validate_directories(directories)?;

    let mut success = true;
    let mut total_moved = 0usize;

    for target_dir in &target_dirs {
        let resolved = commands::display_path(target_dir);
        println!(
            "{}",
            palette.cyan(&format!("Processing directory: {}", resolved.display()))
        );

        let mut media_files: Vec<PathBuf> = Vec::new();
        for entry in std::fs::read_dir(target_dir)?.flatten() {
            let path = entry.path();
            if path.is_file() && fsutil::is_media_file(&path) {
                media_files.push(path);
            }
        }
        media_files.sort();

        if media_files.is_empty() {
            println!("  No media files found in {}", resolved.display());
            continue;
        }
        println!("  Found {} media file(s)", media_files.len());

        for file_path in &media_files {
            match organize_single_file(file_path, dry_run, palette) {
                Ok(true) => total_moved += 1,
                Ok(false) => {}
                Err(e) => {
                    println!(
                        "  {} Could not move {} - {}",
                        palette.red("FAILED:"),
                        file_name(file_path),
                        e
                    );
                    success = false;
                }
            }
        }
    }

    if dry_run {
        println!(
            "\n{}",
            palette.cyan(&format!(
                "Dry run complete. {} file(s) would be organized.",
                total_moved
            ))
        );
    } else {
        println!(
            "\n{}",
            palette.green(&format!(
                "Organization complete. {} file(s) moved successfully.",
                total_moved
            ))
        );
    }

    Ok(success)
}

fn organize_single_file(file_path: &Path, dry_run: bool, palette: Palette) -> Result<bool> {
    let stem = file_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let subdir_name = stem.replace(' ', ".");

    let parent = file_path.parent().unwrap_or_else(|| Path::new("."));
    let destination_dir = parent.join(&subdir_name);
    let destination_file = destination_dir.join(file_path.file_name().unwrap_or_default());

    if destination_file.exists() {
        println!(
            "  {}",
            palette.yellow(&format!(
                "Skipping {} - destination already exists",
                file_name(file_path)
            ))
        );
        return Ok(false);
    }

    if dry_run {
        println!(
            "  {} {}",
            palette.blue("Would create:"),
            destination_dir.display()
        );
        println!(
            "  {} {} -> {}",
            palette.blue("Would move:"),
            file_name(file_path),
            destination_dir.display()
        );
        return Ok(true);
    }

    if !destination_dir.exists() {
        println!(
            "  {} {}",
            palette.green("Creating:"),
            destination_dir.display()
        );
        std::fs::create_dir_all(&destination_dir)?;
    }

    println!(
        "  {} {} -> {}",
        palette.green("Moving:"),
        file_name(file_path),
        destination_dir.display()
    );
    std::fs::rename(file_path, &destination_file)?;
    Ok(true)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
