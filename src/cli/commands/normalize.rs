//! Directory name normalization command.

use crate::cli::commands;
use crate::core::normalize::Normalizer;
use crate::utils::fs as fsutil;
use crate::utils::ui::{self, Palette};
use crate::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn run(
    directories: &[PathBuf],
    dry_run: bool,
    explain: bool,
    palette: Palette,
) -> Result<bool> {
    let target_dirs = commands::validate_directories(directories)?;
    let normalizer = Normalizer::new()?;
    let mut all_success = true;

    for target_dir in &target_dirs {
        let resolved = commands::display_path(target_dir);
        println!("\nProcessing directory: {}", resolved.display());

        let mut subdirs: Vec<String> = Vec::new();
        for entry in std::fs::read_dir(target_dir)?.flatten() {
            if entry.path().is_dir() {
                subdirs.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        subdirs.sort();

        for dir_name in subdirs {
            let new_name = if explain {
                println!("\n{}", palette.bold_blue(&dir_name));
                normalizer.normalize_explained(&dir_name, palette)
            } else {
                normalizer.normalize(&dir_name)
            };
            if new_name == dir_name {
                continue;
            }

            let old_path = target_dir.join(&dir_name);
            let new_path = target_dir.join(&new_name);

            if dry_run {
                let (before, after) = ui::highlight_changes(&dir_name, &new_name, palette);
                println!("  Before: '{}'", before);
                println!("  After:  '{}'", after);
                continue;
            }

            if !rename_with_conflict_handling(
                &old_path, &new_path, &dir_name, &new_name, target_dir, palette,
            )? {
                all_success = false;
            }
        }
    }

    Ok(all_success)
}

/// Rename one directory, resolving a name collision by deleting the
/// less valuable of the two trees after confirmation.
fn rename_with_conflict_handling(
    old_path: &Path,
    new_path: &Path,
    dir_name: &str,
    new_name: &str,
    target_dir: &Path,
    palette: Palette,
) -> Result<bool> {
    if new_path.exists() {
        // A case-only rename on a case-insensitive mount (Samba/CIFS)
        // can destroy the directory it is renaming.
        let case_only = dir_name.to_lowercase() == new_name.to_lowercase();
        if case_only && fsutil::is_case_insensitive_filesystem(target_dir) {
            println!(
                "\n{}",
                palette.red(&format!(
                    "ERROR: Cannot safely rename '{}' to '{}'",
                    dir_name, new_name
                ))
            );
            println!(
                "Reason: Case-insensitive filesystem detected. Case-only renames are unsafe and may cause data loss."
            );
            return Ok(false);
        }

        if !new_path.is_dir() {
            println!(
                "Error: Cannot rename {} -> {} (file exists)",
                old_path.display(),
                new_path.display()
            );
            return Ok(false);
        }

        println!("\nDirectory conflict detected!");
        println!("Source:      '{}' ({})", dir_name, directory_info(old_path));
        println!("Destination: '{}' ({})", new_name, directory_info(new_path));

        let source_has_media = fsutil::has_media_files_recursive(old_path);
        let dest_has_media = fsutil::has_media_files_recursive(new_path);
        let delete_destination = pick_destination_for_deletion(old_path, new_path);

        println!("\nDeletion analysis:");
        println!("  Source has media files: {}", source_has_media);
        println!("  Destination has media files: {}", dest_has_media);
        if source_has_media != dest_has_media {
            if delete_destination {
                println!("  -> Deleting destination (no media files)");
            } else {
                println!("  -> Deleting source (no media files)");
            }
        } else {
            println!("  Source size: {} bytes", fsutil::directory_size(old_path));
            println!("  Destination size: {} bytes", fsutil::directory_size(new_path));
            if delete_destination {
                println!("  -> Deleting destination (smaller/equal size)");
            } else {
                println!("  -> Deleting source (smaller/equal size)");
            }
        }

        let doomed_name = if delete_destination { new_name } else { dir_name };
        let message = format!(
            "Delete \"{}\" as determined by analysis? [Y/n]: ",
            doomed_name
        );
        if !ui::confirm(&message, Some(true))? {
            println!("Skipped: {}", old_path.display());
            return Ok(true);
        }

        if delete_destination {
            println!("Deleting destination directory: {}", new_path.display());
            std::fs::remove_dir_all(new_path)?;
        } else {
            println!("Deleting source directory: {}", old_path.display());
            std::fs::remove_dir_all(old_path)?;
            println!("Kept existing destination: {}", new_path.display());
            return Ok(true);
        }
    }

    std::fs::rename(old_path, new_path)?;
    let (before, after) = ui::highlight_changes(dir_name, new_name, palette);
    println!("  Before: '{}'", before);
    println!("  After:  '{}'", after);
    Ok(true)
}

/// Decide which side of a name collision to delete: a tree without
/// media files loses; otherwise the smaller (or equal-sized source)
/// loses. Returns `true` when the destination should be deleted.
fn pick_destination_for_deletion(source: &Path, destination: &Path) -> bool {
    let source_has_media = fsutil::has_media_files_recursive(source);
    let dest_has_media = fsutil::has_media_files_recursive(destination);
    if source_has_media != dest_has_media {
        return source_has_media;
    }
    fsutil::directory_size(source) > fsutil::directory_size(destination)
}

fn directory_info(path: &Path) -> String {
    let file_count = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count();
    format!(
        "{} files, {}",
        file_count,
        fsutil::format_size(fsutil::directory_size(path))
    )
}
