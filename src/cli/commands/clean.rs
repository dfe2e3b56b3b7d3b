//! Unwanted file cleanup command.

use crate::cli::commands;
use crate::utils::fs as fsutil;
use crate::Result;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Extensions deleted by the clean command.
const UNWANTED_EXTENSIONS: &[&str] = &["txt", "exe", "url"];

/// Delete .txt, .exe and .url files recursively. Text files inside
/// BDMV or JAR trees are structural and are skipped.
pub fn run(directories: &[PathBuf], dry_run: bool) -> Result<bool> {
    let target_dirs = commands::validate_directories(directories)?;

    let mut total_deleted = 0usize;
    let mut total_bytes = 0u64;

    for target_dir in &target_dirs {
        let resolved = commands::display_path(target_dir);
        println!("\nScanning directory recursively: {}", resolved.display());

        let mut files_to_delete: Vec<PathBuf> = Vec::new();
        let mut skipped_files: Vec<PathBuf> = Vec::new();

        for entry in WalkDir::new(target_dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(ext) = fsutil::get_extension(path) else {
                continue;
            };
            if !UNWANTED_EXTENSIONS.contains(&ext.as_str()) {
                continue;
            }
            if ext == "txt" {
                let upper = path.display().to_string().to_uppercase();
                if upper.contains("BDMV") || upper.contains("JAR") {
                    skipped_files.push(path.to_path_buf());
                    continue;
                }
            }
            files_to_delete.push(path.to_path_buf());
        }

        if !skipped_files.is_empty() {
            println!(
                "Skipped {} .txt files (path contains BDMV or JAR):",
                skipped_files.len()
            );
            for path in &skipped_files {
                println!("  Skipped: {}", path.display());
            }
            println!();
        }

        if files_to_delete.is_empty() {
            println!("No files found to delete in this directory.");
            continue;
        }

        let dir_bytes: u64 = files_to_delete
            .iter()
            .filter_map(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .sum();
        println!(
            "Found {} files to delete (Total size: {}):",
            files_to_delete.len(),
            fsutil::format_size(dir_bytes)
        );

        for path in &files_to_delete {
            let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            if dry_run {
                println!(
                    "  Would delete: {} ({})",
                    path.display(),
                    fsutil::format_size(size)
                );
            } else {
                match std::fs::remove_file(path) {
                    Ok(()) => println!(
                        "  Deleted: {} ({})",
                        path.display(),
                        fsutil::format_size(size)
                    ),
                    Err(e) => println!("  Error deleting {}: {}", path.display(), e),
                }
            }
        }

        total_deleted += files_to_delete.len();
        total_bytes += dir_bytes;
    }

    if target_dirs.len() > 1 {
        if dry_run {
            println!(
                "\nTotal dry run complete. Would delete {} files ({} total) across {} directories.",
                total_deleted,
                fsutil::format_size(total_bytes),
                target_dirs.len()
            );
        } else {
            println!(
                "\nTotal deleted {} files ({} total) across {} directories.",
                total_deleted,
                fsutil::format_size(total_bytes),
                target_dirs.len()
            );
        }
    }

    Ok(true)
}
