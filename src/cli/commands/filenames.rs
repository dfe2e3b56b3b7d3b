//! Media filename normalization command.
//!
//! Renames the main media file in each subdirectory to match the
//! directory name, dragging obviously related subtitle files along so
//! players keep picking them up.

use crate::cli::commands;
use crate::utils::fs as fsutil;
use crate::utils::ui::{self, Palette};
use crate::Result;
use std::path::{Path, PathBuf};

/// Subtitle extensions renamed together with the media file.
const COMPANION_EXTENSIONS: &[&str] = &["srt", "idx", "sub"];

pub fn run(directories: &[PathBuf], dry_run: bool, palette: Palette) -> Result<bool> {
    let target_dirs = commands::validate_directories(directories)?;

    let mut success = true;
    let mut total_processed = 0usize;

    for target_dir in &target_dirs {
        let resolved = commands::display_path(target_dir);
        println!(
            "{}",
            palette.cyan(&format!("Processing directory: {}", resolved.display()))
        );

        let mut subdirs: Vec<PathBuf> = Vec::new();
        for entry in std::fs::read_dir(target_dir)?.flatten() {
            let path = entry.path();
            if path.is_dir() {
                subdirs.push(path);
            }
        }
        subdirs.sort();

        if subdirs.is_empty() {
            println!("  No subdirectories found in {}", resolved.display());
            continue;
        }
        println!("  Found {} subdirectory(ies)", subdirs.len());

        for subdir in &subdirs {
            match rename_in_directory(subdir, dry_run, palette) {
                Ok(true) => total_processed += 1,
                Ok(false) => {}
                Err(e) => {
                    println!(
                        "  {} Could not rename in {} - {}",
                        palette.red("FAILED:"),
                        subdir.display(),
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
                "Dry run complete. {} file(s) would be renamed.",
                total_processed
            ))
        );
    } else {
        println!(
            "\n{}",
            palette.green(&format!(
                "Filename normalization complete. {} file(s) renamed successfully.",
                total_processed
            ))
        );
    }

    Ok(success)
}

/// Rename the main media file (and companion subtitles) in one
/// subdirectory. Returns `true` when a rename happened or would happen
/// in dry-run mode.
fn rename_in_directory(subdir: &Path, dry_run: bool, palette: Palette) -> Result<bool> {
    let Some(main_video) = fsutil::largest_media_file(subdir) else {
        return Ok(false);
    };
    let old_name = main_video
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let dir_name = subdir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let extension = main_video
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let new_name = format!("{}{}", dir_name, extension);
    if old_name == new_name {
        return Ok(false);
    }

    let new_path = subdir.join(&new_name);
    if new_path.exists() && new_path != main_video {
        println!(
            "  {}",
            palette.red(&format!(
                "Skipping {} - destination file already exists: {}",
                dir_name, new_name
            ))
        );
        return Ok(false);
    }

    let companions = companion_subtitles(subdir, &old_name);
    let mut subtitle_renames: Vec<(PathBuf, PathBuf, String)> = Vec::new();
    for sub_path in companions {
        let sub_name = sub_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let new_sub_name = companion_new_name(&sub_name, &old_name, &new_name);
        let new_sub_path = subdir.join(&new_sub_name);
        if new_sub_path.exists() && new_sub_path != sub_path {
            continue;
        }
        if sub_name != new_sub_name {
            subtitle_renames.push((sub_path, new_sub_path, new_sub_name));
        }
    }

    if dry_run {
        println!("{}", palette.bold_blue(&dir_name));
        let (before, after) = ui::highlight_changes(&old_name, &new_name, palette);
        println!("    Before: {}", before);
        println!("    After : {}", after);
        for (sub_path, _, new_sub_name) in &subtitle_renames {
            let sub_name = sub_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let (sub_before, sub_after) = ui::highlight_changes(&sub_name, new_sub_name, palette);
            println!("    Before: {}", sub_before);
            println!("    After : {}", sub_after);
        }
        return Ok(true);
    }

    std::fs::rename(&main_video, &new_path)?;
    println!(
        "  {} {} -> {} in {}",
        palette.green("Renamed:"),
        old_name,
        new_name,
        dir_name
    );

    for (sub_path, new_sub_path, new_sub_name) in subtitle_renames {
        let sub_name = sub_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        match std::fs::rename(&sub_path, &new_sub_path) {
            Ok(()) => println!(
                "  {} {} -> {}",
                palette.green("Renamed:"),
                sub_name,
                new_sub_name
            ),
            Err(e) => println!(
                "  {} Could not rename subtitle {} - {}",
                palette.yellow("Warning:"),
                sub_name,
                e
            ),
        }
    }

    Ok(true)
}

/// Subtitle files safe to rename with the media file. Multiple loose
/// `.srt` files are ambiguous and are left alone; `.idx`/`.sub` pairs
/// are always taken when they relate to the media file by name.
fn companion_subtitles(subdir: &Path, media_name: &str) -> Vec<PathBuf> {
    let media_stem = stem_of(media_name).to_lowercase();

    let mut srt_files: Vec<PathBuf> = Vec::new();
    let mut other_files: Vec<PathBuf> = Vec::new();
    let Ok(entries) = std::fs::read_dir(subdir) else {
        return Vec::new();
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = fsutil::get_extension(&path) else {
            continue;
        };
        if !COMPANION_EXTENSIONS.contains(&ext.as_str()) {
            continue;
        }
        if ext == "srt" {
            srt_files.push(path);
        } else {
            other_files.push(path);
        }
    }

    let mut candidates = other_files;
    if srt_files.len() == 1 {
        candidates.extend(srt_files);
    }

    candidates.retain(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let sub_stem = stem_of(&name).to_lowercase();
        sub_stem.starts_with(&media_stem)
            || media_stem.starts_with(&sub_stem)
            || extract_language_suffix(&name, media_name).is_some()
    });
    candidates.sort();
    candidates
}

/// Suffix left after stripping the media stem from a subtitle stem,
/// usually a language code like "en".
fn extract_language_suffix(subtitle_name: &str, media_name: &str) -> Option<String> {
    let media_stem = stem_of(media_name);
    let sub_stem = stem_of(subtitle_name);
    if !sub_stem.to_lowercase().starts_with(&media_stem.to_lowercase()) {
        return None;
    }
    let remainder = sub_stem
        .get(media_stem.len()..)?
        .trim_start_matches(['.', ' ']);
    if remainder.is_empty() {
        None
    } else {
        Some(remainder.to_string())
    }
}

/// Build the new subtitle name, carrying any language suffix over.
fn companion_new_name(subtitle_name: &str, old_media_name: &str, new_media_name: &str) -> String {
    let new_stem = stem_of(new_media_name);
    let ext = Path::new(subtitle_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    match extract_language_suffix(subtitle_name, old_media_name) {
        Some(lang) => format!("{}.{}{}", new_stem, lang, ext),
        None => format!("{}{}", new_stem, ext),
    }
}

fn stem_of(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string())
}
