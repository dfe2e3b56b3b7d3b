//! Subtitle discovery and merge.
//!
//! Summarizes subtitle languages for display (embedded tracks plus
//! external files) and copies languages present only in soon-to-be
//! deleted directories into the kept one.

use crate::services::mediainfo;
use crate::utils::fs as fsutil;
use crate::utils::ui::{self, Palette};
use crate::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Key used for subtitle files that carry no language code.
pub const GENERIC_LANG: &str = "generic";

/// One discovered external subtitle file.
#[derive(Debug, Clone)]
pub struct SubtitleFile {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// Path relative to the searched directory.
    pub relative: PathBuf,
    /// Whether the file sits at the directory root (preferred source).
    pub is_root: bool,
}

/// External subtitle files grouped by language code (or [`GENERIC_LANG`]).
pub type LanguageFiles = BTreeMap<String, Vec<SubtitleFile>>;

/// Extract a 2-letter language code from a subtitle filename, scanning
/// dot-separated parts from the right ("Movie.2020.en.srt" -> "en").
pub fn extract_language_code(filename: &str) -> Option<String> {
    let stem = Path::new(filename).file_stem()?.to_str()?;
    stem.rsplit('.')
        .find(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
        .map(|part| part.to_lowercase())
}

/// Format one subtitle entry: language in bold blue, format dimmed.
fn format_entry(palette: Palette, lang: &str, format: Option<&str>) -> String {
    match format {
        Some(format) => format!("{}{}", palette.bold_blue(lang), palette.dim(&format!("({})", format))),
        None => palette.bold_blue(lang),
    }
}

/// Combined summary of all subtitles in a directory: embedded text
/// tracks of media files plus external subtitle files at the top level.
/// Returns an empty string when nothing is found (or the directory is
/// unreadable).
pub fn directory_summary(
    dir: &Path,
    language_filter: Option<&[String]>,
    palette: Palette,
) -> String {
    let mut found: BTreeSet<String> = BTreeSet::new();

    let Ok(entries) = std::fs::read_dir(dir) else {
        return String::new();
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if fsutil::is_subtitle_file(&path) {
            let filename = entry.file_name().to_string_lossy().to_string();
            let entry = match extract_language_code(&filename) {
                Some(lang) => format_entry(palette, &lang.to_uppercase(), Some("ext")),
                None => format_entry(palette, "EXT", None),
            };
            found.insert(entry);
        } else if fsutil::is_media_file(&path) {
            for (lang, format) in mediainfo::embedded_subtitles(&path) {
                found.insert(format_entry(palette, &lang, format.as_deref()));
            }
        }
    }

    if let Some(filter) = language_filter {
        found.retain(|entry| {
            let upper = entry.to_uppercase();
            filter.iter().any(|lang| upper.contains(&lang.to_uppercase()))
        });
    }

    found.into_iter().collect::<Vec<_>>().join(", ")
}

/// Recursively find external subtitle files under a directory, skipping
/// unreadable entries.
fn find_subtitle_files(dir: &Path, base: &Path, out: &mut Vec<SubtitleFile>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let relative = base.join(entry.file_name());
        if path.is_file() && fsutil::is_subtitle_file(&path) {
            out.push(SubtitleFile {
                path,
                is_root: base.as_os_str().is_empty(),
                relative,
            });
        } else if path.is_dir() {
            find_subtitle_files(&path, &relative, out);
        }
    }
}

/// Subtitle files of a directory organized by language, preserving
/// multiple files per language.
pub fn files_by_language(dir: &Path) -> LanguageFiles {
    let mut files = Vec::new();
    find_subtitle_files(dir, Path::new(""), &mut files);

    let mut by_lang: LanguageFiles = BTreeMap::new();
    for file in files {
        let filename = file
            .relative
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let lang = extract_language_code(&filename).unwrap_or_else(|| GENERIC_LANG.to_string());
        by_lang.entry(lang).or_default().push(file);
    }
    // Root-level files take precedence over nested ones.
    for files in by_lang.values_mut() {
        files.sort_by_key(|f| !f.is_root);
    }
    by_lang
}

/// Decide which languages should be copied from the donor set into the
/// kept directory. A kept generic subtitle only suppresses copying more
/// generic files; explicitly-coded languages the kept directory lacks
/// are still offered.
pub fn languages_to_copy(kept: &LanguageFiles, available: &LanguageFiles) -> Vec<String> {
    let kept_langs: BTreeSet<&str> = kept.keys().map(String::as_str).collect();
    available
        .keys()
        .filter(|lang| !kept_langs.contains(lang.as_str()))
        .cloned()
        .collect()
}

/// Offer to copy subtitle languages present among the directories being
/// deleted but absent from the kept directory. Returns whether anything
/// was copied.
pub fn merge_additional(kept_dir: &Path, doomed: &[PathBuf], palette: Palette) -> Result<bool> {
    let kept = files_by_language(kept_dir);

    // Collect donors, root-level files first within each language.
    let mut available: LanguageFiles = BTreeMap::new();
    for dir in doomed {
        for (lang, files) in files_by_language(dir) {
            available.entry(lang).or_default().extend(files);
        }
    }
    for files in available.values_mut() {
        files.sort_by_key(|f| !f.is_root);
    }

    let langs = languages_to_copy(&kept, &available);
    if langs.is_empty() {
        return Ok(false);
    }

    println!("\n{}", palette.green("Additional subtitles found:"));
    for lang in &langs {
        let files = &available[lang];
        let plural = if files.len() > 1 { "s" } else { "" };
        println!("  {} ({} file{}):", lang.to_uppercase(), files.len(), plural);
        for file in files {
            let source = doomed.iter().find(|d| file.path.starts_with(d));
            match source {
                Some(dir) => println!(
                    "    - {} (from {})",
                    file.relative.display(),
                    dir.display()
                ),
                None => println!("    - {}", file.relative.display()),
            }
        }
    }
    println!("\nWould copy to: {}", kept_dir.display());

    if !ui::confirm("Copy additional subtitles to kept directory? [Y/n]: ", Some(true))? {
        return Ok(false);
    }

    // Name single files after the kept directory's main video.
    let video_base = fsutil::largest_media_file(kept_dir)
        .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().to_string()))
        .unwrap_or_else(|| "movie".to_string());

    let mut copied = 0usize;
    println!("Copying subtitles...");
    for lang in &langs {
        let files = &available[lang];
        for file in files {
            let ext = file
                .path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            let target_name = if files.len() == 1 && lang != GENERIC_LANG {
                format!("{}.{}{}", video_base, lang, ext)
            } else if files.len() == 1 {
                format!("{}{}", video_base, ext)
            } else {
                file.relative
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default()
            };
            // Never overwrite an existing file.
            let target = fsutil::unique_target_path(&kept_dir.join(target_name));
            match fsutil::copy_preserving_mtime(&file.path, &target) {
                Ok(_) => {
                    println!(
                        "  Copied: {}",
                        target.file_name().unwrap_or_default().to_string_lossy()
                    );
                    copied += 1;
                }
                Err(e) => {
                    println!("  Error copying {}: {}", file.relative.display(), e);
                }
            }
        }
    }

    if copied > 0 {
        println!("Successfully copied {} subtitle file(s)", copied);
    }
    Ok(copied > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_language_code() {
        assert_eq!(extract_language_code("Movie.2020.en.srt"), Some("en".to_string()));
        assert_eq!(extract_language_code("Movie.2020.EN.srt"), Some("en".to_string()));
        assert_eq!(extract_language_code("Movie.2020.srt"), None);
        assert_eq!(extract_language_code("Movie.10.srt"), None);
    }

    fn lang_files(langs: &[&str]) -> LanguageFiles {
        langs
            .iter()
            .map(|l| (l.to_string(), Vec::new()))
            .collect()
    }

    #[test]
    fn test_languages_to_copy_plain() {
        let kept = lang_files(&["en"]);
        let available = lang_files(&["en", "fr", "de"]);
        assert_eq!(languages_to_copy(&kept, &available), vec!["de", "fr"]);
    }

    #[test]
    fn test_languages_to_copy_generic_rules() {
        // A kept generic subtitle suppresses copying generic files but
        // not explicitly-coded languages.
        let kept = lang_files(&[GENERIC_LANG]);
        let available = lang_files(&[GENERIC_LANG, "fr"]);
        assert_eq!(languages_to_copy(&kept, &available), vec!["fr"]);
    }
}
