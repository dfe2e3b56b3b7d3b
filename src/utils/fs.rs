//! File system utilities.
//!
//! All recursive helpers here tolerate permission and OS errors at the
//! single-file level: a bad entry is skipped, never fatal.

use crate::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Media file extensions considered for probing and verification.
pub const MEDIA_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "mov"];

/// Subtitle file extensions.
pub const SUBTITLE_EXTENSIONS: &[&str] = &[
    "srt", "sub", "ass", "ssa", "vtt", "idx", "sup", "smi", "rt", "sbv",
];

/// Check if a path exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(crate::Error::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

/// Get file extension in lowercase.
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Check if a file is a media file based on extension.
pub fn is_media_file(path: &Path) -> bool {
    get_extension(path)
        .map(|ext| MEDIA_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Check if a file is a subtitle file based on extension.
pub fn is_subtitle_file(path: &Path) -> bool {
    get_extension(path)
        .map(|ext| SUBTITLE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Total size of a directory tree in bytes. Symlinks are not followed;
/// inaccessible entries are skipped.
pub fn directory_size(path: &Path) -> u64 {
    let mut total = 0u64;
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };
    for entry in entries.flatten() {
        let Ok(meta) = entry.path().symlink_metadata() else {
            continue;
        };
        if meta.is_file() {
            total += meta.len();
        } else if meta.is_dir() {
            total += directory_size(&entry.path());
        }
    }
    total
}

/// Convert bytes to megabytes.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Format a byte count as a human readable string.
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// Find the largest media file directly inside a directory.
pub fn largest_media_file(dir: &Path) -> Option<PathBuf> {
    let mut largest: Option<(u64, PathBuf)> = None;
    let entries = std::fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !is_media_file(&path) {
            continue;
        }
        let Ok(meta) = entry.metadata() else { continue };
        if largest.as_ref().map(|(s, _)| meta.len() > *s).unwrap_or(true) {
            largest = Some((meta.len(), path));
        }
    }
    largest.map(|(_, p)| p)
}

/// Check if a directory tree contains at least one media file.
/// Disc images (.iso) and BluRay indexes (.bdmv) count as media.
pub fn has_media_files_recursive(dir: &Path) -> bool {
    for entry in WalkDir::new(dir).follow_links(false).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if is_media_file(path) {
            return true;
        }
        if let Some(ext) = get_extension(path) {
            if ext == "iso" || ext == "bdmv" {
                return true;
            }
        }
    }
    false
}

/// Check if a directory tree contains archive files (.rar, .par2).
pub fn has_archive_files_recursive(dir: &Path) -> bool {
    for entry in WalkDir::new(dir).follow_links(false).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(ext) = get_extension(entry.path()) {
            if ext == "rar" || ext == "par2" {
                return true;
            }
        }
    }
    false
}

/// Return `path` unchanged if free, otherwise append `_1`, `_2`, ... to
/// the file stem until the path does not exist.
pub fn unique_target_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut counter = 1;
    loop {
        let candidate = parent.join(format!("{}_{}{}", stem, counter, ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Copy a file, carrying the source's modification time onto the copy.
/// Permissions are preserved by the copy itself; the timestamp transfer
/// is best-effort and never fails the copy.
pub fn copy_preserving_mtime(src: &Path, dst: &Path) -> std::io::Result<u64> {
    let bytes = std::fs::copy(src, dst)?;
    if let Ok(modified) = std::fs::metadata(src).and_then(|m| m.modified()) {
        if let Ok(file) = std::fs::OpenOptions::new().write(true).open(dst) {
            let _ = file.set_modified(modified);
        }
    }
    Ok(bytes)
}

/// Check whether the filesystem holding `dir` is case-insensitive.
/// Creates and removes a probe file; errs on the side of case-sensitive
/// when the probe cannot be created.
pub fn is_case_insensitive_filesystem(dir: &Path) -> bool {
    let probe = dir.join(".tidyflix_case_probe");
    if std::fs::write(&probe, b"").is_err() {
        return false;
    }
    let upper = dir.join(".TIDYFLIX_CASE_PROBE");
    let insensitive = upper.exists();
    let _ = std::fs::remove_file(&probe);
    insensitive
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_media_file() {
        assert!(is_media_file(Path::new("movie.mkv")));
        assert!(is_media_file(Path::new("movie.MP4")));
        assert!(!is_media_file(Path::new("movie.srt")));
        assert!(!is_media_file(Path::new("movie")));
    }

    #[test]
    fn test_is_subtitle_file() {
        assert!(is_subtitle_file(Path::new("movie.en.srt")));
        assert!(is_subtitle_file(Path::new("movie.ASS")));
        assert!(!is_subtitle_file(Path::new("movie.mkv")));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_copy_preserving_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("movie.en.srt");
        std::fs::write(&src, "subs").unwrap();

        // Age the source so a plain copy's fresh mtime would show.
        let old = std::time::SystemTime::now() - std::time::Duration::from_secs(86_400);
        let file = std::fs::OpenOptions::new().write(true).open(&src).unwrap();
        file.set_modified(old).unwrap();
        drop(file);

        let dst = dir.path().join("copy.en.srt");
        copy_preserving_mtime(&src, &dst).unwrap();

        let src_mtime = std::fs::metadata(&src).unwrap().modified().unwrap();
        let dst_mtime = std::fs::metadata(&dst).unwrap().modified().unwrap();
        let drift = src_mtime
            .duration_since(dst_mtime)
            .unwrap_or_else(|e| e.duration());
        assert!(drift < std::time::Duration::from_secs(2));
        assert_eq!(std::fs::read(&dst).unwrap(), b"subs");
    }

    #[test]
    fn test_bytes_to_mb() {
        assert_eq!(bytes_to_mb(1024 * 1024), 1.0);
        assert_eq!(bytes_to_mb(0), 0.0);
    }
}
