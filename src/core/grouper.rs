//! Duplicate discovery.
//!
//! Single lightweight pass over the immediate subdirectories of each
//! scan root: extract a "Title Year" prefix from every name, group by
//! the case-folded prefix, and keep only groups with two or more
//! members.

use crate::models::DirectoryEntry;
use crate::Result;
use regex::Regex;
use std::collections::HashMap;

/// Result of the discovery pass. Group order is first-discovery order,
/// not sorted; the resolver re-sorts batches before display.
#[derive(Debug, Default)]
pub struct DuplicateMap {
    /// (folded key, members) for every key with at least two members.
    pub groups: Vec<(String, Vec<DirectoryEntry>)>,
    /// Total subdirectories seen across all roots.
    pub total_dirs: usize,
}

impl DuplicateMap {
    /// Number of duplicate groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of directories that need analysis.
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(|(_, members)| members.len()).sum()
    }
}

/// Extract the display prefix from a directory name: everything up to
/// and including the first run of exactly four digits bounded by word
/// boundaries, with separators and punctuation replaced by spaces, so
/// "Movie.Title.2020" and "Movie Title (2020)" share a prefix. Names
/// without such a run yield `None` and are excluded from duplicate
/// consideration.
pub fn parse_prefix(name: &str) -> Option<String> {
    let re = Regex::new(r"\b\d{4}\b").ok()?;
    let m = re.find(name)?;
    let raw = &name[..m.end()];
    let spaced: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Case-fold a display prefix for grouping.
pub fn fold_key(prefix: &str) -> String {
    prefix.to_lowercase()
}

/// Discover duplicate groups under the given roots.
///
/// Lists immediate subdirectories only. A root that cannot be read is
/// skipped with a warning; it never aborts the scan of other roots.
pub fn discover_duplicates(roots: &[std::path::PathBuf]) -> Result<DuplicateMap> {
    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, Vec<DirectoryEntry>> = HashMap::new();
    let mut total_dirs = 0usize;

    for root in roots {
        let abs_root = std::fs::canonicalize(root).unwrap_or_else(|_| root.clone());
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Cannot access directory {}: {}", root.display(), e);
                eprintln!("Warning: Cannot access directory {}: {}", root.display(), e);
                continue;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            total_dirs += 1;

            let name = entry.file_name().to_string_lossy().to_string();
            let Some(prefix) = parse_prefix(&name) else {
                continue;
            };
            let key = fold_key(&prefix);
            let abs_path = std::fs::canonicalize(&path).unwrap_or(path);
            let members = by_key.entry(key.clone()).or_insert_with(|| {
                order.push(key.clone());
                Vec::new()
            });
            members.push(DirectoryEntry::new(name, abs_path, abs_root.clone()));
        }
    }

    let mut map = DuplicateMap {
        groups: Vec::new(),
        total_dirs,
    };
    for key in order {
        if let Some(members) = by_key.remove(&key) {
            if members.len() > 1 {
                map.groups.push((key, members));
            }
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefix_basic() {
        assert_eq!(
            parse_prefix("Movie.Title.2020.1080p.x264"),
            Some("Movie Title 2020".to_string())
        );
        assert_eq!(
            parse_prefix("Movie Title (2020) 2160p x265"),
            Some("Movie Title 2020".to_string())
        );
    }

    #[test]
    fn test_parse_prefix_separators_fold_together() {
        let a = parse_prefix("Movie_Title_2020_Extras").unwrap();
        let b = parse_prefix("Movie.Title.2020.BluRay").unwrap();
        let c = parse_prefix("Movie Title 2020").unwrap();
        assert_eq!(fold_key(&a), fold_key(&b));
        assert_eq!(fold_key(&b), fold_key(&c));
    }

    #[test]
    fn test_parse_prefix_requires_four_digit_run() {
        assert_eq!(parse_prefix("Movie.Without.Year"), None);
        assert_eq!(parse_prefix("Movie.12345.Numbers"), None);
        assert_eq!(parse_prefix("Movie.123"), None);
    }

    #[test]
    fn test_parse_prefix_stops_at_first_year() {
        assert_eq!(
            parse_prefix("Blade.Runner.2049.2017.2160p"),
            Some("Blade Runner 2049".to_string())
        );
    }
}
