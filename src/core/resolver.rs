//! Interactive duplicate resolution.
//!
//! Consumes groups from the background scanner as they become ready,
//! batches the first few so the prompt can start before scanning
//! finishes, and drives the keep/skip/delete decision per group.

use crate::core::grouper::DuplicateMap;
use crate::core::scanner::{BackgroundScanner, ScanMessage};
use crate::core::{scoring, subtitles};
use crate::models::{ContentLine, DirectoryEntry, DuplicateGroup};
use crate::utils::fs as fsutil;
use crate::utils::ui::{self, Palette};
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

/// Poll timeout while waiting for the next ready group.
const POLL_TIMEOUT: Duration = Duration::from_secs(1);

/// Indent for content preview lines.
const INDENT: &str = "   ";

/// A parsed prompt response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Keep the Nth displayed member (1-based).
    Keep(usize),
    /// Skip this group without deletions.
    Skip,
    /// Stop presenting further groups, keep accumulated deletions.
    Done,
    /// Mark every member of the group for deletion.
    DeleteAll,
    /// Terminate the program with no deletions.
    Quit,
}

/// Parse one line of prompt input. Empty input keeps the first-ranked
/// member. Returns `None` for unrecognized input (caller reprompts).
pub fn parse_choice(input: &str, member_count: usize) -> Option<Choice> {
    let input = input.trim();
    if input.is_empty() {
        return Some(Choice::Keep(1));
    }
    match input.to_lowercase().as_str() {
        "s" => return Some(Choice::Skip),
        "d" => return Some(Choice::Done),
        "a" => return Some(Choice::DeleteAll),
        "q" => return Some(Choice::Quit),
        _ => {}
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=member_count).contains(&n) => Some(Choice::Keep(n)),
        _ => None,
    }
}

/// Run the scan-and-resolve pipeline over the discovered duplicate map.
/// Returns the accumulated list of directories to delete.
pub fn process_with_background_scan(
    map: DuplicateMap,
    language_filter: Option<Vec<String>>,
    palette: Palette,
) -> Result<Vec<PathBuf>> {
    let total_groups = map.group_count();
    let start_threshold = total_groups.min(3).max(1);

    println!("\n{}", palette.cyan("Phase 2: Background analysis started..."));
    let mut scanner = BackgroundScanner::spawn(map.groups, language_filter, palette);

    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress_bar.set_message("Waiting for initial analysis to complete...");

    let mut pending: Vec<DuplicateGroup> = Vec::new();
    let mut to_delete: Vec<PathBuf> = Vec::new();
    let mut processed = 0usize;
    let mut started = false;
    let mut finished = false;
    let mut last_report: Option<(usize, usize)> = None;

    while !finished {
        match scanner.recv_timeout(POLL_TIMEOUT) {
            Ok(ScanMessage::Group(group)) => {
                pending.push(group);
                if !started && pending.len() < start_threshold {
                    continue;
                }
                if !started {
                    started = true;
                    progress_bar.finish_and_clear();
                }
                // Alphabetical within the batch; arrival order across
                // batches.
                pending.sort_by(|a, b| a.key.cmp(&b.key));
                for mut group in pending.drain(..) {
                    processed += 1;
                    if present_group(&mut group, &mut to_delete, processed, total_groups, palette)? {
                        scanner.stop();
                        return Ok(to_delete);
                    }
                }
            }
            Ok(ScanMessage::Finished) => finished = true,
            Err(RecvTimeoutError::Timeout) => {
                let (scanned, total) = scanner.progress();
                if !started {
                    progress_bar.set_message(format!(
                        "Background analysis: {}/{} directories ({} duplicates ready)...",
                        scanned,
                        total,
                        pending.len()
                    ));
                    progress_bar.tick();
                } else if let Some(line) = progress_update(scanned, total, &mut last_report) {
                    // Only while actually waiting on the scanner, and
                    // only when the counts moved since the last report.
                    println!("\n{}", palette.green(&line));
                }
            }
            Err(RecvTimeoutError::Disconnected) => finished = true,
        }
    }

    progress_bar.finish_and_clear();

    // Drain groups that became ready after the last presentation.
    pending.sort_by(|a, b| a.key.cmp(&b.key));
    for mut group in pending.drain(..) {
        processed += 1;
        println!(
            "\n{}",
            palette.green(&format!(
                "Processing duplicate {}/{} (final batch)",
                processed, total_groups
            ))
        );
        if present_group(&mut group, &mut to_delete, processed, total_groups, palette)? {
            break;
        }
    }

    scanner.stop();
    Ok(to_delete)
}

/// Build the scan-progress line shown while waiting between groups.
/// Returns `None` once the scan is complete or when the counts have not
/// changed since the last report.
fn progress_update(
    scanned: usize,
    total: usize,
    last_report: &mut Option<(usize, usize)>,
) -> Option<String> {
    if scanned >= total {
        return None;
    }
    if *last_report == Some((scanned, total)) {
        return None;
    }
    *last_report = Some((scanned, total));
    Some(format!("Background scan progress {}/{}", scanned, total))
}

/// Present one group and record the user's decision. Returns `true`
/// when the user asked to stop presenting further groups.
fn present_group(
    group: &mut DuplicateGroup,
    to_delete: &mut Vec<PathBuf>,
    current_group: usize,
    total_groups: usize,
    palette: Palette,
) -> Result<bool> {
    println!("\n=== {} ===\n", palette.cyan(&group.key));

    scoring::apply_relative_size_scores(&mut group.members, scoring::MAX_SIZE_SCORE);
    // Stable sort keeps the provisional size ordering for equal scores.
    group.members.sort_by(|a, b| b.video_score.cmp(&a.video_score));

    let baseline = group
        .members
        .iter()
        .map(|m| m.video_score)
        .min()
        .unwrap_or(0);
    let (min_size, max_size) = group.size_bounds();
    let multiple_roots = group
        .members
        .iter()
        .map(|m| m.source_root.as_path())
        .collect::<HashSet<_>>()
        .len()
        > 1;

    for (i, member) in group.members.iter().enumerate() {
        print_member(
            member,
            i + 1,
            baseline,
            min_size,
            max_size,
            multiple_roots,
            palette,
        );
    }

    loop {
        let message = format!(
            "\n[{}/{}] Select item to KEEP (1-{}), press Enter for 1, 's' to skip, 'd' when done, 'a' to delete all, or 'q' to quit: ",
            current_group,
            total_groups,
            group.members.len()
        );
        let input = ui::prompt(&message)?;

        match parse_choice(&input, group.members.len()) {
            Some(Choice::Keep(n)) => {
                queue_others_for_deletion(&group.members, n - 1, to_delete, palette)?;
                return Ok(false);
            }
            Some(Choice::Skip) => return Ok(false),
            Some(Choice::Done) => return Ok(true),
            Some(Choice::DeleteAll) => {
                for member in &group.members {
                    to_delete.push(member.path.clone());
                }
                println!("Marked all {} directories for deletion", group.members.len());
                return Ok(false);
            }
            Some(Choice::Quit) => {
                if ui::confirm("Are you sure you want to quit? [Y/n]: ", Some(true))? {
                    println!("Quitting without deletion.");
                    std::process::exit(0);
                }
            }
            None => {
                println!(
                    "Please enter a number between 1 and {}, press Enter for 1, 's' to skip, 'd' when done, 'a' to delete all, or 'q' to quit",
                    group.members.len()
                );
            }
        }
    }
}

/// Render one member row plus its source, subtitle and preview lines.
fn print_member(
    member: &DirectoryEntry,
    index: usize,
    baseline: u32,
    min_size: u64,
    max_size: u64,
    multiple_roots: bool,
    palette: Palette,
) {
    let size_color: fn(&Palette, &str) -> String = if member.size_bytes == max_size {
        Palette::green
    } else if member.size_bytes == min_size {
        Palette::red
    } else {
        Palette::yellow
    };

    let tags = if member.tags.is_empty() {
        String::new()
    } else {
        let rendered: Vec<String> = member
            .tags
            .iter()
            .map(|t| palette.paint(t.label(), t.color()))
            .collect();
        format!(" [{}]", rendered.join(", "))
    };

    let delta = if member.video_score > baseline {
        format!(" {}", palette.cyan(&format!("(+{})", member.video_score - baseline)))
    } else {
        String::new()
    };

    println!(
        "{} {:40} {}{}{}",
        size_color(&palette, &format!("{}.", index)),
        member.name,
        size_color(&palette, &format!("{:10.2} MB", member.size_mb)),
        tags,
        delta
    );

    if multiple_roots {
        println!(
            "{}{}",
            INDENT,
            palette.dim(&format!("Source: {}", member.source_root.display()))
        );
    }
    if !member.subtitle_summary.is_empty() {
        println!(
            "{}{}",
            INDENT,
            palette.blue(&format!("Subs: {}", member.subtitle_summary))
        );
    }
    print_preview(&member.preview, palette);
}

/// Render the cached content preview.
fn print_preview(preview: &[ContentLine], palette: Palette) {
    for line in preview {
        match line {
            ContentLine::File(name) => {
                let styled = if fsutil::is_subtitle_file(std::path::Path::new(name)) {
                    palette.blue(name)
                } else {
                    palette.dim(name)
                };
                println!("{}- {}", INDENT, styled);
            }
            ContentLine::MoreFiles(n) => println!("{}[{} more files ...]", INDENT, n),
            ContentLine::Dir(name) => println!("{}- {}", INDENT, palette.dim(&format!("{}/", name))),
            ContentLine::SubFile(name) => {
                let styled = if fsutil::is_subtitle_file(std::path::Path::new(name)) {
                    palette.blue(name)
                } else {
                    palette.dim(name)
                };
                println!("{}  - {}", INDENT, styled);
            }
            ContentLine::SubDir(name) => {
                println!("{}  - {}", INDENT, palette.dim(&format!("{}/", name)))
            }
            ContentLine::MoreSubItems(n) => println!("{}  [{} more items ...]", INDENT, n),
            ContentLine::Error(msg) => println!("{}- {}", INDENT, msg),
        }
    }
}

/// Queue every member except the kept one for deletion, after offering
/// to rescue subtitles the kept directory lacks.
fn queue_others_for_deletion(
    members: &[DirectoryEntry],
    keep_index: usize,
    to_delete: &mut Vec<PathBuf>,
    palette: Palette,
) -> Result<()> {
    let kept = &members[keep_index];
    let doomed: Vec<PathBuf> = members
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != keep_index)
        .map(|(_, m)| m.path.clone())
        .collect();

    if !doomed.is_empty() {
        subtitles::merge_additional(&kept.path, &doomed, palette)?;
    }
    to_delete.extend(doomed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choice_keep() {
        assert_eq!(parse_choice("", 3), Some(Choice::Keep(1)));
        assert_eq!(parse_choice("2", 3), Some(Choice::Keep(2)));
        assert_eq!(parse_choice("3", 3), Some(Choice::Keep(3)));
    }

    #[test]
    fn test_parse_choice_letters() {
        assert_eq!(parse_choice("s", 3), Some(Choice::Skip));
        assert_eq!(parse_choice("S", 3), Some(Choice::Skip));
        assert_eq!(parse_choice("d", 3), Some(Choice::Done));
        assert_eq!(parse_choice("a", 3), Some(Choice::DeleteAll));
        assert_eq!(parse_choice("q", 3), Some(Choice::Quit));
    }

    #[test]
    fn test_parse_choice_rejects_bad_input() {
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("x", 3), None);
        assert_eq!(parse_choice("-1", 3), None);
    }

    #[test]
    fn test_progress_update_reports_each_count_once() {
        let mut last = None;
        assert_eq!(
            progress_update(2, 10, &mut last),
            Some("Background scan progress 2/10".to_string())
        );
        // Same counts again stay silent; a new count reports.
        assert_eq!(progress_update(2, 10, &mut last), None);
        assert_eq!(
            progress_update(5, 10, &mut last),
            Some("Background scan progress 5/10".to_string())
        );
    }

    #[test]
    fn test_progress_update_silent_when_scan_complete() {
        let mut last = None;
        assert_eq!(progress_update(10, 10, &mut last), None);
        assert_eq!(progress_update(11, 10, &mut last), None);
    }
}
