//! Background analysis of duplicate groups.
//!
//! One worker thread walks the discovered groups, performing the
//! expensive per-directory work (size walk, codec sniffing, subtitle
//! enumeration, content preview) and publishes each fully-populated
//! group onto a channel. The interactive consumer starts before the
//! scan finishes; the channel handoff is the only synchronization point
//! and transfers ownership of a group to the consumer.

use crate::core::{grouper, scoring, subtitles};
use crate::models::{ContentLine, DirectoryEntry, DuplicateGroup};
use crate::utils::fs as fsutil;
use crate::utils::ui::Palette;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Cap on top-level files listed in a content preview.
const PREVIEW_MAX_FILES: usize = 10;
/// Caps on files/subdirectories listed per child directory.
const PREVIEW_MAX_SUBFILES: usize = 5;
const PREVIEW_MAX_SUBDIRS: usize = 3;

/// Message published by the scan worker. Exactly one `Finished`
/// sentinel follows the last group.
#[derive(Debug)]
pub enum ScanMessage {
    Group(DuplicateGroup),
    Finished,
}

/// Shared scan progress, safe to read while the worker runs.
#[derive(Debug)]
struct Progress {
    scanned: AtomicUsize,
    total: usize,
}

/// Handle to the background scan worker.
pub struct BackgroundScanner {
    rx: Receiver<ScanMessage>,
    progress: Arc<Progress>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl BackgroundScanner {
    /// Spawn the worker over the discovered groups.
    pub fn spawn(
        groups: Vec<(String, Vec<DirectoryEntry>)>,
        language_filter: Option<Vec<String>>,
        palette: Palette,
    ) -> Self {
        let total = groups.iter().map(|(_, members)| members.len()).sum();
        let progress = Arc::new(Progress {
            scanned: AtomicUsize::new(0),
            total,
        });
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let worker_progress = Arc::clone(&progress);
        let worker_stop = Arc::clone(&stop);
        let handle = std::thread::spawn(move || {
            scan_worker(groups, tx, worker_progress, worker_stop, language_filter, palette);
        });

        Self {
            rx,
            progress,
            stop,
            handle: Some(handle),
        }
    }

    /// Wait up to `timeout` for the next message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<ScanMessage, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Current progress as (members scanned, total members).
    pub fn progress(&self) -> (usize, usize) {
        (self.progress.scanned.load(Ordering::Relaxed), self.progress.total)
    }

    /// Request the worker to stop and wait for it with a bounded join.
    /// The worker finishes its in-flight member; if it is still busy
    /// after the timeout the thread is detached (process exit reaps it).
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let deadline = Instant::now() + Duration::from_secs(1);
            while !handle.is_finished() && Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(20));
            }
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                tracing::debug!("scan worker still busy at stop timeout, detaching");
            }
        }
    }
}

/// Worker loop: scan every member of every group, publish completed
/// groups in scan-completion order, then the terminal sentinel.
fn scan_worker(
    groups: Vec<(String, Vec<DirectoryEntry>)>,
    tx: mpsc::Sender<ScanMessage>,
    progress: Arc<Progress>,
    stop: Arc<AtomicBool>,
    language_filter: Option<Vec<String>>,
    palette: Palette,
) {
    'outer: for (key, mut members) in groups {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        for member in members.iter_mut() {
            if stop.load(Ordering::Relaxed) {
                break 'outer;
            }
            scan_member(member, language_filter.as_deref(), palette);
            progress.scanned.fetch_add(1, Ordering::Relaxed);
        }

        // Provisional ordering by raw size, superseded by the
        // score-based sort at display time.
        members.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));

        // Rebuild the display key from the first member's raw name so
        // original casing survives the folded grouping key.
        let display_key = grouper::parse_prefix(&members[0].name).unwrap_or(key);

        let group = DuplicateGroup {
            key: display_key,
            members,
        };
        if tx.send(ScanMessage::Group(group)).is_err() {
            // Consumer went away; nothing left to publish.
            return;
        }
    }

    let _ = tx.send(ScanMessage::Finished);
}

/// Populate a single entry: size walk, tag classification with codec
/// probing, adjusted size, subtitle summary and content preview.
fn scan_member(entry: &mut DirectoryEntry, language_filter: Option<&[String]>, palette: Palette) {
    entry.size_bytes = fsutil::directory_size(&entry.path);
    entry.size_mb = fsutil::bytes_to_mb(entry.size_bytes);

    entry.tags = scoring::classify_with_probe(&entry.name, &entry.path);
    entry.video_score = scoring::tag_score(&entry.tags);
    entry.adjusted_size_mb = scoring::adjusted_size_mb(entry.size_mb, &entry.tags);

    entry.subtitle_summary = subtitles::directory_summary(&entry.path, language_filter, palette);
    entry.preview = preview_directory(&entry.path);
}

/// Build a capped listing of a directory for display: the first ten
/// top-level files plus a roll-up count, then each child directory with
/// a few of its own entries.
pub fn preview_directory(dir: &std::path::Path) -> Vec<ContentLine> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => return vec![ContentLine::Error(format!("[Error reading contents: {}]", e))],
    };

    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        match entry.file_type() {
            Ok(t) if t.is_file() => files.push(name),
            Ok(t) if t.is_dir() => dirs.push(name),
            _ => {}
        }
    }
    files.sort();
    dirs.sort();

    let mut lines = Vec::new();
    for name in files.iter().take(PREVIEW_MAX_FILES) {
        lines.push(ContentLine::File(name.clone()));
    }
    if files.len() > PREVIEW_MAX_FILES {
        lines.push(ContentLine::MoreFiles(files.len() - PREVIEW_MAX_FILES));
    }

    for name in &dirs {
        lines.push(ContentLine::Dir(name.clone()));
        let subdir = dir.join(name);
        match std::fs::read_dir(&subdir) {
            Ok(entries) => {
                let mut sub_files = Vec::new();
                let mut sub_dirs = Vec::new();
                for entry in entries.flatten() {
                    let name = entry.file_name().to_string_lossy().to_string();
                    match entry.file_type() {
                        Ok(t) if t.is_file() => sub_files.push(name),
                        Ok(t) if t.is_dir() => sub_dirs.push(name),
                        _ => {}
                    }
                }
                sub_files.sort();
                sub_dirs.sort();
                for name in sub_files.iter().take(PREVIEW_MAX_SUBFILES) {
                    lines.push(ContentLine::SubFile(name.clone()));
                }
                for name in sub_dirs.iter().take(PREVIEW_MAX_SUBDIRS) {
                    lines.push(ContentLine::SubDir(name.clone()));
                }
                let shown = sub_files.len().min(PREVIEW_MAX_SUBFILES)
                    + sub_dirs.len().min(PREVIEW_MAX_SUBDIRS);
                let remaining = sub_files.len() + sub_dirs.len() - shown;
                if remaining > 0 {
                    lines.push(ContentLine::MoreSubItems(remaining));
                }
            }
            Err(_) => lines.push(ContentLine::Error("[Permission denied]".to_string())),
        }
    }

    lines
}
