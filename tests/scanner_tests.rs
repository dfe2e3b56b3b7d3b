//! Integration tests for the background scanner.

use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tidyflix::core::scanner::{preview_directory, BackgroundScanner, ScanMessage};
use tidyflix::models::{ContentLine, DirectoryEntry};
use tidyflix::utils::ui::Palette;

fn make_member(root: &Path, name: &str, media_bytes: usize) -> DirectoryEntry {
    let dir = root.join(name);
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("movie.mkv"), vec![0u8; media_bytes]).unwrap();
    DirectoryEntry::new(name.to_string(), dir, root.to_path_buf())
}

fn collect_all(scanner: &BackgroundScanner) -> (Vec<String>, usize) {
    let mut keys = Vec::new();
    let mut sentinels = 0;
    loop {
        match scanner.recv_timeout(Duration::from_secs(10)) {
            Ok(ScanMessage::Group(group)) => keys.push(group.key),
            Ok(ScanMessage::Finished) => {
                sentinels += 1;
                break;
            }
            Err(_) => break,
        }
    }
    (keys, sentinels)
}

#[test]
fn test_every_group_is_published_once_then_sentinel() {
    let temp_dir = TempDir::new().unwrap();
    let groups = vec![
        (
            "alpha movie 2020".to_string(),
            vec![
                make_member(temp_dir.path(), "Alpha.Movie.2020.1080p.x264", 2048),
                make_member(temp_dir.path(), "Alpha.Movie.2020.2160p.x265", 4096),
            ],
        ),
        (
            "beta movie 2019".to_string(),
            vec![
                make_member(temp_dir.path(), "Beta.Movie.2019.720p.x264", 512),
                make_member(temp_dir.path(), "Beta.Movie.2019.1080p.x264", 1024),
            ],
        ),
    ];

    let scanner = BackgroundScanner::spawn(groups, None, Palette::new(false));
    let (keys, sentinels) = collect_all(&scanner);

    assert_eq!(keys.len(), 2);
    assert_eq!(sentinels, 1);
    // Groups arrive in input order; display keys carry original casing.
    assert_eq!(keys[0], "Alpha Movie 2020");
    assert_eq!(keys[1], "Beta Movie 2019");
}

#[test]
fn test_members_arrive_scanned_and_size_sorted() {
    let temp_dir = TempDir::new().unwrap();
    let groups = vec![(
        "some movie 2020".to_string(),
        vec![
            make_member(temp_dir.path(), "Some.Movie.2020.720p.x264", 1000),
            make_member(temp_dir.path(), "Some.Movie.2020.2160p.x265", 9000),
        ],
    )];

    let scanner = BackgroundScanner::spawn(groups, None, Palette::new(false));
    let message = scanner.recv_timeout(Duration::from_secs(10)).unwrap();
    let ScanMessage::Group(group) = message else {
        panic!("expected a group before the sentinel");
    };

    // Largest first, and every member populated.
    assert!(group.members[0].size_bytes >= group.members[1].size_bytes);
    for member in &group.members {
        assert!(member.size_bytes > 0);
        assert!(!member.tags.is_empty());
        assert!(member.video_score > 0);
        assert!(!member.preview.is_empty());
    }

    let (scanned, total) = scanner.progress();
    assert_eq!(scanned, 2);
    assert_eq!(total, 2);
}

#[test]
fn test_stop_still_delivers_sentinel() {
    let temp_dir = TempDir::new().unwrap();
    let groups = vec![(
        "some movie 2020".to_string(),
        vec![
            make_member(temp_dir.path(), "Some.Movie.2020.1080p.x264", 100),
            make_member(temp_dir.path(), "Some.Movie.2020.720p.x264", 100),
        ],
    )];

    let mut scanner = BackgroundScanner::spawn(groups, None, Palette::new(false));
    scanner.stop();

    // Whatever was published, the stream must end with exactly one
    // sentinel rather than a hang.
    let (_, sentinels) = collect_all(&scanner);
    assert_eq!(sentinels, 1);
}

#[test]
fn test_preview_caps_top_level_files() {
    let temp_dir = TempDir::new().unwrap();
    for i in 0..14 {
        fs::write(temp_dir.path().join(format!("file{:02}.nfo", i)), "x").unwrap();
    }

    let lines = preview_directory(temp_dir.path());
    let files = lines
        .iter()
        .filter(|l| matches!(l, ContentLine::File(_)))
        .count();
    assert_eq!(files, 10);
    assert!(lines.contains(&ContentLine::MoreFiles(4)));
}

#[test]
fn test_preview_lists_subdirectories_with_rollup() {
    let temp_dir = TempDir::new().unwrap();
    let sub = temp_dir.path().join("Subs");
    fs::create_dir(&sub).unwrap();
    for i in 0..8 {
        fs::write(sub.join(format!("sub{:02}.srt", i)), "x").unwrap();
    }

    let lines = preview_directory(temp_dir.path());
    assert!(lines.contains(&ContentLine::Dir("Subs".to_string())));
    let sub_files = lines
        .iter()
        .filter(|l| matches!(l, ContentLine::SubFile(_)))
        .count();
    assert_eq!(sub_files, 5);
    assert!(lines.contains(&ContentLine::MoreSubItems(3)));
}
