//! Integration tests for duplicate discovery.

use std::fs;
use tempfile::TempDir;
use tidyflix::core::grouper::discover_duplicates;

#[test]
fn test_discover_basic_duplicates() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("Some.Movie.2020.1080p.x264")).unwrap();
    fs::create_dir(temp_dir.path().join("Some.Movie.2020.2160p.x265")).unwrap();
    fs::create_dir(temp_dir.path().join("Other.Movie.2019.1080p")).unwrap();

    let map = discover_duplicates(&[temp_dir.path().to_path_buf()]).unwrap();

    assert_eq!(map.group_count(), 1);
    assert_eq!(map.member_count(), 2);
    assert_eq!(map.total_dirs, 3);
    assert_eq!(map.groups[0].0, "some movie 2020");
}

#[test]
fn test_separator_variants_group_together() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("Some.Movie.2020.1080p")).unwrap();
    fs::create_dir(temp_dir.path().join("Some Movie (2020) 2160p")).unwrap();
    fs::create_dir(temp_dir.path().join("some_movie_2020_720p")).unwrap();

    let map = discover_duplicates(&[temp_dir.path().to_path_buf()]).unwrap();

    assert_eq!(map.group_count(), 1);
    assert_eq!(map.member_count(), 3);
}

#[test]
fn test_singletons_are_discarded() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("Lonely.Movie.2018.1080p")).unwrap();
    fs::create_dir(temp_dir.path().join("Another.Film.2021.720p")).unwrap();

    let map = discover_duplicates(&[temp_dir.path().to_path_buf()]).unwrap();

    assert_eq!(map.group_count(), 0);
    assert_eq!(map.total_dirs, 2);
}

#[test]
fn test_names_without_year_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("No Year Here")).unwrap();
    fs::create_dir(temp_dir.path().join("No Year Here Again")).unwrap();
    fs::create_dir(temp_dir.path().join("Some.Movie.2020.A")).unwrap();
    fs::create_dir(temp_dir.path().join("Some.Movie.2020.B")).unwrap();

    let map = discover_duplicates(&[temp_dir.path().to_path_buf()]).unwrap();

    assert_eq!(map.group_count(), 1);
    assert_eq!(map.total_dirs, 4);
}

#[test]
fn test_duplicates_across_roots() {
    let root_a = TempDir::new().unwrap();
    let root_b = TempDir::new().unwrap();
    fs::create_dir(root_a.path().join("Some.Movie.2020.1080p")).unwrap();
    fs::create_dir(root_b.path().join("Some.Movie.2020.2160p")).unwrap();

    let map = discover_duplicates(&[
        root_a.path().to_path_buf(),
        root_b.path().to_path_buf(),
    ])
    .unwrap();

    assert_eq!(map.group_count(), 1);
    let members = &map.groups[0].1;
    assert_eq!(members.len(), 2);
    assert_ne!(members[0].source_root, members[1].source_root);
}

#[cfg(unix)]
#[test]
fn test_unreadable_root_is_skipped_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let good = TempDir::new().unwrap();
    fs::create_dir(good.path().join("Some.Movie.2020.1080p")).unwrap();
    fs::create_dir(good.path().join("Some.Movie.2020.2160p")).unwrap();

    let bad = TempDir::new().unwrap();
    fs::create_dir(bad.path().join("Hidden.Movie.2019.A")).unwrap();
    fs::create_dir(bad.path().join("Hidden.Movie.2019.B")).unwrap();
    let original = fs::metadata(bad.path()).unwrap().permissions();
    fs::set_permissions(bad.path(), fs::Permissions::from_mode(0o000)).unwrap();

    // Running as root bypasses permission checks; nothing to observe.
    if fs::read_dir(bad.path()).is_ok() {
        fs::set_permissions(bad.path(), original).unwrap();
        return;
    }

    let map = discover_duplicates(&[
        bad.path().to_path_buf(),
        good.path().to_path_buf(),
    ])
    .unwrap();

    fs::set_permissions(bad.path(), original).unwrap();

    // The unreadable root is skipped; the readable one still groups.
    assert_eq!(map.group_count(), 1);
    assert_eq!(map.groups[0].0, "some movie 2020");
    assert_eq!(map.member_count(), 2);
}

#[test]
fn test_loose_files_are_not_counted() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("Some.Movie.2020.mkv"), "fake").unwrap();
    fs::create_dir(temp_dir.path().join("Some.Movie.2020.1080p")).unwrap();

    let map = discover_duplicates(&[temp_dir.path().to_path_buf()]).unwrap();

    assert_eq!(map.total_dirs, 1);
    assert_eq!(map.group_count(), 0);
}
