//! Integration tests for quality scoring across a duplicate group.

use std::path::PathBuf;
use tidyflix::core::scoring::{
    adjusted_size_mb, apply_relative_size_scores, classify, tag_score, MAX_SIZE_SCORE,
};
use tidyflix::models::DirectoryEntry;

fn entry(name: &str, size_mb: f64) -> DirectoryEntry {
    let mut e = DirectoryEntry::new(
        name.to_string(),
        PathBuf::from(format!("/movies/{}", name)),
        PathBuf::from("/movies"),
    );
    e.size_mb = size_mb;
    e.size_bytes = (size_mb * 1024.0 * 1024.0) as u64;
    e.tags = classify(name, None);
    e.video_score = tag_score(&e.tags);
    e.adjusted_size_mb = adjusted_size_mb(size_mb, &e.tags);
    e
}

#[test]
fn test_smaller_h265_outranks_larger_h264_on_size() {
    // 1.5 GB of H265 adjusts to 3.0 GB effective, beating 2 GB of H264.
    let mut members = vec![
        entry("Some.Movie.2020.1080p.x264", 2048.0),
        entry("Some.Movie.2020.1080p.x265", 1536.0),
    ];
    apply_relative_size_scores(&mut members, MAX_SIZE_SCORE);

    let x264 = &members[0];
    let x265 = &members[1];
    assert!(x265.adjusted_size_mb > x264.adjusted_size_mb);
    // The largest adjusted size takes the full size score.
    assert_eq!(x265.video_score, tag_score(&x265.tags) + MAX_SIZE_SCORE);
    assert!(x265.video_score > x264.video_score);
}

#[test]
fn test_largest_adjusted_size_gets_exactly_max_points() {
    let mut members = vec![
        entry("Some.Movie.2020.1080p", 1000.0),
        entry("Some.Movie.2020.720p", 500.0),
    ];
    apply_relative_size_scores(&mut members, MAX_SIZE_SCORE);

    assert_eq!(members[0].video_score, tag_score(&members[0].tags) + 25);
    // Half the adjusted size gets floor(0.5 * 25) = 12 points.
    assert_eq!(members[1].video_score, tag_score(&members[1].tags) + 12);
}

#[test]
fn test_repeated_application_does_not_accumulate() {
    let mut members = vec![
        entry("Some.Movie.2020.2160p.x265", 4000.0),
        entry("Some.Movie.2020.1080p.x264", 2000.0),
    ];
    apply_relative_size_scores(&mut members, MAX_SIZE_SCORE);
    let first: Vec<u32> = members.iter().map(|m| m.video_score).collect();
    apply_relative_size_scores(&mut members, MAX_SIZE_SCORE);
    let second: Vec<u32> = members.iter().map(|m| m.video_score).collect();
    assert_eq!(first, second);
}

#[test]
fn test_zero_size_keeps_tag_score_only() {
    let mut members = vec![
        entry("Some.Movie.2020.1080p.x264", 1000.0),
        entry("Some.Movie.2020.2160p.x265", 0.0),
    ];
    apply_relative_size_scores(&mut members, MAX_SIZE_SCORE);

    assert_eq!(members[1].video_score, tag_score(&members[1].tags));
}

#[test]
fn test_all_zero_sizes() {
    let mut members = vec![
        entry("Some.Movie.2020.1080p", 0.0),
        entry("Some.Movie.2020.720p", 0.0),
    ];
    apply_relative_size_scores(&mut members, MAX_SIZE_SCORE);

    assert_eq!(members[0].video_score, tag_score(&members[0].tags));
    assert_eq!(members[1].video_score, tag_score(&members[1].tags));
}

#[test]
fn test_full_quality_stack_scores() {
    // 2160p + x265 + 10bit + HDR10 = 15 + 10 + 5 + 12.
    let tags = classify("Some.Movie.2020.2160p.x265.10bit.HDR10", None);
    assert_eq!(tag_score(&tags), 42);

    // DV and IMAX stack on top of the rest.
    let tags = classify("Some.Movie.2020.2160p.DV.IMAX", None);
    assert_eq!(tag_score(&tags), 15 + 15 + 7);
}
