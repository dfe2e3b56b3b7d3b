//! Quality scoring.
//!
//! Maps a directory name (plus an optionally probed codec) to a tag set,
//! computes encoding-adjusted sizes, and normalizes size scores relative
//! to the largest adjusted size within a duplicate group.

use crate::models::{DirectoryEntry, Tag};
use crate::services::mediainfo::{self, Codec};
use std::path::Path;

/// Maximum points awarded by the group-relative size comparison.
pub const MAX_SIZE_SCORE: u32 = 25;

/// Check for a token bounded by whitespace, a dot, or the string
/// boundary. Used for short aliases (av1, avc, 4k, dv, 3d) that would
/// otherwise match inside longer words.
fn has_bounded_token(name_lower: &str, token: &str) -> bool {
    let bytes = name_lower.as_bytes();
    let is_delim = |b: u8| b == b'.' || b.is_ascii_whitespace();
    let mut start = 0;
    while let Some(pos) = name_lower[start..].find(token) {
        let begin = start + pos;
        let end = begin + token.len();
        let before_ok = begin == 0 || is_delim(bytes[begin - 1]);
        let after_ok = end == bytes.len() || is_delim(bytes[end]);
        if before_ok && after_ok {
            return true;
        }
        start = begin + 1;
    }
    false
}

/// Detect the video encoding from name tokens alone.
/// Priority: AV1 > H265 > H264.
fn encoding_from_name(name_lower: &str) -> Option<Tag> {
    if has_bounded_token(name_lower, "av1") || name_lower.contains("av01") {
        Some(Tag::Av1)
    } else if ["hevc", "h265", "x265", "h.265", "x.265", "hev1", "hvc1"]
        .iter()
        .any(|c| name_lower.contains(c))
    {
        Some(Tag::H265)
    } else if ["h264", "x264", "h.264", "x.264", "avc1"]
        .iter()
        .any(|c| name_lower.contains(c))
        || has_bounded_token(name_lower, "avc")
    {
        Some(Tag::H264)
    } else {
        None
    }
}

/// Parse quality tags from a directory name, falling back to a probed
/// codec for the encoding when the name carries none.
///
/// Tag order reflects detection priority: encoding, resolution, bit
/// depth, HDR, Dolby Vision, IMAX, repack, 3D. At most one encoding and
/// one resolution tag are emitted.
pub fn classify(name: &str, probed_codec: Option<Codec>) -> Vec<Tag> {
    let name_lower = name.to_lowercase();
    let mut tags = Vec::new();

    let encoding = encoding_from_name(&name_lower).or(match probed_codec {
        Some(Codec::Av1) => Some(Tag::Av1),
        Some(Codec::H265) => Some(Tag::H265),
        Some(Codec::H264) => Some(Tag::H264),
        None => None,
    });
    if let Some(encoding) = encoding {
        tags.push(encoding);
    }

    // Resolution: first match wins, so a name carrying both "2160p" and
    // "4K" yields a single resolution tag.
    if name_lower.contains("2160p") {
        tags.push(Tag::R2160p);
    } else if has_bounded_token(&name_lower, "4k") {
        tags.push(Tag::R4k);
    } else if name_lower.contains("1080p") {
        tags.push(Tag::R1080p);
    } else if name_lower.contains("720p") {
        tags.push(Tag::R720p);
    }

    if name_lower.contains("10bit") {
        tags.push(Tag::TenBit);
    }

    // HDR10 takes precedence over and suppresses plain HDR.
    if name_lower.contains("hdr10") {
        tags.push(Tag::Hdr10);
    } else if name_lower.contains("hdr") {
        tags.push(Tag::Hdr);
    }

    if has_bounded_token(&name_lower, "dv") {
        tags.push(Tag::DolbyVision);
    }
    if name_lower.contains("imax") {
        tags.push(Tag::Imax);
    }
    if name_lower.contains("repack") {
        tags.push(Tag::Repack);
    }
    if has_bounded_token(&name_lower, "3d") {
        tags.push(Tag::ThreeD);
    }

    tags
}

/// Like [`classify`], but probes the directory's media files for a codec
/// only when the name itself names no encoding.
pub fn classify_with_probe(name: &str, dir: &Path) -> Vec<Tag> {
    let name_only = classify(name, None);
    if name_only.iter().any(|t| t.is_encoding()) {
        return name_only;
    }
    classify(name, mediainfo::probe_directory_codec(dir))
}

/// Sum of the fixed point values of a tag set.
pub fn tag_score(tags: &[Tag]) -> u32 {
    tags.iter().map(|t| t.score()).sum()
}

/// Size scaled by the encoding-efficiency multiplier (AV1 2.5x, H265
/// 2.0x, H264 and unknown 1.0x). A smaller file in an efficient codec
/// can out-rank a larger one of equal perceptual quality.
pub fn adjusted_size_mb(size_mb: f64, tags: &[Tag]) -> f64 {
    if size_mb <= 0.0 {
        return 0.0;
    }
    let multiplier = tags
        .iter()
        .find(|t| t.is_encoding())
        .map(|t| t.size_multiplier())
        .unwrap_or(1.0);
    size_mb * multiplier
}

/// Recompute every member's `video_score` as tag score plus a
/// group-relative size score.
///
/// The member with the largest adjusted size receives exactly
/// `max_points`; others scale linearly. Members with zero or unknown
/// size contribute nothing but keep their tag score. The total is
/// rebuilt from the tag score each call, so repeated invocations never
/// accumulate.
pub fn apply_relative_size_scores(members: &mut [DirectoryEntry], max_points: u32) {
    let max_adjusted = members
        .iter()
        .map(|m| m.adjusted_size_mb)
        .fold(0.0_f64, f64::max);

    for member in members.iter_mut() {
        let size_score = if max_adjusted > 0.0 && member.adjusted_size_mb > 0.0 {
            let ratio = member.adjusted_size_mb / max_adjusted;
            (ratio * max_points as f64).floor() as u32
        } else {
            0
        };
        member.video_score = tag_score(&member.tags) + size_score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_token() {
        assert!(has_bounded_token("movie.av1.mkv", "av1"));
        assert!(has_bounded_token("av1 movie", "av1"));
        assert!(has_bounded_token("movie av1", "av1"));
        assert!(!has_bounded_token("caravan", "av1"));
        assert!(!has_bounded_token("woodvale", "dv"));
        assert!(has_bounded_token("movie.dv.hdr", "dv"));
    }

    #[test]
    fn test_encoding_priority() {
        // AV1 wins over anything else named alongside it.
        assert_eq!(
            classify("Movie.2020.AV1.x265", None).first(),
            Some(&Tag::Av1)
        );
        assert_eq!(
            classify("Movie.2020.x265.1080p", None).first(),
            Some(&Tag::H265)
        );
    }

    #[test]
    fn test_probed_codec_fallback() {
        let tags = classify("Movie.2020.1080p", Some(Codec::H265));
        assert_eq!(tags, vec![Tag::H265, Tag::R1080p]);

        // Name wins over the probe.
        let tags = classify("Movie.2020.x264", Some(Codec::H265));
        assert_eq!(tags, vec![Tag::H264]);
    }

    #[test]
    fn test_single_resolution_tag() {
        let tags = classify("Movie.2020.2160p.4K", None);
        let resolutions: Vec<_> = tags
            .iter()
            .filter(|t| matches!(t, Tag::R2160p | Tag::R4k | Tag::R1080p | Tag::R720p))
            .collect();
        assert_eq!(resolutions, vec![&Tag::R2160p]);
    }

    #[test]
    fn test_hdr10_suppresses_hdr() {
        let tags = classify("Movie.2020.HDR10", None);
        assert!(tags.contains(&Tag::Hdr10));
        assert!(!tags.contains(&Tag::Hdr));

        let tags = classify("Movie.2020.HDR", None);
        assert!(tags.contains(&Tag::Hdr));
    }

    #[test]
    fn test_tag_score_sum() {
        let tags = classify("Movie.2020.2160p.x265.10bit.HDR10", None);
        assert_eq!(tag_score(&tags), 10 + 15 + 5 + 12);
    }

    #[test]
    fn test_adjusted_size() {
        assert_eq!(adjusted_size_mb(1000.0, &[Tag::H265]), 2000.0);
        assert_eq!(adjusted_size_mb(1000.0, &[Tag::Av1]), 2500.0);
        assert_eq!(adjusted_size_mb(1000.0, &[Tag::H264]), 1000.0);
        assert_eq!(adjusted_size_mb(1000.0, &[Tag::R1080p]), 1000.0);
        assert_eq!(adjusted_size_mb(0.0, &[Tag::Av1]), 0.0);
    }
}
