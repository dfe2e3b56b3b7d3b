//! Media inspection via ffprobe.
//!
//! Extracts track-level metadata (video codec, embedded subtitle
//! languages) from media files. Any failure to run ffprobe or parse its
//! output degrades to an empty track list, never an error: callers fall
//! back to filename-based classification.

use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// Track type as reported by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Text,
    Other,
}

/// One probed track.
#[derive(Debug, Clone)]
pub struct Track {
    pub kind: TrackKind,
    /// Language code, uppercased; "UNK" when the container has none.
    pub language: String,
    /// Codec or format identifier.
    pub codec: String,
}

/// Video codec families relevant to quality scoring, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Av1,
    H265,
    H264,
}

/// FFprobe output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

/// FFprobe stream information.
#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    codec_tag_string: Option<String>,
    #[serde(default)]
    tags: Option<StreamTags>,
}

#[derive(Debug, Default, Deserialize)]
struct StreamTags {
    language: Option<String>,
}

/// Probe a media file and return its tracks. Returns an empty list when
/// ffprobe is missing, fails, or produces unparseable output.
pub fn inspect(path: &Path) -> Vec<Track> {
    let output = match Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_streams"])
        .arg(path)
        .output()
    {
        Ok(output) if output.status.success() => output,
        _ => return Vec::new(),
    };

    let ffprobe: FfprobeOutput = match serde_json::from_slice(&output.stdout) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!("unparseable ffprobe output for {:?}: {}", path, e);
            return Vec::new();
        }
    };

    ffprobe
        .streams
        .into_iter()
        .map(|stream| {
            let kind = match stream.codec_type.as_deref() {
                Some("video") => TrackKind::Video,
                Some("subtitle") => TrackKind::Text,
                _ => TrackKind::Other,
            };
            let language = stream
                .tags
                .and_then(|t| t.language)
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| "UNK".to_string())
                .to_uppercase();
            // Prefer the codec tag (e.g. "hvc1", "av01") over the codec
            // name so the classification sees container-level ids too.
            let codec = stream
                .codec_tag_string
                .filter(|t| !t.is_empty() && t != "[0][0][0][0]")
                .or(stream.codec_name)
                .unwrap_or_default();
            Track { kind, language, codec }
        })
        .collect()
}

/// Classify a codec identifier into one of the scored families.
pub fn classify_codec_id(id: &str) -> Option<Codec> {
    let id = id.to_lowercase();
    if ["av01", "av1"].iter().any(|c| id.contains(c)) {
        Some(Codec::Av1)
    } else if ["hevc", "h265", "x265", "hev1", "hvc1"].iter().any(|c| id.contains(c)) {
        Some(Codec::H265)
    } else if ["avc", "h264", "x264", "avc1"].iter().any(|c| id.contains(c)) {
        Some(Codec::H264)
    } else {
        None
    }
}

/// Detect the video codec of a directory by probing its first media file.
/// Only the first media file and its first video track are consulted.
pub fn probe_directory_codec(dir: &Path) -> Option<Codec> {
    let entries = std::fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !crate::utils::fs::is_media_file(&path) {
            continue;
        }
        let codec = inspect(&path)
            .iter()
            .find(|t| t.kind == TrackKind::Video)
            .and_then(|t| classify_codec_id(&t.codec));
        return codec;
    }
    None
}

/// All embedded text tracks of a media file as (language, format) pairs.
/// A format of "UTF-8" is collapsed to `None`: it names an encoding, not
/// a subtitle format.
pub fn embedded_subtitles(path: &Path) -> Vec<(String, Option<String>)> {
    inspect(path)
        .into_iter()
        .filter(|t| t.kind == TrackKind::Text)
        .map(|t| {
            let format = if t.codec.is_empty() || t.codec.eq_ignore_ascii_case("utf-8") {
                None
            } else {
                Some(t.codec)
            };
            (t.language, format)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_codec_id() {
        assert_eq!(classify_codec_id("av01"), Some(Codec::Av1));
        assert_eq!(classify_codec_id("hvc1"), Some(Codec::H265));
        assert_eq!(classify_codec_id("HEVC"), Some(Codec::H265));
        assert_eq!(classify_codec_id("avc1"), Some(Codec::H264));
        assert_eq!(classify_codec_id("vp9"), None);
    }

    #[test]
    fn test_inspect_missing_file_is_empty() {
        assert!(inspect(Path::new("/nonexistent/file.mkv")).is_empty());
    }
}
