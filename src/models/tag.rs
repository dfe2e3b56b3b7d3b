//! Quality tags and their scoring tables.

use colored::Color;

/// A discrete quality indicator detected from a directory name or a
/// probed media file. Variants are listed in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    // Video encodings
    Av1,
    H265,
    H264,
    // Resolutions
    R2160p,
    R4k,
    R1080p,
    R720p,
    // Quality features
    TenBit,
    Hdr10,
    Hdr,
    DolbyVision,
    Imax,
    Repack,
    ThreeD,
}

impl Tag {
    /// Display label for the tag.
    pub fn label(self) -> &'static str {
        match self {
            Tag::Av1 => "AV1",
            Tag::H265 => "H265",
            Tag::H264 => "H264",
            Tag::R2160p => "2160p",
            Tag::R4k => "4K",
            Tag::R1080p => "1080p",
            Tag::R720p => "720p",
            Tag::TenBit => "10bit",
            Tag::Hdr10 => "HDR10",
            Tag::Hdr => "HDR",
            Tag::DolbyVision => "DV",
            Tag::Imax => "IMAX",
            Tag::Repack => "REPACK",
            Tag::ThreeD => "3D",
        }
    }

    /// Points awarded for this tag.
    pub fn score(self) -> u32 {
        match self {
            Tag::Av1 => 12,
            Tag::H265 => 10,
            Tag::H264 => 5,
            Tag::R2160p | Tag::R4k => 15,
            Tag::R1080p => 8,
            Tag::R720p => 3,
            Tag::TenBit => 5,
            Tag::Hdr10 => 12,
            Tag::Hdr => 8,
            Tag::DolbyVision => 15,
            Tag::Imax => 7,
            Tag::Repack => 2,
            Tag::ThreeD => 0,
        }
    }

    /// Whether this tag names a video encoding.
    pub fn is_encoding(self) -> bool {
        matches!(self, Tag::Av1 | Tag::H265 | Tag::H264)
    }

    /// Encoding efficiency multiplier used for adjusted-size ranking.
    /// Non-encoding tags have no effect on size.
    pub fn size_multiplier(self) -> f64 {
        match self {
            Tag::Av1 => 2.5,
            Tag::H265 => 2.0,
            _ => 1.0,
        }
    }

    /// Display color: green for high quality, yellow for middle of the
    /// road, red for low quality indicators.
    pub fn color(self) -> Color {
        match self {
            Tag::H264 | Tag::R1080p => Color::Yellow,
            Tag::R720p | Tag::ThreeD => Color::Red,
            _ => Color::Green,
        }
    }
}
