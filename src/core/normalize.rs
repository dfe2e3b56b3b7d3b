//! Directory name normalization.
//!
//! An ordered rule chain rewrites scene-release directory names into a
//! canonical dotted form. The chain runs repeatedly until a fixpoint is
//! reached, since one rule's output can expose work for another (e.g.
//! bracket removal producing doubled dots).

use crate::utils::ui::{self, Palette};
use crate::Result;
use regex::Regex;

/// Maximum fixpoint iterations, guarding against rule cycles.
const MAX_ITERATIONS: usize = 10;

/// Release-group noise removed from names wherever it appears.
const SUBSTRINGS_TO_REMOVE: &[&str] = &[
    "www.UIndex.org    -    ",
    "[TGx]",
    "[EtHD]",
    "[rarbg]",
    "DDLValley.COOL",
    "[www.YYeTs.net]",
    "[norar]",
    "[no-rar]",
    "Rarbg.Com-",
    "[ www.torrentday.com ]",
];

/// Terms whose canonical capitalization is enforced per dot-part.
const TERM_CAPITALIZATIONS: &[(&str, &str)] = &[
    ("720p", "720p"),
    ("1080p", "1080p"),
    ("2160p", "2160p"),
    ("4k", "4K"),
    ("limited", "LIMITED"),
    ("extended", "EXTENDED"),
    ("unrated", "UNRATED"),
    ("uncut", "UNCUT"),
    ("proper", "PROPER"),
    ("repack", "REPACK"),
    ("rerip", "RERIP"),
    ("multi", "MULTi"),
    ("bluray", "BluRay"),
    ("dvd", "DVD"),
    ("hdtv", "HDTV"),
    ("webrip", "WebRip"),
    ("webdl", "WebDL"),
    ("bdrip", "BDRip"),
    ("dvdrip", "DVDRip"),
    ("hdcam", "HDCam"),
    ("hdrip", "HDRip"),
    ("xvid", "XviD"),
    ("divx", "DivX"),
    ("x264", "x264"),
    ("x265", "x265"),
    ("h264", "H264"),
    ("h265", "H265"),
    ("avc", "AVC"),
    ("hevc", "HEVC"),
    ("aac", "AAC"),
    ("ac3", "AC3"),
    ("dts", "DTS"),
    ("flac", "FLAC"),
    ("mp3", "MP3"),
    ("truehd", "TrueHD"),
    ("atmos", "Atmos"),
    ("dolby", "Dolby"),
    ("netflix", "Netflix"),
    ("hulu", "Hulu"),
    ("amazon", "Amazon"),
    ("disney", "Disney"),
    ("hbo", "HBO"),
    ("apple", "Apple"),
    ("paramount", "Paramount"),
    ("peacock", "Peacock"),
];

/// Edition terms relocated to just after the year.
const TERMS_TO_MOVE: &[&str] = &[
    "proper", "repack", "rerip", "limited", "extended", "unrated", "theatrical", "internal",
];

/// Compiled name normalizer.
pub struct Normalizer {
    substrings: Vec<Regex>,
    collapse_dots: Regex,
    colons: Regex,
    special_dot: Regex,
    end_bracket: Regex,
    group_suffix: Regex,
    brackets: Regex,
    trailing_junk: Regex,
    four_digits: Regex,
    year_part: Regex,
}

impl Normalizer {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| crate::Error::other(format!("bad pattern: {}", e)))
        };
        let substrings = SUBSTRINGS_TO_REMOVE
            .iter()
            .map(|s| compile(&format!("(?i){}", regex::escape(s))))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            substrings,
            collapse_dots: compile(r"\.{2,}")?,
            colons: compile(r"[:\x{A789}\x{2236}\x{FF1A}\x{02D0}]")?,
            special_dot: compile(r"\.[\-\+~\x{2013}]\.")?,
            end_bracket: compile(r"^(.*?)\[([^\]]+)\]$")?,
            group_suffix: compile(r"-\w+$")?,
            brackets: compile(r"[\(\)\[\]\{\}]")?,
            trailing_junk: compile(r"[^A-Za-z0-9]+$")?,
            four_digits: compile(r"\d{4}")?,
            year_part: compile(r"^\d{4}$")?,
        })
    }

    /// Apply the full rule chain once, reporting each rule that changed
    /// the text to `observer(rule_name, before, after)`.
    fn apply_once(&self, text: &str, observer: &mut dyn FnMut(&str, &str, &str)) -> String {
        let rules: &[(&str, &dyn Fn(&str) -> String)] = &[
            ("remove_release_tags", &|t| self.remove_release_tags(t)),
            ("separators_to_dots", &|t| separators_to_dots(t)),
            ("collapse_dots", &|t| self.collapse_dots.replace_all(t, ".").into_owned()),
            ("remove_colons", &|t| self.colons.replace_all(t, "").into_owned()),
            ("clean_special_dot_patterns", &|t| {
                self.special_dot.replace_all(t, ".").into_owned()
            }),
            ("trailing_bracket_to_group", &|t| self.trailing_bracket_to_group(t)),
            ("brackets_to_dots", &|t| self.brackets.replace_all(t, ".").into_owned()),
            ("clean_dash_dot", &|t| t.replace("-.", ".").replace(".-", ".")),
            ("strip_trailing_junk", &|t| {
                self.trailing_junk.replace(t, "").into_owned()
            }),
            ("strip_trailing_dots", &|t| t.trim_end_matches('.').to_string()),
            ("title_case", &|t| self.title_case(t)),
            ("canonical_terms", &|t| canonical_terms(t)),
            ("move_edition_terms", &|t| self.move_edition_terms(t)),
            ("strip_leading_dots", &|t| t.trim_start_matches('.').to_string()),
        ];

        let mut current = text.to_string();
        for (name, rule) in rules {
            let next = rule(&current);
            if next != current {
                observer(name, &current, &next);
                current = next;
            }
        }
        current
    }

    /// Normalize a directory name: run the rule chain until it stops
    /// changing the text.
    pub fn normalize(&self, name: &str) -> String {
        let mut current = name.to_string();
        for _ in 0..MAX_ITERATIONS {
            let next = self.apply_once(&current, &mut |_, _, _| {});
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Like [`Normalizer::normalize`], printing each rule's before/after
    /// with highlighted changes.
    pub fn normalize_explained(&self, name: &str, palette: Palette) -> String {
        let mut current = name.to_string();
        for iteration in 0..MAX_ITERATIONS {
            let mut changed = false;
            let next = self.apply_once(&current, &mut |rule, before, after| {
                changed = true;
                let (before_hl, after_hl) = ui::highlight_changes(before, after, palette);
                println!("  {}:", rule);
                println!("    Before: '{}'", before_hl);
                println!("    After:  '{}'", after_hl);
            });
            if next == current {
                break;
            }
            if changed {
                println!("  End of iteration {}: '{}'", iteration + 1, next);
            }
            current = next;
        }
        if name != current {
            println!("Final result: '{}'", current);
        }
        current
    }

    fn remove_release_tags(&self, text: &str) -> String {
        let mut result = text.to_string();
        for re in &self.substrings {
            result = re.replace_all(&result, ".").into_owned();
        }
        result
    }

    /// `Title.2019.1080p[GROUP]` becomes `Title.2019.1080p-GROUP`, but
    /// only when the name does not already end with a `-group` suffix.
    fn trailing_bracket_to_group(&self, text: &str) -> String {
        if let Some(caps) = self.end_bracket.captures(text) {
            let before = &caps[1];
            let inner = &caps[2];
            if !self.group_suffix.is_match(before) {
                return format!("{}-{}", before, inner);
            }
        }
        text.to_string()
    }

    /// Capitalize dot-separated words up to the year, preserving short
    /// all-caps words. Names with partially capitalized titles are left
    /// alone; all-lowercase and all-capitalized titles are normalized.
    fn title_case(&self, text: &str) -> String {
        if text.is_empty() {
            return text.to_string();
        }
        let parts: Vec<&str> = text.split('.').collect();

        let year_index = parts.iter().position(|p| self.four_digits.is_match(p));
        let check_until = year_index.unwrap_or(parts.len());

        let mut capitalized = 0usize;
        let mut non_empty = 0usize;
        for part in &parts[..check_until] {
            if part.is_empty() {
                continue;
            }
            non_empty += 1;
            if part.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
                capitalized += 1;
            }
        }
        // Mixed capitalization suggests an intentional casing; leave it.
        if non_empty > 0 && capitalized > 0 && capitalized < non_empty {
            return text.to_string();
        }

        let mut result: Vec<String> = Vec::with_capacity(parts.len());
        for (i, part) in parts.iter().enumerate() {
            if self.four_digits.is_match(part) {
                result.push(part.to_string());
                result.extend(parts[i + 1..].iter().map(|p| p.to_string()));
                break;
            }
            let is_short_acronym =
                part.len() <= 4 && !part.is_empty() && part.chars().all(|c| c.is_ascii_uppercase());
            if is_short_acronym {
                result.push(part.to_string());
            } else {
                result.push(capitalize(part));
            }
        }
        result.join(".")
    }

    /// Move edition terms (PROPER, EXTENDED, ...) found before the year
    /// to directly after it, preserving their relative order.
    fn move_edition_terms(&self, text: &str) -> String {
        if text.is_empty() {
            return text.to_string();
        }
        let parts: Vec<&str> = text.split('.').collect();
        let Some(year_index) = parts.iter().position(|p| self.year_part.is_match(p)) else {
            return text.to_string();
        };

        let mut kept: Vec<&str> = Vec::with_capacity(parts.len());
        let mut moved: Vec<&str> = Vec::new();
        for (i, part) in parts.iter().enumerate() {
            let lower = part.to_lowercase();
            if i < year_index && TERMS_TO_MOVE.contains(&lower.as_str()) {
                moved.push(part);
            } else {
                kept.push(part);
            }
        }
        if moved.is_empty() {
            return text.to_string();
        }

        let new_year_index = year_index - moved.len();
        let mut result: Vec<&str> = kept[..=new_year_index].to_vec();
        result.extend(moved);
        result.extend(&kept[new_year_index + 1..]);
        result.join(".")
    }
}

/// Replace spaces, underscores and commas with dots.
fn separators_to_dots(text: &str) -> String {
    text.replace([' ', '_', ','], ".")
}

/// Enforce canonical capitalization of known terms per dot-part.
fn canonical_terms(text: &str) -> String {
    text.split('.')
        .map(|part| {
            let lower = part.to_lowercase();
            TERM_CAPITALIZATIONS
                .iter()
                .find(|(term, _)| *term == lower)
                .map(|(_, preferred)| preferred.to_string())
                .unwrap_or_else(|| part.to_string())
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// First character uppercased, rest lowercased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
