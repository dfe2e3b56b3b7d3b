//! Integration tests for the name normalization rule chain.

use tidyflix::core::normalize::Normalizer;

fn normalize(name: &str) -> String {
    Normalizer::new().unwrap().normalize(name)
}

#[test]
fn test_scene_name_cleanup() {
    assert_eq!(
        normalize("Some Movie (2019) [1080p] [BluRay] [5.1]"),
        "Some.Movie.2019.1080p.BluRay.5.1"
    );
}

#[test]
fn test_release_site_tags_are_stripped() {
    assert_eq!(
        normalize("Some.Movie.2019.1080p.WEBRip.x264[rarbg]"),
        "Some.Movie.2019.1080p.WebRip.x264"
    );
}

#[test]
fn test_trailing_group_bracket_becomes_dash() {
    assert_eq!(
        normalize("Some.Movie.2019.1080p.x264[GRP]"),
        "Some.Movie.2019.1080p.x264-GRP"
    );
    // An existing -group suffix wins over the bracket.
    assert_eq!(
        normalize("Some.Movie.2019-GRP[extra]"),
        "Some.Movie.2019-GRP.extra"
    );
}

#[test]
fn test_colons_and_special_dots() {
    assert_eq!(
        normalize("Movie: The Sequel (2021) .-. 720p"),
        "Movie.The.Sequel.2021.720p"
    );
}

#[test]
fn test_title_casing_and_term_capitalization() {
    assert_eq!(
        normalize("the.big.movie.2018.2160p.hevc.bluray"),
        "The.Big.Movie.2018.2160p.HEVC.BluRay"
    );
}

#[test]
fn test_short_acronyms_survive_title_casing() {
    assert_eq!(normalize("FBI.STORY.2001.1080p"), "FBI.Story.2001.1080p");
}

#[test]
fn test_edition_terms_move_after_year() {
    assert_eq!(
        normalize("Some.Movie.REPACK.2019.1080p.BluRay"),
        "Some.Movie.2019.REPACK.1080p.BluRay"
    );
    assert_eq!(
        normalize("Some.Movie.extended.proper.2019.720p"),
        "Some.Movie.2019.EXTENDED.PROPER.720p"
    );
}

#[test]
fn test_idempotent_on_clean_names() {
    let clean = "Some.Movie.2019.1080p.BluRay.x264-GRP";
    assert_eq!(normalize(clean), clean);
}

#[test]
fn test_fixpoint_terminates() {
    // Pathological input with nested noise still converges.
    let messy = "[ www.torrentday.com ] ..some___movie,, (2019) {720p} [EtHD]";
    let once = normalize(messy);
    assert_eq!(normalize(&once), once);
    assert!(once.contains("2019"));
    assert!(!once.contains('['));
    assert!(!once.contains(' '));
}
