//! Release-tag stripping for provider titles.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Sanitized titles are cut to this many characters.
pub const MAX_TITLE_CHARS: usize = 99;

static LANGUAGE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i) *\((dub|sub|uncensored|uncut|subbed|dubbed)\)")
        .expect("language marker pattern is valid")
});

static AUDIO_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) *\([^)]+audio\)").expect("audio marker pattern is valid"));

static TRAILING_BD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)( +BD)+ *$").expect("BD marker pattern is valid"));

static TV_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(TV\)").expect("TV marker pattern is valid"));

/// Strip release noise from a title and bound its length.
///
/// Removes dub/sub/uncensored/uncut markers, "(... audio)" parentheticals, a
/// trailing "BD" token and every "(TV)", then trims and truncates to
/// [`MAX_TITLE_CHARS`] characters. The steps are repeated until the title stops
/// changing, so `sanitize_title(sanitize_title(x)) == sanitize_title(x)`.
pub fn sanitize_title(title: &str) -> String {
    let mut current = sanitize_once(title);
    loop {
        let next = sanitize_once(&current);
        // Every step only removes characters, so equal length means equal text.
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

fn sanitize_once(title: &str) -> String {
    let title = LANGUAGE_MARKER.replace_all(title, "");
    let title = AUDIO_MARKER.replace_all(&title, "");
    let title = TRAILING_BD.replace_all(&title, "");
    let title = TV_MARKER.replace_all(&title, "");

    let truncated: String = title.trim().chars().take(MAX_TITLE_CHARS).collect();
    truncated.trim().to_string()
}
