//! Title similarity scoring.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::sanitize_title;

/// Scores strictly above this value are considered the same title.
pub const MATCH_THRESHOLD: f64 = 0.6;

/// Outcome of comparing a provider title against a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Similarity {
    /// Whether `value` clears [`MATCH_THRESHOLD`].
    pub same: bool,
    /// Best Dice coefficient observed, in `[0, 1]`.
    pub value: f64,
}

impl Similarity {
    /// Wrap a raw score, deriving `same` from the fixed threshold.
    pub fn from_value(value: f64) -> Self {
        Self {
            same: value > MATCH_THRESHOLD,
            value,
        }
    }
}

/// Compare a candidate (provider) title against an external (catalog) title.
///
/// The candidate is lower-cased and sanitized before it is compared with the
/// lower-cased external title. Each non-empty alt title is then compared with
/// the lower-cased, *unsanitized* candidate and the highest score wins.
///
/// Swapping `external` and `candidate` is not symmetric once alt titles are
/// involved, and sanitizing only applies to the candidate side.
///
/// Whitespace is ignored. Strings shorter than two characters have no
/// bigrams, so they only score `1.0` on exact (case-insensitive) equality.
pub fn similarity(external: &str, candidate: &str, alt_titles: &[String]) -> Similarity {
    let candidate = candidate.to_lowercase();
    let external = external.to_lowercase();

    let mut best = dice_coefficient(&sanitize_title(&candidate), &external);

    for alt in alt_titles.iter().filter(|alt| !alt.is_empty()) {
        let score = dice_coefficient(&candidate, &alt.to_lowercase());
        if score > best {
            best = score;
        }
    }

    Similarity::from_value(best)
}

/// Dice coefficient over character bigrams, counted with multiplicity.
///
/// Whitespace is dropped first. Lengths are counted in chars so that native
/// titles score the same as their romanized counterparts would.
fn dice_coefficient(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    let b: Vec<char> = b.chars().filter(|c| !c.is_whitespace()).collect();

    if a == b {
        return 1.0;
    }
    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();
    for pair in a.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut shared = 0;
    for pair in b.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1])) {
            if *count > 0 {
                *count -= 1;
                shared += 1;
            }
        }
    }

    (2 * shared) as f64 / (a.len() + b.len() - 2) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alts(titles: &[&str]) -> Vec<String> {
        titles.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_identical_titles_match() {
        let sim = similarity("Sword Art Online", "Sword Art Online", &[]);
        assert!(sim.same);
        assert!((sim.value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_self_similarity_is_always_a_match() {
        for title in ["Overlord", "Re:Zero", "Kono Subarashii Sekai ni Shukufuku wo!", "86"] {
            let sim = similarity(title, title, &[]);
            assert!(sim.value >= MATCH_THRESHOLD, "title: {title}");
            assert!(sim.same, "title: {title}");
        }
    }

    #[test]
    fn test_case_insensitive() {
        let sim = similarity("OVERLORD", "overlord", &[]);
        assert!((sim.value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_candidate_is_sanitized() {
        let sim = similarity("Overlord", "Overlord (Dub)", &[]);
        assert!((sim.value - 1.0).abs() < f64::EPSILON);
        assert!(sim.same);
    }

    #[test]
    fn test_unrelated_titles_do_not_match() {
        let sim = similarity("Overlord", "Toradora", &[]);
        assert!(!sim.same);
        assert!(sim.value < 0.2);
    }

    #[test]
    fn test_dice_counts_bigram_multiplicity() {
        // "aaaa" has bigrams aa x3, "aa" has aa x1: 2 * 1 / (3 + 1)
        let sim = similarity("aa", "aaaa", &[]);
        assert!((sim.value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_short_strings_fall_back_to_equality() {
        assert!((similarity("a", "A", &[]).value - 1.0).abs() < f64::EPSILON);
        assert_eq!(similarity("a", "b", &[]).value, 0.0);
        assert_eq!(similarity("a", "ab", &[]).value, 0.0);
        assert_eq!(similarity("", "ab", &[]).value, 0.0);
        assert!((similarity("", "", &[]).value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_alt_titles_raise_the_score() {
        let without = similarity("Re:Zero", "Re Zero Starting Life", &[]);
        assert!(!without.same);

        let with = similarity(
            "Re:Zero",
            "Re Zero Starting Life",
            &alts(&["Re:Zero", "Re:Zero Starting Life"]),
        );
        assert!(with.same);
        assert!(with.value > without.value);
    }

    #[test]
    fn test_empty_alt_titles_are_skipped() {
        let sim = similarity("Overlord", "Toradora", &alts(&["", ""]));
        assert!(!sim.same);
    }

    #[test]
    fn test_alt_branch_is_not_symmetric() {
        // The alt list is compared against the candidate, so swapping the
        // first two arguments changes which string meets the alt titles.
        let alt = alts(&["Toradora!"]);
        let forward = similarity("Overlord", "Toradora!", &alt);
        let reverse = similarity("Toradora!", "Overlord", &alt);

        assert!(forward.same);
        assert!((forward.value - 1.0).abs() < f64::EPSILON);
        assert!(!reverse.same);
        assert!(reverse.value < forward.value);
    }

    #[test]
    fn test_sanitizing_is_candidate_side_only() {
        let forward = similarity("Overlord", "Overlord (TV)", &[]);
        let reverse = similarity("Overlord (TV)", "Overlord", &[]);
        assert!((forward.value - 1.0).abs() < f64::EPSILON);
        assert!(reverse.value < forward.value);
    }

    #[test]
    fn test_native_titles_score_by_char_count() {
        // 6 shared bigrams out of 6 + 9
        let sim = similarity("本好きの下剋上", "本好きの下剋上 第二部", &[]);
        assert!((sim.value - 0.8).abs() < 1e-9);
        assert!(sim.same);

        let ascii = similarity("abcdefg", "abcdefg hij", &[]);
        assert!((ascii.value - sim.value).abs() < 1e-9);
    }

    #[test]
    fn test_native_alt_title_matches() {
        let sim = similarity(
            "Ascendance of a Bookworm",
            "本好きの下剋上",
            &alts(&["Honzuki no Gekokujou", "本好きの下剋上"]),
        );
        assert!((sim.value - 1.0).abs() < f64::EPSILON);
        assert!(sim.same);
    }

    #[test]
    fn test_accented_titles_are_not_penalized() {
        let sim = similarity("pokémon", "pokémon", &[]);
        assert!((sim.value - 1.0).abs() < f64::EPSILON);

        // "café au lait" vs "café olé": bigrams ca, af, fé shared of 9 + 6
        let sim = similarity("café au lait", "café olé", &[]);
        assert!((sim.value - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(!Similarity::from_value(0.6).same);
        assert!(Similarity::from_value(0.6000001).same);
    }
}
