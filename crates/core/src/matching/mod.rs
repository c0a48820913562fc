//! Title normalization and fuzzy matching.
//!
//! Provider titles carry release noise ("(Dub)", "(TV)", " BD", ...) that has
//! to be stripped before they are compared against catalog titles. Matching
//! uses a Sørensen-Dice coefficient over character bigrams.

mod sanitize;
mod similarity;

pub use sanitize::{sanitize_title, MAX_TITLE_CHARS};
pub use similarity::{similarity, Similarity, MATCH_THRESHOLD};
