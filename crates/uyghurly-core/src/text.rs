use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static PARENTHESIZED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").unwrap());
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SLUG_DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s\-_]").unwrap());
static DASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

/// Answer comparison used by typing questions
pub trait AnswerMatcher {
    fn normalize(&self, answer: &str) -> String {
        clean_text(&answer.trim().to_lowercase())
    }

    /// Case-insensitive match that tolerates bracketed annotations.
    ///
    /// Accepts when the answers agree with bracketed parts removed, with only
    /// the bracket characters removed, or verbatim.
    fn matches(&self, user_answer: &str, correct_answer: &str) -> bool {
        if self.normalize(user_answer) == self.normalize(correct_answer) {
            return true;
        }

        let user = user_answer.trim().to_lowercase();
        let correct = correct_answer.trim().to_lowercase();

        strip_bracket_chars(&user) == strip_bracket_chars(&correct) || user == correct
    }
}

pub struct DefaultMatcher;
impl AnswerMatcher for DefaultMatcher {}

pub fn is_correct_answer(user_answer: &str, correct_answer: &str) -> bool {
    DefaultMatcher.matches(user_answer, correct_answer)
}

/// Drop `(...)` and `[...]` groups and squeeze whitespace
pub fn clean_text(text: &str) -> String {
    let text = PARENTHESIZED.replace_all(text, "");
    let text = BRACKETED.replace_all(&text, "");
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Keep bracketed content, drop the bracket characters themselves
pub fn strip_bracket_chars(text: &str) -> String {
    let text: String = text
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '[' | ']'))
        .collect();
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Remove parenthesized annotations only, as the content cleaner does for Uyghur words
pub fn remove_parentheses(text: &str) -> String {
    PARENTHESIZED.replace_all(text, "").trim().to_string()
}

/// Lowercase ASCII search form: diacritics stripped, punctuation dropped
pub fn normalize_text(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect()
}

/// URL slug for a lesson title
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let kept = SLUG_DISALLOWED.replace_all(&lower, "");
    let dashed = WHITESPACE.replace_all(&kept, "-");
    let collapsed = DASH_RUNS.replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
