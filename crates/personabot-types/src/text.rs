//! Small display helpers for bot names and personas.

/// Upper-case the first character of a string.
///
/// ```
/// use personabot_types::text::capitalize;
///
/// assert_eq!(capitalize("luna"), "Luna");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keep the first `word_count` space-separated words, adding `...` if cut.
///
/// ```
/// use personabot_types::text::truncate_words;
///
/// assert_eq!(truncate_words("a very friendly assistant", 3), "a very friendly...");
/// assert_eq!(truncate_words("short one", 3), "short one");
/// ```
pub fn truncate_words(s: &str, word_count: usize) -> String {
    let words: Vec<&str> = s.split(' ').collect();
    if words.len() <= word_count {
        return s.to_string();
    }
    format!("{}...", words[..word_count].join(" "))
}
