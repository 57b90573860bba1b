// Utility functions shared by the filtering stages

/// Whitespace tokens of a sentence
pub fn tokens(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

/// Lowercase a token and strip everything except alphanumerics, `_` and inner `-`
pub fn clean_word(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Sentence ends with `.`, `!` or `?` (after trimming)
pub fn has_terminal_punctuation(s: &str) -> bool {
    s.trim_end().ends_with(&['.', '!', '?'][..])
}

/// First non-whitespace character is uppercase
pub fn starts_capitalized(s: &str) -> bool {
    s.trim_start()
        .chars()
        .next()
        .map(char::is_uppercase)
        .unwrap_or(false)
}

/// Two adjacent tokens are the same word (case-insensitive, punctuation ignored)
pub fn has_repeated_word(s: &str) -> bool {
    let words: Vec<String> = s
        .split_whitespace()
        .map(clean_word)
        .filter(|w| !w.is_empty())
        .collect();

    words
        .windows(2)
        .any(|pair| pair[0] == pair[1] && pair[0].chars().any(char::is_alphabetic))
}

/// Share of alphanumeric characters among non-whitespace characters
pub fn alphanumeric_ratio(s: &str) -> f32 {
    let mut total = 0usize;
    let mut alnum = 0usize;
    for c in s.chars().filter(|c| !c.is_whitespace()) {
        total += 1;
        if c.is_alphanumeric() {
            alnum += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    alnum as f32 / total as f32
}

/// Case-insensitive substring presence of any of `needles` in an already
/// lowercased haystack; returns the number of needles present
pub fn count_present(haystack_lower: &str, needles: &[String]) -> usize {
    needles
        .iter()
        .filter(|n| haystack_lower.contains(n.as_str()))
        .count()
}

/// Whole-word presence of `word` in an already lowercased haystack
///
/// A trailing plural `s` or `es` still counts as the same word.
pub fn contains_word(haystack_lower: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    haystack_lower.match_indices(word).any(|(start, _)| {
        let starts_word = haystack_lower[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        if !starts_word {
            return false;
        }
        let rest = &haystack_lower[start + word.len()..];
        let rest = rest
            .strip_prefix("es")
            .filter(|r| !r.starts_with(char::is_alphanumeric))
            .or_else(|| rest.strip_prefix('s'))
            .unwrap_or(rest);
        !rest.starts_with(char::is_alphanumeric)
    })
}

/// Number of `words` present as whole words; see [`contains_word`]
pub fn count_words_present(haystack_lower: &str, words: &[String]) -> usize {
    words
        .iter()
        .filter(|w| contains_word(haystack_lower, w))
        .count()
}
