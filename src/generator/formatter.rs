/// Trait for turning template output into display text
pub trait TextFormatter {
    fn format(&self, words: &[&str]) -> String;
}

/// Joins words with single spaces
pub struct PlainFormatter;

impl TextFormatter for PlainFormatter {
    fn format(&self, words: &[&str]) -> String {
        words
            .iter()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Capitalizes the first letter and ends with a period unless the text
/// already carries terminal punctuation.
pub struct SentenceFormatter;

impl TextFormatter for SentenceFormatter {
    fn format(&self, words: &[&str]) -> String {
        let text = PlainFormatter.format(words);
        if text.is_empty() {
            return text;
        }
        let mut text = capitalize_first_letter(&text);
        if !text.ends_with(['.', '!', '?']) {
            text.push('.');
        }
        text
    }
}

/// Headline capitalization; short function words stay lowercase except
/// at the start.
pub struct TitleFormatter;

const MINOR_WORDS: [&str; 12] = [
    "a", "an", "and", "as", "at", "for", "in", "of", "on", "or", "the", "with",
];

impl TextFormatter for TitleFormatter {
    fn format(&self, words: &[&str]) -> String {
        let text = PlainFormatter.format(words);
        text.split_whitespace()
            .enumerate()
            .map(|(i, w)| {
                if i > 0 && MINOR_WORDS.contains(&w.to_lowercase().as_str()) {
                    w.to_lowercase()
                } else {
                    capitalize_first_letter(w)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn capitalize_first_letter(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => first.to_uppercase().chain(chars).collect(),
        _ => word.to_string(),
    }
}
