use serde::Deserialize;

/// A fixed-length list of interchangeable fragments for one template slot.
///
/// `size` is the declared radix used by the decoder. It must equal
/// `words.len()`; a mismatch is not caught at runtime and shows up as
/// repeated or unreachable tokens (the embedded pools are checked in tests).
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TemplatePool {
    pub name: String,
    pub size: usize,
    pub words: Vec<String>,
}

impl TemplatePool {
    /// Token for a decoded slot digit
    pub fn token(&self, slot: usize) -> &str {
        if self.words.is_empty() {
            return "";
        }
        &self.words[slot % self.words.len()]
    }

    pub fn is_consistent(&self) -> bool {
        !self.words.is_empty() && self.size == self.words.len()
    }
}

/// Placeholder names of a `{name}` pattern, in order of first appearance.
pub fn slot_names(pattern: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = pattern;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else { break };
        let name = &after[..end];
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &after[end + 1..];
    }
    names
}

/// Replace every `{key}` in the template with its value.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = tpl.to_string();
    for (k, v) in pairs {
        let needle = format!("{{{}}}", k);
        out = out.replace(&needle, v);
    }
    out
}
