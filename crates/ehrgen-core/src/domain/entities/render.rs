//! Variable substitution for generated files.

use std::collections::BTreeMap;

/// Context for rendering `{{VARIABLE}}` placeholders.
///
/// Immutable after creation; `with_variable` returns a new instance.
///
/// ## Variable Naming Convention
///
/// Variables are `SCREAMING_SNAKE_CASE`. Unknown placeholders are left as-is.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, consuming self and returning a new context.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Replace every `{{KEY}}` placeholder with its value.
    ///
    /// - `{{UNKNOWN}}` remains as literal `{{UNKNOWN}}`
    /// - repeated placeholders are all replaced
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }
}

/// Convert a display name to snake_case: `"Acme Health"` -> `"acme_health"`.
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// Convert a display name to kebab-case: `"AcmeHealth"` -> `"acme-health"`.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

/// Split a string into lowercase words.
///
/// Separators (`_`, `-`, `.`, `/`, whitespace) end a word, as do camelCase
/// transitions (`aB`) and acronym boundaries (`HTTPServer` -> `http`,
/// `server`). Other punctuation is dropped.
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if !c.is_alphanumeric() {
            if matches!(c, '_' | '-' | '.' | '/') || c.is_whitespace() {
                flush(&mut words, &mut current);
            }
            continue;
        }

        current.push(c);

        if let Some(&next) = chars.peek() {
            let camel = c.is_lowercase() && next.is_uppercase();
            let acronym = c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(char::is_lowercase);
            if camel || acronym {
                flush(&mut words, &mut current);
            }
        }
    }
    flush(&mut words, &mut current);

    words
}

fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(current.to_lowercase());
        current.clear();
    }
}
