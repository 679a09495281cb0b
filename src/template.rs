// Named format templates with positional slots: {0} body, {1} UTC timestamp
use crate::constants::{DEFAULT_TEMPLATE_KEY, DEFAULT_TEMPLATE_PATTERN, TIMESTAMP_FORMAT};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    patterns: HashMap<String, String>,
}

impl Default for Templates {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl Templates {
    /// Builds the template table; `"default"` falls back to `{0}`.
    pub fn new(mut patterns: HashMap<String, String>) -> Self {
        patterns
            .entry(DEFAULT_TEMPLATE_KEY.to_string())
            .or_insert_with(|| DEFAULT_TEMPLATE_PATTERN.to_string());
        Self { patterns }
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&str> {
        self.patterns.get(key).map(String::as_str)
    }

    /// Formats `body` with the template named `key`, stamped with the current time.
    pub fn format<'a>(
        &self,
        key: &str,
        body: &'a str,
    ) -> Cow<'a, str> {
        self.format_at(key, body, Utc::now())
    }

    /// Unknown keys leave `body` untouched.
    pub fn format_at<'a>(
        &self,
        key: &str,
        body: &'a str,
        now: DateTime<Utc>,
    ) -> Cow<'a, str> {
        match self.get(key) {
            Some(pattern) => {
                let stamp = now.format(TIMESTAMP_FORMAT).to_string();
                Cow::Owned(render(pattern, &[body, &stamp]))
            }
            None => Cow::Borrowed(body),
        }
    }
}

/// Substitutes `{n}` slots; `{{` and `}}` are literal braces. Slots without
/// an argument are copied through as written.
fn render(
    pattern: &str,
    args: &[&str],
) -> String {
    let mut out = String::with_capacity(pattern.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut rest = pattern;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('{') {
            if let Some(end) = tail.find('}') {
                if let Ok(slot) = tail[1..end].parse::<usize>() {
                    if let Some(arg) = args.get(slot) {
                        out.push_str(arg);
                        rest = &tail[end + 1..];
                        continue;
                    }
                }
            }
        }
        out.push_str(&tail[..1]);
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}
