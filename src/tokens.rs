//! Token usage as reported by the provider.
//!
//! Each counter is optional: a provider that omits a field is recorded as
//! `None`, which is distinct from a reported zero.

use serde::Deserialize;

/// Usage counters from one response envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TokenUsage {
    #[serde(default, rename = "prompt_tokens")]
    pub prompt: Option<u64>,
    #[serde(default, rename = "completion_tokens")]
    pub completion: Option<u64>,
    #[serde(default, rename = "total_tokens")]
    pub total: Option<u64>,
}

impl TokenUsage {
    /// True when the provider reported none of the counters.
    pub fn is_empty(&self) -> bool {
        self.prompt.is_none() && self.completion.is_none() && self.total.is_none()
    }
}

/// Format usage for display. Example: "1,234 prompt · 56 completion · 1,290 total"
///
/// Counters the provider did not report are left out.
pub fn format_token_usage(usage: &TokenUsage) -> String {
    [
        (usage.prompt, "prompt"),
        (usage.completion, "completion"),
        (usage.total, "total"),
    ]
    .iter()
    .filter_map(|(count, label)| count.map(|n| format!("{} {}", format_number(n), label)))
    .collect::<Vec<_>>()
    .join(" · ")
}

pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
