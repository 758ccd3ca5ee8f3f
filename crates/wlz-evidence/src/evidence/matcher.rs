use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::keywords::tokenize;
use crate::dossier::Measure;

/// Records scoring at or below this value never become evidence.
pub const RELEVANCE_THRESHOLD: f64 = 0.3;

const SNIPPET_LEAD: usize = 50;
const SNIPPET_WINDOW: usize = 200;
const MAX_REASON_KEYWORDS: usize = 3;

/// Measurement families that count as the same clinical domain.
const MEASURE_FAMILIES: &[&[&str]] = &[
    &["adl", "katz", "barthel", "zelfzorg"],
    &["bpsd", "npi", "cmai", "gedrag", "agitatie"],
    &["cognitie", "mmse", "geheugen", "dementie"],
    &["mobiliteit", "val", "tinetti", "balans"],
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,
    pub reason: Option<String>,
}

pub fn is_relevant(score: f64) -> bool {
    score > RELEVANCE_THRESHOLD
}

/// Fraction of keywords found as case-insensitive substrings of `text`.
pub fn match_text<K: AsRef<str>>(text: &str, keywords: &[K]) -> MatchResult {
    if keywords.is_empty() {
        return MatchResult {
            score: 0.0,
            reason: None,
        };
    }

    let haystack = lower_chars(text);
    let matched: Vec<&str> = keywords
        .iter()
        .map(AsRef::as_ref)
        .filter(|keyword| find_chars(&haystack, &lower_chars(keyword)).is_some())
        .collect();

    let score = (matched.len() as f64 / keywords.len() as f64).clamp(0.0, 1.0);
    let reason = if matched.is_empty() {
        None
    } else {
        Some(format!(
            "Trefwoorden gevonden: {}",
            matched
                .iter()
                .take(MAX_REASON_KEYWORDS)
                .copied()
                .collect::<Vec<_>>()
                .join(", ")
        ))
    };

    MatchResult { score, reason }
}

/// Structured bonus for a measure against a form field and its value.
///
/// 1.0 when the instrument name shares a token with the field, 0.9 when both belong to
/// the same measurement family, 0.8 when the value equals the recorded score.
pub fn match_measure(measure: &Measure, field: &str, value: Option<&Value>) -> f64 {
    let type_tokens = tokenize(&measure.measure_type);
    let field_tokens = tokenize(field);
    let field_lower = field.to_lowercase();
    let type_lower = measure.measure_type.to_lowercase();

    let exact = type_tokens.iter().any(|token| field_tokens.contains(token))
        || (!type_lower.is_empty() && field_lower.contains(&type_lower));
    if exact {
        return 1.0;
    }

    let same_family = MEASURE_FAMILIES.iter().any(|family| {
        family.iter().any(|member| field_lower.contains(member))
            && family.iter().any(|member| type_lower.contains(member))
    });
    if same_family {
        return 0.9;
    }

    let literal = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    if literal.is_some_and(|candidate| (candidate - measure.score).abs() < f64::EPSILON) {
        return 0.8;
    }

    0.0
}

/// Window of text around the first keyword (in keyword order) that occurs in `text`.
pub fn extract_snippet<K: AsRef<str>>(text: &str, keywords: &[K]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let haystack = lower_chars(text);
    let hit = keywords
        .iter()
        .find_map(|keyword| find_chars(&haystack, &lower_chars(keyword.as_ref())));

    match hit {
        Some(position) => {
            let start = position.saturating_sub(SNIPPET_LEAD);
            let end = (start + SNIPPET_WINDOW).min(chars.len());
            let mut snippet = String::new();
            if start > 0 {
                snippet.push_str("...");
            }
            snippet.extend(&chars[start..end]);
            if end < chars.len() {
                snippet.push_str("...");
            }
            snippet
        }
        None => {
            let end = SNIPPET_WINDOW.min(chars.len());
            let mut snippet: String = chars[..end].iter().collect();
            if end < chars.len() {
                snippet.push_str("...");
            }
            snippet
        }
    }
}

// One lowercase char per input char so positions line up with the original text.
fn lower_chars(text: &str) -> Vec<char> {
    text.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
