use serde_json::Value;

/// Function words dropped from derived keyword queries.
const STOP_WORDS: &[&str] = &[
    "de", "het", "een", "en", "van", "in", "op", "te", "met", "voor", "is", "zijn", "of", "aan",
    "bij", "door", "naar", "om", "als", "dat", "die", "er", "niet", "ook", "nog", "the", "and",
    "for", "with", "per",
];

/// Domain vocabulary keyed by a substring of the field name.
const DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "adl",
        &["adl", "katz", "wassen", "aankleden", "toiletgang", "mobiliteit"],
    ),
    (
        "nacht",
        &["nacht", "nachtelijk", "onrust", "dwalen", "toezicht", "slapen"],
    ),
    ("toezicht", &["toezicht", "nacht", "dwalen", "valrisico"]),
    (
        "gedrag",
        &["gedrag", "agressie", "onrust", "npi", "cmai", "bpsd"],
    ),
    (
        "bpsd",
        &["bpsd", "npi", "cmai", "agitatie", "onrust", "apathie"],
    ),
    (
        "communicatie",
        &["communicatie", "spraak", "begrip", "afasie", "gehoor"],
    ),
    (
        "mobiliteit",
        &["mobiliteit", "lopen", "rolstoel", "transfer", "val", "rollator"],
    ),
    (
        "psych",
        &["psychisch", "angst", "depressie", "somber", "stemming"],
    ),
    (
        "sociaal",
        &["sociaal", "contact", "eenzaam", "activiteiten", "dagbesteding"],
    ),
    (
        "zelfstandig",
        &["zelfstandig", "regie", "beslissen", "plannen"],
    ),
    (
        "medisch",
        &["medisch", "diagnose", "arts", "medicatie", "behandeling"],
    ),
    (
        "cognit",
        &["cognitie", "geheugen", "mmse", "dementie", "orientatie"],
    ),
];

/// Lowercased alphanumeric tokens longer than one character.
pub fn tokenize(raw: &str) -> Vec<String> {
    raw.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() > 1)
        .map(|token| token.to_lowercase())
        .collect()
}

/// Build the keyword query for a form field and its current value.
///
/// Field tokens come first, then value tokens, then the domain vocabulary of every
/// table entry whose key occurs in the field name. Duplicates keep their first position.
pub fn derive_keywords(field: &str, value: Option<&Value>) -> Vec<String> {
    let field_lower = field.to_lowercase();
    let mut keywords = tokenize(&field_lower);

    match value {
        Some(Value::String(text)) => keywords.extend(tokenize(text)),
        Some(Value::Number(number)) => keywords.push(number.to_string()),
        _ => {}
    }

    for (key, vocabulary) in DOMAIN_KEYWORDS {
        if field_lower.contains(key) {
            keywords.extend(vocabulary.iter().map(|word| word.to_string()));
        }
    }

    let mut seen = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        if keyword.chars().count() <= 1 || STOP_WORDS.contains(&keyword.as_str()) {
            continue;
        }
        if !seen.contains(&keyword) {
            seen.push(keyword);
        }
    }
    seen
}
