use regex::Regex;
use std::sync::OnceLock;

/// Compiles `pattern` once into `cell`. Patterns are literals in this crate.
pub(crate) fn cached_regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("invalid built-in regex"))
}

/// First letter upper, rest lower: `"jANE"` -> `"Jane"`.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Capitalizes every whitespace-separated token and joins them with single spaces.
pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-cases every letter that follows a non-letter: `"new york, usa"` -> `"New York, Usa"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Filesystem-safe form of a candidate name: punctuation dropped, whitespace to `_`, lowercased.
pub fn slugify(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    let slug = kept
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect::<String>()
        .to_lowercase();
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug
    }
}

/// Splits a free-form technology list on commas, semicolons, slashes and the word "and".
pub fn split_tech_stack(raw: &str) -> Vec<String> {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    cached_regex(&SEPARATORS, r"(?i)[,;/]|\sand\s")
        .split(raw)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads years of experience from a direct answer such as `"5 yrs"` or `"7"`.
///
/// An explicit "N years"/"N yrs" wins; otherwise the first bare number is
/// accepted if it lies in `0..=50`. Only meant for answers to a direct
/// question, never for scanning chat text.
pub fn parse_years_experience(text: &str) -> Option<u32> {
    static EXPLICIT: OnceLock<Regex> = OnceLock::new();
    static BARE: OnceLock<Regex> = OnceLock::new();

    if let Some(caps) = cached_regex(&EXPLICIT, r"(?i)(\d+)\s*(?:years?|yrs?)").captures(text) {
        return caps[1].parse().ok();
    }

    cached_regex(&BARE, r"\d+")
        .find(text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|years| *years <= 50)
}
