/// Key and name canonicalization shared by ingestion and spec lookup
use once_cell::sync::Lazy;
use regex::Regex;

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid acronym regex"));
static WORD_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid boundary regex"));

/// Convert a camelCase/PascalCase/kebab key to snake_case.
///
/// Keys that are already snake_case come back unchanged, so the function is
/// safe to apply to every key regardless of which convention the server used.
pub fn to_snake_case(key: &str) -> String {
    let step = ACRONYM_BOUNDARY.replace_all(key, "${1}_${2}");
    let step = WORD_BOUNDARY.replace_all(&step, "${1}_${2}");
    step.replace(['-', ' '], "_").to_lowercase()
}

/// Convert a snake_case key to lowerCamelCase
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Fold a spec name, alias or entity type for comparison.
///
/// Case, spaces, `-` and `_` are ignored: `"Engine-Actions"`, `"engine actions"`
/// and `"ENGINE_ACTIONS"` all fold to `"engineactions"`.
pub fn fold_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Turn a snake_case or camelCase key into a human heading ("placeholder_property" -> "Placeholder Property")
pub fn humanize(key: &str) -> String {
    to_snake_case(key)
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
