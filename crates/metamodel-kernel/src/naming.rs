//! Member naming conventions.

use regex::Regex;
use std::sync::OnceLock;

fn word_boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([a-z0-9])([A-Z])|([A-Z])([A-Z][a-z])")
            .expect("word-boundary regex must compile")
    })
}

/// `placeOrder` -> `Place Order`, `URLShortener` -> `URL Shortener`.
pub fn natural_name(identifier: &str) -> String {
    let spaced = word_boundary_re().replace_all(identifier, |caps: &regex::Captures<'_>| {
        match (caps.get(1), caps.get(2)) {
            (Some(before), Some(after)) => format!("{} {}", before.as_str(), after.as_str()),
            _ => format!("{} {}", &caps[3], &caps[4]),
        }
    });
    capitalize(spaced.replace('_', " ").trim())
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn decapitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strips `prefix` from a method name when what follows starts a new word.
///
/// `getFirstName` with `get` -> `Some("FirstName")`; `getaway` -> `None`.
pub fn strip_prefix<'a>(method_name: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = method_name.strip_prefix(prefix)?;
    rest.chars()
        .next()
        .filter(|first| first.is_uppercase() || first.is_ascii_digit())
        .map(|_| rest)
}

/// Member name of a property or collection accessor: `getFirstName` -> `firstName`.
pub fn accessor_member_name(method_name: &str) -> String {
    ["get", "is"]
        .iter()
        .find_map(|prefix| strip_prefix(method_name, prefix))
        .map(decapitalize)
        .unwrap_or_else(|| method_name.to_string())
}

/// Member name a mixin contributes: `dom.Customer_placeOrder` -> `placeOrder`.
pub fn mixin_member_name(class_name: &str) -> String {
    let simple = class_name.rsplit('.').next().unwrap_or(class_name);
    let simple = simple.rsplit('$').next().unwrap_or(simple);
    match simple.rsplit_once('_') {
        Some((_, member)) if !member.is_empty() => decapitalize(member),
        _ => decapitalize(simple),
    }
}
