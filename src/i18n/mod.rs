//! Message catalog.
//!
//! Replies are looked up from an embedded JSON catalog (loaded once at
//! startup, never mutated afterwards) and rendered with [`fill`].

use std::sync::OnceLock;

use serde_json::Value;

/// Catalog store, loaded from the embedded JSON.
static CATALOG: OnceLock<Value> = OnceLock::new();

/// Load the embedded catalog. Called once from `main`; a second call is a
/// no-op. Tests may call it freely.
pub fn init() {
    let _ = CATALOG.set(
        serde_json::from_str(include_str!("ja.json")).expect("embedded ja.json must parse"),
    );
}

/// Get text for a key, with nested keys via dot notation, e.g. "wakeup.success".
///
/// Returns the key itself when it cannot be resolved, so a missing entry is
/// visible in chat instead of silently dropping the reply.
pub fn text(key: &str) -> String {
    let Some(catalog) = CATALOG.get() else {
        return key.to_string();
    };

    let mut current = catalog;
    for part in key.split('.') {
        match current.get(part) {
            Some(v) => current = v,
            None => return key.to_string(),
        }
    }
    current.as_str().map(|s| s.to_string()).unwrap_or_else(|| key.to_string())
}

/// Substitute `{name}` placeholders in a single pass.
///
/// A substituted value that itself contains a placeholder token is emitted
/// verbatim and never re-substituted; unknown placeholders are left intact.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match values.iter().find(|(n, _)| *n == name) {
                    Some((_, v)) => out.push_str(v),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                // Unbalanced brace, keep the remainder as-is
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Lookup and fill in one step.
pub fn render(key: &str, values: &[(&str, &str)]) -> String {
    fill(&text(key), values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_nested_keys() {
        init();
        assert!(text("wakeup.success").contains("{userName}"));
        assert!(text("record.status").contains("{streak}"));
    }

    #[test]
    fn missing_key_echoes_key() {
        init();
        assert_eq!(text("no.such.key"), "no.such.key");
    }

    #[test]
    fn fill_substitutes_named_values() {
        let got = fill("OK！{hours}:{minutes}に設定しました", &[("hours", "7"), ("minutes", "05")]);
        assert_eq!(got, "OK！7:05に設定しました");
    }

    #[test]
    fn fill_is_single_pass() {
        // A value containing a placeholder token must not be re-substituted.
        let got = fill("{a} and {b}", &[("a", "{b}"), ("b", "two")]);
        assert_eq!(got, "{b} and two");
    }

    #[test]
    fn fill_leaves_unknown_placeholders() {
        assert_eq!(fill("hi {name}", &[]), "hi {name}");
    }

    #[test]
    fn fill_tolerates_unbalanced_braces() {
        assert_eq!(fill("oops {name", &[("name", "x")]), "oops {name");
    }
}
