//! Naive Content-Security-Policy parsing
//!
//! Directives are split on `;` and sources on whitespace. Quoted values
//! and nonces are kept as opaque tokens and never interpreted.

use std::collections::BTreeMap;

/// Parse a CSP header into directive name -> sources
///
/// Directive names are lowercased; a repeated directive keeps its first
/// occurrence, as browsers do.
pub fn parse_csp(header: &str) -> BTreeMap<String, Vec<String>> {
    let mut directives = BTreeMap::new();
    for part in header.split(';') {
        let mut tokens = part.split_whitespace();
        let Some(name) = tokens.next() else {
            continue;
        };
        directives
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| tokens.map(str::to_string).collect());
    }
    directives
}

/// Sources governing scripts: `script-src`, else `default-src`
pub fn effective_script_sources(directives: &BTreeMap<String, Vec<String>>) -> Option<&Vec<String>> {
    directives
        .get("script-src")
        .or_else(|| directives.get("default-src"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_header() {
        let parsed = parse_csp("default-src 'self'; img-src 'self' data: ; upgrade-insecure-requests");
        assert_eq!(parsed["default-src"], vec!["'self'"]);
        assert_eq!(parsed["img-src"], vec!["'self'", "data:"]);
        assert!(parsed["upgrade-insecure-requests"].is_empty());
    }

    #[test]
    fn test_parse_keeps_first_duplicate_and_lowercases() {
        let parsed = parse_csp("Script-Src 'self'; script-src *");
        assert_eq!(parsed["script-src"], vec!["'self'"]);
    }

    #[test]
    fn test_quoted_values_are_not_interpreted() {
        // A semicolon inside a quoted token still splits the directive
        let parsed = parse_csp("script-src 'nonce-a;b' 'self'");
        assert_eq!(parsed["script-src"], vec!["'nonce-a"]);
        assert!(parsed.contains_key("b'"));
    }

    #[test]
    fn test_effective_script_sources() {
        let parsed = parse_csp("default-src 'self' 'unsafe-inline'");
        assert_eq!(
            effective_script_sources(&parsed).unwrap(),
            &vec!["'self'".to_string(), "'unsafe-inline'".to_string()]
        );
        assert!(effective_script_sources(&BTreeMap::new()).is_none());
    }
}
