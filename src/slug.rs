//! Slug derivation for blog posts.

use regex::Regex;

lazy_static::lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHEN_RUN: Regex = Regex::new(r"-{2,}").unwrap();
}

/// Derive a URL-safe slug from a post title.
///
/// Lowercases, strips characters outside word/space/hyphen, collapses
/// whitespace runs and repeated hyphens to single hyphens, and trims edge
/// hyphens. Deterministic; no uniqueness handling happens here.
pub fn derive(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUN.replace_all(stripped.trim(), "-");
    let collapsed = HYPHEN_RUN.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_basic() {
        assert_eq!(derive("Preventive healthcare"), "preventive-healthcare");
    }

    #[test]
    fn test_derive_strips_punctuation() {
        assert_eq!(derive("Eye Care!! 2024"), "eye-care-2024");
    }

    #[test]
    fn test_derive_collapses_whitespace_runs() {
        assert_eq!(derive("Child   health    tips"), "child-health-tips");
    }

    #[test]
    fn test_derive_collapses_repeated_hyphens() {
        assert_eq!(derive("eye -- care"), "eye-care");
    }

    #[test]
    fn test_derive_trims_edge_hyphens() {
        assert_eq!(derive("--hello world--"), "hello-world");
        assert_eq!(derive("!!wellness!!"), "wellness");
    }

    #[test]
    fn test_derive_keeps_underscores() {
        assert_eq!(derive("hero_title update"), "hero_title-update");
    }

    #[test]
    fn test_derive_is_deterministic() {
        assert_eq!(derive("Eye Care!! 2024"), derive("Eye Care!! 2024"));
    }

    #[test]
    fn test_derive_all_symbols_yields_empty() {
        assert_eq!(derive("!!!???"), "");
    }
}
