//! Affiliation classification.
//!
//! Decides whether a free-text affiliation belongs to a company rather than an
//! academic institution, and pulls a candidate organization name out of it.
//! Both steps are plain keyword and pattern heuristics: an affiliation naming
//! both a university and a company counts as academic, and unlisted company
//! names are missed.
//!
//! The [`AffiliationClassifier`] trait is the seam the record parser depends
//! on; [`KeywordClassifier`] is the default implementation.

mod terms;

use regex::Regex;
use std::sync::LazyLock;

pub use terms::{ACADEMIC_TERMS, INDUSTRY_TERMS};

/// Affiliation segments at or above this many characters are never returned
/// by the comma-segment fallback.
const MAX_SEGMENT_CHARS: usize = 50;

fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Capitalized phrase ending in a legal-entity suffix
static LEGAL_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r"([A-Z][A-Za-z0-9\-\s]+(?:Inc\.?|LLC|Ltd\.?|Corp\.?|Corporation|Company|Co\.|GmbH|S\.A\.|B\.V\.|N\.V\.))",
    )
});

/// Capitalized phrase ending in a pharma/biotech domain word
static DOMAIN_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r"([A-Z][A-Za-z0-9\-\s]+(?:Pharma(?:ceuticals)?|Biotech(?:nology)?|Therapeutics|Biosciences?))",
    )
});

/// Classification rules applied to each author affiliation.
pub trait AffiliationClassifier: Send + Sync + std::fmt::Debug {
    /// Whether the affiliation looks like a company rather than an academic institution
    fn is_non_academic(&self, affiliation: &str) -> bool;

    /// Best-effort organization name for a non-academic affiliation
    fn extract_organization_name(&self, affiliation: &str) -> Option<String>;
}

/// Keyword and pattern based classifier backed by the fixed term lists.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl AffiliationClassifier for KeywordClassifier {
    fn is_non_academic(&self, affiliation: &str) -> bool {
        is_non_academic(affiliation)
    }

    fn extract_organization_name(&self, affiliation: &str) -> Option<String> {
        extract_organization_name(affiliation)
    }
}

fn contains_industry_term(lowered: &str) -> bool {
    INDUSTRY_TERMS.iter().any(|term| lowered.contains(term))
}

/// Returns true when the affiliation contains an industry term and no academic term.
///
/// Academic terms take precedence: `"Pfizer Inc. and Harvard University"` is academic.
pub fn is_non_academic(affiliation: &str) -> bool {
    if affiliation.is_empty() {
        return false;
    }

    let lowered = affiliation.to_lowercase();

    if ACADEMIC_TERMS.iter().any(|term| lowered.contains(term)) {
        return false;
    }

    contains_industry_term(&lowered)
}

/// Extract a candidate organization name from an affiliation string.
///
/// Tries the legal-suffix pattern, then the pharma/biotech pattern, against the
/// original-case text. Falls back to the first short comma-separated segment
/// containing an industry term.
pub fn extract_organization_name(affiliation: &str) -> Option<String> {
    if affiliation.is_empty() {
        return None;
    }

    for pattern in [&*LEGAL_SUFFIX_RE, &*DOMAIN_WORD_RE] {
        if let Some(captures) = pattern.captures(affiliation) {
            if let Some(name) = captures.get(1) {
                return Some(name.as_str().trim().to_string());
            }
        }
    }

    affiliation
        .split(',')
        .map(str::trim)
        .find(|segment| {
            segment.chars().count() < MAX_SEGMENT_CHARS
                && contains_industry_term(&segment.to_lowercase())
        })
        .map(str::to_string)
}
