//! Fixed keyword lists used for affiliation classification.
//!
//! Matching is by lower-case substring. The generic legal suffixes at the end
//! of the industry list ("inc", "co", ...) are broad and match many
//! non-pharma corporations.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Pharmaceutical, biotech and generic corporate keywords
pub static INDUSTRY_TERMS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "pharma",
        "biotech",
        "therapeutics",
        "bioscience",
        "biopharm",
        "laboratories",
        "biopharma",
        "pharmaceutical",
        "biotechnology",
        "pfizer",
        "novartis",
        "roche",
        "merck",
        "johnson & johnson",
        "j&j",
        "astrazeneca",
        "glaxosmithkline",
        "gsk",
        "sanofi",
        "abbvie",
        "gilead",
        "amgen",
        "biogen",
        "regeneron",
        "moderna",
        "biontech",
        "vertex",
        "alexion",
        "genentech",
        "boehringer",
        "takeda",
        "bayer",
        "bristol myers squibb",
        "eli lilly",
        "novo nordisk",
        "inc",
        "corp",
        "ltd",
        "llc",
        "co",
        "company",
        "corporation",
    ])
});

/// Academic institution keywords; any match makes an affiliation academic
pub static ACADEMIC_TERMS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "university",
        "college",
        "school",
        "institute of technology",
        "polytechnic",
        "academy",
        "faculty",
        "department of",
        "hospital",
        "medical center",
        "clinic",
        "foundation",
        "research institute",
        "national institute",
        "laboratory of",
        "center for",
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_counts() {
        assert_eq!(INDUSTRY_TERMS.len(), 42);
        assert_eq!(ACADEMIC_TERMS.len(), 16);
    }

    #[test]
    fn test_terms_are_lowercase() {
        for term in INDUSTRY_TERMS.iter().chain(ACADEMIC_TERMS.iter()) {
            assert_eq!(*term, term.to_lowercase());
        }
    }
}
