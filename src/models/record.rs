//! Publication and author records produced by the record parser.

use serde::Serialize;
use std::collections::BTreeSet;

/// Placeholder for a field that is absent or could not be parsed
pub const NOT_AVAILABLE: &str = "N/A";

/// PubMed identifier as returned by the search endpoint
pub type Pmid = String;

/// One author of a publication, with the classification of their affiliations.
///
/// Built once while parsing a record and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRecord {
    name: String,
    affiliations: Vec<String>,
    is_non_academic: bool,
    company_names: BTreeSet<String>,
}

impl AuthorRecord {
    pub fn new(
        name: impl Into<String>,
        affiliations: Vec<String>,
        is_non_academic: bool,
        company_names: BTreeSet<String>,
    ) -> Self {
        Self {
            name: name.into(),
            affiliations,
            is_non_academic,
            company_names,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw affiliation strings in document order
    pub fn affiliations(&self) -> &[String] {
        &self.affiliations
    }

    /// Whether any affiliation was classified as non-academic
    pub fn is_non_academic(&self) -> bool {
        self.is_non_academic
    }

    /// Organization names extracted from the non-academic affiliations
    pub fn company_names(&self) -> &BTreeSet<String> {
        &self.company_names
    }
}

/// A parsed PubMed record.
///
/// The derived fields (`non_academic_authors`, `company_affiliations`) are
/// computed once in [`PublicationRecord::new`] and frozen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicationRecord {
    id: Pmid,
    title: String,
    publication_date: String,
    authors: Vec<AuthorRecord>,
    corresponding_email: Option<String>,
    non_academic_authors: Vec<String>,
    company_affiliations: BTreeSet<String>,
}

impl PublicationRecord {
    pub fn new(
        id: impl Into<Pmid>,
        title: impl Into<String>,
        publication_date: impl Into<String>,
        authors: Vec<AuthorRecord>,
        corresponding_email: Option<String>,
    ) -> Self {
        let non_academic_authors = authors
            .iter()
            .filter(|author| author.is_non_academic())
            .map(|author| author.name().to_string())
            .collect();

        let company_affiliations = authors
            .iter()
            .flat_map(|author| author.company_names().iter().cloned())
            .collect();

        Self {
            id: id.into(),
            title: title.into(),
            publication_date: publication_date.into(),
            authors,
            corresponding_email,
            non_academic_authors,
            company_affiliations,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// `YYYY-MM-DD`, a bare year, or `N/A`
    pub fn publication_date(&self) -> &str {
        &self.publication_date
    }

    pub fn authors(&self) -> &[AuthorRecord] {
        &self.authors
    }

    pub fn corresponding_email(&self) -> Option<&str> {
        self.corresponding_email.as_deref()
    }

    /// Names of authors with at least one non-academic affiliation, in author order
    pub fn non_academic_authors(&self) -> &[String] {
        &self.non_academic_authors
    }

    pub fn company_affiliations(&self) -> &BTreeSet<String> {
        &self.company_affiliations
    }

    /// The sole filter predicate of the pipeline
    pub fn is_industry_affiliated(&self) -> bool {
        !self.company_affiliations.is_empty()
    }

    /// Every author name, in document order
    pub fn author_names(&self) -> Vec<&str> {
        self.authors.iter().map(AuthorRecord::name).collect()
    }

    /// Every affiliation of every author, in document order
    pub fn all_affiliations(&self) -> Vec<&str> {
        self.authors
            .iter()
            .flat_map(|author| author.affiliations().iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(name: &str, affiliation: &str, company: Option<&str>) -> AuthorRecord {
        AuthorRecord::new(
            name,
            vec![affiliation.to_string()],
            company.is_some(),
            company.map(str::to_string).into_iter().collect(),
        )
    }

    #[test]
    fn test_derived_fields() {
        let record = PublicationRecord::new(
            "123",
            "Title",
            "2021-01-01",
            vec![
                author("Ann Lee", "Genentech, South San Francisco, CA", Some("Genentech")),
                author("Bo Chen", "Stanford University", None),
                author("Cy Diaz", "Genentech Inc.", Some("Genentech Inc.")),
            ],
            None,
        );

        assert_eq!(record.non_academic_authors(), ["Ann Lee", "Cy Diaz"]);
        assert_eq!(record.company_affiliations().len(), 2);
        assert!(record.is_industry_affiliated());
        assert_eq!(record.author_names(), vec!["Ann Lee", "Bo Chen", "Cy Diaz"]);
        assert_eq!(record.all_affiliations()[1], "Stanford University");
    }

    #[test]
    fn test_non_academic_author_without_company_is_not_industry() {
        let unnamed = AuthorRecord::new("Dee Fox", vec![], true, BTreeSet::new());
        let record = PublicationRecord::new("1", "T", "N/A", vec![unnamed], None);

        assert_eq!(record.non_academic_authors(), ["Dee Fox"]);
        assert!(!record.is_industry_affiliated());
    }
}
