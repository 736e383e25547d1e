//! PubMed record parser.
//!
//! Turns one `PubmedArticle` element into a [`PublicationRecord`]. Missing or
//! odd sub-fields never fail a record; they degrade to [`NOT_AVAILABLE`].
//! Only structural defects produce a [`ParseFailure`], and those are confined
//! to the record they occur in.

pub mod xml;

use chrono::Month;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use thiserror::Error;

use crate::classifier::{AffiliationClassifier, KeywordClassifier};
use crate::models::{AuthorRecord, PublicationRecord, NOT_AVAILABLE};
pub use xml::{XmlError, XmlNode};

/// Element name of one record inside an efetch `PubmedArticleSet`
pub const RECORD_ELEMENT: &str = "PubmedArticle";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w.+-]+@[\w-]+\.[\w.-]+")
        .unwrap_or_else(|e| panic!("invalid static email regex: {e}"))
});

/// A record that could not be parsed; it is skipped, never retried
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("expected a <PubmedArticle> element, found <{0}>")]
    UnexpectedElement(String),

    #[error("malformed markup in record {pmid}: {detail}")]
    Malformed { pmid: String, detail: String },
}

/// Find the first email-like token in a string
pub fn find_email(text: &str) -> Option<&str> {
    EMAIL_RE.find(text).map(|m| m.as_str())
}

/// Parser for PubMed article elements, generic over the affiliation rules.
#[derive(Debug, Clone, Default)]
pub struct RecordParser<C = KeywordClassifier> {
    classifier: C,
}

impl RecordParser {
    /// Parser using the default keyword classifier
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: AffiliationClassifier> RecordParser<C> {
    /// Parser using custom affiliation rules
    pub fn with_classifier(classifier: C) -> Self {
        Self { classifier }
    }

    /// Decode an efetch document and parse every `PubmedArticle` in it.
    ///
    /// A document that is not well-formed fails as a whole; individual records
    /// fail independently.
    pub fn parse_article_set(
        &self,
        xml: &str,
    ) -> Result<Vec<Result<PublicationRecord, ParseFailure>>, XmlError> {
        let document = XmlNode::parse_document(xml)?;
        Ok(document
            .find_all(RECORD_ELEMENT)
            .map(|article| self.parse_article(article))
            .collect())
    }

    /// Parse one `PubmedArticle` element
    pub fn parse_article(&self, article: &XmlNode) -> Result<PublicationRecord, ParseFailure> {
        if article.name() != RECORD_ELEMENT {
            return Err(ParseFailure::UnexpectedElement(article.name().to_string()));
        }

        let pmid = article
            .find("PMID")
            .and_then(XmlNode::text)
            .unwrap_or(NOT_AVAILABLE)
            .to_string();

        if let Some(defect) = article.first_defect() {
            return Err(ParseFailure::Malformed {
                pmid,
                detail: defect.to_string(),
            });
        }

        tracing::trace!("Processing article with PMID: {}", pmid);

        let title = article
            .find("ArticleTitle")
            .map(XmlNode::full_text)
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let publication_date = parse_publication_date(article.find("PubDate"));

        let mut authors = Vec::new();
        let mut corresponding_email = None;

        if let Some(author_list) = article.find("AuthorList") {
            for element in author_list.children_named("Author") {
                let Some(author) = self.parse_author(element) else {
                    continue;
                };

                if corresponding_email.is_none() {
                    corresponding_email = author
                        .affiliations()
                        .iter()
                        .find_map(|affiliation| find_email(affiliation))
                        .map(str::to_string);
                }

                authors.push(author);
            }
        }

        // Falls back to any text in the record, which can pick up unrelated
        // addresses (journal contacts, notes)
        if corresponding_email.is_none() {
            corresponding_email = article
                .descendants()
                .filter_map(XmlNode::text)
                .filter(|text| text.contains('@'))
                .find_map(find_email)
                .map(str::to_string);
        }

        let record =
            PublicationRecord::new(pmid, title, publication_date, authors, corresponding_email);

        if !record.non_academic_authors().is_empty() {
            tracing::debug!(
                "Found non-academic authors for PMID {}: {}",
                record.id(),
                record.non_academic_authors().join(", ")
            );
        }

        Ok(record)
    }

    /// Authors without a last name (collective names, empty entries) are skipped
    fn parse_author(&self, author: &XmlNode) -> Option<AuthorRecord> {
        let last_name = author.child_text("LastName")?;

        let name = match author
            .child_text("ForeName")
            .or_else(|| author.child_text("Initials"))
        {
            Some(given) => format!("{} {}", given, last_name),
            None => last_name.to_string(),
        };

        let mut affiliations: Vec<String> = author
            .find_all("AffiliationInfo")
            .filter_map(|info| info.child_text("Affiliation"))
            .map(str::to_string)
            .collect();

        if affiliations.is_empty() {
            if let Some(direct) = author.child_text("Affiliation") {
                affiliations.push(direct.to_string());
            }
        }

        let mut is_non_academic = false;
        let mut company_names = BTreeSet::new();

        for affiliation in &affiliations {
            if self.classifier.is_non_academic(affiliation) {
                is_non_academic = true;
                if let Some(company) = self.classifier.extract_organization_name(affiliation) {
                    company_names.insert(company);
                }
            }
        }

        Some(AuthorRecord::new(
            name,
            affiliations,
            is_non_academic,
            company_names,
        ))
    }
}

/// Build `YYYY-MM-DD` from a `PubDate` element.
///
/// Missing month or day default to `01`. An alphabetic month must be a
/// three-letter English abbreviation. When the month or day cannot be
/// resolved the year alone is returned; without a year the result is `N/A`.
pub fn parse_publication_date(pub_date: Option<&XmlNode>) -> String {
    let Some(pub_date) = pub_date else {
        return NOT_AVAILABLE.to_string();
    };
    let Some(year) = pub_date.child_text("Year") else {
        return NOT_AVAILABLE.to_string();
    };

    let month = match pub_date.child("Month") {
        None => Some(1),
        Some(month) => month.text().and_then(resolve_month),
    };

    let day = match pub_date.child("Day") {
        None => Some(1),
        Some(day) => day.text().and_then(|d| d.parse::<u32>().ok()),
    };

    match (month, day) {
        (Some(month), Some(day)) => format!("{}-{:02}-{:02}", year, month, day),
        _ => year.to_string(),
    }
}

fn resolve_month(raw: &str) -> Option<u32> {
    if raw.chars().all(|c| c.is_ascii_alphabetic()) {
        if raw.len() != 3 {
            return None;
        }
        return raw.parse::<Month>().ok().map(|m| m.number_from_month());
    }
    raw.parse::<u32>().ok()
}
