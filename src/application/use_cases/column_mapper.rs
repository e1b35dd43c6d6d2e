//! Header to target-field inference
//!
//! Two tiers, first success wins:
//! - exact: the normalized header equals a configured synonym
//! - approximate: normalized Levenshtein similarity (0-100) against every
//!   synonym; a field qualifies when its best score is strictly above the
//!   configured threshold, and the highest qualifying score wins
//!
//! Both tiers walk fields in canonical order, so ties go to the earlier
//! field (DATE, FULL NAME, CONTACT, ADDRESS).

use crate::domain::record::{HeaderAssignment, RawRecord, TargetField};
use crate::domain::synonyms::SynonymDictionary;

/// Default threshold for the approximate tier
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 80.0;

/// How a header was matched
#[derive(Debug, Clone, PartialEq)]
pub enum MatchType {
    Exact,
    Fuzzy,
}

/// Match result with similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMatch {
    pub field: TargetField,
    pub score: f64,
    pub match_type: MatchType,
}

pub struct ColumnMapper {
    dictionary: SynonymDictionary,
    threshold: f64,
}

impl ColumnMapper {
    pub fn new(dictionary: SynonymDictionary, threshold: f64) -> Self {
        Self {
            dictionary,
            threshold,
        }
    }

    /// Target field represented by `header`, if any
    pub fn map_column(&self, header: &str) -> Option<TargetField> {
        self.match_column(header).map(|m| m.field)
    }

    /// Like [`map_column`](Self::map_column) but keeps the score and tier
    pub fn match_column(&self, header: &str) -> Option<ColumnMatch> {
        let normalized = normalize_header(header);
        if normalized.is_empty() {
            return None;
        }

        self.try_exact_match(&normalized)
            .or_else(|| self.try_fuzzy_match(&normalized))
    }

    fn try_exact_match(&self, header: &str) -> Option<ColumnMatch> {
        self.dictionary
            .iter()
            .find(|(_, synonyms)| synonyms.iter().any(|s| s == header))
            .map(|(field, _)| ColumnMatch {
                field,
                score: 100.0,
                match_type: MatchType::Exact,
            })
    }

    fn try_fuzzy_match(&self, header: &str) -> Option<ColumnMatch> {
        let mut best: Option<ColumnMatch> = None;

        for (field, synonyms) in self.dictionary.iter() {
            let score = synonyms
                .iter()
                .map(|s| similarity(header, s))
                .fold(0.0_f64, f64::max);

            if score <= self.threshold {
                continue;
            }

            // Strictly greater keeps the earlier field on ties
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(ColumnMatch {
                    field,
                    score,
                    match_type: MatchType::Fuzzy,
                });
            }
        }

        best
    }

    /// Assign every distinct header of a table. Headers that match nothing
    /// are left out.
    pub fn assign_headers<'a, I>(&self, headers: I) -> HeaderAssignment
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut assignment = HeaderAssignment::new();
        for header in headers {
            if assignment.contains_key(header) {
                continue;
            }
            match self.map_column(header) {
                Some(field) => {
                    assignment.insert(header.to_string(), field);
                }
                None => tracing::debug!(header, "header matched no target field"),
            }
        }
        assignment
    }

    /// Assign headers seen across all rows of a table, in first-seen order
    pub fn assign_table(&self, records: &[RawRecord]) -> HeaderAssignment {
        self.assign_headers(records.iter().flat_map(|r| r.headers()))
    }
}

impl Default for ColumnMapper {
    fn default() -> Self {
        Self::new(SynonymDictionary::default(), DEFAULT_FUZZY_THRESHOLD)
    }
}

/// Lowercase and trim surrounding whitespace
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Normalized edit-distance similarity in [0, 100], 100 = identical.
/// Computed as `100 * (len - distance) / len` over the longer string so
/// that boundary scores such as 80 are exact.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 100.0;
    }
    let distance = strsim::levenshtein(a, b);
    100.0 * (longest - distance) as f64 / longest as f64
}
