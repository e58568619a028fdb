mod score;

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::config::MatcherOptions;
use crate::config::SearchKey;
use crate::error::MatchError;
use crate::proto::CatalogRecord;
use score::FieldScorer;

/// Produces the set of reference paths matching a query.
///
/// Implementations must be deterministic for a fixed query and record set.
/// Callers never submit an empty query.
pub trait RecordMatcher {
    fn search(&mut self, query: &str) -> Result<MatchSet, MatchError>;

    fn record_count(&self) -> usize;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchHit {
    pub path: String,
    pub name: String,
    pub score: f64,
}

/// Ranked hits plus a path set for membership checks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchSet {
    hits: Vec<MatchHit>,
    paths: HashSet<String>,
}

impl MatchSet {
    pub fn from_hits(hits: Vec<MatchHit>) -> Self {
        let paths = hits.iter().map(|hit| hit.path.clone()).collect();
        Self { hits, paths }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Best hit first.
    pub fn hits(&self) -> &[MatchHit] {
        &self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

struct IndexedRecord {
    path: String,
    name: String,
    fields: Vec<String>,
}

/// Typo-tolerant matcher over the loaded catalog records.
pub struct FuzzyMatcher {
    records: Vec<IndexedRecord>,
    options: MatcherOptions,
}

impl FuzzyMatcher {
    pub fn new(records: Vec<CatalogRecord>, options: MatcherOptions) -> Self {
        let total = records.len();
        let records: Vec<IndexedRecord> = records
            .into_iter()
            .filter_map(|record| index_record(record, &options.keys))
            .collect();
        if records.len() < total {
            warn!(
                "skipped {} of {total} index records without a name or reference path",
                total - records.len()
            );
        }
        Self { records, options }
    }
}

impl RecordMatcher for FuzzyMatcher {
    fn search(&mut self, query: &str) -> Result<MatchSet, MatchError> {
        let len = query.chars().count();
        if len > self.options.max_pattern_len {
            return Err(MatchError::PatternTooLong {
                len,
                max: self.options.max_pattern_len,
            });
        }

        let mut scorer = FieldScorer::new(query, self.options.threshold, self.options.distance);
        let mut scored: Vec<(f64, usize)> = Vec::new();
        for (idx, record) in self.records.iter().enumerate() {
            let best = record
                .fields
                .iter()
                .filter_map(|field| scorer.score(field))
                .reduce(f64::min);
            if let Some(score) = best {
                scored.push((score, idx));
            }
        }
        scored.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });

        let hits = scored
            .into_iter()
            .map(|(score, idx)| MatchHit {
                path: self.records[idx].path.clone(),
                name: self.records[idx].name.clone(),
                score,
            })
            .collect::<Vec<_>>();
        debug!("fuzzy search for '{query}' matched {} records", hits.len());
        Ok(MatchSet::from_hits(hits))
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }
}

fn index_record(record: CatalogRecord, keys: &[SearchKey]) -> Option<IndexedRecord> {
    if !record.is_valid() {
        return None;
    }
    let path = record.reference_path()?;
    let mut fields = Vec::new();
    for key in keys {
        match key {
            SearchKey::Name => fields.push(record.name.clone()),
            SearchKey::Qualities => fields.extend(record.qualities.iter().cloned()),
            SearchKey::Group => fields.push(record.group.clone()),
        }
    }
    Some(IndexedRecord {
        path,
        name: record.name,
        fields,
    })
}
