//! Per-field scoring for the approximate matcher.
//!
//! Scores live in `[0, 1]`: 0 is an exact match at the start of the field,
//! and anything above the configured threshold is not a match. Errors are
//! weighted by query length and the match position by `distance`.

use nucleo_matcher::Matcher;
use nucleo_matcher::Utf32Str;
use nucleo_matcher::pattern::AtomKind;
use nucleo_matcher::pattern::CaseMatching;
use nucleo_matcher::pattern::Normalization;
use nucleo_matcher::pattern::Pattern;

pub(crate) struct FieldScorer {
    pattern: Pattern,
    query: Vec<char>,
    threshold: f64,
    distance: f64,
    matcher: Matcher,
    utf32buf: Vec<char>,
    indices: Vec<u32>,
}

impl FieldScorer {
    pub(crate) fn new(query: &str, threshold: f64, distance: usize) -> Self {
        Self {
            pattern: create_pattern(query),
            query: query.chars().flat_map(char::to_lowercase).collect(),
            threshold,
            distance: distance.max(1) as f64,
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
            utf32buf: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Score of `field`, or `None` when it scores above the threshold.
    pub(crate) fn score(&mut self, field: &str) -> Option<f64> {
        if field.is_empty() || self.query.is_empty() {
            return None;
        }
        let approximate = self.approximate_score(field);
        let score = match self.exact_score(field) {
            Some(exact) => exact.min(approximate),
            None => approximate,
        };
        (score <= self.threshold).then_some(score)
    }

    fn exact_score(&mut self, field: &str) -> Option<f64> {
        let haystack: Utf32Str<'_> = Utf32Str::new(field, &mut self.utf32buf);
        self.indices.clear();
        self.pattern
            .indices(haystack, &mut self.matcher, &mut self.indices)?;
        let start = self.indices.iter().min().copied().unwrap_or(0);
        Some(self.proximity(start as usize))
    }

    fn approximate_score(&self, field: &str) -> f64 {
        let text: Vec<char> = field.chars().flat_map(char::to_lowercase).collect();
        let (errors, start) = best_substring_alignment(&self.query, &text, self.distance);
        alignment_cost(errors, start, self.query.len(), self.distance).min(1.0)
    }

    fn proximity(&self, start: usize) -> f64 {
        (start as f64 / self.distance).min(1.0)
    }
}

fn create_pattern(query: &str) -> Pattern {
    Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Substring,
    )
}

/// Error count and start offset of the substring of `text` that aligns with
/// `pattern` at the lowest combined cost `errors / len + start / distance`.
/// Equal costs prefer fewer errors, then the earliest start.
pub(crate) fn best_substring_alignment(
    pattern: &[char],
    text: &[char],
    distance: f64,
) -> (usize, usize) {
    if pattern.is_empty() {
        return (0, 0);
    }
    // Each cell holds (errors, start offset of the aligned substring).
    let mut prev: Vec<(usize, usize)> = (0..=text.len()).map(|j| (0, j)).collect();
    let mut row: Vec<(usize, usize)> = vec![(0, 0); text.len() + 1];
    for (i, pc) in pattern.iter().enumerate() {
        row[0] = (i + 1, 0);
        for (j, tc) in text.iter().enumerate() {
            let (diag_err, diag_start) = prev[j];
            let substitution = (diag_err + usize::from(pc != tc), diag_start);
            let deletion = (prev[j + 1].0 + 1, prev[j + 1].1);
            let insertion = (row[j].0 + 1, row[j].1);
            row[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut row);
    }
    let len = pattern.len();
    prev.into_iter()
        .min_by(|a, b| {
            alignment_cost(a.0, a.1, len, distance)
                .total_cmp(&alignment_cost(b.0, b.1, len, distance))
                .then_with(|| a.cmp(b))
        })
        .unwrap_or((len, 0))
}

fn alignment_cost(errors: usize, start: usize, len: usize, distance: f64) -> f64 {
    errors as f64 / len as f64 + (start as f64 / distance).min(1.0)
}
