//! The search widget: one navigation tree, one query box, one index slot.
//!
//! Input is accepted from construction onwards. The index may arrive later,
//! or never; every input re-checks [`IndexState`] so the first keystroke
//! after arrival is answered by the matcher.

use tracing::error;
use tracing::info;
use tracing::warn;

use crate::config::MatcherOptions;
use crate::error::IndexLoadError;
use crate::filter;
use crate::filter::FallbackReason;
use crate::filter::FilterOutcome;
use crate::matcher::FuzzyMatcher;
use crate::matcher::RecordMatcher;
use crate::proto::SearchIndex;
use crate::render;
use crate::render::NavProjection;
use crate::tree::NavTree;

/// Availability of the approximate matcher.
pub enum IndexState {
    /// The load has not finished yet.
    Unloaded,
    Ready(Box<dyn RecordMatcher>),
    /// The load failed; the message is kept for diagnostics only.
    Failed(String),
}

impl IndexState {
    pub fn ready(matcher: impl RecordMatcher + 'static) -> Self {
        Self::Ready(Box::new(matcher))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn matcher_mut(&mut self) -> Result<&mut dyn RecordMatcher, FallbackReason> {
        match self {
            Self::Ready(matcher) => Ok(matcher.as_mut()),
            Self::Unloaded => Err(FallbackReason::IndexUnloaded),
            Self::Failed(_) => Err(FallbackReason::IndexFailed),
        }
    }
}

impl std::fmt::Debug for IndexState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unloaded => f.write_str("Unloaded"),
            Self::Ready(matcher) => write!(f, "Ready({} records)", matcher.record_count()),
            Self::Failed(message) => f.debug_tuple("Failed").field(message).finish(),
        }
    }
}

#[derive(Debug)]
pub struct SearchWidget {
    tree: NavTree,
    index: IndexState,
    options: MatcherOptions,
    last: FilterOutcome,
}

impl SearchWidget {
    pub fn new(tree: NavTree) -> Self {
        Self::with_options(tree, MatcherOptions::default())
    }

    pub fn with_options(mut tree: NavTree, options: MatcherOptions) -> Self {
        let mut index = IndexState::Unloaded;
        let last = filter::apply(&mut tree, "", &mut index);
        Self {
            tree,
            index,
            options,
            last,
        }
    }

    /// Handles one input event with the field's current raw value.
    pub fn input(&mut self, raw: &str) -> &FilterOutcome {
        self.last = filter::apply(&mut self.tree, raw, &mut self.index);
        &self.last
    }

    /// Accepts the single result of the index load. Later results are
    /// ignored.
    pub fn index_loaded(&mut self, result: Result<SearchIndex, IndexLoadError>) {
        if !matches!(self.index, IndexState::Unloaded) {
            warn!("index load already settled; ignoring repeated result");
            return;
        }
        self.index = match result {
            Ok(index) => {
                let matcher = FuzzyMatcher::new(index.items, self.options.clone());
                info!(
                    "search index ready with {} records",
                    matcher.record_count()
                );
                IndexState::ready(matcher)
            }
            Err(err) => {
                error!("search index unavailable, substring matching stays active: {err}");
                IndexState::Failed(err.to_string())
            }
        };
    }

    /// Re-runs the last query, e.g. right after the index arrived.
    pub fn refresh(&mut self) -> &FilterOutcome {
        let query = self.last.query.clone();
        self.input(&query)
    }

    pub fn index_state(&self) -> &IndexState {
        &self.index
    }

    pub fn tree(&self) -> &NavTree {
        &self.tree
    }

    pub fn last_outcome(&self) -> &FilterOutcome {
        &self.last
    }

    pub fn projection(&self) -> NavProjection {
        render::project(&self.tree, &self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::filter::FilterMode;
    use pretty_assertions::assert_eq;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{
                "groups": [
                    {
                        "name": "Manipulators",
                        "items": [
                            {
                                "name": "Manipulative Maiden",
                                "slug": "maiden",
                                "qualities": ["cunning", "charming"]
                            }
                        ]
                    },
                    {
                        "name": "Warriors",
                        "items": [
                            {
                                "name": "Steadfast Guardian",
                                "slug": "guardian",
                                "qualities": ["loyal", "brave"]
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    fn widget() -> (SearchWidget, SearchIndex) {
        let catalog = catalog();
        let index = SearchIndex {
            items: catalog.records(),
        };
        (SearchWidget::new(NavTree::from_catalog(&catalog)), index)
    }

    #[test]
    fn starts_unloaded_and_reset() {
        let (widget, _) = widget();
        assert!(matches!(widget.index_state(), IndexState::Unloaded));
        assert_eq!(widget.last_outcome().mode, FilterMode::Reset);
        assert_eq!(widget.last_outcome().visible, 2);
    }

    #[test]
    fn typing_before_index_arrives_uses_fallback_then_upgrades() {
        let (mut widget, index) = widget();

        let outcome = widget.input("manipuletive");
        assert_eq!(outcome.mode, FilterMode::Fallback);
        assert_eq!(outcome.fallback, Some(FallbackReason::IndexUnloaded));
        assert_eq!(outcome.visible, 0);

        widget.index_loaded(Ok(index));
        assert!(widget.index_state().is_ready());

        let outcome = widget.refresh();
        assert_eq!(outcome.mode, FilterMode::IndexMatched);
        assert_eq!(outcome.query, "manipuletive");
        assert_eq!(outcome.visible, 1);
        assert!(widget.tree().groups()[0].is_expanded());
    }

    #[test]
    fn failed_load_keeps_fallback_for_good() {
        let (mut widget, index) = widget();
        widget.index_loaded(Err(IndexLoadError::Status {
            url: "https://example.org/search.json".to_string(),
            status: 404,
        }));
        assert!(matches!(widget.index_state(), IndexState::Failed(_)));

        widget.index_loaded(Ok(index));
        assert!(!widget.index_state().is_ready());

        let outcome = widget.input("brave");
        assert_eq!(outcome.mode, FilterMode::Fallback);
        assert_eq!(outcome.fallback, Some(FallbackReason::IndexFailed));
        assert_eq!(outcome.visible, 1);
    }

    #[test]
    fn empty_index_matches_nothing_but_still_resets() {
        let (mut widget, _) = widget();
        widget.index_loaded(Ok(SearchIndex::default()));

        assert_eq!(widget.input("maid").visible, 0);
        let outcome = widget.input("");
        assert_eq!(outcome.mode, FilterMode::Reset);
        assert_eq!(outcome.visible, 2);
    }

    #[test]
    fn projection_reflects_last_pass() {
        let (mut widget, index) = widget();
        widget.index_loaded(Ok(index));
        widget.input("guard");

        let projection = widget.projection();
        assert_eq!(projection.query, "guard");
        let expanded: Vec<bool> = projection.groups.iter().map(|g| g.expanded).collect();
        assert_eq!(expanded, vec![false, true]);
    }
}
