//! Filter engine: recomputes node visibility for a query.
//!
//! Every pass starts from a fully visible tree, so nothing from an earlier
//! query can leave a node stuck visible or hidden.

use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::accordion;
use crate::matcher::MatchHit;
use crate::matcher::MatchSet;
use crate::tree::NavNode;
use crate::tree::NavTree;
use crate::tree::NodeId;
use crate::tree::NodeKind;
use crate::widget::IndexState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Empty query: everything visible, every container collapsed.
    Reset,
    IndexMatched,
    /// Case-insensitive substring match over name and qualities.
    Fallback,
}

/// Why a non-empty query was answered by substring matching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum FallbackReason {
    IndexUnloaded,
    IndexFailed,
    MatchFailed(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilterOutcome {
    pub query: String,
    pub mode: FilterMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
    /// Ranked matcher hits, best first; empty outside index-matched mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<MatchHit>,
    pub visible: usize,
}

impl FilterOutcome {
    pub(crate) fn reset(visible: usize) -> Self {
        Self {
            query: String::new(),
            mode: FilterMode::Reset,
            fallback: None,
            hits: Vec::new(),
            visible,
        }
    }
}

/// Runs one full filter pass followed by the accordion sync.
pub fn apply(tree: &mut NavTree, raw_query: &str, index: &mut IndexState) -> FilterOutcome {
    let query = raw_query.trim();
    tree.set_all_visible(true);

    if query.is_empty() {
        accordion::sync(tree, false);
        return FilterOutcome::reset(tree.nodes().len());
    }

    let (mode, fallback, hits) = match index.matcher_mut() {
        Ok(matcher) => match matcher.search(query) {
            Ok(set) => {
                apply_match_set(tree, &set);
                (FilterMode::IndexMatched, None, set.hits().to_vec())
            }
            Err(err) => {
                warn!("matcher failed for '{query}', using substring fallback: {err}");
                apply_fallback(tree, query);
                (
                    FilterMode::Fallback,
                    Some(FallbackReason::MatchFailed(err.to_string())),
                    Vec::new(),
                )
            }
        },
        Err(reason) => {
            apply_fallback(tree, query);
            (FilterMode::Fallback, Some(reason), Vec::new())
        }
    };

    surface_parents(tree);
    accordion::sync(tree, true);

    let visible = tree.visible_ids().len();
    debug!("filter '{query}' ({mode:?}) left {visible} nodes visible");
    FilterOutcome {
        query: query.to_string(),
        mode,
        fallback,
        hits,
        visible,
    }
}

/// Substring rule used when no index answers the query.
pub fn fallback_matches(node: &NavNode, query: &str) -> bool {
    let needle = query.to_lowercase();
    node.name().to_lowercase().contains(&needle)
        || node.qualities_text().to_lowercase().contains(&needle)
}

fn apply_match_set(tree: &mut NavTree, set: &MatchSet) {
    let decisions: Vec<(NodeId, bool)> = tree
        .nodes()
        .iter()
        .map(|node| {
            let visible = match node.reference_path() {
                Ok(path) => set.contains(&path),
                Err(err) => {
                    debug!("{err}; excluded from index matches");
                    false
                }
            };
            (node.id(), visible)
        })
        .collect();
    for (id, visible) in decisions {
        tree.set_visible(id, visible);
    }
}

fn apply_fallback(tree: &mut NavTree, query: &str) {
    let decisions: Vec<(NodeId, bool)> = tree
        .nodes()
        .iter()
        .map(|node| (node.id(), fallback_matches(node, query)))
        .collect();
    for (id, visible) in decisions {
        tree.set_visible(id, visible);
    }
}

/// A visible subordinate forces every enclosing node visible.
fn surface_parents(tree: &mut NavTree) {
    let mut surfaced = Vec::new();
    for node in tree.nodes().iter().filter(|node| node.is_visible()) {
        let mut kind = node.kind();
        while let NodeKind::Subordinate { parent } = kind {
            surfaced.push(parent);
            kind = tree.node(parent).kind();
        }
    }
    for id in surfaced {
        tree.set_visible(id, true);
    }
}
