//! Read-only projection of the navigation state, for display and for JSON
//! output.

use serde::Serialize;

use crate::filter::FallbackReason;
use crate::filter::FilterMode;
use crate::filter::FilterOutcome;
use crate::matcher::MatchHit;
use crate::theme;
use crate::theme::Theme;
use crate::tree::NavTree;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NavProjection {
    pub theme: Theme,
    pub query: String,
    pub mode: FilterMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
    pub visible: usize,
    /// Index hits, best first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<MatchHit>,
    pub groups: Vec<GroupView>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupView {
    pub label: String,
    pub slug: String,
    pub expanded: bool,
    pub aria_expanded: &'static str,
    pub nodes: Vec<NodeView>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeView {
    pub name: String,
    pub qualities: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub subordinate: bool,
    pub hidden: bool,
}

pub fn project(tree: &NavTree, outcome: &FilterOutcome) -> NavProjection {
    let groups = tree
        .groups()
        .iter()
        .map(|group| GroupView {
            label: group.label().to_string(),
            slug: group.slug().to_string(),
            expanded: group.is_expanded(),
            aria_expanded: group.aria_expanded(),
            nodes: group
                .nodes()
                .iter()
                .map(|id| {
                    let node = tree.node(*id);
                    NodeView {
                        name: node.name().to_string(),
                        qualities: node.qualities_text().to_string(),
                        href: node.href().map(str::to_string),
                        subordinate: node.is_subordinate(),
                        hidden: !node.is_visible(),
                    }
                })
                .collect(),
        })
        .collect();

    NavProjection {
        theme: theme::current(),
        query: outcome.query.clone(),
        mode: outcome.mode,
        fallback: outcome.fallback.clone(),
        visible: outcome.visible,
        hits: outcome.hits.clone(),
        groups,
    }
}

impl NavProjection {
    /// Plain-text rendering of the accordion. Collapsed groups show only
    /// their header; expanded groups list their visible nodes.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for group in &self.groups {
            let marker = if group.expanded { '▾' } else { '▸' };
            let shown = group.nodes.iter().filter(|node| !node.hidden).count();
            out.push_str(&format!("{marker} {} ({shown})\n", group.label));
            if !group.expanded {
                continue;
            }
            for node in group.nodes.iter().filter(|node| !node.hidden) {
                let indent = if node.subordinate { "    " } else { "  " };
                if node.qualities.is_empty() {
                    out.push_str(&format!("{indent}{}\n", node.name));
                } else {
                    out.push_str(&format!("{indent}{} [{}]\n", node.name, node.qualities));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter;
    use crate::widget::IndexState;
    use pretty_assertions::assert_eq;

    fn tree() -> NavTree {
        let mut tree = NavTree::new();
        let manipulators = tree.push_group("Manipulators", "manipulators");
        let maiden = tree.push_item(
            manipulators,
            "Manipulative Maiden",
            vec!["cunning".to_string(), "charming".to_string()],
            Some("/manipulators/maiden/".to_string()),
        );
        tree.push_subordinate(
            maiden,
            "The Seductress",
            Vec::new(),
            Some("/manipulators/maiden/#the-seductress".to_string()),
        );
        let warriors = tree.push_group("Warriors", "warriors");
        tree.push_item(
            warriors,
            "Steadfast Guardian",
            vec!["brave".to_string()],
            Some("/warriors/guardian/".to_string()),
        );
        tree
    }

    #[test]
    fn text_lists_visible_nodes_of_expanded_groups() {
        let mut tree = tree();
        let outcome = filter::apply(&mut tree, "seduct", &mut IndexState::Unloaded);
        let text = project(&tree, &outcome).to_text();
        assert_eq!(
            text,
            "▾ Manipulators (2)\n  Manipulative Maiden [cunning, charming]\n    The Seductress\n▸ Warriors (0)\n"
        );
    }

    #[test]
    fn reset_shows_collapsed_headers() {
        let mut tree = tree();
        let outcome = filter::apply(&mut tree, "", &mut IndexState::Unloaded);
        let projection = project(&tree, &outcome);
        assert_eq!(projection.to_text(), "▸ Manipulators (2)\n▸ Warriors (1)\n");
        assert!(
            projection
                .groups
                .iter()
                .all(|group| group.aria_expanded == "false")
        );
    }

    #[test]
    fn index_hits_are_listed_best_first() {
        use crate::config::MatcherOptions;
        use crate::matcher::FuzzyMatcher;
        use crate::proto::CatalogRecord;

        let record = |name: &str, quality: &str, group: &str, slug: &str| CatalogRecord {
            name: name.to_string(),
            qualities: vec![quality.to_string()],
            group: group.to_string(),
            group_slug: group.to_lowercase(),
            slug: slug.to_string(),
            href: None,
        };
        let mut index = IndexState::ready(FuzzyMatcher::new(
            vec![
                record("Steadfast Guardian", "brave", "Warriors", "guardian"),
                record("Manipulative Maiden", "cunning", "Manipulators", "maiden"),
            ],
            MatcherOptions::default(),
        ));
        let mut tree = tree();
        let outcome = filter::apply(&mut tree, "maiden", &mut index);
        let value = serde_json::to_value(project(&tree, &outcome)).unwrap();

        assert_eq!(value["mode"], "index_matched");
        assert_eq!(value["hits"][0]["path"], "manipulators/maiden");
        assert_eq!(value["hits"][0]["name"], "Manipulative Maiden");
        assert_eq!(value["hits"].as_array().map(Vec::len), Some(1));

        let outcome = filter::apply(&mut tree, "brave", &mut IndexState::Unloaded);
        let value = serde_json::to_value(project(&tree, &outcome)).unwrap();
        assert!(value.get("hits").is_none());
    }

    #[test]
    fn json_marks_hidden_nodes() {
        let mut tree = tree();
        let outcome = filter::apply(&mut tree, "brave", &mut IndexState::Unloaded);
        let value = serde_json::to_value(project(&tree, &outcome)).unwrap();

        assert_eq!(value["mode"], "fallback");
        assert_eq!(value["fallback"]["reason"], "index_unloaded");
        assert_eq!(value["groups"][0]["nodes"][0]["hidden"], true);
        assert_eq!(value["groups"][1]["aria_expanded"], "true");
        assert_eq!(value["groups"][1]["nodes"][0]["href"], "/warriors/guardian/");
    }
}
