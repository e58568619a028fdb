//! In-memory mirror of the rendered navigation.
//!
//! Nodes and containers are created once when the tree is built. Afterwards
//! only two flags change: `visible` on nodes (owned by the filter engine) and
//! `expanded` on containers (owned by the accordion synchronizer).

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::MalformedNodeError;
use crate::reference::fragment_href;
use crate::reference::item_href;
use crate::reference::normalize_href;
use crate::reference::slugify;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum NodeKind {
    Primary,
    /// Nested detail entry; a visible subordinate forces its parent visible.
    Subordinate { parent: NodeId },
}

#[derive(Clone, Debug)]
pub struct NavNode {
    id: NodeId,
    name: String,
    qualities_text: String,
    href: Option<String>,
    group: GroupId,
    kind: NodeKind,
    visible: bool,
}

impl NavNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qualities joined the way the page renders its `data-qualities`
    /// attribute.
    pub fn qualities_text(&self) -> &str {
        &self.qualities_text
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn is_subordinate(&self) -> bool {
        matches!(self.kind, NodeKind::Subordinate { .. })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn reference_path(&self) -> Result<String, MalformedNodeError> {
        let path = self.href.as_deref().map(normalize_href).unwrap_or_default();
        if path.is_empty() {
            return Err(MalformedNodeError {
                name: self.name.clone(),
            });
        }
        Ok(path)
    }
}

#[derive(Clone, Debug)]
pub struct GroupContainer {
    id: GroupId,
    label: String,
    slug: String,
    nodes: Vec<NodeId>,
    expanded: bool,
}

impl GroupContainer {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Every node in the container, subordinates included, in render order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Accessibility mirror of the expansion flag.
    pub fn aria_expanded(&self) -> &'static str {
        if self.expanded { "true" } else { "false" }
    }
}

#[derive(Clone, Debug, Default)]
pub struct NavTree {
    nodes: Vec<NavNode>,
    groups: Vec<GroupContainer>,
}

impl NavTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the tree the page renders for `catalog`: one container per
    /// group, one primary node per item and one subordinate node per shadow.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut tree = Self::new();
        for group in &catalog.groups {
            let group_id = tree.push_group(&group.name, &group.slug);
            for item in &group.items {
                let item_id = tree.push_item(
                    group_id,
                    &item.name,
                    item.qualities.clone(),
                    Some(item_href(&group.slug, &item.slug)),
                );
                for shadow in &item.extended.shadows {
                    let href = fragment_href(&group.slug, &item.slug, &slugify(&shadow.name));
                    tree.push_subordinate(
                        item_id,
                        &shadow.name,
                        shadow.qualities.clone(),
                        Some(href),
                    );
                }
            }
        }
        tree
    }

    pub fn push_group(&mut self, label: &str, slug: &str) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(GroupContainer {
            id,
            label: label.to_string(),
            slug: slug.to_string(),
            nodes: Vec::new(),
            expanded: false,
        });
        id
    }

    /// Adds a top-level entry at the end of `group`.
    ///
    /// # Panics
    ///
    /// Panics if `group` was issued by a different tree.
    pub fn push_item(
        &mut self,
        group: GroupId,
        name: &str,
        qualities: Vec<String>,
        href: Option<String>,
    ) -> NodeId {
        self.push_node(group, name, qualities, href, NodeKind::Primary)
    }

    /// Adds a nested entry under `parent`, in the parent's container.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was issued by a different tree.
    pub fn push_subordinate(
        &mut self,
        parent: NodeId,
        name: &str,
        qualities: Vec<String>,
        href: Option<String>,
    ) -> NodeId {
        let group = self.nodes[parent.0].group;
        self.push_node(
            group,
            name,
            qualities,
            href,
            NodeKind::Subordinate { parent },
        )
    }

    fn push_node(
        &mut self,
        group: GroupId,
        name: &str,
        qualities: Vec<String>,
        href: Option<String>,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NavNode {
            id,
            name: name.to_string(),
            qualities_text: qualities.join(", "),
            href,
            group,
            kind,
            visible: true,
        });
        self.groups[group.0].nodes.push(id);
        id
    }

    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    /// # Panics
    ///
    /// Panics if `id` was issued by a different tree.
    pub fn node(&self, id: NodeId) -> &NavNode {
        &self.nodes[id.0]
    }

    pub fn groups(&self) -> &[GroupContainer] {
        &self.groups
    }

    /// # Panics
    ///
    /// Panics if `id` was issued by a different tree.
    pub fn group(&self, id: GroupId) -> &GroupContainer {
        &self.groups[id.0]
    }

    pub fn visible_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.visible)
            .map(|node| node.id)
            .collect()
    }

    pub fn group_has_visible(&self, id: GroupId) -> bool {
        self.groups[id.0]
            .nodes
            .iter()
            .any(|node| self.nodes[node.0].visible)
    }

    pub(crate) fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }

    pub(crate) fn set_all_visible(&mut self, visible: bool) {
        for node in &mut self.nodes {
            node.visible = visible;
        }
    }

    pub(crate) fn set_expanded(&mut self, id: GroupId, expanded: bool) {
        self.groups[id.0].expanded = expanded;
    }
}
