//! Keeps group expansion coherent with node visibility.
//!
//! Only touches the `expanded` flag (and its aria mirror); visibility
//! belongs to the filter engine.

use crate::tree::GroupId;
use crate::tree::NavTree;

/// Expands each container with at least one visible node while a query is
/// active; collapses everything else.
pub fn sync(tree: &mut NavTree, query_active: bool) {
    let decisions: Vec<(GroupId, bool)> = tree
        .groups()
        .iter()
        .map(|group| {
            let expanded = query_active && tree.group_has_visible(group.id());
            (group.id(), expanded)
        })
        .collect();
    for (id, expanded) in decisions {
        tree.set_expanded(id, expanded);
    }
}
