//! Deterministic checks for the candidate tree's structural invariants.
//!
//! Pure and I/O-free, callable from tests (and, if a caller wants a paranoid
//! mode, from the search controller after a conversion completes).

use crate::core::node::{NodeId, Tree};

/// Validate every invariant that can be checked on a completed tree.
///
/// Returns a list of human-readable violations; empty means the tree is
/// consistent.
pub fn validate_invariants(tree: &Tree, root: NodeId, max_children: u32) -> Vec<String> {
    let mut errors = Vec::new();
    walk(tree, root, 0, &mut errors, max_children);
    errors
}

fn walk(tree: &Tree, id: NodeId, expected_iteration: u32, errors: &mut Vec<String>, max_children: u32) {
    let node = tree.get(id);

    if node.iteration != expected_iteration {
        errors.push(format!(
            "node {} has iteration {} but depth in tree is {}",
            node.id, node.iteration, expected_iteration
        ));
    }

    if (node.children.len() as u32) > max_children {
        errors.push(format!(
            "node {} has {} children, exceeding max_children {}",
            node.id,
            node.children.len(),
            max_children
        ));
    }

    if node.score >= 1.0 && !node.self_reflection.is_empty() {
        errors.push(format!(
            "node {} has score 1.0 but a non-empty self_reflection",
            node.id
        ));
    }

    for (index, &child_id) in node.children.iter().enumerate() {
        let child = tree.get(child_id);
        let expected_id = format!("{}.{}", node.id, index);
        if child.id != expected_id {
            errors.push(format!(
                "child at position {} of {} has id {} but expected {}",
                index, node.id, child.id, expected_id
            ));
        }
        if child.parent != Some(id) {
            errors.push(format!("node {} does not point back to parent {}", child.id, node.id));
        }
        walk(tree, child_id, expected_iteration + 1, errors, max_children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_tree() {
        let mut tree = Tree::new();
        let root = tree.insert_root("code".into(), vec![]);
        tree.append_child(root, "a".into(), vec![], String::new(), String::new(), 0.5);
        tree.append_child(root, "b".into(), vec![], String::new(), "why".into(), 0.5);

        assert!(validate_invariants(&tree, root, 5).is_empty());
    }

    #[test]
    fn rejects_children_over_the_bound() {
        let mut tree = Tree::new();
        let root = tree.insert_root("code".into(), vec![]);
        tree.append_child(root, "a".into(), vec![], String::new(), String::new(), 0.0);
        tree.append_child(root, "b".into(), vec![], String::new(), String::new(), 0.0);

        let errors = validate_invariants(&tree, root, 1);
        assert!(errors.iter().any(|e| e.contains("exceeding max_children")));
    }

    #[test]
    fn rejects_passing_node_with_reflection() {
        let mut tree = Tree::new();
        let root = tree.insert_root("code".into(), vec![]);
        tree.get_mut(root).score = 1.0;
        tree.get_mut(root).self_reflection = "should be empty".into();

        let errors = validate_invariants(&tree, root, 5);
        assert!(errors.iter().any(|e| e.contains("non-empty self_reflection")));
    }
}
