//! The candidate tree: an arena of [`Node`]s linked by index.
//!
//! Per the design notes this is an arena rather than an owned-children tree:
//! a `Vec<Node>` indexed by [`NodeId`], with parent links stored as indices.
//! The dotted `id` string remains the human-readable path and is computed
//! once, at append time, from the parent's path and sibling count.

use serde::{Deserialize, Serialize};

/// Index of a [`Node`] within a [`Tree`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// A candidate conversion and its execution outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Depth from the root; root is `0`.
    pub iteration: u32,
    /// Dotted path, e.g. `"0.1.0"`. Root is `"0"`.
    pub id: String,
    /// The candidate translated source, fences stripped.
    pub code: String,
    /// Tests used to evaluate this node.
    pub tests: Vec<String>,
    /// Accumulated pass/fail feedback from the sandbox.
    pub feedback: String,
    /// Natural-language critique of a failed candidate. Empty iff `score == 1.0`.
    pub self_reflection: String,
    /// Outcome score in `[0, 1]`.
    pub score: f64,
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Children in creation order.
    pub children: Vec<NodeId>,
}

impl Node {
    fn root(code: String, tests: Vec<String>) -> Self {
        Self {
            iteration: 0,
            id: "0".to_string(),
            code,
            tests,
            feedback: String::new(),
            self_reflection: String::new(),
            score: 0.0,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn is_passing(&self) -> bool {
        self.score >= 1.0
    }
}

/// Arena owning every node created during one conversion.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Insert the root node. Must be called at most once, before any `append_child`.
    pub fn insert_root(&mut self, code: String, tests: Vec<String>) -> NodeId {
        debug_assert!(self.nodes.is_empty(), "root already inserted");
        self.nodes.push(Node::root(code, tests));
        NodeId(0)
    }

    /// Append a new child of `parent`, assigning `iteration` and `id` per the
    /// dotted-path rule: `"<parent.id>.<k>"` where `k` is the parent's child
    /// count at the moment of insertion.
    pub fn append_child(
        &mut self,
        parent: NodeId,
        code: String,
        tests: Vec<String>,
        feedback: String,
        self_reflection: String,
        score: f64,
    ) -> NodeId {
        let parent_iteration = self[parent].iteration;
        let parent_id = self[parent].id.clone();
        let index_in_parent = self[parent].children.len();

        let child = Node {
            iteration: parent_iteration + 1,
            id: format!("{parent_id}.{index_in_parent}"),
            code,
            tests,
            feedback,
            self_reflection,
            score,
            parent: Some(parent),
            children: Vec::new(),
        };
        let child_id = NodeId(self.nodes.len());
        self.nodes.push(child);
        self[parent].children.push(child_id);
        child_id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}

impl std::ops::Index<NodeId> for Tree {
    type Output = Node;
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl std::ops::IndexMut<NodeId> for Tree {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_expected_shape() {
        let mut tree = Tree::new();
        let root = tree.insert_root("code".to_string(), vec!["t".to_string()]);
        assert_eq!(root, NodeId(0));
        assert_eq!(tree[root].id, "0");
        assert_eq!(tree[root].iteration, 0);
        assert!(tree[root].parent.is_none());
    }

    #[test]
    fn children_get_dotted_ids_in_creation_order() {
        let mut tree = Tree::new();
        let root = tree.insert_root("code".to_string(), vec![]);
        let c0 = tree.append_child(root, "a".into(), vec![], String::new(), String::new(), 0.0);
        let c1 = tree.append_child(root, "b".into(), vec![], String::new(), String::new(), 0.0);

        assert_eq!(tree[c0].id, "0.0");
        assert_eq!(tree[c1].id, "0.1");
        assert_eq!(tree[c0].iteration, 1);
        assert_eq!(tree[root].children, vec![c0, c1]);
    }

    #[test]
    fn grandchild_id_extends_parent_path() {
        let mut tree = Tree::new();
        let root = tree.insert_root("code".into(), vec![]);
        let child = tree.append_child(root, "a".into(), vec![], String::new(), String::new(), 0.0);
        let grandchild =
            tree.append_child(child, "b".into(), vec![], String::new(), String::new(), 0.0);

        assert_eq!(tree[grandchild].id, "0.0.0");
        assert_eq!(tree[grandchild].iteration, 2);
    }

    #[test]
    fn len_counts_every_inserted_node() {
        let mut tree = Tree::new();
        let root = tree.insert_root("code".into(), vec![]);
        tree.append_child(root, "a".into(), vec![], String::new(), String::new(), 0.0);
        tree.append_child(root, "b".into(), vec![], String::new(), String::new(), 0.0);
        assert_eq!(tree.len(), 3);
    }
}
