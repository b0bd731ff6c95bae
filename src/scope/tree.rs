//! In-memory element tree
//!
//! A minimal arena of elements with tag, classes and id, enough to describe
//! page structure without a browser.

use super::ScopeNode;
use crate::models::ScopeId;

#[derive(Clone, Debug)]
struct TreeNode {
    parent: Option<usize>,
    tag: String,
    classes: Vec<String>,
    id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ScopeTree {
    nodes: Vec<TreeNode>,
}

/// Index of the document node
const ROOT: usize = 0;

impl ScopeTree {
    /// A tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![TreeNode {
                parent: None,
                tag: "#document".to_string(),
                classes: Vec::new(),
                id: None,
            }],
        }
    }

    pub fn root(&self) -> usize {
        ROOT
    }

    /// Append an element under `parent` and return its index
    pub fn append(&mut self, parent: usize, tag: &str, classes: &[&str], id: Option<&str>) -> usize {
        self.push(Some(parent), tag, classes, id)
    }

    /// Create an element that is not attached to the document
    pub fn detached(&mut self, tag: &str, classes: &[&str], id: Option<&str>) -> usize {
        self.push(None, tag, classes, id)
    }

    fn push(&mut self, parent: Option<usize>, tag: &str, classes: &[&str], id: Option<&str>) -> usize {
        self.nodes.push(TreeNode {
            parent,
            tag: tag.to_ascii_uppercase(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            id: id.map(str::to_string),
        });
        self.nodes.len() - 1
    }

    pub fn node(&self, index: usize) -> NodeRef<'_> {
        NodeRef { tree: self, index }
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed handle to one element of a `ScopeTree`
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    tree: &'a ScopeTree,
    index: usize,
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl<'a> NodeRef<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    fn data(&self) -> &'a TreeNode {
        &self.tree.nodes[self.index]
    }
}

impl ScopeNode for NodeRef<'_> {
    fn parent(&self) -> Option<Self> {
        // the document node is not an element
        self.data()
            .parent
            .filter(|parent| *parent != ROOT)
            .map(|index| NodeRef { tree: self.tree, index })
    }

    fn is_attached(&self) -> bool {
        let mut index = self.index;
        while let Some(parent) = self.tree.nodes[index].parent {
            index = parent;
        }
        index == ROOT
    }

    fn tag_name(&self) -> String {
        self.data().tag.clone()
    }

    fn has_class(&self, class: &str) -> bool {
        self.data().classes.iter().any(|c| c == class)
    }

    fn scope_id(&self) -> Option<ScopeId> {
        self.data().id.as_deref().map(ScopeId::from)
    }
}
