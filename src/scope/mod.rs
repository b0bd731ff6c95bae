//! Scope resolution
//!
//! Maps an element to the form instance that encloses it, so a change in
//! one address block never touches another block on the same page.
//! The walk is written once against `ScopeNode`; the DOM implements it for
//! `web_sys::Element` and `ScopeTree` implements it in memory.

pub mod tree;

pub use tree::{NodeRef, ScopeTree};

use crate::config::BoundaryMarkers;
use crate::models::ScopeId;

/// A node that can be walked towards the document root
pub trait ScopeNode: Clone {
    /// Parent element, `None` at the top of the chain
    fn parent(&self) -> Option<Self>;

    /// Whether the node is attached to the document
    fn is_attached(&self) -> bool;

    /// Upper-case tag name (`FORM`, `DIV`, ...)
    fn tag_name(&self) -> String;

    fn has_class(&self, class: &str) -> bool;

    /// Identifier of this node when it acts as a boundary
    fn scope_id(&self) -> Option<ScopeId>;

    fn is_boundary(&self, markers: &BoundaryMarkers) -> bool {
        markers.matches(&self.tag_name(), |class| self.has_class(class))
    }
}

/// Result of a successful resolution
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedScope<N> {
    /// The nearest boundary at or above the element
    Boundary(N),
    /// No boundary encloses the element: the whole page is its scope
    Page,
}

impl<N: ScopeNode> ResolvedScope<N> {
    /// The scope id to use for lookups in the page model
    pub fn id(&self) -> Option<ScopeId> {
        match self {
            ResolvedScope::Boundary(node) => node.scope_id(),
            ResolvedScope::Page => Some(ScopeId::page()),
        }
    }
}

/// Find the form instance boundary enclosing `node` (the node itself
/// counts). Returns `None` when the node is not attached to the document.
pub fn resolve_scope<N: ScopeNode>(node: &N, markers: &BoundaryMarkers) -> Option<ResolvedScope<N>> {
    if !node.is_attached() {
        return None;
    }

    let mut current = node.clone();
    loop {
        if current.is_boundary(markers) {
            return Some(ResolvedScope::Boundary(current));
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return Some(ResolvedScope::Page),
        }
    }
}

/// Resolve straight to a scope id, as every handler needs
pub fn resolve_scope_id<N: ScopeNode>(node: &N, markers: &BoundaryMarkers) -> Option<ScopeId> {
    resolve_scope(node, markers).and_then(|scope| scope.id())
}
