//! Focusable element enumeration
//!
//! Given a container, produce the ordered set of elements that Tab
//! navigation may land on. The set is derived, never stored by the tree:
//! callers re-query whenever modal content changes.

use super::element::{ElementId, ElementTree};

/// Ordered sequence of focusable handles, in traversal order
///
/// Emptiness is a valid state; a trap over an empty set does nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusableSet {
    elements: Vec<ElementId>,
}

impl FocusableSet {
    pub fn new(elements: Vec<ElementId>) -> Self {
        Self { elements }
    }

    pub const fn empty() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn first(&self) -> Option<ElementId> {
        self.elements.first().copied()
    }

    pub fn last(&self) -> Option<ElementId> {
        self.elements.last().copied()
    }

    pub fn get(&self, index: usize) -> Option<ElementId> {
        self.elements.get(index).copied()
    }

    /// Position of `id` in the set
    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|&e| e == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.position(id).is_some()
    }

    pub fn as_slice(&self) -> &[ElementId] {
        &self.elements
    }
}

/// Element enumeration service consumed by the focus trap
pub trait FocusableQuery {
    /// Ordered focusable elements inside `container` (container excluded)
    fn query_focusable(&self, container: ElementId) -> FocusableSet;
}

impl FocusableQuery for ElementTree {
    fn query_focusable(&self, container: ElementId) -> FocusableSet {
        if !self.contains(container) {
            return FocusableSet::empty();
        }

        let elements = self
            .descendants(container)
            .into_iter()
            .filter(|&id| is_focusable(self, id, container))
            .collect();

        FocusableSet::new(elements)
    }
}

/// Focusability rules for a single element
///
/// - disabled elements never qualify
/// - any negative explicit tab index takes the element out of tab order
/// - hidden elements (or elements under a hidden ancestor) never qualify
/// - interactive controls qualify, anything else needs an explicit tab index >= 0
pub fn is_focusable(tree: &ElementTree, id: ElementId, container: ElementId) -> bool {
    let Some(el) = tree.get(id) else {
        return false;
    };

    if el.disabled {
        return false;
    }
    if matches!(el.tab_index, Some(t) if t < 0) {
        return false;
    }
    if tree.is_hidden_within(id, container) {
        return false;
    }

    el.kind.is_interactive() || el.tab_index.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::element::{ElementKind, InputType};

    fn radio_container() -> (ElementTree, ElementId) {
        let mut tree = ElementTree::new();
        let root = tree.root(ElementKind::Container, "date range");
        for label in ["7d", "30d", "90d", "year", "custom"] {
            tree.append(root, ElementKind::Input(InputType::Radio), label)
                .unwrap();
        }
        tree.append(root, ElementKind::Button, "Apply").unwrap();
        tree.append(root, ElementKind::Button, "Cancel").unwrap();
        (tree, root)
    }

    #[test]
    fn test_five_radios_and_two_buttons() {
        let (tree, root) = radio_container();
        assert_eq!(tree.query_focusable(root).len(), 7);
    }

    #[test]
    fn test_excludes_disabled_and_negative_tab_index() {
        let mut tree = ElementTree::new();
        let root = tree.root(ElementKind::Container, "modal");
        let ok = tree.append(root, ElementKind::Button, "ok").unwrap();
        let off = tree.append(root, ElementKind::Button, "off").unwrap();
        let skipped = tree.append(root, ElementKind::Input(InputType::Text), "skip").unwrap();
        let select = tree.append(root, ElementKind::Select, "pick").unwrap();
        tree.set_disabled(off, true);
        tree.set_tab_index(skipped, Some(-1));

        let set = tree.query_focusable(root);
        assert_eq!(set.as_slice(), &[ok, select]);
    }

    #[test]
    fn test_includes_explicit_tab_index_on_generic_elements() {
        let mut tree = ElementTree::new();
        let root = tree.root(ElementKind::Container, "modal");
        let plain = tree.append(root, ElementKind::Text, "plain").unwrap();
        let tabbable = tree.append(root, ElementKind::Container, "card").unwrap();
        let late = tree.append(root, ElementKind::Text, "late").unwrap();
        tree.set_tab_index(tabbable, Some(0));
        tree.set_tab_index(late, Some(3));

        let set = tree.query_focusable(root);
        assert!(!set.contains(plain));
        // Positive indices make an element focusable but do not reorder
        assert_eq!(set.as_slice(), &[tabbable, late]);
    }

    #[test]
    fn test_hidden_subtree_is_skipped_until_revealed() {
        let mut tree = ElementTree::new();
        let root = tree.root(ElementKind::Container, "modal");
        let custom = tree.append(root, ElementKind::Input(InputType::Radio), "custom").unwrap();
        let field = tree.append(root, ElementKind::Input(InputType::Date), "from").unwrap();
        let apply = tree.append(root, ElementKind::Button, "Apply").unwrap();
        tree.set_hidden(field, true);

        assert_eq!(tree.query_focusable(root).as_slice(), &[custom, apply]);

        tree.set_hidden(field, false);
        assert_eq!(tree.query_focusable(root).as_slice(), &[custom, field, apply]);
    }

    #[test]
    fn test_unknown_container_is_empty() {
        let (tree, _) = radio_container();
        let mut bigger = ElementTree::new();
        let mut last = bigger.root(ElementKind::Container, "x");
        for _ in 0..20 {
            last = bigger.append(last, ElementKind::Container, "y").unwrap();
        }
        assert!(tree.query_focusable(last).is_empty());
    }

    #[test]
    fn test_container_not_in_own_set() {
        let mut tree = ElementTree::new();
        let root = tree.root(ElementKind::Button, "weird root");
        tree.set_tab_index(root, Some(0));
        assert!(tree.query_focusable(root).is_empty());
    }
}
