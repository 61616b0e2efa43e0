//! Element tree - the DOM-like structure modals are built from
//!
//! Each modal describes its content as a small tree of elements (buttons,
//! inputs, radio groups, ...). The tree hands out opaque [`ElementId`]
//! handles; nothing outside this module touches the arena directly.
//!
//! Traversal order is pre-order depth-first, which matches document order
//! for the purposes of focus navigation.

use std::fmt;

/// Opaque handle to an element in an [`ElementTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Input flavours that matter for focus and rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Password,
    Url,
    Date,
    Radio,
    Checkbox,
    /// Never focusable, carries form state only
    Hidden,
}

/// What kind of element a node is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Button,
    Input(InputType),
    Select,
    TextArea,
    /// Links are only interactive when they carry an href
    Link { href: Option<String> },
    /// Structural grouping (modal body, fieldset, row)
    Container,
    /// Static text
    Text,
}

impl ElementKind {
    /// Whether this kind is an interactive control by nature
    ///
    /// Generic elements (containers, text) can still become focusable
    /// through an explicit non-negative tab index.
    pub fn is_interactive(&self) -> bool {
        match self {
            ElementKind::Button | ElementKind::Select | ElementKind::TextArea => true,
            ElementKind::Input(InputType::Hidden) => false,
            ElementKind::Input(_) => true,
            ElementKind::Link { href } => href.is_some(),
            ElementKind::Container | ElementKind::Text => false,
        }
    }

    /// Whether the element accepts typed characters
    pub fn accepts_text(&self) -> bool {
        matches!(
            self,
            ElementKind::Input(InputType::Text | InputType::Password | InputType::Url | InputType::Date)
                | ElementKind::TextArea
        )
    }
}

/// A single node in the tree
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Human-readable label (button caption, field label, radio text)
    pub label: String,
    pub disabled: bool,
    /// Hidden elements (and their whole subtree) are not rendered or focusable
    pub hidden: bool,
    /// Explicit tab index, if any
    pub tab_index: Option<i32>,
    /// Current text of an input
    pub value: String,
    /// Shown when `value` is empty
    pub placeholder: String,
    /// Radio and checkbox state
    pub checked: bool,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
}

impl Element {
    fn new(id: ElementId, kind: ElementKind, label: String, parent: Option<ElementId>) -> Self {
        Self {
            id,
            kind,
            label,
            disabled: false,
            hidden: false,
            tab_index: None,
            value: String::new(),
            placeholder: String::new(),
            checked: false,
            parent,
            children: Vec::new(),
        }
    }
}

/// Arena-backed element tree
///
/// Elements are never physically removed; [`ElementTree::remove_children`]
/// detaches them so handles held elsewhere stay valid but unreachable.
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    nodes: Vec<Element>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new detached root element
    pub fn root(&mut self, kind: ElementKind, label: impl Into<String>) -> ElementId {
        self.alloc(kind, label.into(), None)
    }

    /// Append a child under `parent`, returning its handle
    ///
    /// Returns `None` when `parent` does not belong to this tree.
    pub fn append(
        &mut self,
        parent: ElementId,
        kind: ElementKind,
        label: impl Into<String>,
    ) -> Option<ElementId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.alloc(kind, label.into(), Some(parent));
        self.nodes[parent.0 as usize].children.push(id);
        Some(id)
    }

    fn alloc(&mut self, kind: ElementKind, label: String, parent: Option<ElementId>) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(Element::new(id, kind, label, parent));
        id
    }

    pub fn contains(&self, id: ElementId) -> bool {
        (id.0 as usize) < self.nodes.len()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn set_disabled(&mut self, id: ElementId, disabled: bool) {
        if let Some(el) = self.get_mut(id) {
            el.disabled = disabled;
        }
    }

    pub fn set_hidden(&mut self, id: ElementId, hidden: bool) {
        if let Some(el) = self.get_mut(id) {
            el.hidden = hidden;
        }
    }

    pub fn set_tab_index(&mut self, id: ElementId, tab_index: Option<i32>) {
        if let Some(el) = self.get_mut(id) {
            el.tab_index = tab_index;
        }
    }

    pub fn set_label(&mut self, id: ElementId, label: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.label = label.into();
        }
    }

    pub fn set_value(&mut self, id: ElementId, value: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.value = value.into();
        }
    }

    pub fn set_placeholder(&mut self, id: ElementId, placeholder: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.placeholder = placeholder.into();
        }
    }

    pub fn set_checked(&mut self, id: ElementId, checked: bool) {
        if let Some(el) = self.get_mut(id) {
            el.checked = checked;
        }
    }

    /// Text value of an element (empty for unknown handles)
    pub fn value(&self, id: ElementId) -> &str {
        self.get(id).map(|el| el.value.as_str()).unwrap_or("")
    }

    /// Detach all children of `id`
    pub fn remove_children(&mut self, id: ElementId) {
        let Some(el) = self.get_mut(id) else {
            return;
        };
        let children = std::mem::take(&mut el.children);
        for child in children {
            if let Some(c) = self.get_mut(child) {
                c.parent = None;
            }
        }
    }

    /// Whether `id` sits strictly below `ancestor`
    pub fn is_descendant_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut cursor = self.get(id).and_then(|el| el.parent);
        while let Some(parent) = cursor {
            if parent == ancestor {
                return true;
            }
            cursor = self.get(parent).and_then(|el| el.parent);
        }
        false
    }

    /// Pre-order traversal of everything below `container` (container excluded)
    pub fn descendants(&self, container: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let Some(root) = self.get(container) else {
            return out;
        };
        let mut stack: Vec<ElementId> = root.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(el) = self.get(id) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    /// Whether `id` or any of its ancestors up to (and including) `container` is hidden
    pub fn is_hidden_within(&self, id: ElementId, container: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(el) = self.get(current) else {
                return true;
            };
            if el.hidden {
                return true;
            }
            if current == container {
                break;
            }
            cursor = el.parent;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descendants_in_document_order() {
        let mut tree = ElementTree::new();
        let root = tree.root(ElementKind::Container, "modal");
        let row = tree.append(root, ElementKind::Container, "row").unwrap();
        let a = tree.append(row, ElementKind::Button, "a").unwrap();
        let b = tree.append(row, ElementKind::Button, "b").unwrap();
        let c = tree.append(root, ElementKind::Button, "c").unwrap();

        assert_eq!(tree.descendants(root), vec![row, a, b, c]);
        assert_eq!(tree.descendants(row), vec![a, b]);
    }

    #[test]
    fn test_append_to_unknown_parent() {
        let mut tree = ElementTree::new();
        let mut other = ElementTree::new();
        other.root(ElementKind::Container, "x");
        let foreign = other.root(ElementKind::Container, "y");

        assert!(tree.append(foreign, ElementKind::Button, "nope").is_none());
    }

    #[test]
    fn test_remove_children_detaches() {
        let mut tree = ElementTree::new();
        let root = tree.root(ElementKind::Container, "modal");
        let a = tree.append(root, ElementKind::Button, "a").unwrap();

        tree.remove_children(root);

        assert!(tree.descendants(root).is_empty());
        assert!(!tree.is_descendant_of(a, root));
        assert!(tree.get(a).is_some(), "handle stays valid");
    }

    #[test]
    fn test_hidden_ancestor_hides_subtree() {
        let mut tree = ElementTree::new();
        let root = tree.root(ElementKind::Container, "modal");
        let group = tree.append(root, ElementKind::Container, "group").unwrap();
        let field = tree.append(group, ElementKind::Input(InputType::Date), "date").unwrap();

        assert!(!tree.is_hidden_within(field, root));
        tree.set_hidden(group, true);
        assert!(tree.is_hidden_within(field, root));
    }

    #[test]
    fn test_link_needs_href() {
        assert!(!ElementKind::Link { href: None }.is_interactive());
        assert!(ElementKind::Link { href: Some("/docs".into()) }.is_interactive());
        assert!(!ElementKind::Input(InputType::Hidden).is_interactive());
    }
}
