//! In-memory arena document.
//!
//! A small DOM good enough to host a chat widget: elements, text, attributes,
//! form values, geometry, computed style, and a handful of declarative page
//! behaviors standing in for the widget's own scripts.

use std::collections::BTreeMap;

use super::{BoundingBox, ComputedStyle, Document, KeyEvent, NodeId};
use crate::result::{ProbeError, ProbeResult};

/// Page behavior attached to a node. Events bubble from their target to the
/// root and trigger the listeners of every node on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listener {
    /// Plain Enter keydown empties the event target, as a chat input does
    /// once it has sent the message
    ClearOnEnter,
    /// Click flips the panel's `aria-hidden` between `"true"` and `"false"`
    ToggleHidden {
        /// Panel whose state is flipped
        panel: NodeId,
    },
    /// Click anywhere outside the panel and the exempt nodes hides the panel
    DismissOnOutsideClick {
        /// Panel to hide
        panel: NodeId,
        /// Nodes whose clicks do not count as outside (usually the launcher)
        exempt: Vec<NodeId>,
    },
}

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    /// Dirty value of a form control; `None` until written
    value: Option<String>,
    rect: BoundingBox,
    style: ComputedStyle,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Arena-backed [`Document`]
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    body: Option<NodeId>,
    listeners: Vec<(NodeId, Listener)>,
    key_log: Vec<(NodeId, KeyEvent)>,
    viewport_width: f32,
    location_path: String,
    embedded: bool,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// A document holding only its root node
    #[must_use]
    pub fn empty() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            body: None,
            listeners: Vec::new(),
            key_log: Vec::new(),
            viewport_width: 1280.0,
            location_path: "/".to_string(),
            embedded: false,
        }
    }

    /// A document with an empty `<body>`
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self::empty();
        let root = doc.root();
        doc.push(root, NodeKind::Element(Element::new("body")));
        doc
    }

    /// Set the viewport width
    #[must_use]
    pub const fn with_viewport_width(mut self, width: f32) -> Self {
        self.viewport_width = width;
        self
    }

    /// Set the location path
    #[must_use]
    pub fn with_location_path(mut self, path: impl Into<String>) -> Self {
        self.location_path = path.into();
        self
    }

    /// Mark the document as embedded in another browsing context
    #[must_use]
    pub const fn with_embedded(mut self, embedded: bool) -> Self {
        self.embedded = embedded;
        self
    }

    /// The document root
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, text included
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Key events dispatched so far, in order
    #[must_use]
    pub fn key_events(&self) -> &[(NodeId, KeyEvent)] {
        &self.key_log
    }

    /// Append an element under `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> ProbeResult<NodeId> {
        self.check(parent)?;
        let element = Element::new(&tag.to_ascii_lowercase());
        Ok(self.push(parent, NodeKind::Element(element)))
    }

    /// Append a text node under `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> ProbeResult<NodeId> {
        self.check(parent)?;
        Ok(self.push(parent, NodeKind::Text(text.to_string())))
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> ProbeResult<()> {
        let element = self.element_mut(node)?;
        element
            .attrs
            .insert(name.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    /// Remove an attribute from an element
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> ProbeResult<()> {
        self.element_mut(node)?.attrs.remove(&name.to_ascii_lowercase());
        Ok(())
    }

    /// Set the element's bounding rectangle
    pub fn set_bounding_box(&mut self, node: NodeId, rect: BoundingBox) -> ProbeResult<()> {
        self.element_mut(node)?.rect = rect;
        Ok(())
    }

    /// Set the element's computed style
    pub fn set_style(&mut self, node: NodeId, style: ComputedStyle) -> ProbeResult<()> {
        self.element_mut(node)?.style = style;
        Ok(())
    }

    /// Attach a page behavior to `node`
    pub fn add_listener(&mut self, node: NodeId, listener: Listener) -> ProbeResult<()> {
        self.check(node)?;
        self.listeners.push((node, listener));
        Ok(())
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let is_body = matches!(&kind, NodeKind::Element(e) if e.tag == "body");
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.0].children.push(id);
        if is_body && self.body.is_none() {
            self.body = Some(id);
        }
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn check(&self, id: NodeId) -> ProbeResult<()> {
        self.node(id)
            .map(|_| ())
            .ok_or(ProbeError::UnknownNode { index: id.0 })
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> ProbeResult<&mut Element> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(element)) => Ok(element),
            _ => Err(ProbeError::UnknownNode { index: id.0 }),
        }
    }

    /// `node` followed by its ancestors up to the root
    fn event_path(&self, node: NodeId, bubbles: bool) -> Vec<NodeId> {
        let mut path = vec![node];
        if bubbles {
            let mut current = self.parent_of(node);
            while let Some(id) = current {
                path.push(id);
                current = self.parent_of(id);
            }
        }
        path
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn listeners_on(&self, path: &[NodeId]) -> Vec<Listener> {
        path.iter()
            .flat_map(|&id| {
                self.listeners
                    .iter()
                    .filter(move |(owner, _)| *owner == id)
                    .map(|(_, listener)| listener.clone())
            })
            .collect()
    }

    fn set_hidden(&mut self, panel: NodeId, hidden: bool) {
        if let Ok(element) = self.element_mut(panel) {
            element
                .attrs
                .insert("aria-hidden".to_string(), hidden.to_string());
        }
    }

    fn is_form_control(element: &Element) -> bool {
        element.tag == "input" || element.tag == "textarea"
    }
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            value: None,
            rect: BoundingBox::default(),
            style: ComputedStyle::default(),
        }
    }
}

impl Document for MemoryDocument {
    fn body(&self) -> NodeId {
        self.body.unwrap_or_else(|| self.root())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let root = self.root();
        self.descendants(root)
            .into_iter()
            .find(|&node| self.attribute(node, "id").as_deref() == Some(id))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
            .filter(|&parent| self.element(parent).is_some())
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(start) = self.node(node) else {
            return out;
        };
        let mut stack: Vec<NodeId> = start.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(current) = self.node(id) else {
                continue;
            };
            if matches!(current.kind, NodeKind::Element(_)) {
                out.push(id);
                stack.extend(current.children.iter().rev().copied());
            }
        }
        out
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.element(node)
            .map(|e| e.tag.clone())
            .unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)?
            .attrs
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(current) = self.node(id) else {
                continue;
            };
            match &current.kind {
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Element(_) | NodeKind::Document => {
                    stack.extend(current.children.iter().rev().copied());
                }
            }
        }
        out
    }

    fn bounding_box(&self, node: NodeId) -> BoundingBox {
        self.element(node).map(|e| e.rect).unwrap_or_default()
    }

    fn computed_style(&self, node: NodeId) -> ComputedStyle {
        self.element(node)
            .map(|e| e.style.clone())
            .unwrap_or_default()
    }

    fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    fn location_path(&self) -> String {
        self.location_path.clone()
    }

    fn is_embedded(&self) -> bool {
        self.embedded
    }

    fn editable_content(&self, node: NodeId) -> String {
        let Some(element) = self.element(node) else {
            return String::new();
        };
        match (element.tag.as_str(), &element.value) {
            (_, Some(value)) => value.clone(),
            ("input", None) => element.attrs.get("value").cloned().unwrap_or_default(),
            _ => self.text_content(node),
        }
    }

    fn set_editable_content(&mut self, node: NodeId, value: &str) {
        let Some(element) = self.element(node) else {
            return;
        };
        if Self::is_form_control(element) {
            if let Ok(element) = self.element_mut(node) {
                element.value = Some(value.to_string());
            }
            return;
        }
        // Content-editable: the text becomes the only child. A lone text child
        // is rewritten in place; replaced children stay in the arena detached.
        if let [only] = self.nodes[node.0].children[..] {
            if let NodeKind::Text(text) = &mut self.nodes[only.0].kind {
                value.clone_into(text);
                return;
            }
        }
        let text = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(node),
            children: Vec::new(),
            kind: NodeKind::Text(value.to_string()),
        });
        self.nodes[node.0].children = vec![text];
    }

    fn dispatch_key(&mut self, node: NodeId, event: &KeyEvent) {
        if self.check(node).is_err() {
            return;
        }
        self.key_log.push((node, event.clone()));
        let path = self.event_path(node, event.bubbles);
        for listener in self.listeners_on(&path) {
            if listener == Listener::ClearOnEnter
                && event.kind == "keydown"
                && event.key == "Enter"
                && !event.shift
            {
                self.set_editable_content(node, "");
            }
        }
    }

    fn click(&mut self, node: NodeId) {
        if self.check(node).is_err() {
            return;
        }
        let path = self.event_path(node, true);
        for listener in self.listeners_on(&path) {
            match listener {
                Listener::ToggleHidden { panel } => {
                    let open = self.attribute(panel, "aria-hidden").as_deref() == Some("false");
                    self.set_hidden(panel, open);
                }
                Listener::DismissOnOutsideClick { panel, exempt } => {
                    let inside = self.contains(panel, node)
                        || exempt.iter().any(|&e| self.contains(e, node));
                    if !inside {
                        self.set_hidden(panel, true);
                    }
                }
                Listener::ClearOnEnter => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launcher_page() -> (MemoryDocument, NodeId, NodeId) {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let button = doc.append_element(body, "button").unwrap();
        let panel = doc.append_element(body, "div").unwrap();
        doc.set_attribute(panel, "aria-hidden", "true").unwrap();
        doc.add_listener(button, Listener::ToggleHidden { panel }).unwrap();
        doc.add_listener(
            doc.root(),
            Listener::DismissOnOutsideClick {
                panel,
                exempt: vec![button],
            },
        )
        .unwrap();
        (doc, button, panel)
    }

    #[test]
    fn test_new_has_body() {
        let doc = MemoryDocument::new();
        assert_eq!(doc.tag_name(doc.body()), "body");
        assert_eq!(doc.parent(doc.body()), None);
    }

    #[test]
    fn test_descendants_document_order() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let a = doc.append_element(body, "div").unwrap();
        let a1 = doc.append_element(a, "span").unwrap();
        let b = doc.append_element(body, "p").unwrap();
        doc.append_text(a1, "hi").unwrap();
        assert_eq!(doc.descendants(body), vec![a, a1, b]);
    }

    #[test]
    fn test_text_content_concatenates() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let div = doc.append_element(body, "div").unwrap();
        doc.append_text(div, "Widget\n").unwrap();
        let strong = doc.append_element(div, "strong").unwrap();
        doc.append_text(strong, "$19.99").unwrap();
        assert_eq!(doc.text_content(div), "Widget\n$19.99");
    }

    #[test]
    fn test_append_to_unknown_parent_fails() {
        let mut doc = MemoryDocument::new();
        let err = doc.append_element(NodeId(99), "div").unwrap_err();
        assert!(matches!(err, ProbeError::UnknownNode { index: 99 }));
    }

    #[test]
    fn test_input_value_round_trip() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let input = doc.append_element(body, "input").unwrap();
        doc.set_attribute(input, "value", "draft").unwrap();
        assert_eq!(doc.editable_content(input), "draft");
        doc.set_editable_content(input, "");
        assert_eq!(doc.editable_content(input), "");
        assert_eq!(doc.attribute(input, "value").as_deref(), Some("draft"));
    }

    #[test]
    fn test_content_editable_replaces_children() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let div = doc.append_element(body, "div").unwrap();
        doc.set_attribute(div, "contenteditable", "true").unwrap();
        let span = doc.append_element(div, "span").unwrap();
        doc.append_text(span, "old").unwrap();
        doc.set_editable_content(div, "new");
        assert_eq!(doc.editable_content(div), "new");
        assert!(doc.descendants(div).is_empty());
    }

    #[test]
    fn test_content_editable_rewrites_reuse_text_node() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let div = doc.append_element(body, "div").unwrap();
        doc.set_attribute(div, "contenteditable", "true").unwrap();
        doc.append_text(div, "draft").unwrap();
        let before = doc.node_count();
        for value in ["QA test", "", "draft"] {
            doc.set_editable_content(div, value);
            assert_eq!(doc.editable_content(div), value);
        }
        assert_eq!(doc.node_count(), before);
    }

    #[test]
    fn test_clear_on_enter_bubbles_from_input() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let form = doc.append_element(body, "form").unwrap();
        let input = doc.append_element(form, "textarea").unwrap();
        doc.add_listener(form, Listener::ClearOnEnter).unwrap();
        doc.set_editable_content(input, "hello");

        doc.dispatch_key(input, &KeyEvent::key_down("Enter").with_shift());
        assert_eq!(doc.editable_content(input), "hello");

        doc.dispatch_key(input, &KeyEvent::key_down("Enter"));
        assert_eq!(doc.editable_content(input), "");
        assert_eq!(doc.key_events().len(), 2);
    }

    #[test]
    fn test_toggle_and_dismiss() {
        let (mut doc, button, panel) = launcher_page();
        doc.click(button);
        assert_eq!(doc.attribute(panel, "aria-hidden").as_deref(), Some("false"));

        doc.click(panel);
        assert_eq!(doc.attribute(panel, "aria-hidden").as_deref(), Some("false"));

        let body = doc.body();
        doc.click(body);
        assert_eq!(doc.attribute(panel, "aria-hidden").as_deref(), Some("true"));
    }

    #[test]
    fn test_element_by_id() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let div = doc.append_element(body, "div").unwrap();
        doc.set_attribute(div, "id", "chatbox").unwrap();
        assert_eq!(doc.element_by_id("chatbox"), Some(div));
        assert_eq!(doc.element_by_id("missing"), None);
    }

    #[test]
    fn test_has_class() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let button = doc.append_element(body, "button").unwrap();
        doc.set_attribute(button, "class", "btn floating-chatbot__btn")
            .unwrap();
        assert!(doc.has_class(button, "floating-chatbot__btn"));
        assert!(!doc.has_class(button, "floating"));
    }
}
