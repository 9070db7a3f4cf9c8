//! The inspected document.
//!
//! Batteries never own the page they inspect. They see it through the
//! [`Document`] trait: element queries, attribute and text reads, geometry and
//! computed style. The only writes are the editable-content swap and key
//! dispatch of the Enter probe and the launcher battery's clicks.

#[cfg(feature = "html")]
pub mod html;
mod memory;

pub use memory::{Listener, MemoryDocument};

/// Opaque handle to a node in the inspected document.
///
/// Identity is the handle itself: two handles are the same node iff they are
/// equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Arena index of the node
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Element bounding rectangle in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Left offset
    pub x: f32,
    /// Top offset
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left offset rounded to one decimal, the key used for column detection
    #[must_use]
    pub fn left_key(&self) -> String {
        format!("{:.1}", self.x)
    }
}

/// The computed-style properties the layout check reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedStyle {
    /// CSS `display`
    pub display: String,
    /// CSS `grid-template-columns`
    pub grid_template_columns: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "block".to_string(),
            grid_template_columns: "none".to_string(),
        }
    }
}

impl ComputedStyle {
    /// Whether the element lays its children out as a grid
    #[must_use]
    pub fn is_grid(&self) -> bool {
        self.display.trim().eq_ignore_ascii_case("grid")
    }
}

/// Synthetic keyboard event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Event type, e.g. `keydown`
    pub kind: String,
    /// Key value, e.g. `Enter`
    pub key: String,
    /// Shift modifier held
    pub shift: bool,
    /// Event bubbles to ancestors
    pub bubbles: bool,
    /// Event can be cancelled
    pub cancelable: bool,
    /// Event crosses shadow boundaries
    pub composed: bool,
}

impl KeyEvent {
    /// Create a bubbling, cancelable, composed `keydown`
    #[must_use]
    pub fn key_down(key: impl Into<String>) -> Self {
        Self {
            kind: "keydown".to_string(),
            key: key.into(),
            shift: false,
            bubbles: true,
            cancelable: true,
            composed: true,
        }
    }

    /// Hold shift
    #[must_use]
    pub const fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Read access to the inspected page plus the few interactions the
/// batteries simulate.
///
/// Reads on a handle the document does not know return empty values rather
/// than failing; the page is untrusted and may change under the harness.
pub trait Document {
    /// The `<body>` element, or the document root when there is none
    fn body(&self) -> NodeId;

    /// Element whose `id` attribute equals `id`
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Parent element, `None` at the root
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Descendant elements in document order, excluding `node`
    fn descendants(&self, node: NodeId) -> Vec<NodeId>;

    /// Lower-case tag name, empty for non-elements
    fn tag_name(&self, node: NodeId) -> String;

    /// Attribute value, if present
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Concatenated text of the node and its descendants
    fn text_content(&self, node: NodeId) -> String;

    /// Bounding rectangle
    fn bounding_box(&self, node: NodeId) -> BoundingBox;

    /// Computed style
    fn computed_style(&self, node: NodeId) -> ComputedStyle;

    /// Viewport width in CSS pixels
    fn viewport_width(&self) -> f32;

    /// Path component of the current location
    fn location_path(&self) -> String;

    /// Whether the document is rendered inside another browsing context
    fn is_embedded(&self) -> bool;

    /// Editable content: the value of form controls, the text of
    /// content-editable elements
    fn editable_content(&self, node: NodeId) -> String;

    /// Replace the editable content
    fn set_editable_content(&mut self, node: NodeId, value: &str);

    /// Dispatch a keyboard event at `node`
    fn dispatch_key(&mut self, node: NodeId, event: &KeyEvent);

    /// Primary-button click on `node`
    fn click(&mut self, node: NodeId);

    /// Whether `node` is an element with the given tag
    fn has_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag_name(node).eq_ignore_ascii_case(tag)
    }

    /// Whether the `class` attribute lists `class`
    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|value| value.split_whitespace().any(|c| c == class))
    }

    /// Descendants of `node` with the given tag, in document order
    fn descendants_by_tag(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|&n| self.has_tag(n, tag))
            .collect()
    }

    /// Every element in the document, in document order, starting at body
    fn all_elements(&self) -> Vec<NodeId> {
        let body = self.body();
        let mut nodes = vec![body];
        nodes.extend(self.descendants(body));
        nodes
    }
}
