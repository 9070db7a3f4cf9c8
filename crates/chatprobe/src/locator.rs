//! Product card discovery.
//!
//! Chat answers render product results without stable markup. A card is
//! recognised by co-occurrence: a "view product" link, and an "add to cart"
//! button somewhere in the nearest enclosing element.
//!
//! # Algorithm
//!
//! ```text
//!   root (chat container or <body>)
//!    └── …
//!         └── card  <── first ancestor containing an add-to-cart button
//!              ├── <a>View Product</a>   <── walk upward from here
//!              └── <button>Add to Cart</button>
//! ```
//!
//! Two anchors resolving to the same ancestor yield one card. The locator
//! enforces no upper bound; the card count check does.

use std::collections::HashSet;

use crate::dom::{Document, NodeId};
use crate::policy::Policy;
use crate::text::normalize;

/// Root the card search starts from: the chat container, else `<body>`
pub fn card_root<D: Document>(doc: &D, policy: &Policy) -> NodeId {
    doc.element_by_id(&policy.config.chat_container_id)
        .unwrap_or_else(|| doc.body())
}

/// Locate product cards under `root`, unique by node identity, in the order
/// their first view link appears.
pub fn find_product_cards<D: Document>(doc: &D, root: NodeId, policy: &Policy) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut cards = Vec::new();

    for anchor in view_links(doc, root, policy) {
        match enclosing_card(doc, anchor, root, policy) {
            Some(card) => {
                if seen.insert(card) {
                    cards.push(card);
                }
            }
            None => {
                tracing::debug!(anchor = anchor.index(), "view link without add-to-cart ancestor");
            }
        }
    }

    tracing::debug!(count = cards.len(), "product cards located");
    cards
}

/// Anchors under `node` whose text matches the view pattern
pub fn view_links<D: Document>(doc: &D, node: NodeId, policy: &Policy) -> Vec<NodeId> {
    matching(doc, node, "a", |text| policy.view_link.is_match(text))
}

/// Buttons under `node` whose text matches the add pattern
pub fn add_buttons<D: Document>(doc: &D, node: NodeId, policy: &Policy) -> Vec<NodeId> {
    matching(doc, node, "button", |text| policy.add_button.is_match(text))
}

fn matching<D: Document>(
    doc: &D,
    node: NodeId,
    tag: &str,
    accept: impl Fn(&str) -> bool,
) -> Vec<NodeId> {
    doc.descendants_by_tag(node, tag)
        .into_iter()
        .filter(|&n| accept(&normalize(&doc.text_content(n))))
        .collect()
}

/// Walk strictly upward from `anchor`, stopping before `root`
fn enclosing_card<D: Document>(
    doc: &D,
    anchor: NodeId,
    root: NodeId,
    policy: &Policy,
) -> Option<NodeId> {
    let mut current = doc.parent(anchor);
    while let Some(node) = current {
        if node == root {
            return None;
        }
        if !add_buttons(doc, node, policy).is_empty() {
            return Some(node);
        }
        current = doc.parent(node);
    }
    None
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use super::*;
    use crate::dom::html::parse_html;

    fn cards_in(markup: &str) -> (crate::dom::MemoryDocument, Vec<NodeId>) {
        let doc = parse_html(markup).unwrap();
        let policy = Policy::default();
        let root = card_root(&doc, &policy);
        let cards = find_product_cards(&doc, root, &policy);
        (doc, cards)
    }

    #[test]
    fn test_empty_root() {
        let (_, cards) = cards_in(r#"<body><div id="chatbox"></div></body>"#);
        assert!(cards.is_empty());
    }

    #[test]
    fn test_single_card() {
        let (doc, cards) = cards_in(
            r#"<body><div id="chatbox"><div class="card" id="c1">
                <b>Widget</b><a href="/p/1">View Product</a><button>Add to Cart</button>
            </div></div></body>"#,
        );
        assert_eq!(cards, vec![doc.element_by_id("c1").unwrap()]);
    }

    #[test]
    fn test_orphan_anchor_dropped() {
        let (_, cards) = cards_in(
            r#"<body><div id="chatbox"><div><a href="/p/1">View product</a></div></div></body>"#,
        );
        assert!(cards.is_empty());
    }

    #[test]
    fn test_button_outside_root_does_not_count() {
        let (_, cards) = cards_in(
            r#"<body><button>Add to cart</button><div id="chatbox"><a>View product</a></div></body>"#,
        );
        assert!(cards.is_empty());
    }

    #[test]
    fn test_two_anchors_same_card_dedup() {
        let (doc, cards) = cards_in(
            r#"<body><div id="chatbox"><div id="c1">
                <a>View product</a><a>view   PRODUCT details</a><button>Add to cart</button>
            </div></div></body>"#,
        );
        assert_eq!(cards, vec![doc.element_by_id("c1").unwrap()]);
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        let (doc, cards) = cards_in(
            r#"<body><div id="chatbox"><div id="outer"><button>Add to cart</button>
                <div id="inner"><span><a>View product</a></span><button>Add to cart</button></div>
                <div id="bare"><a>View product</a></div>
            </div></div></body>"#,
        );
        let inner = doc.element_by_id("inner").unwrap();
        let outer = doc.element_by_id("outer").unwrap();
        assert_eq!(cards, vec![inner, outer]);
    }

    #[test]
    fn test_falls_back_to_body() {
        let (doc, cards) = cards_in(
            r#"<body><section id="s"><a>View product</a><button>Add to cart</button></section></body>"#,
        );
        assert_eq!(cards, vec![doc.element_by_id("s").unwrap()]);
    }

    #[test]
    fn test_any_matching_button_qualifies() {
        let (doc, cards) = cards_in(
            r#"<body><div id="chatbox"><div id="c1">
                <button>Like</button><a>View product</a><button>Add to cart</button>
            </div></div></body>"#,
        );
        assert_eq!(cards, vec![doc.element_by_id("c1").unwrap()]);
    }
}
