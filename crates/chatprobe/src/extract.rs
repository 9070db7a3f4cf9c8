//! Card field extraction.
//!
//! Best-effort parsing of rendered card text into name, price, and
//! description. Nothing here fails: a field that cannot be found comes back
//! empty, which callers read as "no opinion".

use crate::dom::{Document, NodeId};
use crate::policy::Policy;
use crate::text::{lines, normalize};

/// Facts read off one product card
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CardFacts {
    /// Product name
    pub name: String,
    /// Price token, whitespace stripped (e.g. `$19.99`)
    pub price: String,
    /// Short description
    pub description: String,
}

impl CardFacts {
    /// Key used by the uniqueness check
    #[must_use]
    pub fn identity_key(&self) -> (String, String) {
        (self.name.clone(), self.price.clone())
    }
}

/// Extract every field of `card`
pub fn extract_facts<D: Document>(doc: &D, card: NodeId, policy: &Policy) -> CardFacts {
    let text = doc.text_content(card);
    let name = extract_name(doc, card, &text);
    let price = extract_price(&text, policy);
    let description = extract_description(&text, &name, &price, policy);
    CardFacts {
        name,
        price,
        description,
    }
}

/// First emphasized text, else the first non-empty line
fn extract_name<D: Document>(doc: &D, card: NodeId, text: &str) -> String {
    let emphasized = doc
        .descendants(card)
        .into_iter()
        .find(|&n| doc.has_tag(n, "strong") || doc.has_tag(n, "b"));
    match emphasized {
        Some(node) => normalize(&doc.text_content(node)),
        None => lines(text).first().map(|l| (*l).to_string()).unwrap_or_default(),
    }
}

/// First price token in the whitespace-collapsed text
pub fn extract_price(text: &str, policy: &Policy) -> String {
    policy
        .price
        .find(&normalize(text))
        .map(|m| m.as_str().chars().filter(|c| !c.is_whitespace()).collect())
        .unwrap_or_default()
}

/// First long-enough line that is not the name, the price, or an action label.
///
/// An empty `price` is contained in every line, so a card without a price has
/// no description.
pub fn extract_description(text: &str, name: &str, price: &str, policy: &Policy) -> String {
    let remaining: Vec<&str> = lines(text)
        .into_iter()
        .filter(|line| *line != name)
        .filter(|line| !line.contains(price))
        .filter(|line| !policy.is_action_text(line))
        .collect();

    let min = policy.config.min_description_chars;
    remaining
        .iter()
        .find(|line| line.chars().count() >= min)
        .or_else(|| remaining.first())
        .map(|line| (*line).to_string())
        .unwrap_or_default()
}
