//! Chat control discovery: the message input and the send control.
//!
//! Absence is a reportable condition, so both finders return `Option`.

use crate::dom::{Document, NodeId};
use crate::policy::Policy;
use crate::text::normalize;

/// First match, in priority order, of: a `textarea`, a content-editable
/// element, a single-line text `input`, a search `input`.
pub fn find_user_input<D: Document>(doc: &D) -> Option<NodeId> {
    let elements = doc.all_elements();
    let first = |accept: &dyn Fn(NodeId) -> bool| elements.iter().copied().find(|&n| accept(n));

    first(&|n: NodeId| doc.has_tag(n, "textarea"))
        .or_else(|| first(&|n: NodeId| doc.attribute(n, "contenteditable").as_deref() == Some("true")))
        .or_else(|| first(&|n: NodeId| is_input_of_type(doc, n, "text")))
        .or_else(|| first(&|n: NodeId| is_input_of_type(doc, n, "search")))
}

/// The first submit control; otherwise the first button or input whose
/// `aria-label` plus visible text matches the send pattern.
pub fn find_send_button<D: Document>(doc: &D, policy: &Policy) -> Option<NodeId> {
    let controls: Vec<NodeId> = doc
        .all_elements()
        .into_iter()
        .filter(|&n| doc.has_tag(n, "button") || doc.has_tag(n, "input"))
        .collect();

    let by_type = controls.iter().copied().find(|&n| {
        doc.attribute(n, "type")
            .is_some_and(|t| t.eq_ignore_ascii_case("submit"))
    });
    by_type.or_else(|| {
        controls.iter().copied().find(|&n| {
            let label = doc.attribute(n, "aria-label").unwrap_or_default();
            let text = normalize(&doc.text_content(n));
            policy.send.is_match(&format!("{label} {text}"))
        })
    })
}

/// `input` whose type is `kind`; a missing type attribute means `text`
fn is_input_of_type<D: Document>(doc: &D, node: NodeId, kind: &str) -> bool {
    doc.has_tag(node, "input")
        && doc
            .attribute(node, "type")
            .map_or(kind == "text", |t| t.eq_ignore_ascii_case(kind))
}

#[cfg(all(test, feature = "html"))]
mod tests {
    use super::*;
    use crate::dom::html::parse_html;

    #[test]
    fn test_textarea_beats_earlier_input() {
        let doc = parse_html(
            r#"<body><input id="i" type="text"><textarea id="t"></textarea></body>"#,
        )
        .unwrap();
        assert_eq!(find_user_input(&doc), doc.element_by_id("t"));
    }

    #[test]
    fn test_content_editable_before_text_input() {
        let doc = parse_html(
            r#"<body><input id="i"><div id="ce" contenteditable="true"></div></body>"#,
        )
        .unwrap();
        assert_eq!(find_user_input(&doc), doc.element_by_id("ce"));
    }

    #[test]
    fn test_untyped_input_counts_as_text() {
        let doc = parse_html(r#"<body><input id="s" type="search"><input id="i"></body>"#).unwrap();
        assert_eq!(find_user_input(&doc), doc.element_by_id("i"));
    }

    #[test]
    fn test_search_input_last_resort() {
        let doc =
            parse_html(r#"<body><input type="checkbox"><input id="s" type="search"></body>"#).unwrap();
        assert_eq!(find_user_input(&doc), doc.element_by_id("s"));
    }

    #[test]
    fn test_no_input() {
        let doc = parse_html("<body><p>nothing here</p></body>").unwrap();
        assert_eq!(find_user_input(&doc), None);
    }

    #[test]
    fn test_submit_type_wins() {
        let doc = parse_html(
            r#"<body><button id="a">Send</button><button id="b" type="submit">Go</button></body>"#,
        )
        .unwrap();
        assert_eq!(find_send_button(&doc, &Policy::default()), doc.element_by_id("b"));
    }

    #[test]
    fn test_aria_label_match() {
        let doc = parse_html(
            r#"<body><button id="x">Clear</button><button id="y" aria-label="Ask assistant">➤</button></body>"#,
        )
        .unwrap();
        assert_eq!(find_send_button(&doc, &Policy::default()), doc.element_by_id("y"));
    }

    #[test]
    fn test_visible_text_match_case_insensitive() {
        let doc = parse_html(r#"<body><button id="y">SEND</button></body>"#).unwrap();
        assert_eq!(find_send_button(&doc, &Policy::default()), doc.element_by_id("y"));
    }

    #[test]
    fn test_no_send_control() {
        let doc = parse_html(r#"<body><button>Close</button><a>Send feedback</a></body>"#).unwrap();
        assert_eq!(find_send_button(&doc, &Policy::default()), None);
    }
}
