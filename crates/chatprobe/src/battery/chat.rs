//! Chat-surface battery.

use std::collections::HashSet;

use super::{BatteryKind, BatteryRun};
use crate::controls::{find_send_button, find_user_input};
use crate::dom::{Document, NodeId};
use crate::extract::extract_facts;
use crate::layout::evaluate_layout;
use crate::locator::{add_buttons, card_root, find_product_cards, view_links};
use crate::policy::Policy;
use crate::probe::{start_enter_probe, ENTER_SENDS, MANUAL_CHECK};
use crate::reporter::{LogSink, Report};

/// Battery name in the summary line
pub const CHAT_BATTERY: &str = "Chatbot QA";

/// Section title
pub const CHAT_SECTION: &str = "Chatbot Cards + Input";

/// Run the chat-surface battery.
///
/// All checks but the Enter probe complete before this returns, summary line
/// included. The probe comes back pending inside the [`BatteryRun`].
pub fn run_chat_battery<D: Document, S: LogSink>(
    doc: &mut D,
    policy: &Policy,
    sink: S,
) -> BatteryRun<S> {
    let mut report = Report::new(CHAT_BATTERY, sink);
    report.section(CHAT_SECTION);

    let chatbox = doc.element_by_id(&policy.config.chat_container_id);
    let input = find_user_input(doc);
    let send = find_send_button(doc, policy);

    report.check("Chatbox present", chatbox.is_some(), None);
    report.check("Input present", input.is_some(), None);
    report.check("Send button present", send.is_some(), None);

    let root = card_root(doc, policy);
    let cards = find_product_cards(doc, root, policy);

    check_card_count(&mut report, &cards, policy);
    check_unique(&mut report, doc, &cards, policy);
    check_descriptions(&mut report, doc, &cards, policy);
    check_card_controls(&mut report, doc, &cards, policy);
    check_layout(&mut report, doc, &cards, policy);

    let probe = match (input, send) {
        (Some(input), Some(_)) => Some(start_enter_probe(doc, input, policy)),
        _ => {
            report.info(ENTER_SENDS, MANUAL_CHECK);
            None
        }
    };
    report.info("Shift+Enter newline", MANUAL_CHECK);

    report.summarize();
    BatteryRun::new(BatteryKind::ChatSurface, report, probe)
}

fn check_card_count<S: LogSink>(report: &mut Report<S>, cards: &[NodeId], policy: &Policy) {
    let max = policy.config.max_cards;
    report.check(
        &format!("Card count <= {max}"),
        cards.len() <= max,
        Some(format!("count={}", cards.len())),
    );
}

fn check_unique<D: Document, S: LogSink>(
    report: &mut Report<S>,
    doc: &D,
    cards: &[NodeId],
    policy: &Policy,
) {
    let mut seen = HashSet::new();
    let dupes = cards
        .iter()
        .filter(|&&card| !seen.insert(extract_facts(doc, card, policy).identity_key()))
        .count();
    report.check(
        "Cards unique (name+price)",
        dupes == 0,
        (dupes > 0).then(|| format!("dupes={dupes}")),
    );
}

fn check_descriptions<D: Document, S: LogSink>(
    report: &mut Report<S>,
    doc: &D,
    cards: &[NodeId],
    policy: &Policy,
) {
    let limit = policy.config.max_description_chars;
    let mut missing = 0;
    let mut too_long = 0;
    for &card in cards {
        let description = extract_facts(doc, card, policy).description;
        if description.is_empty() {
            missing += 1;
        } else if description.chars().count() > limit {
            too_long += 1;
        }
    }

    // Empty descriptions are an accepted fallback and never fail.
    report.check(
        "Description present (fallback allowed)",
        true,
        (missing > 0).then(|| format!("missing={missing} (fallback expected)")),
    );
    report.check(
        &format!("Description <= {limit} chars"),
        too_long == 0,
        (too_long > 0).then(|| format!("tooLong={too_long}")),
    );
}

/// The view link and add button of every card: labelled and reachable by
/// keyboard.
fn check_card_controls<D: Document, S: LogSink>(
    report: &mut Report<S>,
    doc: &D,
    cards: &[NodeId],
    policy: &Policy,
) {
    let controls: Vec<NodeId> = cards
        .iter()
        .flat_map(|&card| {
            let view = view_links(doc, card, policy).first().copied();
            let add = add_buttons(doc, card, policy).first().copied();
            view.into_iter().chain(add)
        })
        .collect();

    let missing = controls
        .iter()
        .filter(|&&c| {
            doc.attribute(c, "aria-label")
                .map_or(true, |label| label.is_empty())
        })
        .count();
    let unfocusable = controls.iter().filter(|&&c| !is_focusable(doc, c)).count();

    report.check(
        "Buttons have aria-label",
        missing == 0,
        (missing > 0).then(|| format!("missing={missing}")),
    );
    report.check(
        "Buttons focusable",
        unfocusable == 0,
        (unfocusable > 0).then(|| format!("nonFocusable={unfocusable}")),
    );
}

fn is_focusable<D: Document>(doc: &D, node: NodeId) -> bool {
    let removed_from_tab_order = doc
        .attribute(node, "tabindex")
        .is_some_and(|t| t.trim() == "-1");
    let disableable = ["button", "input", "select", "textarea"]
        .iter()
        .any(|tag| doc.has_tag(node, tag));
    let disabled = disableable && doc.attribute(node, "disabled").is_some();
    !removed_from_tab_order && !disabled
}

fn check_layout<D: Document, S: LogSink>(
    report: &mut Report<S>,
    doc: &D,
    cards: &[NodeId],
    policy: &Policy,
) {
    let verdict = evaluate_layout(doc, cards, policy);
    match verdict.check_name() {
        Some(name) => report.check(
            name,
            verdict.is_ok(),
            Some(format!("cols={}", verdict.columns())),
        ),
        None => report.info("Layout check", "No cards rendered to evaluate layout"),
    }
}
