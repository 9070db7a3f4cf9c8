//! Chatprobe: heuristic smoke tests for an embedded chat widget
//!
//! Inspects a rendered page and reports PASS/FAIL/INFO verdicts about the
//! chat widget on it: controls present, product cards bounded and unique,
//! card controls accessible, layout responsive, Enter sending the message.
//! On the host page it checks the floating launcher instead.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     CHATPROBE Architecture                         │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌──────────────┐  │
//! │  │ Document │──►│ Context  │──►│ Battery   │──►│ Report       │  │
//! │  │ (trait)  │   │ Selector │   │ (checks)  │   │ (LogSink)    │  │
//! │  └──────────┘   └──────────┘   └─────┬─────┘   └──────▲───────┘  │
//! │                                      │ Enter probe    │          │
//! │                                      └──► settle ─────┘          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The page is reached only through [`Document`]. [`MemoryDocument`] is the
//! bundled implementation; with the `html` feature it loads from markup.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Check batteries for the chat surface and the floating launcher
pub mod battery;
mod context;
mod controls;

/// Page model the batteries inspect
pub mod dom;
mod extract;
mod layout;
mod locator;
mod policy;
mod probe;
mod reporter;
mod result;
mod text;

pub use battery::{run_chat_battery, run_launcher_battery, BatteryKind, BatteryRun};
pub use context::{run_harness, select_battery};
pub use controls::{find_send_button, find_user_input};
pub use dom::{BoundingBox, ComputedStyle, Document, KeyEvent, Listener, MemoryDocument, NodeId};
pub use extract::{extract_description, extract_facts, extract_price, CardFacts};
pub use layout::{count_grid_tracks, evaluate_layout, LayoutVerdict, DESKTOP_LAYOUT, MOBILE_LAYOUT};
pub use locator::{add_buttons, card_root, find_product_cards, view_links};
pub use policy::{
    ColumnDetection, Policy, PolicyConfig, DEFAULT_MAX_CARDS, DEFAULT_MAX_DESCRIPTION_CHARS,
    DEFAULT_MIN_DESCRIPTION_CHARS, DEFAULT_MOBILE_BREAKPOINT, DEFAULT_PROBE_DELAY_MS,
    DEFAULT_PROBE_TEXT,
};
pub use probe::{start_enter_probe, PendingProbe, ENTER_SENDS, MANUAL_CHECK};
pub use reporter::{
    CheckResult, LogLevel, LogSink, MemorySink, Outcome, Report, RunCounters, TracingSink,
};
pub use result::{ProbeError, ProbeResult};
pub use text::{lines, normalize};

#[cfg(feature = "html")]
pub use dom::html::{load_html, parse_html};
