//! Context selection: which battery applies to the page at hand.

use crate::battery::{run_chat_battery, run_launcher_battery, BatteryKind, BatteryRun};
use crate::dom::Document;
use crate::policy::Policy;
use crate::reporter::LogSink;

/// Chat surface when the path names it or when embedded in another page;
/// the host page's launcher otherwise.
pub fn select_battery<D: Document>(doc: &D, policy: &Policy) -> BatteryKind {
    let path = doc.location_path().to_lowercase();
    let indicator = policy.config.chat_path_indicator.to_lowercase();
    if path.contains(&indicator) || doc.is_embedded() {
        BatteryKind::ChatSurface
    } else {
        BatteryKind::Launcher
    }
}

/// Select a battery for `doc` and run it.
///
/// # Example
///
/// ```
/// use chatprobe::{run_harness, MemoryDocument, MemorySink, Policy};
///
/// let mut doc = MemoryDocument::new().with_location_path("/shop/");
/// let run = run_harness(&mut doc, &Policy::default(), MemorySink::new());
/// let report = run.abandon();
/// assert_eq!(report.counters().fail, 1);
/// ```
pub fn run_harness<D: Document, S: LogSink>(doc: &mut D, policy: &Policy, sink: S) -> BatteryRun<S> {
    let kind = select_battery(doc, policy);
    tracing::info!(
        ?kind,
        path = %doc.location_path(),
        embedded = doc.is_embedded(),
        "running battery"
    );
    match kind {
        BatteryKind::ChatSurface => run_chat_battery(doc, policy, sink),
        BatteryKind::Launcher => run_launcher_battery(doc, policy, sink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    fn kind(path: &str, embedded: bool) -> BatteryKind {
        let doc = MemoryDocument::new()
            .with_location_path(path)
            .with_embedded(embedded);
        select_battery(&doc, &Policy::default())
    }

    #[test]
    fn test_chat_path_selects_chat_surface() {
        assert_eq!(kind("/chatbot/", false), BatteryKind::ChatSurface);
        assert_eq!(kind("/ChatBot", false), BatteryKind::ChatSurface);
        assert_eq!(kind("/en/chatbot/history", false), BatteryKind::ChatSurface);
    }

    #[test]
    fn test_embedded_selects_chat_surface() {
        assert_eq!(kind("/", true), BatteryKind::ChatSurface);
    }

    #[test]
    fn test_host_page_selects_launcher() {
        assert_eq!(kind("/", false), BatteryKind::Launcher);
        assert_eq!(kind("/chat", false), BatteryKind::Launcher);
    }
}
