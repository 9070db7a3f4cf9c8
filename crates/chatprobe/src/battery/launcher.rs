//! Floating-launcher battery.
//!
//! Runs on the host page. Three synchronous checks: the launcher and its
//! panel exist, clicking the launcher flips the panel's `aria-hidden`, and a
//! click outside an open panel hides it again.

use super::{BatteryKind, BatteryRun};
use crate::dom::{Document, NodeId};
use crate::policy::Policy;
use crate::reporter::{LogSink, Report};

/// Battery name in the summary line
pub const LAUNCHER_BATTERY: &str = "Widget QA";

/// Section title
pub const LAUNCHER_SECTION: &str = "Floating Widget";

/// Presence check name
pub const WIDGET_PRESENT: &str = "Floating widget present";

/// Run the launcher battery.
///
/// When the launcher or the panel is missing, a single FAIL is written and
/// the battery stops there, without a summary line.
pub fn run_launcher_battery<D: Document, S: LogSink>(
    doc: &mut D,
    policy: &Policy,
    sink: S,
) -> BatteryRun<S> {
    let mut report = Report::new(LAUNCHER_BATTERY, sink);
    report.section(LAUNCHER_SECTION);

    let launcher = find_launcher(doc, policy);
    let panel = doc.element_by_id(&policy.config.panel_id);
    let (Some(launcher), Some(panel)) = (launcher, panel) else {
        tracing::debug!(
            launcher = launcher.is_some(),
            panel = panel.is_some(),
            "floating widget incomplete"
        );
        report.check(WIDGET_PRESENT, false, Some("Not found on this page".to_string()));
        return BatteryRun::new(BatteryKind::Launcher, report, None);
    };
    report.check(WIDGET_PRESENT, true, None);

    let was_open = is_open(doc, panel);
    doc.click(launcher);
    let opened = is_open(doc, panel);
    report.check("Toggle open/close", opened != was_open, None);

    if opened {
        let outside = doc.body();
        doc.click(outside);
        let closed = doc.attribute(panel, "aria-hidden").as_deref() == Some("true");
        report.check("Click outside closes", closed, None);
    }

    report.summarize();
    BatteryRun::new(BatteryKind::Launcher, report, None)
}

fn find_launcher<D: Document>(doc: &D, policy: &Policy) -> Option<NodeId> {
    let class = &policy.config.launcher_class;
    doc.all_elements()
        .into_iter()
        .find(|&n| doc.has_class(n, class))
}

/// Open means `aria-hidden="false"`; a missing attribute reads as closed
fn is_open<D: Document>(doc: &D, panel: NodeId) -> bool {
    doc.attribute(panel, "aria-hidden").as_deref() == Some("false")
}
