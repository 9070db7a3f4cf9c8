//! Enter-to-send probe.
//!
//! Types a probe message into the chat input, dispatches a synthetic Enter
//! keydown, and checks a short while later whether the widget consumed the
//! message. The battery does not wait: it gets a [`PendingProbe`] back and
//! prints its summary first. Whoever needs the settled verdict awaits
//! [`PendingProbe::settle`].
//!
//! The input is always restored to its pre-probe content once the re-check
//! has run, whatever the verdict. A probe that is dropped before settling
//! never re-checks and never restores, like a page closed inside the delay.

use std::time::Duration;

use crate::dom::{Document, KeyEvent, NodeId};
use crate::policy::Policy;
use crate::reporter::{CheckResult, LogSink, Outcome, Report};

/// Name of the Enter-to-send check
pub const ENTER_SENDS: &str = "Enter sends message (input cleared)";

/// Detail of every INFO that needs a human
pub const MANUAL_CHECK: &str = "Manual check required";

/// A dispatched Enter whose effect has not been checked yet
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an unsettled probe never reports and never restores the input"]
pub struct PendingProbe {
    input: NodeId,
    original: String,
    delay: Duration,
}

/// Fill `input` with the probe text and dispatch Enter on it
pub fn start_enter_probe<D: Document>(doc: &mut D, input: NodeId, policy: &Policy) -> PendingProbe {
    let original = doc.editable_content(input);
    doc.set_editable_content(input, &policy.config.probe_text);
    doc.dispatch_key(input, &KeyEvent::key_down("Enter"));

    let delay = policy.probe_delay();
    tracing::debug!(input = input.index(), delay_ms = delay.as_millis() as u64, "enter probe dispatched");
    PendingProbe {
        input,
        original,
        delay,
    }
}

impl PendingProbe {
    /// Input under probe
    #[must_use]
    pub const fn input(&self) -> NodeId {
        self.input
    }

    /// Content the input had before the probe
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Delay before the re-check
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the delay, then re-check and restore
    pub async fn settle<D: Document, S: LogSink>(
        self,
        doc: &mut D,
        report: &mut Report<S>,
    ) -> Outcome {
        tokio::time::sleep(self.delay).await;
        self.verify(doc, report)
    }

    /// Re-check now and restore the input.
    ///
    /// An emptied input, or one back at its original content, passes. Anything
    /// else is inconclusive rather than wrong.
    pub fn verify<D: Document, S: LogSink>(self, doc: &mut D, report: &mut Report<S>) -> Outcome {
        let current = doc.editable_content(self.input);
        let cleared = current.is_empty() || current == self.original;
        let result = if cleared {
            CheckResult::new(ENTER_SENDS, Outcome::Pass, None)
        } else {
            CheckResult::new(ENTER_SENDS, Outcome::Info, Some(MANUAL_CHECK.to_string()))
        };
        let outcome = result.outcome;
        report.record(result);

        doc.set_editable_content(self.input, &self.original);
        outcome
    }
}
