//! Check batteries.
//!
//! A battery is the fixed, ordered list of checks for one context: the chat
//! surface itself, or the host page with its floating launcher. Each run owns
//! its [`Report`]; nothing is shared between runs.

pub mod chat;
pub mod launcher;

use crate::dom::Document;
use crate::probe::PendingProbe;
use crate::reporter::{LogSink, Report};

pub use chat::run_chat_battery;
pub use launcher::run_launcher_battery;

/// Which battery ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryKind {
    /// Checks run inside the chat surface
    ChatSurface,
    /// Checks run on the host page's floating launcher
    Launcher,
}

/// A finished battery, possibly with the Enter probe still in flight.
///
/// The summary line has already been written. If the probe is pending, its
/// result is not in that summary; [`BatteryRun::settle`] adds it to the
/// report once the delay has passed.
#[derive(Debug)]
pub struct BatteryRun<S: LogSink> {
    kind: BatteryKind,
    report: Report<S>,
    probe: Option<PendingProbe>,
}

impl<S: LogSink> BatteryRun<S> {
    pub(crate) fn new(kind: BatteryKind, report: Report<S>, probe: Option<PendingProbe>) -> Self {
        Self {
            kind,
            report,
            probe,
        }
    }

    /// Battery that ran
    #[must_use]
    pub const fn kind(&self) -> BatteryKind {
        self.kind
    }

    /// Report as it stands
    #[must_use]
    pub fn report(&self) -> &Report<S> {
        &self.report
    }

    /// Whether no probe is outstanding
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.probe.is_none()
    }

    /// Await the outstanding probe, if any, and return the complete report
    pub async fn settle<D: Document>(mut self, doc: &mut D) -> Report<S> {
        if let Some(probe) = self.probe.take() {
            probe.settle(doc, &mut self.report).await;
        }
        self.report
    }

    /// Give up on the outstanding probe, as when the page goes away before
    /// the delay ends. Its result is never recorded.
    pub fn abandon(mut self) -> Report<S> {
        if self.probe.take().is_some() {
            tracing::debug!("enter probe abandoned before settling");
        }
        self.report
    }
}
