//! Outbound page and timing reports.
//!
//! A sink is fire-and-forget from the tracker's point of view: errors are
//! logged, panics are caught, and neither reaches the store update.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use trident_core::InstrumentationError;
use web_time::Instant;

use crate::timing::TimingReport;

pub trait InstrumentationSink: Send + Sync {
    fn report_page_start(&self, _url: &str) -> Result<(), InstrumentationError> {
        Ok(())
    }

    fn report_page_end(&self, _url: &str) -> Result<(), InstrumentationError> {
        Ok(())
    }

    fn report_time_consuming(
        &self,
        _route_name: &str,
        _start: Instant,
        _end: Instant,
    ) -> Result<(), InstrumentationError> {
        Ok(())
    }
}

/// Drops every report.
pub struct NoopSink;
impl InstrumentationSink for NoopSink {}

/// Writes reports to the `log` facade.
pub struct LogSink;
impl InstrumentationSink for LogSink {
    fn report_page_start(&self, url: &str) -> Result<(), InstrumentationError> {
        log::debug!("page start: {url}");
        Ok(())
    }

    fn report_page_end(&self, url: &str) -> Result<(), InstrumentationError> {
        log::debug!("page end: {url}");
        Ok(())
    }

    fn report_time_consuming(
        &self,
        route_name: &str,
        start: Instant,
        end: Instant,
    ) -> Result<(), InstrumentationError> {
        log::debug!(
            "time consuming: {route_name} {} ms",
            end.saturating_duration_since(start).as_millis()
        );
        Ok(())
    }
}

/// A report queued for the sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Report {
    PageEnd(String),
    PageStart(String),
    TimeConsuming(TimingReport),
}

impl Report {
    fn name(&self) -> &'static str {
        match self {
            Report::PageEnd(_) => "report_page_end",
            Report::PageStart(_) => "report_page_start",
            Report::TimeConsuming(_) => "report_time_consuming",
        }
    }

    /// Delivers the report, containing sink errors and panics.
    pub fn deliver(&self, sink: &dyn InstrumentationSink) {
        let result = catch_unwind(AssertUnwindSafe(|| match self {
            Report::PageEnd(url) => sink.report_page_end(url),
            Report::PageStart(url) => sink.report_page_start(url),
            Report::TimeConsuming(t) => sink.report_time_consuming(&t.route_name, t.start, t.end),
        }));
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("{} failed: {e}", self.name()),
            Err(panic) => log::warn!("{} panicked: {}", self.name(), panic_message(&*panic)),
        }
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}
