use std::collections::HashMap;
use std::sync::Arc;

use trident_core::Clock;
use web_time::{Duration, Instant};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingRecord {
    pub route_name: String,
    pub start: Instant,
}

/// A completed measurement, from navigate intent to transition complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingReport {
    pub route_name: String,
    pub start: Instant,
    pub end: Instant,
}

impl TimingReport {
    pub fn elapsed(&self) -> Duration {
        self.end.saturating_duration_since(self.start)
    }
}

/// In-flight transition timings, at most one per route name.
///
/// The store holds at most `max_in_flight` records; starting one more evicts
/// the record with the oldest start. A bound of zero disables timing.
pub struct TimingStore {
    records: HashMap<String, TimingRecord>,
    max_in_flight: usize,
    clock: Arc<dyn Clock>,
}

impl TimingStore {
    pub fn new(max_in_flight: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: HashMap::new(),
            max_in_flight,
            clock,
        }
    }

    /// Starts (or restarts) the measurement for `route_name`.
    pub fn on_navigate_intent(&mut self, route_name: &str) {
        if self.max_in_flight == 0 {
            return;
        }
        if !self.records.contains_key(route_name) && self.records.len() >= self.max_in_flight {
            self.evict_oldest();
        }
        let start = self.clock.now();
        self.records.insert(
            route_name.to_string(),
            TimingRecord {
                route_name: route_name.to_string(),
                start,
            },
        );
    }

    /// Finishes the measurement for `route_name`, if one is in flight.
    pub fn on_transition_complete(&mut self, route_name: &str) -> Option<TimingReport> {
        let record = self.records.remove(route_name)?;
        let end = self.clock.now();
        Some(TimingReport {
            route_name: record.route_name,
            start: record.start,
            end,
        })
    }

    /// Drops records started more than `age` ago. Returns how many went.
    pub fn evict_older_than(&mut self, age: Duration) -> usize {
        let now = self.clock.now();
        let before = self.records.len();
        self.records.retain(|route, r| {
            let keep = now.saturating_duration_since(r.start) <= age;
            if !keep {
                log::warn!("timing for {route} never completed; dropped");
            }
            keep
        });
        before - self.records.len()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .records
            .values()
            .min_by_key(|r| r.start)
            .map(|r| r.route_name.clone());
        if let Some(route) = oldest {
            log::warn!(
                "{} transitions in flight; dropping timing for {route}",
                self.records.len()
            );
            self.records.remove(&route);
        }
    }

    pub fn get(&self, route_name: &str) -> Option<&TimingRecord> {
        self.records.get(route_name)
    }

    pub fn contains(&self, route_name: &str) -> bool {
        self.records.contains_key(route_name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
