use std::sync::Arc;

use parking_lot::Mutex;
use trident_core::{
    ActionKind, Clock, NavAction, NavigationNode, TrackerConfig, resolve_active_leaf,
    system_clock,
};

use crate::context::NavigationContext;
use crate::detector::{TransitionOutcome, detect};
use crate::instrumentation::{InstrumentationSink, LogSink, Report};
use crate::registry::{CallbackRegistry, Invocation, LifecycleCallbacks};
use crate::timing::{TimingReport, TimingStore};

/// Everything one store update asks of the outside world, in order:
/// the outgoing onPause, the incoming onResume, then sink reports.
#[must_use]
pub struct Dispatch {
    pub outcome: Option<TransitionOutcome>,
    calls: Vec<Invocation>,
    reports: Vec<Report>,
    sink: Arc<dyn InstrumentationSink>,
}

impl Dispatch {
    pub fn calls(&self) -> &[Invocation] {
        &self.calls
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn run(self) -> Option<TransitionOutcome> {
        for call in self.calls {
            call.run();
        }
        for report in &self.reports {
            report.deliver(self.sink.as_ref());
        }
        self.outcome
    }
}

/// Watches store updates and turns active-scene changes into lifecycle
/// callbacks, page reports and transition timings.
///
/// Create one per store and call `on_store_update` from the store's update
/// cycle with the state before and after each action.
pub struct SceneTracker {
    config: TrackerConfig,
    context: NavigationContext,
    registry: CallbackRegistry,
    timings: TimingStore,
    sink: Arc<dyn InstrumentationSink>,
}

impl Default for SceneTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl SceneTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let timings = TimingStore::new(config.max_in_flight_timings, system_clock());
        let registry = CallbackRegistry::with_pending_limit(config.max_pending_resumes);
        Self {
            config,
            context: NavigationContext::new(),
            registry,
            timings,
            sink: Arc::new(LogSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn InstrumentationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the timing clock. Drops in-flight timings.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.timings = TimingStore::new(self.config.max_in_flight_timings, clock);
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn context(&self) -> &NavigationContext {
        &self.context
    }

    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    pub fn timings(&self) -> &TimingStore {
        &self.timings
    }

    pub fn timings_mut(&mut self) -> &mut TimingStore {
        &mut self.timings
    }

    /// Called by a scene on mount.
    pub fn register(&mut self, instance_key: impl Into<String>, callbacks: LifecycleCallbacks) {
        self.registry.register(instance_key, callbacks);
    }

    /// Called by a scene on unmount.
    pub fn unregister(&mut self, instance_key: &str) -> bool {
        self.registry.unregister(instance_key)
    }

    /// Processes one store update and runs the resulting callbacks and
    /// reports. Returns the transition, if the update was one.
    pub fn on_store_update(
        &mut self,
        prev: Option<&NavigationNode>,
        next: Option<&NavigationNode>,
        action: &NavAction,
    ) -> Option<TransitionOutcome> {
        self.prepare(prev, next, action).run()
    }

    /// Processes one store update up to the point of calling out: the
    /// context, registry queue and timings are updated, and the callbacks
    /// and reports are handed back in a `Dispatch`.
    pub fn prepare(
        &mut self,
        prev: Option<&NavigationNode>,
        next: Option<&NavigationNode>,
        action: &NavAction,
    ) -> Dispatch {
        let prev_scene = resolve_active_leaf(prev);
        let next_scene = resolve_active_leaf(next);
        log::trace!(
            "{}: {:?}/{:?} -> {:?}/{:?}",
            action.kind,
            prev_scene.route_name(),
            prev_scene.instance_key(),
            next_scene.route_name(),
            next_scene.instance_key()
        );

        let mut calls = Vec::new();
        let mut reports = Vec::new();

        let outcome = detect(&self.context, &prev_scene, &next_scene, action, &self.config);
        if let Some(outcome) = &outcome {
            log::debug!(
                "scene change {} -> {}",
                outcome.from_route_identity,
                outcome.to_route_identity
            );
            let change = outcome.change();
            if outcome.pauses_outgoing()
                && let Some(from_key) = &outcome.from_scene_key
                && let Some(call) = self.registry.pause_invocation(from_key, change.clone())
            {
                calls.push(call);
            }
            if let Some(to_key) = &outcome.to_scene_key
                && let Some(call) = self.registry.resume_or_queue(to_key, change)
            {
                calls.push(call);
            }

            self.context.commit(prev_scene, next_scene, outcome);

            if self.config.report_pages {
                reports.push(Report::PageEnd(
                    outcome.from_route_identity.canonical_url.clone(),
                ));
                reports.push(Report::PageStart(
                    outcome.to_route_identity.canonical_url.clone(),
                ));
            }
        }

        if let Some(report) = self.track_timing(action) {
            log::info!(
                "{} transition took {} ms",
                report.route_name,
                report.elapsed().as_millis()
            );
            reports.push(Report::TimeConsuming(report));
        }

        Dispatch {
            outcome,
            calls,
            reports,
            sink: self.sink.clone(),
        }
    }

    fn track_timing(&mut self, action: &NavAction) -> Option<TimingReport> {
        let route = self.context.current_route_name()?.to_string();
        match action.kind {
            ActionKind::Navigate => {
                self.timings.on_navigate_intent(&route);
                None
            }
            ActionKind::CompleteTransition => self.timings.on_transition_complete(&route),
            _ => None,
        }
    }
}

/// A `SceneTracker` for hosts that dispatch from more than one thread.
///
/// One mutex serializes store updates and registrations. Callbacks and
/// sink reports run after the lock is released, so a callback may
/// register, unregister or dispatch again without deadlocking; a nested
/// update is processed as its own call against the already committed
/// context.
#[derive(Clone)]
pub struct SharedSceneTracker {
    inner: Arc<Mutex<SceneTracker>>,
}

impl SharedSceneTracker {
    pub fn new(tracker: SceneTracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    pub fn on_store_update(
        &self,
        prev: Option<&NavigationNode>,
        next: Option<&NavigationNode>,
        action: &NavAction,
    ) -> Option<TransitionOutcome> {
        let dispatch = self.inner.lock().prepare(prev, next, action);
        dispatch.run()
    }

    pub fn register(&self, instance_key: impl Into<String>, callbacks: LifecycleCallbacks) {
        let drained = self
            .inner
            .lock()
            .registry
            .register_deferred(instance_key, callbacks);
        if let Some(call) = drained {
            call.run();
        }
    }

    pub fn unregister(&self, instance_key: &str) -> bool {
        self.inner.lock().unregister(instance_key)
    }

    /// Runs `f` with the tracker locked. Do not dispatch from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut SceneTracker) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
