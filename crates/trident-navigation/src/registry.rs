use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::instrumentation::panic_message;

/// What a lifecycle callback is told about a scene change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneChange {
    /// `None` on the first scene ever shown.
    pub from_scene: Option<String>,
    pub to_scene: String,
}

impl SceneChange {
    pub fn new(from_scene: Option<&str>, to_scene: impl Into<String>) -> Self {
        Self {
            from_scene: from_scene.map(str::to_string),
            to_scene: to_scene.into(),
        }
    }
}

impl fmt::Display for SceneChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.from_scene.as_deref().unwrap_or("<none>"),
            self.to_scene
        )
    }
}

pub type LifecycleCallback = Arc<dyn Fn(&SceneChange) + Send + Sync>;

/// onPause/onResume hooks a mounted scene registers under its instance key.
#[derive(Clone, Default)]
pub struct LifecycleCallbacks {
    pub on_pause: Option<LifecycleCallback>,
    pub on_resume: Option<LifecycleCallback>,
}

impl LifecycleCallbacks {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn on_pause(mut self, f: impl Fn(&SceneChange) + Send + Sync + 'static) -> Self {
        self.on_pause = Some(Arc::new(f));
        self
    }
    pub fn on_resume(mut self, f: impl Fn(&SceneChange) + Send + Sync + 'static) -> Self {
        self.on_resume = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for LifecycleCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleCallbacks")
            .field("on_pause", &self.on_pause.is_some())
            .field("on_resume", &self.on_resume.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Pause,
    Resume,
}

/// A callback resolved from the registry, ready to run.
///
/// Returned instead of invoked where the caller must release a lock first.
#[must_use]
pub struct Invocation {
    pub phase: Phase,
    pub instance_key: String,
    pub change: SceneChange,
    callback: LifecycleCallback,
}

impl Invocation {
    /// Runs the callback. A panicking callback is logged and contained, so
    /// the calls queued after it still run. Returns false if it panicked.
    pub fn run(self) -> bool {
        log::debug!(
            "{:?} {} ({})",
            self.phase,
            self.instance_key,
            self.change
        );
        match catch_unwind(AssertUnwindSafe(|| (self.callback)(&self.change))) {
            Ok(()) => true,
            Err(panic) => {
                log::warn!(
                    "{:?} callback of {} panicked: {}",
                    self.phase,
                    self.instance_key,
                    panic_message(&*panic)
                );
                false
            }
        }
    }
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("phase", &self.phase)
            .field("instance_key", &self.instance_key)
            .field("change", &self.change)
            .finish()
    }
}

/// Outcome of `fire_resume_or_queue`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resumption {
    Invoked,
    Queued,
}

#[derive(Default)]
enum SlotState {
    #[default]
    Unregistered,
    Registered(LifecycleCallbacks),
}

struct Pending {
    change: SceneChange,
    /// Queue order, for evicting the oldest request.
    seq: u64,
}

#[derive(Default)]
struct InstanceSlot {
    state: SlotState,
    /// At most one queued resume; a newer request replaces it.
    pending: Option<Pending>,
}

impl InstanceSlot {
    fn callbacks(&self) -> Option<&LifecycleCallbacks> {
        match &self.state {
            SlotState::Registered(cbs) => Some(cbs),
            SlotState::Unregistered => None,
        }
    }

    fn is_vacant(&self) -> bool {
        matches!(self.state, SlotState::Unregistered) && self.pending.is_none()
    }
}

pub const DEFAULT_MAX_PENDING_RESUMES: usize = 256;

/// Per-instance lifecycle callbacks plus resumes waiting for a registration.
///
/// Scenes that never register leave their resume queued, so the queue is
/// bounded: past `max_pending` the oldest request is dropped. A bound of
/// zero disables queuing.
pub struct CallbackRegistry {
    slots: HashMap<String, InstanceSlot>,
    max_pending: usize,
    next_seq: u64,
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::with_pending_limit(DEFAULT_MAX_PENDING_RESUMES)
    }
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pending_limit(max_pending: usize) -> Self {
        Self {
            slots: HashMap::new(),
            max_pending,
            next_seq: 0,
        }
    }

    /// Stores (or replaces) the callbacks for `instance_key` and runs a queued
    /// resume, if one was waiting.
    pub fn register(&mut self, instance_key: impl Into<String>, callbacks: LifecycleCallbacks) {
        if let Some(call) = self.register_deferred(instance_key, callbacks) {
            call.run();
        }
    }

    /// `register`, but hands back the drained resume instead of running it.
    pub fn register_deferred(
        &mut self,
        instance_key: impl Into<String>,
        callbacks: LifecycleCallbacks,
    ) -> Option<Invocation> {
        let instance_key = instance_key.into();
        let slot = self.slots.entry(instance_key.clone()).or_default();
        let on_resume = callbacks.on_resume.clone();
        slot.state = SlotState::Registered(callbacks);

        // Without an onResume the queued request stays for a later registration.
        let callback = on_resume?;
        let change = slot.pending.take()?.change;
        log::debug!("draining queued resume for {instance_key}");
        Some(Invocation {
            phase: Phase::Resume,
            instance_key,
            change,
            callback,
        })
    }

    /// Drops the callbacks of an unmounted scene. Queued resumes are kept.
    pub fn unregister(&mut self, instance_key: &str) -> bool {
        let Some(slot) = self.slots.get_mut(instance_key) else {
            return false;
        };
        let was_registered = matches!(slot.state, SlotState::Registered(_));
        slot.state = SlotState::Unregistered;
        if slot.is_vacant() {
            self.slots.remove(instance_key);
        }
        was_registered
    }

    pub fn pause_invocation(&self, instance_key: &str, change: SceneChange) -> Option<Invocation> {
        let callback = self
            .slots
            .get(instance_key)?
            .callbacks()?
            .on_pause
            .clone()?;
        Some(Invocation {
            phase: Phase::Pause,
            instance_key: instance_key.to_string(),
            change,
            callback,
        })
    }

    /// Runs the registered onPause, if any. Returns whether one was registered.
    pub fn fire_pause(&self, instance_key: &str, change: SceneChange) -> bool {
        match self.pause_invocation(instance_key, change) {
            Some(call) => {
                call.run();
                true
            }
            None => false,
        }
    }

    /// Returns the registered onResume as an invocation, or queues `change`
    /// for the next registration of `instance_key`.
    pub fn resume_or_queue(&mut self, instance_key: &str, change: SceneChange) -> Option<Invocation> {
        if let Some(slot) = self.slots.get_mut(instance_key)
            && let Some(callback) = slot.callbacks().and_then(|c| c.on_resume.clone())
        {
            slot.pending = None;
            return Some(Invocation {
                phase: Phase::Resume,
                instance_key: instance_key.to_string(),
                change,
                callback,
            });
        }
        self.queue(instance_key, change);
        None
    }

    fn queue(&mut self, instance_key: &str, change: SceneChange) {
        if self.max_pending == 0 {
            log::debug!("no onResume for {instance_key}; queuing disabled, dropped ({change})");
            return;
        }
        let replacing = self
            .slots
            .get(instance_key)
            .is_some_and(|s| s.pending.is_some());
        if !replacing && self.pending_len() >= self.max_pending {
            self.evict_oldest_pending();
        }
        log::debug!("no onResume for {instance_key} yet; queued ({change})");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.entry(instance_key.to_string()).or_default().pending =
            Some(Pending { change, seq });
    }

    fn evict_oldest_pending(&mut self) {
        let oldest = self
            .slots
            .iter()
            .filter_map(|(key, s)| s.pending.as_ref().map(|p| (p.seq, key)))
            .min()
            .map(|(_, key)| key.clone());
        if let Some(key) = oldest {
            log::warn!(
                "{} resumes queued; dropping the one for {key}",
                self.pending_len()
            );
            if let Some(slot) = self.slots.get_mut(&key) {
                slot.pending = None;
                if slot.is_vacant() {
                    self.slots.remove(&key);
                }
            }
        }
    }

    pub fn fire_resume_or_queue(&mut self, instance_key: &str, change: SceneChange) -> Resumption {
        match self.resume_or_queue(instance_key, change) {
            Some(call) => {
                call.run();
                Resumption::Invoked
            }
            None => Resumption::Queued,
        }
    }

    pub fn is_registered(&self, instance_key: &str) -> bool {
        self.slots
            .get(instance_key)
            .is_some_and(|s| s.callbacks().is_some())
    }

    pub fn pending(&self, instance_key: &str) -> Option<&SceneChange> {
        self.slots
            .get(instance_key)?
            .pending
            .as_ref()
            .map(|p| &p.change)
    }

    pub fn pending_len(&self) -> usize {
        self.slots.values().filter(|s| s.pending.is_some()).count()
    }

    /// Number of instance keys with callbacks or a queued resume.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
