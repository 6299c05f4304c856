//! Replays a recorded sequence of store updates through a `SceneTracker`.
//!
//! Input is a JSON array of `{ "state": <navigation state|null>, "action": <action> }`
//! steps, read from the file given as the first argument or from stdin.
//! Scenes "mount" (register their callbacks) right after they first become
//! active, which exercises the queued-resume path.
//!
//!     RUST_LOG=debug cargo run -p scene_trace -- demos/scene_trace/trace.json

use std::collections::HashSet;
use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;
use trident_core::from_json;
use trident_core::prelude::*;
use trident_navigation::{LifecycleCallbacks, SceneTracker, TimingReport};

#[derive(Deserialize)]
struct Step {
    state: Option<NavigationNode>,
    action: NavAction,
}

fn scene_callbacks(instance_key: &str) -> LifecycleCallbacks {
    let pause_key = instance_key.to_string();
    let resume_key = instance_key.to_string();
    LifecycleCallbacks::new()
        .on_pause(move |c| log::info!("[{pause_key}] onPause {c}"))
        .on_resume(move |c| log::info!("[{resume_key}] onResume {c}"))
}

struct PrintSink;
impl trident_navigation::InstrumentationSink for PrintSink {
    fn report_page_start(&self, url: &str) -> Result<(), InstrumentationError> {
        log::info!("page start {url}");
        Ok(())
    }

    fn report_page_end(&self, url: &str) -> Result<(), InstrumentationError> {
        log::info!("page end {url}");
        Ok(())
    }

    fn report_time_consuming(
        &self,
        route_name: &str,
        start: web_time::Instant,
        end: web_time::Instant,
    ) -> Result<(), InstrumentationError> {
        let report = TimingReport {
            route_name: route_name.to_string(),
            start,
            end,
        };
        log::info!("timing {route_name}: {:?}", report.elapsed());
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let input = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("reading trace {path}"))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading trace from stdin")?;
            buf
        }
    };
    let steps: Vec<Step> = from_json(&input).context("parsing trace")?;

    let mut tracker = SceneTracker::default().with_sink(Arc::new(PrintSink));
    let mut mounted = HashSet::new();
    let mut prev: Option<NavigationNode> = None;
    let mut transitions = 0usize;

    for (i, step) in steps.into_iter().enumerate() {
        let outcome = tracker.on_store_update(prev.as_ref(), step.state.as_ref(), &step.action);
        match &outcome {
            Some(o) => {
                transitions += 1;
                log::info!(
                    "#{i} {}: {} -> {}",
                    step.action.kind,
                    o.from_route_identity,
                    o.to_route_identity
                );
            }
            None => log::info!("#{i} {}: no scene change", step.action.kind),
        }

        if let Some(key) = resolve_active_leaf(step.state.as_ref()).instance_key
            && mounted.insert(key.clone())
        {
            tracker.register(key.clone(), scene_callbacks(&key));
        }
        prev = step.state;
    }

    log::info!(
        "{transitions} scene changes; current {}",
        tracker.context().current_scene_url().unwrap_or("<none>")
    );
    Ok(())
}
