// Layout driver - time-sliced tick loop owning one simulation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::simulation::Simulation;
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragPhase {
    Start,
    Move,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub pinned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub nodes: Vec<NodePosition>,
    pub alpha: f64,
    pub at_rest: bool,
    pub viewport: Viewport,
}

impl LayoutSnapshot {
    pub fn positions(&self) -> HashMap<String, (f64, f64)> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), (n.x, n.y)))
            .collect()
    }
}

struct Shared {
    simulation: Mutex<Simulation>,
    viewport: Mutex<Viewport>,
    wake: Notify,
}

/// Runs the simulation on a background task, one tick per interval while
/// hot, parked once at rest. Drags and resizes wake it up. Dropping the
/// driver stops the task.
pub struct LayoutDriver {
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl LayoutDriver {
    pub fn spawn(simulation: Simulation, viewport: Viewport, tick_interval: Duration) -> Self {
        let shared = Arc::new(Shared {
            simulation: Mutex::new(simulation),
            viewport: Mutex::new(viewport),
            wake: Notify::new(),
        });
        let task = tokio::spawn(run(shared.clone(), tick_interval));
        Self { shared, task }
    }

    pub async fn snapshot(&self) -> LayoutSnapshot {
        let viewport = *self.shared.viewport.lock().await;
        let sim = self.shared.simulation.lock().await;
        LayoutSnapshot {
            nodes: sim
                .nodes()
                .iter()
                .map(|n| NodePosition {
                    id: n.id.clone(),
                    x: n.x,
                    y: n.y,
                    pinned: n.fx.is_some(),
                })
                .collect(),
            alpha: sim.alpha(),
            at_rest: sim.is_at_rest(),
            viewport,
        }
    }

    pub async fn drag(&self, node_id: &str, phase: DragPhase, x: f64, y: f64) -> AppResult<()> {
        {
            let mut sim = self.shared.simulation.lock().await;
            match phase {
                DragPhase::Start => {
                    sim.drag_start(node_id)?;
                    sim.drag_to(node_id, x, y)?;
                }
                DragPhase::Move => sim.drag_to(node_id, x, y)?,
                DragPhase::End => sim.drag_end(node_id)?,
            }
        }
        self.shared.wake.notify_one();
        Ok(())
    }

    /// Recenter on the new viewport and reheat.
    pub async fn resize(&self, viewport: Viewport) {
        *self.shared.viewport.lock().await = viewport;
        {
            let mut sim = self.shared.simulation.lock().await;
            sim.set_center(viewport.width / 2.0, viewport.height / 2.0);
            sim.set_alpha(0.3);
        }
        self.shared.wake.notify_one();
    }

    /// Wait until the simulation has cooled down. Returns early while a drag
    /// keeps it hot, since it cannot come to rest before the drag ends.
    pub async fn settle(&self) {
        loop {
            {
                let sim = self.shared.simulation.lock().await;
                if sim.is_at_rest() || !sim.is_cooling() {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

impl Drop for LayoutDriver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(shared: Arc<Shared>, tick_interval: Duration) {
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut ticks: u64 = 0;

    loop {
        let cooled = {
            let mut sim = shared.simulation.lock().await;
            sim.tick();
            ticks += 1;
            sim.is_at_rest()
        };

        if cooled {
            debug!("Layout at rest after {} ticks", ticks);
            shared.wake.notified().await;
            continue;
        }
        interval.tick().await;
    }
}
