// Force simulation - velocity Verlet layout with link, many-body and centering forces
// Numerics follow d3-force so layouts look the same as the browser rendition

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;
use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::models::TransactionGraph;

const INITIAL_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceSettings {
    pub link_distance: f64,
    /// Negative values repel.
    pub charge_strength: f64,
    pub charge_distance_min: f64,
    pub velocity_decay: f64,
    pub alpha_min: f64,
    pub alpha_decay: f64,
}

impl Default for ForceSettings {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            link_distance: 100.0,
            charge_strength: -400.0,
            charge_distance_min: 1.0,
            velocity_decay: 0.4,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct SimLink {
    source: usize,
    target: usize,
    strength: f64,
    bias: f64,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    nodes: Vec<SimNode>,
    index: HashMap<String, usize>,
    links: Vec<SimLink>,
    settings: ForceSettings,
    alpha: f64,
    alpha_target: f64,
    center: (f64, f64),
    rng: StdRng,
}

impl Simulation {
    /// Lay out `graph` around the center of a `width` x `height` viewport.
    /// Edges naming unknown node ids are dropped.
    pub fn new(graph: &TransactionGraph, width: f64, height: f64, seed: u64) -> Self {
        Self::with_settings(graph, width, height, seed, ForceSettings::default())
    }

    pub fn with_settings(
        graph: &TransactionGraph,
        width: f64,
        height: f64,
        seed: u64,
        settings: ForceSettings,
    ) -> Self {
        let initial_angle = PI * (3.0 - 5f64.sqrt());
        let mut index = HashMap::with_capacity(graph.nodes.len());
        let nodes: Vec<SimNode> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                index.insert(node.id.clone(), i);
                let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
                let angle = i as f64 * initial_angle;
                SimNode {
                    id: node.id.clone(),
                    x: radius * angle.cos(),
                    y: radius * angle.sin(),
                    vx: 0.0,
                    vy: 0.0,
                    fx: None,
                    fy: None,
                }
            })
            .collect();

        let mut links = Vec::with_capacity(graph.edges.len());
        for edge in &graph.edges {
            match (index.get(&edge.source), index.get(&edge.target)) {
                (Some(&source), Some(&target)) => links.push(SimLink {
                    source,
                    target,
                    strength: 0.0,
                    bias: 0.0,
                }),
                _ => warn!(
                    "Skipping edge {} -> {}: endpoint not in node list",
                    edge.source, edge.target
                ),
            }
        }

        let mut degree = vec![0usize; nodes.len()];
        for link in &links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }
        for link in &mut links {
            let (s, t) = (degree[link.source] as f64, degree[link.target] as f64);
            link.strength = 1.0 / s.min(t);
            link.bias = s / (s + t);
        }

        Self {
            nodes,
            index,
            links,
            settings,
            alpha: 1.0,
            alpha_target: 0.0,
            center: (width / 2.0, height / 2.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&SimNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    #[cfg(test)]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[cfg(test)]
    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn is_at_rest(&self) -> bool {
        self.alpha < self.settings.alpha_min
    }

    /// False while a drag holds the simulation hot; it will not come to
    /// rest until every pinned node is released.
    pub fn is_cooling(&self) -> bool {
        self.alpha_target < self.settings.alpha_min
    }

    pub fn positions(&self) -> HashMap<String, (f64, f64)> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), (n.x, n.y)))
            .collect()
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    /// Move the centering force, e.g. after the viewport was resized.
    pub fn set_center(&mut self, x: f64, y: f64) {
        self.center = (x, y);
    }

    /// Keep the simulation hot and pin `id` where it currently is.
    pub fn drag_start(&mut self, id: &str) -> AppResult<()> {
        let i = self.node_index(id)?;
        self.alpha_target = 0.3;
        let node = &mut self.nodes[i];
        node.fx = Some(node.x);
        node.fy = Some(node.y);
        Ok(())
    }

    pub fn drag_to(&mut self, id: &str, x: f64, y: f64) -> AppResult<()> {
        let i = self.node_index(id)?;
        let node = &mut self.nodes[i];
        node.fx = Some(x);
        node.fy = Some(y);
        Ok(())
    }

    /// Release the pin. The simulation cools down again once no other
    /// node is still being dragged.
    pub fn drag_end(&mut self, id: &str) -> AppResult<()> {
        let i = self.node_index(id)?;
        let node = &mut self.nodes[i];
        node.fx = None;
        node.fy = None;
        if self.nodes.iter().all(|n| n.fx.is_none()) {
            self.alpha_target = 0.0;
        }
        Ok(())
    }

    /// Advance one step. Cooling happens first, then forces, then integration.
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.settings.alpha_decay;

        self.apply_links();
        self.apply_charge();
        self.apply_center();

        let decay = 1.0 - self.settings.velocity_decay;
        for node in &mut self.nodes {
            match node.fx {
                Some(fx) => {
                    node.x = fx;
                    node.vx = 0.0;
                }
                None => {
                    node.vx *= decay;
                    node.x += node.vx;
                }
            }
            match node.fy {
                Some(fy) => {
                    node.y = fy;
                    node.vy = 0.0;
                }
                None => {
                    node.vy *= decay;
                    node.y += node.vy;
                }
            }
        }
    }

    /// Tick until at rest or `max_ticks` is reached; returns ticks taken.
    pub fn run_to_rest(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while !self.is_at_rest() && ticks < max_ticks {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    fn node_index(&self, id: &str) -> AppResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("node {}", id)))
    }

    fn jiggle(&mut self) -> f64 {
        (self.rng.random::<f64>() - 0.5) * 1e-6
    }

    fn apply_links(&mut self) {
        for l in 0..self.links.len() {
            let SimLink { source, target, strength, bias } = self.links[l];
            let (s, t) = (&self.nodes[source], &self.nodes[target]);
            let mut x = t.x + t.vx - s.x - s.vx;
            let mut y = t.y + t.vy - s.y - s.vy;
            if x == 0.0 {
                x = self.jiggle();
            }
            if y == 0.0 {
                y = self.jiggle();
            }
            let length = (x * x + y * y).sqrt();
            let k = (length - self.settings.link_distance) / length * self.alpha * strength;
            x *= k;
            y *= k;

            let t = &mut self.nodes[target];
            t.vx -= x * bias;
            t.vy -= y * bias;
            let s = &mut self.nodes[source];
            s.vx += x * (1.0 - bias);
            s.vy += y * (1.0 - bias);
        }
    }

    // Exact pairwise summation; transaction neighbourhoods are small.
    fn apply_charge(&mut self) {
        let n = self.nodes.len();
        let distance_min2 = self.settings.charge_distance_min * self.settings.charge_distance_min;
        let scale = self.settings.charge_strength * self.alpha;
        let mut deltas = vec![(0.0, 0.0); n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut x = self.nodes[j].x - self.nodes[i].x;
                let mut y = self.nodes[j].y - self.nodes[i].y;
                let mut l = x * x + y * y;
                if x == 0.0 {
                    x = self.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.jiggle();
                    l += y * y;
                }
                if l < distance_min2 {
                    l = (distance_min2 * l).sqrt();
                }
                deltas[i].0 += x * scale / l;
                deltas[i].1 += y * scale / l;
            }
        }

        for (node, (dx, dy)) in self.nodes.iter_mut().zip(deltas) {
            node.vx += dx;
            node.vy += dy;
        }
    }

    fn apply_center(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        let n = self.nodes.len() as f64;
        let (sx, sy) = self
            .nodes
            .iter()
            .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
        let shift_x = sx / n - self.center.0;
        let shift_y = sy / n - self.center.1;
        for node in &mut self.nodes {
            node.x -= shift_x;
            node.y -= shift_y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GraphEdge, GraphNode};

    fn star(leaves: usize) -> TransactionGraph {
        let nodes = (0..=leaves)
            .map(|i| GraphNode {
                id: i.to_string(),
                label: format!("0x{:040x}", i),
            })
            .collect();
        let edges = (1..=leaves)
            .map(|i| GraphEdge {
                source: "0".into(),
                target: i.to_string(),
                value: 1.0,
                timestamp: "2018-05-05 02:36:05".into(),
            })
            .collect();
        TransactionGraph { nodes, edges }
    }

    #[test]
    fn test_cools_down_in_bounded_ticks() {
        let mut sim = Simulation::new(&star(6), 800.0, 600.0, 7);
        let ticks = sim.run_to_rest(10_000);
        assert!(sim.is_at_rest());
        assert!((295..=305).contains(&ticks), "took {} ticks", ticks);
        assert!(sim.nodes().iter().all(|n| n.x.is_finite() && n.y.is_finite()));
    }

    #[test]
    fn test_layout_is_centered() {
        let mut sim = Simulation::new(&star(8), 800.0, 600.0, 7);
        sim.run_to_rest(10_000);
        let n = sim.nodes().len() as f64;
        let mean_x = sim.nodes().iter().map(|n| n.x).sum::<f64>() / n;
        let mean_y = sim.nodes().iter().map(|n| n.y).sum::<f64>() / n;
        assert!((mean_x - 400.0).abs() < 1.0, "mean x {}", mean_x);
        assert!((mean_y - 300.0).abs() < 1.0, "mean y {}", mean_y);
    }

    #[test]
    fn test_unlinked_nodes_repel() {
        let mut graph = star(1);
        graph.edges.clear();
        let mut sim = Simulation::new(&graph, 800.0, 600.0, 7);
        let distance = |sim: &Simulation| {
            let (a, b) = (&sim.nodes()[0], &sim.nodes()[1]);
            ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
        };
        let before = distance(&sim);
        sim.run_to_rest(10_000);
        assert!(distance(&sim) > before * 5.0);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut a = Simulation::new(&star(5), 800.0, 600.0, 11);
        let mut b = Simulation::new(&star(5), 800.0, 600.0, 11);
        a.run_to_rest(10_000);
        b.run_to_rest(10_000);
        assert_eq!(a.nodes(), b.nodes());
    }

    #[test]
    fn test_drag_pins_and_releases() {
        let mut sim = Simulation::new(&star(4), 800.0, 600.0, 7);
        sim.run_to_rest(10_000);

        sim.drag_start("2").unwrap();
        assert_eq!(sim.alpha_target(), 0.3);
        sim.drag_to("2", 100.0, 120.0).unwrap();
        for _ in 0..50 {
            sim.tick();
        }
        let pinned = sim.node("2").unwrap();
        assert_eq!((pinned.x, pinned.y), (100.0, 120.0));
        assert!(!sim.is_at_rest());

        sim.drag_end("2").unwrap();
        assert_eq!(sim.alpha_target(), 0.0);
        assert!(sim.node("2").unwrap().fx.is_none());
        sim.run_to_rest(10_000);
        assert!(sim.is_at_rest());
    }

    #[test]
    fn test_overlapping_drags_keep_simulation_hot() {
        let mut sim = Simulation::new(&star(4), 800.0, 600.0, 7);
        sim.run_to_rest(10_000);

        sim.drag_start("1").unwrap();
        sim.drag_start("2").unwrap();
        sim.drag_end("1").unwrap();
        assert_eq!(sim.alpha_target(), 0.3);
        assert!(!sim.is_cooling());
        assert!(sim.node("2").unwrap().fx.is_some());

        sim.drag_end("2").unwrap();
        assert_eq!(sim.alpha_target(), 0.0);
        assert!(sim.is_cooling());
    }

    #[test]
    fn test_drag_unknown_node() {
        let mut sim = Simulation::new(&star(2), 800.0, 600.0, 7);
        assert!(matches!(sim.drag_start("missing"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_dangling_edges_are_skipped() {
        let mut graph = star(2);
        graph.edges.push(GraphEdge {
            source: "0".into(),
            target: "99".into(),
            value: 1.0,
            timestamp: String::new(),
        });
        let sim = Simulation::new(&graph, 800.0, 600.0, 7);
        assert_eq!(sim.link_count(), 2);
    }

    #[test]
    fn test_empty_graph_ticks() {
        let mut sim = Simulation::new(&TransactionGraph::default(), 800.0, 600.0, 7);
        sim.tick();
        assert!(sim.nodes().is_empty());
    }
}
