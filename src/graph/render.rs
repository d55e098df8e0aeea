// Graph renderer - pure scene construction and SVG serialization
//
// Every call draws the whole graph from scratch: the inputs are the result,
// the current node positions and the focused (hovered) node, nothing else.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use super::driver::Viewport;
use crate::core::same_address;
use crate::models::ClassificationResult;

const EDGE_STROKE: &str = "#555";
const EDGE_HIGHLIGHT: &str = "#facc15";
const DIMMED: &str = "#9ca3af";
const NODE_FILL: &str = "#6b7280";
const NODE_STROKE: &str = "#374151";
const LABEL_FILL: &str = "#d1d5db";
const LABEL_HIGHLIGHT: &str = "#ffffff";
const TOOLTIP_FILL: &str = "#facc15";
const NODE_RADIUS: f64 = 18.0;
const GLYPH_SIZE: f64 = 50.0;

pub struct RenderInput<'a> {
    pub result: &'a ClassificationResult,
    pub positions: &'a HashMap<String, (f64, f64)>,
    pub viewport: Viewport,
    /// Address that was submitted; picks the node drawn as the risk glyph.
    pub central_address: &'a str,
    /// Node id under the pointer, if any.
    pub focus: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeShape {
    pub source: String,
    pub target: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: &'static str,
    pub opacity: f64,
    pub highlighted: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKind {
    Circle { fill: &'static str },
    Glyph { emoji: &'static str },
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeShape {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub kind: NodeKind,
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelShape {
    pub node_id: String,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub fill: &'static str,
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TooltipShape {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphScene {
    pub width: f64,
    pub height: f64,
    pub focus: Option<String>,
    pub edges: Vec<EdgeShape>,
    pub tooltips: Vec<TooltipShape>,
    pub nodes: Vec<NodeShape>,
    pub labels: Vec<LabelShape>,
}

pub fn build_scene(input: &RenderInput<'_>) -> GraphScene {
    let graph = &input.result.graph;
    let band = input.result.risk_band();
    // Ignore focus on ids that are not in the graph.
    let focus = input.focus.filter(|id| graph.node(id).is_some());

    let mut neighbours: HashSet<&str> = HashSet::new();
    let mut edges = Vec::with_capacity(graph.edges.len());
    let mut tooltips = Vec::with_capacity(graph.edges.len());

    for edge in &graph.edges {
        let (Some(&(x1, y1)), Some(&(x2, y2))) = (
            input.positions.get(&edge.source),
            input.positions.get(&edge.target),
        ) else {
            continue;
        };

        let highlighted = focus.is_some_and(|id| edge.touches(id));
        if highlighted {
            neighbours.insert(edge.source.as_str());
            neighbours.insert(edge.target.as_str());
        }
        let (stroke, opacity) = match (focus, highlighted) {
            (None, _) => (EDGE_STROKE, 0.6),
            (Some(_), true) => (EDGE_HIGHLIGHT, 1.0),
            (Some(_), false) => (DIMMED, 0.1),
        };

        edges.push(EdgeShape {
            source: edge.source.clone(),
            target: edge.target.clone(),
            x1,
            y1,
            x2,
            y2,
            stroke,
            opacity,
            highlighted,
        });
        tooltips.push(TooltipShape {
            x: (x1 + x2) / 2.0,
            y: (y1 + y2) / 2.0,
            text: edge.tooltip(),
            visible: highlighted,
        });
    }

    let mut nodes = Vec::with_capacity(graph.nodes.len());
    let mut labels = Vec::with_capacity(graph.nodes.len());

    for node in &graph.nodes {
        let Some(&(x, y)) = input.positions.get(&node.id) else {
            continue;
        };
        let central = same_address(&node.label, input.central_address);
        let lit = focus.is_none()
            || central
            || focus == Some(node.id.as_str())
            || neighbours.contains(node.id.as_str());

        let kind = if central {
            NodeKind::Glyph { emoji: band.emoji() }
        } else {
            NodeKind::Circle {
                fill: if lit { NODE_FILL } else { DIMMED },
            }
        };
        nodes.push(NodeShape {
            id: node.id.clone(),
            x,
            y,
            kind,
            opacity: if lit { 1.0 } else { 0.2 },
        });

        let (fill, opacity) = if central {
            (band.color(), 1.0)
        } else if focus.is_none() {
            (LABEL_FILL, 1.0)
        } else if neighbours.contains(node.id.as_str()) {
            (LABEL_HIGHLIGHT, 1.0)
        } else {
            (DIMMED, 0.2)
        };
        labels.push(LabelShape {
            node_id: node.id.clone(),
            x,
            y,
            text: node.label.clone(),
            fill,
            opacity,
        });
    }

    GraphScene {
        width: input.viewport.width,
        height: input.viewport.height,
        focus: focus.map(str::to_string),
        edges,
        tooltips,
        nodes,
        labels,
    }
}

impl GraphScene {
    pub fn glyph_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Glyph { .. }))
            .count()
    }

    pub fn circle_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Circle { .. }))
            .count()
    }

    /// Nodes link to `?focus=<id>`; the focused node links back to `?`.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" id="graph" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
            w = self.width,
            h = self.height
        );

        svg.push_str(r#"<g class="edges">"#);
        for e in &self.edges {
            let _ = write!(
                svg,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="2" stroke-opacity="{}" data-source="{}" data-target="{}"/>"#,
                e.x1,
                e.y1,
                e.x2,
                e.y2,
                e.stroke,
                e.opacity,
                escape_markup(&e.source),
                escape_markup(&e.target)
            );
        }
        svg.push_str("</g>");

        svg.push_str(r#"<g class="edge-labels">"#);
        for t in self.tooltips.iter().filter(|t| t.visible) {
            let _ = write!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" font-size="12px" fill="{}" text-anchor="middle">{}</text>"#,
                t.x,
                t.y,
                TOOLTIP_FILL,
                escape_markup(&t.text)
            );
        }
        svg.push_str("</g>");

        svg.push_str(r#"<g class="nodes">"#);
        for n in &self.nodes {
            let href = if self.focus.as_deref() == Some(n.id.as_str()) {
                "?".to_string()
            } else {
                format!("?focus={}", escape_markup(&n.id))
            };
            let _ = write!(svg, r#"<a href="{}" data-node-id="{}">"#, href, escape_markup(&n.id));
            match &n.kind {
                NodeKind::Circle { fill } => {
                    let _ = write!(
                        svg,
                        r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}" stroke="{}" stroke-width="2" opacity="{}"/>"#,
                        n.x, n.y, NODE_RADIUS, fill, NODE_STROKE, n.opacity
                    );
                }
                NodeKind::Glyph { emoji } => {
                    let _ = write!(
                        svg,
                        r#"<text class="central" x="{:.2}" y="{:.2}" font-size="{}px" text-anchor="middle" dy="0.35em" opacity="{}">{}</text>"#,
                        n.x, n.y, GLYPH_SIZE, n.opacity, emoji
                    );
                }
            }
            svg.push_str("</a>");
        }
        svg.push_str("</g>");

        svg.push_str(r#"<g class="node-labels">"#);
        for l in &self.labels {
            let _ = write!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" dy="-25" font-size="14px" fill="{}" text-anchor="middle" opacity="{}">{}</text>"#,
                l.x,
                l.y,
                l.fill,
                l.opacity,
                escape_markup(&l.text)
            );
        }
        svg.push_str("</g></svg>");
        svg
    }
}

/// Escape text for HTML and SVG bodies and attribute values.
pub fn escape_markup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RiskBand;
    use crate::models::{GraphEdge, GraphNode, TransactionGraph};

    fn triangle() -> (ClassificationResult, HashMap<String, (f64, f64)>) {
        let nodes = vec![
            GraphNode { id: "0".into(), label: "0xAAAA".into() },
            GraphNode { id: "1".into(), label: "0xbbbb".into() },
            GraphNode { id: "2".into(), label: "0xcccc".into() },
            GraphNode { id: "3".into(), label: "0xdddd".into() },
        ];
        let edge = |s: &str, t: &str| GraphEdge {
            source: s.into(),
            target: t.into(),
            value: 2.5,
            timestamp: "2018-05-07 07:09:36".into(),
        };
        let result = ClassificationResult {
            fraud_probability: 0.1,
            graph: TransactionGraph {
                nodes,
                edges: vec![edge("0", "1"), edge("1", "2"), edge("2", "3")],
            },
        };
        let positions = (0..4)
            .map(|i| (i.to_string(), (i as f64 * 10.0, i as f64 * 20.0)))
            .collect();
        (result, positions)
    }

    fn scene(focus: Option<&str>) -> GraphScene {
        let (result, positions) = triangle();
        build_scene(&RenderInput {
            result: &result,
            positions: &positions,
            viewport: Viewport { width: 200.0, height: 100.0 },
            central_address: "0xaaaa",
            focus,
        })
    }

    #[test]
    fn test_central_node_is_glyph() {
        let scene = scene(None);
        assert_eq!(scene.glyph_count(), 1);
        assert_eq!(scene.circle_count(), 3);
        let glyph = scene.nodes.iter().find(|n| n.id == "0").unwrap();
        assert!(matches!(glyph.kind, NodeKind::Glyph { emoji: "😊" }));
        let label = scene.labels.iter().find(|l| l.node_id == "0").unwrap();
        assert_eq!(label.fill, RiskBand::Low.color());
    }

    #[test]
    fn test_no_focus_everything_plain() {
        let scene = scene(None);
        assert!(scene.edges.iter().all(|e| e.stroke == EDGE_STROKE && e.opacity == 0.6));
        assert!(scene.tooltips.iter().all(|t| !t.visible));
        assert!(scene.nodes.iter().all(|n| n.opacity == 1.0));
    }

    #[test]
    fn test_focus_highlights_touching_edges_only() {
        let scene = scene(Some("2"));
        for edge in &scene.edges {
            let touches = edge.source == "2" || edge.target == "2";
            assert_eq!(edge.highlighted, touches);
            if touches {
                assert_eq!((edge.stroke, edge.opacity), (EDGE_HIGHLIGHT, 1.0));
            } else {
                assert_eq!((edge.stroke, edge.opacity), (DIMMED, 0.1));
            }
        }
        let visible: Vec<_> = scene.tooltips.iter().filter(|t| t.visible).collect();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].text, "2.5 ETH on 5/7/2018");

        let opacity = |id: &str| scene.nodes.iter().find(|n| n.id == id).unwrap().opacity;
        assert_eq!(opacity("1"), 1.0);
        assert_eq!(opacity("2"), 1.0);
        assert_eq!(opacity("3"), 1.0);
        // central glyph never dims
        assert_eq!(opacity("0"), 1.0);
    }

    #[test]
    fn test_focus_dims_unrelated_nodes() {
        let scene = scene(Some("3"));
        let node = scene.nodes.iter().find(|n| n.id == "1").unwrap();
        assert_eq!(node.opacity, 0.2);
        assert!(matches!(node.kind, NodeKind::Circle { fill: DIMMED }));
        let label = scene.labels.iter().find(|l| l.node_id == "2").unwrap();
        assert_eq!((label.fill, label.opacity), (LABEL_HIGHLIGHT, 1.0));
    }

    #[test]
    fn test_duplicate_labels_do_not_leak_highlight() {
        let (mut result, positions) = triangle();
        result.graph.nodes[3].label = "0xbbbb".into();
        let scene = build_scene(&RenderInput {
            result: &result,
            positions: &positions,
            viewport: Viewport { width: 200.0, height: 100.0 },
            central_address: "0xaaaa",
            focus: Some("1"),
        });
        let highlighted: Vec<_> = scene
            .edges
            .iter()
            .filter(|e| e.highlighted)
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(highlighted, vec![("0", "1"), ("1", "2")]);
    }

    #[test]
    fn test_unknown_focus_is_ignored() {
        let scene = scene(Some("42"));
        assert!(scene.focus.is_none());
        assert!(scene.edges.iter().all(|e| !e.highlighted));
    }

    #[test]
    fn test_svg_output() {
        let svg = scene(Some("1")).to_svg();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches(r#"class="central""#).count(), 1);
        assert!(svg.contains("2.5 ETH on 5/7/2018"));
        assert!(svg.contains(r#"href="?focus=2""#));
        assert!(svg.contains(r#"<a href="?" data-node-id="1">"#));
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape_markup(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
