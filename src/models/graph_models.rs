use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    /// Hex wallet address.
    pub label: String,
}

/// One transfer between two wallets. Several edges may join the same pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub value: f64, // ETH
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphEdge {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// `"0.75 ETH on 5/6/2018"`; the raw timestamp is kept when it does not parse.
    pub fn tooltip(&self) -> String {
        let date = parse_timestamp(&self.timestamp)
            .map(|ts| ts.format("%-m/%-d/%Y").to_string())
            .unwrap_or_else(|| self.timestamp.clone());
        format!("{} ETH on {}", self.value, date)
    }
}

impl TransactionGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_touching<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.touches(node_id))
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(timestamp: &str, value: f64) -> GraphEdge {
        GraphEdge {
            source: "0".into(),
            target: "1".into(),
            value,
            timestamp: timestamp.into(),
        }
    }

    #[test]
    fn test_tooltip_formats_date() {
        assert_eq!(edge("2018-05-06 06:07:31", 0.75).tooltip(), "0.75 ETH on 5/6/2018");
        assert_eq!(edge("2018-05-17T16:22:39Z", 30.0).tooltip(), "30 ETH on 5/17/2018");
        assert_eq!(edge("2018-12-01", 1.5).tooltip(), "1.5 ETH on 12/1/2018");
    }

    #[test]
    fn test_tooltip_keeps_unparseable_timestamp() {
        assert_eq!(edge("yesterday", 1.0).tooltip(), "1 ETH on yesterday");
    }

    #[test]
    fn test_edges_touching() {
        let graph = TransactionGraph {
            nodes: vec![],
            edges: vec![edge("", 1.0), GraphEdge { source: "1".into(), target: "2".into(), value: 2.0, timestamp: String::new() }],
        };
        assert_eq!(graph.edges_touching("0").count(), 1);
        assert_eq!(graph.edges_touching("1").count(), 2);
        assert_eq!(graph.edges_touching("9").count(), 0);
    }
}
