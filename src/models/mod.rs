// Wire and domain models for classification results

pub mod classification;
pub mod graph_models;

pub use classification::{ClassificationRequest, ClassificationResult};
pub use graph_models::{GraphEdge, GraphNode, TransactionGraph};
