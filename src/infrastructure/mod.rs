// Infrastructure - external service clients and their seams
pub mod classifier;            // Remote inference client
pub mod traits;                // Infrastructure traits

pub use classifier::HttpClassifier;
pub use traits::ClassifierInterface;
