use std::sync::Arc;
use crate::{
    config::Config,
    error::AppResult,
    infrastructure::{ClassifierInterface, HttpClassifier},
    page::PageController,
};

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn ClassifierInterface>,
    pub page: Arc<PageController>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let classifier = HttpClassifier::from_config(&config.classifier)?;
        tracing::info!("Forwarding classifications to {}", classifier.endpoint());
        Ok(Self::with_classifier(config, Arc::new(classifier)))
    }

    /// Build the state around any classifier; the proxy route and the page
    /// share it.
    pub fn with_classifier(config: Config, classifier: Arc<dyn ClassifierInterface>) -> Self {
        let page = Arc::new(PageController::new(
            classifier.clone(),
            &config.classifier,
            config.layout.clone(),
        ));
        Self {
            classifier,
            page,
            config,
        }
    }
}
