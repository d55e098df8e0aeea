// Page controller - owns the page model, drives classification and the graph lifecycle

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use super::state::{PageModel, PageStatus};
use crate::config::{ClassifierConfig, LayoutConfig};
use crate::error::{AppError, AppResult};
use crate::graph::{
    build_scene, DragPhase, GraphScene, LayoutDriver, LayoutSnapshot, RenderInput, Simulation,
    Viewport,
};
use crate::infrastructure::ClassifierInterface;
use crate::models::ClassificationResult;

/// Everything the page template needs for one render.
#[derive(Debug, Clone)]
pub struct PageView {
    pub wallet_address: String,
    pub can_submit: bool,
    pub status: PageStatus,
    pub queried_address: Option<String>,
    pub scene: Option<GraphScene>,
}

pub struct PageController {
    model: Mutex<PageModel>,
    layout: Mutex<Option<Arc<LayoutDriver>>>,
    viewport: Mutex<Viewport>,
    classifier: Arc<dyn ClassifierInterface>,
    layout_config: LayoutConfig,
}

impl PageController {
    pub fn new(
        classifier: Arc<dyn ClassifierInterface>,
        classifier_config: &ClassifierConfig,
        layout_config: LayoutConfig,
    ) -> Self {
        Self {
            model: Mutex::new(PageModel::new(
                classifier_config.default_wallet_address.clone(),
                classifier_config.model_name.clone(),
            )),
            layout: Mutex::new(None),
            viewport: Mutex::new(Viewport {
                width: layout_config.width,
                height: layout_config.height,
            }),
            classifier,
            layout_config,
        }
    }

    /// Submit `address` for classification. The address is taken exactly as
    /// typed. The previous drawing is dropped right away; the returned task
    /// resolves once the outcome is applied. Overlapping submissions are not
    /// cancelled, only their stale answers are ignored.
    pub async fn submit(self: &Arc<Self>, address: String) -> AppResult<JoinHandle<()>> {
        let submission = {
            let mut model = self.model.lock().await;
            model.set_wallet_address(address);
            let Some(submission) = model.submit() else {
                return Err(AppError::InvalidAddress(model.wallet_address().to_string()));
            };
            self.layout.lock().await.take();
            submission
        };

        info!(
            "Classifying wallet {} (request {})",
            submission.request.wallet_address, submission.token
        );

        let this = Arc::clone(self);
        Ok(tokio::spawn(async move {
            let outcome = this.classifier.classify(&submission.request).await;
            this.finish(submission.token, outcome).await;
        }))
    }

    async fn finish(&self, token: u64, outcome: AppResult<ClassificationResult>) {
        let mut model = self.model.lock().await;
        if !model.complete(token, outcome) {
            return;
        }
        let Some(result) = model.result() else {
            return;
        };

        let viewport = *self.viewport.lock().await;
        let simulation = Simulation::new(
            &result.graph,
            viewport.width,
            viewport.height,
            self.layout_config.seed,
        );
        info!(
            "Wallet classified: p = {:.4}, {} nodes, {} edges",
            result.fraud_probability,
            result.graph.nodes.len(),
            result.graph.edges.len()
        );
        let driver = LayoutDriver::spawn(
            simulation,
            viewport,
            Duration::from_millis(self.layout_config.tick_interval_ms.max(1)),
        );
        *self.layout.lock().await = Some(Arc::new(driver));
    }

    async fn current_layout(&self) -> AppResult<Arc<LayoutDriver>> {
        self.layout
            .lock()
            .await
            .clone()
            .ok_or_else(|| AppError::NotFound("no graph is displayed".to_string()))
    }

    pub async fn view(&self, focus: Option<&str>) -> PageView {
        let model = self.model.lock().await;
        let layout = self.layout.lock().await;

        let scene = match (model.result(), layout.as_ref(), model.queried_address()) {
            (Some(result), Some(driver), Some(central)) => {
                let snapshot = driver.snapshot().await;
                let positions = snapshot.positions();
                Some(build_scene(&RenderInput {
                    result,
                    positions: &positions,
                    viewport: snapshot.viewport,
                    central_address: central,
                    focus,
                }))
            }
            _ => None,
        };

        PageView {
            wallet_address: model.wallet_address().to_string(),
            can_submit: model.can_submit(),
            status: model.status().clone(),
            queried_address: model.queried_address().map(str::to_string),
            scene,
        }
    }

    pub async fn layout_snapshot(&self) -> AppResult<LayoutSnapshot> {
        Ok(self.current_layout().await?.snapshot().await)
    }

    pub async fn drag(&self, node_id: &str, phase: DragPhase, x: f64, y: f64) -> AppResult<()> {
        self.current_layout().await?.drag(node_id, phase, x, y).await
    }

    /// Remember the viewport for future layouts and recenter the current one.
    pub async fn resize(&self, viewport: Viewport) -> AppResult<()> {
        if !(viewport.width > 0.0 && viewport.height > 0.0) {
            return Err(AppError::BadRequest(format!(
                "viewport must be positive, got {}x{}",
                viewport.width, viewport.height
            )));
        }
        *self.viewport.lock().await = viewport;
        if let Ok(driver) = self.current_layout().await {
            driver.resize(viewport).await;
        }
        Ok(())
    }

    /// Wait for the current layout, if any, to come to rest.
    pub async fn settle(&self) {
        if let Ok(driver) = self.current_layout().await {
            driver.settle().await;
        }
    }
}
