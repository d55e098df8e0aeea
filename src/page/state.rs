use crate::core::is_valid_ethereum_address;
use crate::error::AppResult;
use crate::models::{ClassificationRequest, ClassificationResult};
use tracing::{debug, warn};

pub const CLASSIFY_ERROR_MESSAGE: &str = "Failed to classify the wallet. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum PageStatus {
    Idle,
    /// Carries nothing: a stale result can never sit next to the spinner.
    Loading,
    Success(ClassificationResult),
    Error(String),
}

/// A request the page wants sent. `token` must be handed back to
/// [`PageModel::complete`] with the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub token: u64,
    pub request: ClassificationRequest,
}

#[derive(Debug, Clone)]
pub struct PageModel {
    wallet_address: String,
    model_name: String,
    status: PageStatus,
    latest_token: u64,
    queried_address: Option<String>,
}

impl PageModel {
    pub fn new(wallet_address: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            model_name: model_name.into(),
            status: PageStatus::Idle,
            latest_token: 0,
            queried_address: None,
        }
    }

    pub fn wallet_address(&self) -> &str {
        &self.wallet_address
    }

    pub fn set_wallet_address(&mut self, address: impl Into<String>) {
        self.wallet_address = address.into();
    }

    pub fn can_submit(&self) -> bool {
        is_valid_ethereum_address(&self.wallet_address)
    }

    /// Start a classification for the current address. Refused (no state
    /// change) unless the address is well formed.
    pub fn submit(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            debug!("Refusing submission of invalid address {:?}", self.wallet_address);
            return None;
        }
        self.latest_token += 1;
        self.status = PageStatus::Loading;
        self.queried_address = Some(self.wallet_address.clone());
        Some(Submission {
            token: self.latest_token,
            request: ClassificationRequest::new(self.wallet_address.clone(), self.model_name.clone()),
        })
    }

    /// Apply the outcome of submission `token`. Returns false, leaving the
    /// state untouched, when a newer submission has been issued since.
    pub fn complete(&mut self, token: u64, outcome: AppResult<ClassificationResult>) -> bool {
        if token != self.latest_token {
            debug!("Discarding stale response {} (latest {})", token, self.latest_token);
            return false;
        }
        self.status = match outcome {
            Ok(result) => PageStatus::Success(result),
            Err(e) => {
                warn!("Error classifying wallet: {}", e);
                PageStatus::Error(CLASSIFY_ERROR_MESSAGE.to_string())
            }
        };
        true
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        matches!(self.status, PageStatus::Loading)
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        match &self.status {
            PageStatus::Success(result) => Some(result),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            PageStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Address of the most recent submission, used to find the central node.
    pub fn queried_address(&self) -> Option<&str> {
        self.queried_address.as_deref()
    }

    #[cfg(test)]
    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }
}
