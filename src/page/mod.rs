// Page component - UI state machine and its orchestration

pub mod controller;
pub mod state;

pub use controller::{PageController, PageView};
pub use state::{PageModel, PageStatus, Submission, CLASSIFY_ERROR_MESSAGE};
