// Transaction graph layout and rendering

pub mod driver;
pub mod render;
pub mod simulation;

pub use driver::{DragPhase, LayoutDriver, LayoutSnapshot, NodePosition, Viewport};
pub use render::{build_scene, escape_markup, GraphScene, NodeKind, RenderInput};
pub use simulation::{ForceSettings, Simulation};
