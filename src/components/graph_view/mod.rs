mod component;
pub mod scene;
pub mod state;
mod types;

pub use component::GraphView;
pub use types::{GraphData, GraphLink, GraphNode};
