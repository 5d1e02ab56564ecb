pub mod config;
pub mod geometry;
pub mod layered;

pub use config::LayoutConfig;
pub use geometry::*;
pub use layered::{HierarchicalLayout, LayeredLayout, LayoutNode, auto_layout};
