pub mod branch;
pub mod document;
pub mod edit;
pub mod header;
pub mod operation;
pub mod pipeline;
pub mod step;

pub use branch::*;
pub use document::*;
pub use header::*;
pub use operation::*;
pub use pipeline::*;
pub use step::*;
