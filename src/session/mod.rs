pub mod change;
pub mod config;
pub mod controller;
pub mod debounce;

pub use change::GraphChange;
pub use config::SessionConfig;
pub use controller::{EditSession, SessionAction, SessionState};
pub use debounce::Debouncer;
