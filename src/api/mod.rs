//! API Lambda handler and request processing

pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod state;
pub mod transient;

// Re-export the main handler for convenience
pub use handler::function_handler as handler;
pub use state::AppState;
