pub mod convert;
pub mod core;
pub mod filing;
pub mod scramble;
pub mod utils;

// Re-exports
pub use core::config::ToolsConfig;
pub use utils::progress::ProgressTracker;
