pub mod dirs;
pub mod encoding;
pub mod progress;
