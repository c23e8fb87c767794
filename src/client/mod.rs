pub mod mirror;
pub mod tasks;

// Re-export the modules
pub use mirror::TaskMirror;
pub use tasks::*;
