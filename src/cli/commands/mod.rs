//! Command implementations for the rapport CLI
//!
//! Each command has its own module/file.

pub mod annotate;
pub mod render;
pub mod score;

// Re-export argument types for parser
pub use annotate::AnnotateArgs;
pub use render::RenderArgs;
pub use score::ScoreArgs;
