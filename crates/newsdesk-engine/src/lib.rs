pub mod editing;
pub mod models;
pub mod wire;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{commands::*, editor::*, patch::*, session::*};
pub use models::{block::*, document::*};
pub use wire::{WireBlock, WireError, payload::*};
