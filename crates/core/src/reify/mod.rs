//! Reconstructs raw-text context windows around surviving matches.

mod context;

pub use context::reify;
