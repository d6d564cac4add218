//! Pairwise similarity scoring between two fragments.

mod ratio;

pub use ratio::score;
