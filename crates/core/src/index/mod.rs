//! Sketch-key bucket index over one document's fragments.

mod bucket;

pub use bucket::BucketIndex;
