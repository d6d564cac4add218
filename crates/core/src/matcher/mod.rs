//! Parallel match stage: scores A's fragments against B's candidates.

mod cancel;
mod driver;

pub use cancel::CancelToken;
pub use driver::{run_match, MatchOutcome, ProgressFn};
