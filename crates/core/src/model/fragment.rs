use smallvec::SmallVec;
use smol_str::SmolStr;

use super::ids::{FragmentId, ParagraphId};

/// A fragment's sketch keys are few (1-5) and live inline — they are
/// produced once per fragment and never grow after construction, so a
/// heap allocation per fragment would be pure waste (see the design notes
/// on avoiding per-insertion allocation for small lists).
pub type SketchKeys = SmallVec<[u32; 5]>;

/// A length-`window_n` window of tokens from one paragraph.
///
/// `match_key` is the concatenation of the window's token texts with no
/// separators — the unit of equality for dedup and the scorer's input.
/// `display_text` is the human-readable rendering, with a single ASCII
/// space inserted between adjacent Latin/Digit tokens.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub id: FragmentId,
    pub paragraph_id: ParagraphId,
    pub token_start: usize,
    pub window_n: usize,
    pub match_key: SmolStr,
    pub display_text: SmolStr,
    pub sketch_keys: SketchKeys,
    pub start_page: u32,
    pub start_line: u32,
}

impl Fragment {
    pub fn token_end(&self) -> usize {
        self.token_start + self.window_n
    }
}
