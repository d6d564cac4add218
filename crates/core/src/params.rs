//! Recognized `compare` options, their defaults, and the Validate stage
//! of the pipeline.

use crate::error::{DuplexError, Result};

#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    /// Token window length. Must be >= 2.
    pub window_n: usize,
    /// Similarity acceptance threshold tau, in [0, 1].
    pub similarity_threshold: f64,
    /// Fragment cap per document, with uniform-stride subsampling above it.
    /// Must be >= 100.
    pub max_fragments_per_doc: usize,
    /// Valid-codepoint context window around each match, in the rendered
    /// report.
    pub context_chars: usize,
    /// Worker count for the parallel match stage. Must be >= 1.
    pub worker_count: usize,
    /// Paragraphs whose clean text is shorter than this are dropped before
    /// tokenization.
    pub min_clean_paragraph_len: usize,
    /// Caller preference for `EmptyDocument` handling: when `false` (the
    /// default), a document with zero paragraphs after normalization
    /// yields an empty `CompareResult` rather than an error.
    pub fail_on_empty_document: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            window_n: 8,
            similarity_threshold: 0.75,
            max_fragments_per_doc: 10_000,
            context_chars: 100,
            worker_count: default_worker_count(),
            min_clean_paragraph_len: 3,
            fail_on_empty_document: false,
        }
    }
}

/// `min(8, hardware parallelism)`, falling back to 1 if the platform can't
/// report parallelism.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8))
        .unwrap_or(1)
}

impl Params {
    /// The Validate stage: reject out-of-range parameters before any work
    /// is done.
    pub fn validate(&self) -> Result<()> {
        if self.window_n < 2 {
            return Err(DuplexError::InvalidParam {
                which: "window_n",
                detail: format!("must be >= 2, got {}", self.window_n),
            });
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(DuplexError::InvalidParam {
                which: "similarity_threshold",
                detail: format!("must be in [0, 1], got {}", self.similarity_threshold),
            });
        }
        if self.max_fragments_per_doc < 100 {
            return Err(DuplexError::InvalidParam {
                which: "max_fragments_per_doc",
                detail: format!("must be >= 100, got {}", self.max_fragments_per_doc),
            });
        }
        if self.worker_count < 1 {
            return Err(DuplexError::InvalidParam {
                which: "worker_count",
                detail: format!("must be >= 1, got {}", self.worker_count),
            });
        }
        Ok(())
    }
}
