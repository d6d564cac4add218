use indexmap::IndexMap;

use super::fragment::Fragment;

/// A surviving scored pair, produced by the scorer and carried through
/// ranking/dedup before reification.
#[derive(Debug, Clone)]
pub struct Match {
    pub frag_a: Fragment,
    pub frag_b: Fragment,
    pub score: f64,
    /// Human-readable edit-script summary; `["identical"]` when `score == 1.0`.
    pub ops: Vec<String>,
}

impl Match {
    pub fn is_exact(&self) -> bool {
        self.score >= 1.0
    }
}

/// A reified output row: a surviving match plus the raw-text context
/// windows reconstructed around each fragment in its source paragraph.
#[derive(Debug, Clone)]
pub struct MatchContext {
    pub frag_a: Fragment,
    pub frag_b: Fragment,
    pub score: f64,
    pub ops: Vec<String>,
    pub context_before_a: String,
    pub context_after_a: String,
    pub context_before_b: String,
    pub context_after_b: String,
}

/// Score-band counts: `>0.9`, `(0.8, 0.9]`, `[tau, 0.8]`.
///
/// Kept as an [`IndexMap`] rather than a plain struct so the bands can be
/// serialized and iterated in the fixed, human-meaningful order they are
/// declared in rather than alphabetically.
#[derive(Debug, Clone)]
pub struct Histogram {
    bands: IndexMap<&'static str, u64>,
}

impl Histogram {
    pub const HIGH: &'static str = ">0.9";
    pub const MEDIUM: &'static str = "(0.8, 0.9]";
    pub const LOW: &'static str = "[tau, 0.8]";

    pub fn empty() -> Self {
        let mut bands = IndexMap::new();
        bands.insert(Self::HIGH, 0);
        bands.insert(Self::MEDIUM, 0);
        bands.insert(Self::LOW, 0);
        Self { bands }
    }

    pub fn record(&mut self, score: f64) {
        let band = if score > 0.9 {
            Self::HIGH
        } else if score > 0.8 {
            Self::MEDIUM
        } else {
            Self::LOW
        };
        *self.bands.entry(band).or_insert(0) += 1;
    }

    pub fn get(&self, band: &str) -> u64 {
        self.bands.get(band).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.bands.iter().map(|(k, v)| (*k, *v))
    }
}

/// Per-stage elapsed wall time, in milliseconds, for one `compare` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageTimings {
    pub validate_ms: u64,
    pub ingest_ms: u64,
    pub normalize_ms: u64,
    pub tokenize_window_ms: u64,
    pub match_ms: u64,
    pub rank_dedup_ms: u64,
    pub reify_ms: u64,
}

impl StageTimings {
    pub fn total_ms(&self) -> u64 {
        self.validate_ms
            + self.ingest_ms
            + self.normalize_ms
            + self.tokenize_window_ms
            + self.match_ms
            + self.rank_dedup_ms
            + self.reify_ms
    }
}

/// Complete output of one `compare` invocation.
#[derive(Debug, Clone)]
pub struct CompareResult {
    pub total_fragments_a: usize,
    pub total_fragments_b: usize,
    pub candidate_pairs_considered: u64,
    pub matches: Vec<MatchContext>,
    pub histogram: Histogram,
    pub score_min: f64,
    pub score_max: f64,
    pub score_mean: f64,
    pub elapsed_ms: StageTimings,
}

impl CompareResult {
    /// Fraction of the full `|A| x |B|` cross product that was actually
    /// scored, after sketch-key pre-filtering. Observability only; the
    /// scorer remains the sole acceptance authority regardless of this
    /// ratio.
    pub fn reduction_ratio(&self) -> f64 {
        let total = self.total_fragments_a as f64 * self.total_fragments_b as f64;
        if total == 0.0 {
            0.0
        } else {
            self.candidate_pairs_considered as f64 / total
        }
    }

    pub fn empty() -> Self {
        Self {
            total_fragments_a: 0,
            total_fragments_b: 0,
            candidate_pairs_considered: 0,
            matches: Vec::new(),
            histogram: Histogram::empty(),
            score_min: f64::NAN,
            score_max: f64::NAN,
            score_mean: f64::NAN,
            elapsed_ms: StageTimings::default(),
        }
    }
}
