//! The `compare` entry point and the seven-stage pipeline / six-state
//! state machine that drives it.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::{DuplexError, Result};
use crate::fragment::generate_document_fragments;
use crate::index::BucketIndex;
use crate::ingest::LineStream;
use crate::matcher::{run_match, CancelToken, ProgressFn};
use crate::model::{CompareResult, Histogram, Line, StageTimings};
use crate::normalize::assemble_paragraphs;
use crate::params::Params;
use crate::rank::rank_and_dedup;
use crate::reify::reify;
use crate::tokenize::tokenize;

/// The six reachable terminal/non-terminal states of one `compare` call.
/// `Done` carries no payload here; the payload is the function's return
/// value instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareState {
    Init,
    Validated,
    Ingested,
    Normalized,
    Matched,
    Ranked,
    Done,
    Cancelled,
    Failed,
}

/// Run one comparison of two documents end to end.
///
/// `doc_a`/`doc_b` are drained exactly once, in order (the `LineStream`
/// contract). `progress` is invoked from this thread only, after each
/// match-stage batch; `cancel`, if set before or during the match stage,
/// short-circuits to a `Cancelled` result with no match payload
/// (modeled here as `Ok(CompareResult::empty())` carrying `elapsed_ms`
/// up to the point of cancellation — callers that need to distinguish
/// "cancelled" from "no matches found" should check their own token).
pub fn compare(
    doc_a: impl LineStream,
    doc_b: impl LineStream,
    params: &Params,
    progress: Option<&ProgressFn<'_>>,
    cancel: Option<&CancelToken>,
) -> Result<CompareResult> {
    let mut timings = StageTimings::default();
    let mut state = CompareState::Init;

    // --- Validate ---------------------------------------------------
    let t0 = Instant::now();
    if let Err(e) = params.validate() {
        state = CompareState::Failed;
        debug!(?state, "validate failed: {e}");
        return Err(e);
    }
    state = CompareState::Validated;
    timings.validate_ms = elapsed_ms(t0);

    // --- Ingest -------------------------------------------------------
    let t0 = Instant::now();
    let lines_a: Vec<Line> = doc_a.into_iter().collect();
    let lines_b: Vec<Line> = doc_b.into_iter().collect();
    state = CompareState::Ingested;
    timings.ingest_ms = elapsed_ms(t0);
    info!(lines_a = lines_a.len(), lines_b = lines_b.len(), "ingested line streams");

    // --- Normalize ------------------------------------------------------
    let t0 = Instant::now();
    let mut paragraphs_a = assemble_paragraphs(&lines_a, params.min_clean_paragraph_len);
    let mut paragraphs_b = assemble_paragraphs(&lines_b, params.min_clean_paragraph_len);
    for p in paragraphs_a.iter_mut() {
        p.tokens = tokenize(&p.clean_text);
    }
    for p in paragraphs_b.iter_mut() {
        p.tokens = tokenize(&p.clean_text);
    }
    state = CompareState::Normalized;
    timings.normalize_ms = elapsed_ms(t0);

    if paragraphs_a.is_empty() || paragraphs_b.is_empty() {
        if params.fail_on_empty_document {
            state = CompareState::Failed;
            let which = if paragraphs_a.is_empty() {
                crate::error::DocumentSlot::A
            } else {
                crate::error::DocumentSlot::B
            };
            debug!(?state, "empty document {which:?}");
            return Err(DuplexError::EmptyDocument { which });
        }
        info!("document yielded zero paragraphs; returning empty result");
        let mut result = CompareResult::empty();
        result.elapsed_ms = timings;
        return Ok(result);
    }

    // --- Tokenize & window ----------------------------------------------
    let t0 = Instant::now();
    let fragments_a =
        generate_document_fragments(&paragraphs_a, params.window_n, params.max_fragments_per_doc);
    let fragments_b =
        generate_document_fragments(&paragraphs_b, params.window_n, params.max_fragments_per_doc);
    timings.tokenize_window_ms = elapsed_ms(t0);
    info!(
        fragments_a = fragments_a.len(),
        fragments_b = fragments_b.len(),
        "generated fragments"
    );

    // --- Match ------------------------------------------------------------
    let t0 = Instant::now();
    let index = BucketIndex::build(&fragments_b);
    let outcome = run_match(
        &fragments_a,
        &fragments_b,
        &index,
        params.similarity_threshold,
        params.worker_count,
        progress,
        cancel,
    )?;
    state = CompareState::Matched;
    timings.match_ms = elapsed_ms(t0);

    if outcome.cancelled {
        state = CompareState::Cancelled;
        debug!(?state, "compare cancelled during match stage");
        return Err(DuplexError::Cancelled);
    }

    // --- Rank & dedup ----------------------------------------------------
    let t0 = Instant::now();
    let ranked = rank_and_dedup(outcome.matches, params.similarity_threshold);
    state = CompareState::Ranked;
    timings.rank_dedup_ms = elapsed_ms(t0);

    // --- Reify -------------------------------------------------------------
    let t0 = Instant::now();
    let mut histogram = Histogram::empty();
    let mut score_min = f64::INFINITY;
    let mut score_max = f64::NEG_INFINITY;
    let mut score_sum = 0.0;
    for m in &ranked {
        histogram.record(m.score);
        score_min = score_min.min(m.score);
        score_max = score_max.max(m.score);
        score_sum += m.score;
    }
    let count = ranked.len();
    let matches = reify(ranked, &paragraphs_a, &paragraphs_b, params.context_chars);
    timings.reify_ms = elapsed_ms(t0);
    state = CompareState::Done;
    debug!(?state, matches = count, "compare finished");

    Ok(CompareResult {
        total_fragments_a: fragments_a.len(),
        total_fragments_b: fragments_b.len(),
        candidate_pairs_considered: outcome.candidate_pairs_considered,
        matches,
        histogram,
        score_min: if count == 0 { f64::NAN } else { score_min },
        score_max: if count == 0 { f64::NAN } else { score_max },
        score_mean: if count == 0 { f64::NAN } else { score_sum / count as f64 },
        elapsed_ms: timings,
    })
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}
