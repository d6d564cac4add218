//! Parallel match driver: candidate generation, batching, scoring, and
//! batch-order merge.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use rustc_hash::FxHashMap;

use super::cancel::CancelToken;
use crate::error::{DuplexError, Result};
use crate::model::{Fragment, FragmentId, Match};
use crate::scorer::score;
use crate::index::BucketIndex;

/// Caller progress callback: `(fraction_in_[0,1], batches_done, total_batches)`.
pub type ProgressFn<'a> = dyn Fn(f64, u64, u64) + Sync + 'a;

/// One A fragment alongside its de-duplicated B candidate ids.
struct CandidateGroup<'a> {
    a: &'a Fragment,
    candidates: Vec<FragmentId>,
}

pub struct MatchOutcome {
    pub matches: Vec<Match>,
    pub candidate_pairs_considered: u64,
    pub cancelled: bool,
}

/// Run the full match stage: candidate generation, batching, parallel
/// scoring, and batch-order merge.
///
/// `worker_count` workers score batches of candidate pairs; progress is
/// invoked from this (driver) thread only, once per batch, never from a
/// worker. The cancel token is polled between pair evaluations inside
/// each batch and between batches in the driver loop.
pub fn run_match(
    fragments_a: &[Fragment],
    fragments_b: &[Fragment],
    index: &BucketIndex,
    tau: f64,
    worker_count: usize,
    progress: Option<&ProgressFn<'_>>,
    cancel: Option<&CancelToken>,
) -> Result<MatchOutcome> {
    // 1. Candidate generation (single-threaded).
    let mut groups = Vec::with_capacity(fragments_a.len());
    let mut total_pairs: u64 = 0;
    for a in fragments_a {
        let candidates = index.candidates_for(&a.sketch_keys);
        total_pairs += candidates.len() as u64;
        groups.push(CandidateGroup { a, candidates });
    }

    if total_pairs == 0 {
        return Ok(MatchOutcome {
            matches: Vec::new(),
            candidate_pairs_considered: 0,
            cancelled: false,
        });
    }

    let b_by_id: FxHashMap<FragmentId, &Fragment> =
        fragments_b.iter().map(|f| (f.id, f)).collect();

    // 2. Batching: contiguous runs of A fragments, aiming for
    // max(100, total/W) candidate pairs per batch.
    let worker_count = worker_count.max(1);
    let batch_target = (total_pairs / worker_count as u64).max(100);

    let mut batches: Vec<Vec<&CandidateGroup>> = Vec::new();
    let mut current: Vec<&CandidateGroup> = Vec::new();
    let mut current_count: u64 = 0;
    for group in &groups {
        current.push(group);
        current_count += group.candidates.len() as u64;
        if current_count >= batch_target {
            batches.push(std::mem::take(&mut current));
            current_count = 0;
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }

    let total_batches = batches.len() as u64;
    let pool = ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .build()
        .map_err(|e| DuplexError::Internal { detail: e.to_string() })?;

    // 3-5. Parallel scoring per batch, driver-side merge and progress.
    let mut all_matches = Vec::new();
    let mut cancelled = false;

    for (batch_idx, batch) in batches.iter().enumerate() {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            cancelled = true;
            break;
        }

        let batch_matches: Vec<Match> = pool.install(|| {
            batch
                .par_iter()
                .flat_map_iter(|group| {
                    let mut local = Vec::new();
                    for &b_id in &group.candidates {
                        if cancel.is_some_and(CancelToken::is_cancelled) {
                            break;
                        }
                        if let Some(&b_frag) = b_by_id.get(&b_id) {
                            let (s, ops) = score(&group.a.display_text, &b_frag.display_text);
                            if s >= tau {
                                local.push(Match {
                                    frag_a: group.a.clone(),
                                    frag_b: b_frag.clone(),
                                    score: s,
                                    ops,
                                });
                            }
                        }
                    }
                    local
                })
                .collect()
        });

        all_matches.extend(batch_matches);

        if let Some(p) = progress {
            p((batch_idx + 1) as f64 / total_batches as f64, (batch_idx + 1) as u64, total_batches);
        }
    }

    Ok(MatchOutcome {
        matches: all_matches,
        candidate_pairs_considered: total_pairs,
        cancelled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParagraphId;
    use smol_str::SmolStr;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn fragment(id: usize, text: &str, keys: &[u32]) -> Fragment {
        Fragment {
            id: FragmentId::new(id),
            paragraph_id: ParagraphId::new(0),
            token_start: 0,
            window_n: 2,
            match_key: SmolStr::new(text),
            display_text: SmolStr::new(text),
            sketch_keys: keys.iter().copied().collect(),
            start_page: 1,
            start_line: 1,
        }
    }

    #[test]
    fn finds_exact_match() {
        let a = vec![fragment(0, "python314", &[1])];
        let b = vec![fragment(0, "python314", &[1]), fragment(1, "other", &[2])];
        let index = BucketIndex::build(&b);
        let outcome = run_match(&a, &b, &index, 0.75, 2, None, None).unwrap();
        assert_eq!(outcome.matches.len(), 1);
        assert!(outcome.matches[0].is_exact());
    }

    #[test]
    fn no_candidates_yields_empty_outcome() {
        let a = vec![fragment(0, "zzz", &[99])];
        let b = vec![fragment(0, "abc", &[1])];
        let index = BucketIndex::build(&b);
        let outcome = run_match(&a, &b, &index, 0.75, 2, None, None).unwrap();
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.candidate_pairs_considered, 0);
    }

    #[test]
    fn progress_invoked_once_per_batch_from_driver_thread() {
        let a: Vec<Fragment> = (0..250).map(|i| fragment(i, "python314", &[1])).collect();
        let b = vec![fragment(0, "python314", &[1])];
        let index = BucketIndex::build(&b);
        let calls = AtomicU64::new(0);
        let progress = |_frac: f64, _done: u64, _total: u64| {
            calls.fetch_add(1, Ordering::SeqCst);
        };
        let outcome = run_match(&a, &b, &index, 0.75, 2, Some(&progress), None).unwrap();
        assert_eq!(outcome.matches.len(), 250);
        assert!(calls.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn pre_cancelled_token_stops_before_any_batch() {
        let a = vec![fragment(0, "python314", &[1])];
        let b = vec![fragment(0, "python314", &[1])];
        let index = BucketIndex::build(&b);
        let token = CancelToken::new();
        token.cancel();
        let outcome = run_match(&a, &b, &index, 0.75, 2, None, Some(&token)).unwrap();
        assert!(outcome.cancelled);
        assert!(outcome.matches.is_empty());
    }
}
