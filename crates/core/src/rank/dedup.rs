//! Ranks surviving matches and deduplicates by fragment key pair.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashSet;

use crate::model::Match;

/// Discard sub-threshold matches (belt-and-braces; the scorer should
/// already have enforced this), deduplicate on `(match_key_a, match_key_b)`
/// keeping the first-encountered survivor, then sort by score descending
/// with a deterministic tie-break: smaller
/// `(B paragraph id, B token_start, A paragraph id, A token_start)` first.
pub fn rank_and_dedup(mut matches: Vec<Match>, tau: f64) -> Vec<Match> {
    matches.retain(|m| m.score >= tau);

    let mut seen: FxHashSet<(smol_str::SmolStr, smol_str::SmolStr)> = FxHashSet::default();
    matches.retain(|m| seen.insert((m.frag_a.match_key.clone(), m.frag_b.match_key.clone())));

    matches.sort_by_key(|m| {
        (
            Reverse(OrderedFloat(m.score)),
            m.frag_b.paragraph_id,
            m.frag_b.token_start,
            m.frag_a.paragraph_id,
            m.frag_a.token_start,
        )
    });

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fragment, FragmentId, ParagraphId};
    use smol_str::SmolStr;

    fn m(score: f64, key_a: &str, key_b: &str, para_b: usize, start_b: usize) -> Match {
        Match {
            frag_a: Fragment {
                id: FragmentId::new(0),
                paragraph_id: ParagraphId::new(0),
                token_start: 0,
                window_n: 2,
                match_key: SmolStr::new(key_a),
                display_text: SmolStr::new(key_a),
                sketch_keys: Default::default(),
                start_page: 1,
                start_line: 1,
            },
            frag_b: Fragment {
                id: FragmentId::new(0),
                paragraph_id: ParagraphId::new(para_b),
                token_start: start_b,
                window_n: 2,
                match_key: SmolStr::new(key_b),
                display_text: SmolStr::new(key_b),
                sketch_keys: Default::default(),
                start_page: 1,
                start_line: 1,
            },
            score,
            ops: Vec::new(),
        }
    }

    #[test]
    fn discards_below_threshold() {
        let matches = vec![m(0.5, "a", "b", 0, 0)];
        assert!(rank_and_dedup(matches, 0.75).is_empty());
    }

    #[test]
    fn dedup_keeps_first_encountered() {
        let first = m(0.9, "a", "b", 0, 0);
        let dup = m(0.95, "a", "b", 1, 1);
        let result = rank_and_dedup(vec![first, dup], 0.75);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].score, 0.9);
    }

    #[test]
    fn sorted_by_score_descending() {
        let matches = vec![m(0.8, "a", "b", 0, 0), m(0.95, "c", "d", 0, 0)];
        let result = rank_and_dedup(matches, 0.75);
        assert_eq!(result[0].score, 0.95);
        assert_eq!(result[1].score, 0.8);
    }

    #[test]
    fn ties_broken_by_b_paragraph_then_token_start() {
        let matches = vec![m(0.9, "a", "b", 2, 5), m(0.9, "c", "d", 1, 9)];
        let result = rank_and_dedup(matches, 0.75);
        assert_eq!(result[0].frag_b.paragraph_id, ParagraphId::new(1));
        assert_eq!(result[1].frag_b.paragraph_id, ParagraphId::new(2));
    }
}
