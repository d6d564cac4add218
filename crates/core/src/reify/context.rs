//! Context reifier: reconstruct raw-text windows around a surviving
//! match using the owning paragraph's back-map.

use rustc_hash::FxHashMap;

use crate::model::{Fragment, Match, MatchContext, Paragraph, ParagraphId};
use crate::normalize::is_valid;

/// Reify every surviving match into a [`MatchContext`], looking up each
/// fragment's owning paragraph in its document's paragraph list.
///
/// A fragment whose paragraph cannot be located, or whose token span is
/// out of bounds, contributes empty context strings rather than failing
/// the whole comparison.
pub fn reify(
    matches: Vec<Match>,
    paragraphs_a: &[Paragraph],
    paragraphs_b: &[Paragraph],
    context_chars: usize,
) -> Vec<MatchContext> {
    let by_id_a: FxHashMap<ParagraphId, &Paragraph> =
        paragraphs_a.iter().map(|p| (p.id, p)).collect();
    let by_id_b: FxHashMap<ParagraphId, &Paragraph> =
        paragraphs_b.iter().map(|p| (p.id, p)).collect();

    matches
        .into_iter()
        .map(|m| {
            let (context_before_a, context_after_a) =
                context_around(by_id_a.get(&m.frag_a.paragraph_id).copied(), &m.frag_a, context_chars);
            let (context_before_b, context_after_b) =
                context_around(by_id_b.get(&m.frag_b.paragraph_id).copied(), &m.frag_b, context_chars);

            MatchContext {
                frag_a: m.frag_a,
                frag_b: m.frag_b,
                score: m.score,
                ops: m.ops,
                context_before_a,
                context_after_a,
                context_before_b,
                context_after_b,
            }
        })
        .collect()
}

fn context_around(paragraph: Option<&Paragraph>, fragment: &Fragment, k: usize) -> (String, String) {
    let Some(paragraph) = paragraph else {
        return (String::new(), String::new());
    };

    let token_start = fragment.token_start;
    let token_end = fragment.token_end();
    if token_end == 0 || token_end > paragraph.tokens.len() || token_start >= token_end {
        return (String::new(), String::new());
    }

    let clean_start = paragraph.tokens[token_start].clean_start;
    let clean_end = paragraph.tokens[token_end - 1].clean_end;

    let Some((r0, r1)) = paragraph.raw_byte_range(clean_start, clean_end) else {
        return (String::new(), String::new());
    };

    (context_before(&paragraph.raw_text, r0, k), context_after(&paragraph.raw_text, r1, k))
}

/// Substring of `raw` ending at byte offset `r0`, extended leftward while
/// counting only valid codepoints, stopping once `k` have been collected
/// or the start of `raw` is reached. Invalid codepoints within the window
/// are kept verbatim; they just don't count toward `k`.
fn context_before(raw: &str, r0: usize, k: usize) -> String {
    if k == 0 {
        return String::new();
    }
    let prefix = &raw[..r0];
    let chars: Vec<(usize, char)> = prefix.char_indices().collect();
    if chars.is_empty() {
        return String::new();
    }

    let mut valid_count = 0usize;
    let mut start_char_idx = 0usize;
    let mut i = chars.len();
    while i > 0 {
        i -= 1;
        start_char_idx = i;
        if is_valid(chars[i].1) {
            valid_count += 1;
            if valid_count >= k {
                break;
            }
        }
    }

    prefix[chars[start_char_idx].0..].to_string()
}

/// Symmetric rightward counterpart of [`context_before`], starting at byte
/// offset `r1`.
fn context_after(raw: &str, r1: usize, k: usize) -> String {
    if k == 0 || r1 >= raw.len() {
        return String::new();
    }
    let suffix = &raw[r1..];
    let chars: Vec<(usize, char)> = suffix.char_indices().collect();
    if chars.is_empty() {
        return String::new();
    }

    let mut valid_count = 0usize;
    let mut end_char_count = chars.len();
    for (i, &(_, c)) in chars.iter().enumerate() {
        if is_valid(c) {
            valid_count += 1;
            if valid_count >= k {
                end_char_count = i + 1;
                break;
            }
        }
    }

    let end_byte = chars
        .get(end_char_count)
        .map(|(b, _)| *b)
        .unwrap_or(suffix.len());
    suffix[..end_byte].to_string()
}
