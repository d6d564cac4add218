//! Fragment generator: slide a window of `window_n` tokens across a
//! paragraph's token list, producing `Fragment`s with their `match_key`,
//! `display_text`, and sketch keys.

use smol_str::SmolStr;

use super::sketch::compute_sketch_keys;
use crate::model::{Fragment, FragmentId, Paragraph, Token, TokenKind};

/// Generate every length-`window_n` fragment from one paragraph's tokens.
/// `next_id` is the id to assign to the first fragment generated; it is
/// bumped once per fragment produced.
///
/// A paragraph with fewer than `window_n` tokens contributes no fragments.
pub fn generate_paragraph_fragments(
    paragraph: &Paragraph,
    window_n: usize,
    next_id: &mut usize,
) -> Vec<Fragment> {
    let tokens = &paragraph.tokens;
    if tokens.len() < window_n || window_n == 0 {
        return Vec::new();
    }

    let mut fragments = Vec::with_capacity(tokens.len() - window_n + 1);

    for start in 0..=(tokens.len() - window_n) {
        let window = &tokens[start..start + window_n];
        let (match_key, display_text) = build_texts(window);
        let is_pure_chinese = window.iter().all(|t| t.kind == TokenKind::Chinese);
        let sketch_keys = compute_sketch_keys(&display_text, is_pure_chinese);

        fragments.push(Fragment {
            id: FragmentId::new(*next_id),
            paragraph_id: paragraph.id,
            token_start: start,
            window_n,
            match_key,
            display_text,
            sketch_keys,
            start_page: paragraph.start_page,
            start_line: paragraph.start_line,
        });
        *next_id += 1;
    }

    fragments
}

fn build_texts(window: &[Token]) -> (SmolStr, SmolStr) {
    let mut match_key = String::new();
    let mut display_text = String::new();

    for (i, token) in window.iter().enumerate() {
        match_key.push_str(&token.text);
        display_text.push_str(&token.text);
        if i + 1 < window.len() && token.kind.joins_with_space(window[i + 1].kind) {
            display_text.push(' ');
        }
    }

    (SmolStr::new(match_key), SmolStr::new(display_text))
}

/// Generate all fragments for a document's paragraphs, in paragraph then
/// token-start order, applying the `max_fragments_per_doc` cap.
///
/// When the raw fragment count exceeds `max_fragments_per_doc`, subsample
/// with uniform stride `ceil(total/max)`, keeping the original relative
/// order — the surviving set is a strictly increasing subsequence of the
/// original by (paragraph, token_start).
pub fn generate_document_fragments(
    paragraphs: &[Paragraph],
    window_n: usize,
    max_fragments_per_doc: usize,
) -> Vec<Fragment> {
    let mut next_id = 0usize;
    let mut all = Vec::new();
    for paragraph in paragraphs {
        all.extend(generate_paragraph_fragments(paragraph, window_n, &mut next_id));
    }

    if all.len() <= max_fragments_per_doc || max_fragments_per_doc == 0 {
        return all;
    }

    let stride = all.len().div_ceil(max_fragments_per_doc);
    let sampled: Vec<Fragment> = all.into_iter().step_by(stride).collect();
    sampled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, ParagraphId};
    use crate::normalize::assemble_paragraphs;
    use crate::tokenize::tokenize;

    fn paragraph_from(raw: &str) -> Paragraph {
        let lines = vec![Line::new(raw, 1, 1)];
        let mut paragraphs = assemble_paragraphs(&lines, 0);
        let mut p = paragraphs.remove(0);
        p.tokens = tokenize(&p.clean_text);
        p
    }

    #[test]
    fn window_slide_produces_match_keys_and_spaced_display_text() {
        let p = paragraph_from("Python 3.14 is great");
        let mut next_id = 0;
        let fragments = generate_paragraph_fragments(&p, 2, &mut next_id);
        let keys: Vec<&str> = fragments.iter().map(|f| f.match_key.as_str()).collect();
        assert_eq!(keys, vec!["python314", "314is", "isgreat"]);
        let display: Vec<&str> = fragments.iter().map(|f| f.display_text.as_str()).collect();
        assert_eq!(display, vec!["python 314", "314 is", "is great"]);
    }

    #[test]
    fn chinese_window_slides_one_codepoint_at_a_time() {
        let p = paragraph_from("今天天气很好");
        let mut next_id = 0;
        let fragments = generate_paragraph_fragments(&p, 3, &mut next_id);
        let keys: Vec<&str> = fragments.iter().map(|f| f.match_key.as_str()).collect();
        assert_eq!(keys, vec!["今天天", "天天气", "天气很", "气很好"]);
    }

    #[test]
    fn decimal_point_is_absent_from_fragment_match_keys() {
        let p = paragraph_from("周长为100.5米");
        let mut next_id = 0;
        let fragments = generate_paragraph_fragments(&p, 3, &mut next_id);
        let keys: Vec<&str> = fragments.iter().map(|f| f.match_key.as_str()).collect();
        assert_eq!(keys, vec!["周长为", "长为1005", "为1005米"]);
    }

    #[test]
    fn paragraph_shorter_than_window_yields_no_fragments() {
        let p = paragraph_from("hi");
        let mut next_id = 0;
        let fragments = generate_paragraph_fragments(&p, 8, &mut next_id);
        assert!(fragments.is_empty());
    }

    #[test]
    fn fragment_cap_applies_uniform_stride() {
        let mut paragraph = Paragraph {
            id: ParagraphId::new(0),
            raw_text: String::new(),
            clean_text: String::new(),
            back_map: Vec::new(),
            start_page: 1,
            start_line: 1,
            tokens: Vec::new(),
        };
        // 10_007 tokens of window_n=1 yields exactly 10_007 fragments.
        for i in 0..10_007u32 {
            paragraph.tokens.push(Token {
                text: SmolStr::new(format!("{i}")),
                kind: TokenKind::Digit,
                clean_start: i as usize,
                clean_end: i as usize + 1,
            });
        }
        let fragments = generate_document_fragments(std::slice::from_ref(&paragraph), 1, 2_500);
        // stride = ceil(10007/2500) = 5 -> indices 0,5,10,...
        assert_eq!(fragments.len(), (10_007usize).div_ceil(5));
        for (i, f) in fragments.iter().enumerate() {
            assert_eq!(f.token_start, i * 5);
        }
    }

    #[test]
    fn no_cap_needed_below_threshold() {
        let p = paragraph_from("a b c d e f g h i j");
        let fragments = generate_document_fragments(std::slice::from_ref(&p), 2, 10_000);
        assert!(!fragments.is_empty());
    }
}
