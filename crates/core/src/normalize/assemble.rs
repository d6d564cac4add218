//! Paragraph assembly: group a document's lines by page and clean each
//! page's concatenated text into a [`Paragraph`].

use indexmap::IndexMap;

use super::clean::clean_paragraph;
use crate::model::{Line, ParagraphId, Paragraph};

/// Group `lines` by page (concatenating each page's line texts with no
/// separator, matching the external extractor's line-joining contract),
/// clean each page into a [`Paragraph`], and drop paragraphs whose clean
/// text is shorter than `min_clean_paragraph_len` valid characters.
///
/// Pages are emitted in ascending page-number order regardless of the
/// order lines arrived in, so the result is deterministic even if the
/// extractor does not guarantee page ordering.
pub fn assemble_paragraphs(lines: &[Line], min_clean_paragraph_len: usize) -> Vec<Paragraph> {
    let mut by_page: IndexMap<u32, Vec<&Line>> = IndexMap::new();
    for line in lines {
        by_page.entry(line.page).or_default().push(line);
    }

    let mut pages: Vec<u32> = by_page.keys().copied().collect();
    pages.sort_unstable();

    let mut paragraphs = Vec::with_capacity(pages.len());
    for page in pages {
        let page_lines = &by_page[&page];
        if page_lines.is_empty() {
            continue;
        }
        let mut raw_text = String::new();
        for line in page_lines {
            raw_text.push_str(&line.text);
        }

        let cleaned = clean_paragraph(&raw_text);
        if cleaned.clean_text.chars().count() < min_clean_paragraph_len {
            continue;
        }

        let id = ParagraphId::new(paragraphs.len());
        paragraphs.push(Paragraph {
            id,
            raw_text,
            clean_text: cleaned.clean_text,
            back_map: cleaned.back_map,
            start_page: page,
            start_line: page_lines[0].line_no,
            tokens: Vec::new(),
        });
    }

    paragraphs
}
