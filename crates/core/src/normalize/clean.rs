//! `clean_paragraph`: reduce raw paragraph text to the minimal character
//! set used for matching, while recording an O(1) clean-to-raw back-map.
//!
//! A naive implementation relocates raw positions by re-walking the raw
//! string and counting valid codepoints on every lookup — O(|raw|) per
//! lookup. Here the back-map is built once, during this single
//! left-to-right scan, as a `Vec<u32>` of raw byte offsets indexed by
//! clean codepoint position.

use super::classify::{is_ascii_lower, is_ascii_upper, is_chinese, is_digit};

/// Output of cleaning one paragraph's raw text.
pub struct CleanedParagraph {
    /// Clean text, including single-space separators between adjacent
    /// Latin/Digit runs that were whitespace-separated in the source.
    /// Contains no other codepoints beyond Chinese, lower-case ASCII
    /// letters, digits, and those separator spaces.
    pub clean_text: String,
    /// `back_map[i]` is the raw byte offset of the `i`-th *non-separator*
    /// clean codepoint. Same length as the count of non-space characters
    /// in `clean_text`.
    pub back_map: Vec<u32>,
}

/// Clean never fails; empty input yields empty output.
pub fn clean_paragraph(raw: &str) -> CleanedParagraph {
    let chars: Vec<(usize, char)> = raw.char_indices().collect();
    let n = chars.len();
    let mut clean = String::new();
    let mut back_map = Vec::new();
    let mut i = 0;

    while i < n {
        let (byte_idx, ch) = chars[i];

        if is_chinese(ch) {
            clean.push(ch);
            back_map.push(byte_idx as u32);
            i += 1;
            continue;
        }

        if is_ascii_lower(ch) || is_ascii_upper(ch) {
            while i < n && (is_ascii_lower(chars[i].1) || is_ascii_upper(chars[i].1)) {
                let (b, c) = chars[i];
                clean.push(c.to_ascii_lowercase());
                back_map.push(b as u32);
                i += 1;
            }
            emit_separator_if_needed(&mut clean, &chars, i, n);
            continue;
        }

        if is_digit(ch) {
            while i < n && is_digit(chars[i].1) {
                let (b, c) = chars[i];
                clean.push(c);
                back_map.push(b as u32);
                i += 1;
            }
            // Swallow a decimal point followed by more digits, possibly
            // repeated ("3.14.159" -> "314159").
            while i < n && chars[i].1 == '.' && i + 1 < n && is_digit(chars[i + 1].1) {
                i += 1; // drop the '.', no back_map entry
                while i < n && is_digit(chars[i].1) {
                    let (b, c) = chars[i];
                    clean.push(c);
                    back_map.push(b as u32);
                    i += 1;
                }
            }
            emit_separator_if_needed(&mut clean, &chars, i, n);
            continue;
        }

        // Punctuation, whitespace, and anything else: dropped.
        i += 1;
    }

    CleanedParagraph {
        clean_text: clean,
        back_map,
    }
}

/// After a Latin or Digit run ending at `chars[i]`, peek past any
/// whitespace; if the next non-whitespace codepoint is another Latin
/// letter or a digit, emit one separator space. The separator carries no
/// semantic weight and is stripped back out when a fragment's `match_key`
/// is built.
fn emit_separator_if_needed(clean: &mut String, chars: &[(usize, char)], mut i: usize, n: usize) {
    while i < n && chars[i].1.is_whitespace() {
        i += 1;
    }
    if i < n {
        let c = chars[i].1;
        if is_ascii_lower(c) || is_ascii_upper(c) || is_digit(c) {
            clean.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        let cleaned = clean_paragraph("");
        assert_eq!(cleaned.clean_text, "");
        assert!(cleaned.back_map.is_empty());
    }

    #[test]
    fn latin_runs_are_lowercased_and_decimal_points_dropped() {
        let cleaned = clean_paragraph("Python 3.14 is great");
        assert_eq!(cleaned.clean_text, "python 314 is great");
        assert_eq!(
            cleaned.back_map.len(),
            cleaned.clean_text.chars().filter(|c| *c != ' ').count()
        );
    }

    #[test]
    fn decimal_point_is_dropped_from_clean_text() {
        let cleaned = clean_paragraph("周长为100.5米");
        assert_eq!(cleaned.clean_text, "周长为1005米");
    }

    #[test]
    fn punctuation_is_dropped_without_affecting_adjacency() {
        let cleaned = clean_paragraph("我今天,吃了一个苹果。");
        assert_eq!(cleaned.clean_text, "我今天吃了一个苹果");
    }

    #[test]
    fn pure_chinese_text_gets_no_separator_spaces() {
        let cleaned = clean_paragraph("今天天气很好");
        assert_eq!(cleaned.clean_text, "今天天气很好");
    }

    #[test]
    fn uppercase_is_lowercased() {
        let cleaned = clean_paragraph("iPhone 15 Pro Max");
        assert_eq!(cleaned.clean_text, "iphone 15 pro max");
    }

    #[test]
    fn idempotent() {
        let raw = "Hello, World! 2024年 3.14";
        let once = clean_paragraph(raw).clean_text;
        let twice = clean_paragraph(&once).clean_text;
        assert_eq!(once, twice);
    }

    #[test]
    fn back_map_is_monotonic_and_points_at_char_boundaries() {
        let raw = "Python3.8很棒";
        let cleaned = clean_paragraph(raw);
        for w in cleaned.back_map.windows(2) {
            assert!(w[0] < w[1]);
        }
        for &offset in &cleaned.back_map {
            assert!(raw.is_char_boundary(offset as usize));
        }
    }
}
