//! Tokenizer: split a paragraph's clean text into semantic units. One
//! CJK codepoint is its own token; a maximal run of ASCII letters or of
//! digits is one token each. Separator spaces are consumed between
//! tokens and never themselves produce a token.

use smol_str::SmolStr;

use crate::model::{Token, TokenKind};
use crate::normalize::{is_ascii_lower, is_chinese, is_digit};

/// Tokenize `clean_text`. `clean_text` is assumed to already be in the
/// canonical form `clean_paragraph` produces: Chinese codepoints,
/// lower-case ASCII letters, digits, and single-space separators only.
///
/// `Token::clean_start`/`clean_end` are positions in the *non-separator*
/// codepoint index space — the same space `Paragraph::back_map` is indexed
/// by — not byte offsets into `clean_text` itself.
pub fn tokenize(clean_text: &str) -> Vec<Token> {
    let chars: Vec<char> = clean_text.chars().collect();
    let n = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut clean_pos = 0usize;

    while i < n {
        let c = chars[i];

        if c == ' ' {
            i += 1;
            continue;
        }

        if is_chinese(c) {
            tokens.push(Token {
                text: SmolStr::new(c.to_string()),
                kind: TokenKind::Chinese,
                clean_start: clean_pos,
                clean_end: clean_pos + 1,
            });
            clean_pos += 1;
            i += 1;
            continue;
        }

        if is_ascii_lower(c) {
            let start = clean_pos;
            let mut body = String::new();
            while i < n && is_ascii_lower(chars[i]) {
                body.push(chars[i]);
                i += 1;
                clean_pos += 1;
            }
            tokens.push(Token {
                text: SmolStr::new(body),
                kind: TokenKind::Latin,
                clean_start: start,
                clean_end: clean_pos,
            });
            continue;
        }

        if is_digit(c) {
            let start = clean_pos;
            let mut body = String::new();
            while i < n && is_digit(chars[i]) {
                body.push(chars[i]);
                i += 1;
                clean_pos += 1;
            }
            tokens.push(Token {
                text: SmolStr::new(body),
                kind: TokenKind::Digit,
                clean_start: start,
                clean_end: clean_pos,
            });
            continue;
        }

        // clean_text is assumed canonical; anything else is skipped rather
        // than treated as fatal, so a caller-supplied clean_text with stray
        // punctuation can't crash the engine.
        i += 1;
    }

    tokens
}
