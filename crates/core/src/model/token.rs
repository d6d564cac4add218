use smol_str::SmolStr;

/// The three semantic classes a token can belong to. There is deliberately
/// no case-sensitive Latin variant: matching always lower-cases (see the
/// open question in the design notes about a future case-sensitive mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Chinese,
    Latin,
    Digit,
}

impl TokenKind {
    /// Whether a space is inserted between two adjacent tokens of these
    /// kinds when rendering `display_text`.
    pub fn joins_with_space(self, other: TokenKind) -> bool {
        matches!(
            (self, other),
            (TokenKind::Latin | TokenKind::Digit, TokenKind::Latin | TokenKind::Digit)
        )
    }
}

/// A semantic unit within a paragraph's clean text: one CJK codepoint, or a
/// maximal run of ASCII letters (lower-cased), or a maximal run of digits.
///
/// `clean_start`/`clean_end` is a half-open range over the paragraph's
/// *non-separator* clean codepoint positions — the same index space used by
/// [`crate::model::Paragraph::back_map`], so a fragment's span can be mapped
/// to raw-text offsets with a single slice, no rescanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: SmolStr,
    pub kind: TokenKind,
    pub clean_start: usize,
    pub clean_end: usize,
}

impl Token {
    pub fn len(&self) -> usize {
        self.clean_end - self.clean_start
    }

    pub fn is_empty(&self) -> bool {
        self.clean_start == self.clean_end
    }
}
