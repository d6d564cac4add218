/// Stable identifier for a [`crate::model::Paragraph`] within the document
/// that owns it. Paragraphs are immutable once built, so this index stays
/// valid for the lifetime of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParagraphId(u32);

impl ParagraphId {
    pub const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable identifier assigned to each fragment of document B at bucket-index
/// construction time. Used to deduplicate candidates by identity instead of
/// by pointer/address (see the design notes on object-identity dedup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentId(u32);

impl FragmentId {
    pub const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
