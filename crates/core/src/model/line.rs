/// One extracted text line with provenance, as produced by the external
/// document extractor (PDF/DOCX ingestion is outside this crate).
///
/// Pages are 1-based; line numbers are 1-based within a page. Empty lines
/// must already be filtered by the caller.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub page: u32,
    pub line_no: u32,
}

impl Line {
    pub fn new(text: impl Into<String>, page: u32, line_no: u32) -> Self {
        Self {
            text: text.into(),
            page,
            line_no,
        }
    }
}
