//! Normalize stage: symbol classification, cleaning, and paragraph
//! assembly.

mod assemble;
mod classify;
mod clean;

pub use assemble::assemble_paragraphs;
pub use classify::{is_ascii_lower, is_ascii_upper, is_chinese, is_digit, is_valid};
pub use clean::{clean_paragraph, CleanedParagraph};
