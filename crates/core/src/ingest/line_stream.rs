//! Inbound `LineStream` contract.
//!
//! The engine performs no document extraction itself; it consumes an
//! already-extracted, already-filtered ordered sequence of lines per
//! document. Pages are 1-based, line numbers 1-based within a page, and
//! empty lines must already be dropped by the caller. The stream is
//! finite and non-restartable: the engine drains it exactly once, in
//! order, via `IntoIterator`.

use crate::model::Line;

/// Any `IntoIterator<Item = Line>` satisfies the contract — a `Vec<Line>`
/// collected by the caller's extractor, or a lazy iterator wrapping a
/// PDF/DOCX page walker.
pub trait LineStream: IntoIterator<Item = Line> {}

impl<T> LineStream for T where T: IntoIterator<Item = Line> {}
