//! Ingest contract. The engine consumes a `LineStream`; it never
//! performs extraction itself.

mod line_stream;

pub use line_stream::LineStream;
