//! `duplex-core`: the fragment-recurrence detection engine.
//!
//! Given two already-extracted line streams, `compare` normalizes each
//! into paragraphs, tokenizes and windows them into fragments, matches
//! document A's fragments against a hash-bucket index of document B's,
//! ranks and deduplicates the survivors, and reconstructs raw-text
//! context around each one. See [`compare`] for the entry point.

pub mod engine;
pub mod error;
pub mod fragment;
pub mod index;
pub mod ingest;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod params;
pub mod rank;
pub mod reify;
pub mod scorer;
pub mod tokenize;

pub use engine::{compare, CompareState};
pub use error::{DocumentSlot, DuplexError, Result};
pub use ingest::LineStream;
pub use matcher::CancelToken;
pub use model::{CompareResult, Fragment, Line, Match, MatchContext, Paragraph, Token, TokenKind};
pub use params::Params;
