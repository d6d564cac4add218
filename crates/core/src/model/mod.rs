//! The shared data model: [`Line`] in, [`Paragraph`]/[`Token`]/[`Fragment`]
//! through the pipeline, [`Match`]/[`MatchContext`]/[`CompareResult`] out.

mod fragment;
mod ids;
mod line;
mod paragraph;
mod result;
mod token;

pub use fragment::{Fragment, SketchKeys};
pub use ids::{FragmentId, ParagraphId};
pub use line::Line;
pub use paragraph::Paragraph;
pub use result::{CompareResult, Histogram, Match, MatchContext, StageTimings};
pub use token::{Token, TokenKind};
