//! Data models for Semantic Scholar API payloads and tool inputs.

mod enums;
mod inputs;
mod paper;

pub use enums::ResponseFormat;
pub use inputs::{AuthorPapersInput, PaperDetailsInput, PaperEdgesInput, SearchPapersInput};
pub use paper::{CitationEdge, EdgeDirection, EdgePage, PaperPage, PaperRecord};
