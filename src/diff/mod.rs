//! Paragraph- and word-level document comparison.

pub mod matcher;
pub mod report;
pub mod words;
