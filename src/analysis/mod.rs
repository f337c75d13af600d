//! Model-backed document analyses.

pub mod coherence;
pub mod parse;
pub mod prompts;
pub mod proofread;
pub mod restructure;
