pub mod coherence;
pub mod compare;
pub mod health;
pub mod proofread;
pub mod restructure;
pub mod upload;
