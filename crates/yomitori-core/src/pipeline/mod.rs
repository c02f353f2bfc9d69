//! Normalization, compound merging and candidate aggregation.

mod compound;
mod normalizer;
mod scanner;

pub use compound::merge_compounds;
pub use normalizer::{Normalizer, METHOD};
pub use scanner::{Scanner, TextCandidates};
