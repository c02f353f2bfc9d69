//! Reconstruction of compounds split by the segmenter.

use std::collections::HashSet;

use crate::dictionary::WordExists;
use crate::text::{dedup_preserving_order, is_negative_auxiliary};

/// Dictionary-confirmed concatenations of adjacent tokens.
///
/// A pair qualifies when the left token is a candidate and the right token is
/// a candidate or a negative auxiliary. Without an oracle nothing is merged.
pub fn merge_compounds(
    sequence: &[String],
    candidate_set: &HashSet<String>,
    word_exists: Option<&dyn WordExists>,
) -> Vec<String> {
    let Some(oracle) = word_exists else {
        return Vec::new();
    };

    dedup_preserving_order(
        sequence
            .windows(2)
            .filter(|pair| {
                candidate_set.contains(&pair[0])
                    && (candidate_set.contains(&pair[1]) || is_negative_auxiliary(&pair[1]))
            })
            .map(|pair| format!("{}{}", pair[0], pair[1]))
            .filter(|compound| oracle.exists(compound)),
    )
}
