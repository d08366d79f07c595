//! Post body validation and profanity masking

use super::errors::{RepositoryError, RepositoryResult};

/// Longest accepted body, in characters, measured on the raw input
pub const MAX_BODY_CHARS: usize = 140;

/// Words masked out of every body (matched case-insensitively)
pub const DENYLIST: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Replacement for a denylisted word
pub const MASK: &str = "****";

/// Reject bodies longer than [`MAX_BODY_CHARS`]
pub fn validate_body(body: &str) -> RepositoryResult<()> {
    if body.chars().count() > MAX_BODY_CHARS {
        return Err(RepositoryError::Validation("Chirp is too long".to_string()));
    }
    Ok(())
}

/// Mask every whole space-delimited token found in [`DENYLIST`].
///
/// Splitting is on single spaces only, so runs of spaces and any
/// punctuation attached to a word are preserved as-is.
pub fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lower = word.to_lowercase();
            if DENYLIST.contains(&lower.as_str()) {
                MASK
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
