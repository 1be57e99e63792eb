//! Deterministic node colors.
//!
//! Colors are derived from a SHA-256 digest of the node label and its
//! construction ordinal, so equal labels still get distinct colors and a
//! rebuilt tree is painted the same way every run.

use sha2::{Digest, Sha256};

use crate::domain::geometry::Rgb;

pub fn derive_color(label: Option<&str>, ordinal: u64) -> Rgb {
    let mut hasher = Sha256::new();
    hasher.update(label.unwrap_or_default().as_bytes());
    hasher.update(ordinal.to_le_bytes());
    let digest = hasher.finalize();
    Rgb(digest[0], digest[1], digest[2])
}
