//! Label-based correspondence matching between two cameras.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A value tagged with an identity label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Labeled<P, L> {
    /// The observation (an image point, a set of board corners, ...).
    pub value: P,
    /// Identity shared by observations of the same physical thing.
    pub label: L,
}

impl<P, L> Labeled<P, L> {
    /// Tags `value` with `label`.
    pub fn new(value: P, label: L) -> Self {
        Self { value, label }
    }
}

/// A labeled 2D image point.
pub type LabeledPoint2D = Labeled<DVec2, String>;

/// Matched observations from two cameras as three parallel sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct Correspondences<P, L> {
    /// Matched observations from camera A.
    pub points_a: Vec<P>,
    /// Matched observations from camera B, aligned with `points_a`.
    pub points_b: Vec<P>,
    /// Shared label of each match.
    pub labels: Vec<L>,
}

impl<P, L> Default for Correspondences<P, L> {
    fn default() -> Self {
        Self {
            points_a: Vec::new(),
            points_b: Vec::new(),
            labels: Vec::new(),
        }
    }
}

impl<P, L> Correspondences<P, L> {
    /// Number of matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Pairs observations of cameras A and B that carry equal labels.
///
/// Matches are emitted in A's order, and for each item of A in B's order.
/// Every equal-label pair is emitted, so a label repeated on either side
/// produces several matches. Unmatched observations are dropped; no match
/// at all gives empty sequences.
pub fn match_correspondences<P, L>(a: &[Labeled<P, L>], b: &[Labeled<P, L>]) -> Correspondences<P, L>
where
    P: Clone,
    L: Clone + PartialEq,
{
    let mut out = Correspondences::default();
    for item_a in a {
        let mut hits = 0usize;
        for item_b in b.iter().filter(|item_b| item_b.label == item_a.label) {
            out.points_a.push(item_a.value.clone());
            out.points_b.push(item_b.value.clone());
            out.labels.push(item_a.label.clone());
            hits += 1;
        }
        if hits > 1 {
            log::debug!("label matched {hits} observations in the second camera");
        }
    }
    out
}
