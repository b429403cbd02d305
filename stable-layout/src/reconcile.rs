use core::fmt;

use crate::{AnchorCandidate, Axis, Frame, Point, Size};

/// Why a finalize step left the host's scroll offset alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkipReason {
    /// Finalize was called without a prepared, non-empty batch.
    NoPendingBatch,
    /// Automatic content offset adjustment is turned off.
    Disabled,
    /// No visible item qualified as an anchor when the batch was prepared.
    NoAnchor,
    /// The anchor and every fallback candidate were removed by the batch.
    AnchorLost,
    /// The host reported no geometry for the anchor's post-update index path.
    MissingAttributes,
    /// The corrected offset equals the current one.
    Unchanged,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoPendingBatch => "no pending batch",
            Self::Disabled => "automatic content offset adjustment is disabled",
            Self::NoAnchor => "no visible anchor item",
            Self::AnchorLost => "anchor item was removed with no surviving fallback",
            Self::MissingAttributes => "no layout attributes for the anchor after the update",
            Self::Unchanged => "corrected offset equals the current offset",
        };
        f.write_str(s)
    }
}

/// The outcome of one finalize step.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Correction {
    /// The host's offset was set from `from` to `to`.
    Applied { from: Point, to: Point },
    Skipped(SkipReason),
}

impl Correction {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// The offset that was written to the host, if any.
    pub fn applied_offset(&self) -> Option<Point> {
        match self {
            Self::Applied { to, .. } => Some(*to),
            Self::Skipped(_) => None,
        }
    }
}

/// Largest valid scroll offset along `axis`.
pub fn max_valid_offset(content_size: Size, viewport_size: Size, axis: Axis) -> f64 {
    (content_size.along(axis) - viewport_size.along(axis)).max(0.0)
}

/// Computes the offset that keeps `anchor` at the same viewport position, given its
/// post-update frame.
///
/// Only the scroll-axis component changes; the cross-axis component of `current` is kept. The
/// result is clamped to `[0, max_valid_offset]`.
pub fn corrected_offset(
    anchor: &AnchorCandidate,
    new_frame: Frame,
    current: Point,
    content_size: Size,
    viewport_size: Size,
    axis: Axis,
) -> Point {
    let delta = new_frame.leading_edge(axis) - anchor.snapshot.leading_edge(axis);
    let naive = anchor.scroll_offset.along(axis) + delta;
    let max = max_valid_offset(content_size, viewport_size, axis);
    current.with_along(axis, naive.clamp(0.0, max))
}
