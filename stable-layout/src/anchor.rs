use core::cmp::Ordering;

use crate::types::cmp_edge;
use crate::{AnchorCandidate, Axis, IndexPath, IndexPathRemap, Point, VisibleItemSnapshot};

/// The result of mapping an anchor through one batch of updates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnchorResolution {
    /// No visible item qualified as an anchor.
    None,
    /// The anchor and every fallback candidate lose their identity in this batch.
    Lost,
    /// `anchor` was captured before the update and will live at `target` after it.
    Resolved {
        anchor: AnchorCandidate,
        target: IndexPath,
    },
}

impl AnchorResolution {
    pub fn anchor(&self) -> Option<&AnchorCandidate> {
        match self {
            Self::Resolved { anchor, .. } => Some(anchor),
            Self::None | Self::Lost => None,
        }
    }

    pub fn target(&self) -> Option<IndexPath> {
        match self {
            Self::Resolved { target, .. } => Some(*target),
            Self::None | Self::Lost => None,
        }
    }
}

/// Picks the leading visible item among `candidates`.
///
/// Prefers the item whose leading edge is closest to, but not before, `viewport_leading`. If no
/// item starts inside the viewport (e.g. one tall item covers it), falls back to the item that
/// straddles the viewport's leading edge with the greatest leading edge. Ties on the leading
/// edge go to the lowest index path (section, then item).
pub fn select_anchor<'a>(
    candidates: impl IntoIterator<Item = &'a VisibleItemSnapshot>,
    viewport_leading: f64,
    axis: Axis,
) -> Option<&'a VisibleItemSnapshot> {
    let mut inside: Option<&VisibleItemSnapshot> = None;
    let mut straddling: Option<&VisibleItemSnapshot> = None;

    for s in candidates {
        let leading = s.leading_edge(axis);
        if cmp_edge(leading, viewport_leading) != Ordering::Less {
            let better = inside.is_none_or(|best| {
                cmp_edge(leading, best.leading_edge(axis))
                    .then_with(|| s.index_path.cmp(&best.index_path))
                    == Ordering::Less
            });
            if better {
                inside = Some(s);
            }
        } else if cmp_edge(s.trailing_edge(axis), viewport_leading) == Ordering::Greater {
            let better = straddling.is_none_or(|best| {
                cmp_edge(best.leading_edge(axis), leading)
                    .then_with(|| s.index_path.cmp(&best.index_path))
                    == Ordering::Less
            });
            if better {
                straddling = Some(s);
            }
        }
    }

    inside.or(straddling)
}

/// Chooses an anchor among `candidates` and maps it through `remap`.
///
/// If the preferred anchor does not survive the batch, selection is re-run over the surviving
/// candidates only.
pub fn resolve_anchor(
    candidates: &[VisibleItemSnapshot],
    scroll_offset: Point,
    axis: Axis,
    remap: &IndexPathRemap,
) -> AnchorResolution {
    let viewport_leading = scroll_offset.along(axis);
    let Some(preferred) = select_anchor(candidates, viewport_leading, axis) else {
        return AnchorResolution::None;
    };

    let resolved = |snapshot: &VisibleItemSnapshot, target: IndexPath| AnchorResolution::Resolved {
        anchor: AnchorCandidate {
            snapshot: *snapshot,
            scroll_offset,
        },
        target,
    };

    if let Some(target) = remap.map_item(preferred.index_path) {
        return resolved(preferred, target);
    }

    strace!(
        anchor = %preferred.index_path,
        "resolve_anchor: anchor removed by batch, selecting a survivor"
    );
    let survivors = candidates.iter().filter(|s| !remap.is_removed(s.index_path));
    match select_anchor(survivors, viewport_leading, axis) {
        Some(fallback) => match remap.map_item(fallback.index_path) {
            Some(target) => resolved(fallback, target),
            None => AnchorResolution::Lost,
        },
        None => AnchorResolution::Lost,
    }
}
