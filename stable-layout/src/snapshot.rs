use crate::{Axis, Frame, IndexPath, LayoutAttributesProvider, Point};

/// An item's identity and frame at one point in time.
///
/// Snapshots are only meaningful within the batch in which they were captured: index paths
/// change meaning once the host applies its mutation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleItemSnapshot {
    pub index_path: IndexPath,
    pub frame: Frame,
}

impl VisibleItemSnapshot {
    pub fn leading_edge(&self, axis: Axis) -> f64 {
        self.frame.leading_edge(axis)
    }

    pub fn trailing_edge(&self, axis: Axis) -> f64 {
        self.frame.trailing_edge(axis)
    }
}

/// Captures the current frame of the item at `index_path`.
///
/// Returns `None` if the layout has no attributes for it.
pub fn capture<L: LayoutAttributesProvider + ?Sized>(
    layout: &L,
    index_path: IndexPath,
) -> Option<VisibleItemSnapshot> {
    let frame = layout.layout_attributes(index_path)?;
    Some(VisibleItemSnapshot { index_path, frame })
}

/// The item chosen to represent what the user is looking at, plus the scroll offset at the
/// time it was captured.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorCandidate {
    pub snapshot: VisibleItemSnapshot,
    pub scroll_offset: Point,
}

impl AnchorCandidate {
    pub fn index_path(&self) -> IndexPath {
        self.snapshot.index_path
    }

    /// Distance from the viewport's leading edge to the anchor's leading edge.
    pub fn offset_in_viewport(&self, axis: Axis) -> f64 {
        self.snapshot.leading_edge(axis) - self.scroll_offset.along(axis)
    }
}
