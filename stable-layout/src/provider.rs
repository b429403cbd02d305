use crate::{Frame, IndexPath, Point, Size};

/// Read-only view of the host list's data and scroll position.
pub trait CollectionViewDataProvider {
    /// Calls `f` once per currently visible item. Order is not significant.
    fn for_each_visible_index_path(&self, f: &mut dyn FnMut(IndexPath));

    fn number_of_sections(&self) -> usize;

    fn number_of_items(&self, section: usize) -> usize;

    fn content_offset(&self) -> Point;
}

/// Item geometry as computed by the host's layout pass.
pub trait LayoutAttributesProvider {
    /// Returns the frame of the item at `index_path`, or `None` if it has not been measured.
    fn layout_attributes(&self, index_path: IndexPath) -> Option<Frame>;
}

/// The host view as seen by the finalize step: data, geometry and direct offset mutation.
pub trait HostView: CollectionViewDataProvider + LayoutAttributesProvider {
    fn content_size(&self) -> Size;

    fn viewport_size(&self) -> Size;

    /// Sets the scroll offset directly (no animation).
    ///
    /// Implementations must not route this back into the controller's prepare/finalize cycle.
    fn set_content_offset(&mut self, offset: Point);
}
