use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use stable_layout::{
    Axis, CollectionViewDataProvider, Frame, HostView, IndexPath, IndexPathRemap,
    LayoutAttributesProvider, Point, Size, UpdateOperation, UpdateTarget, max_valid_offset,
};

/// One item of a [`SimulatedCollectionView`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimItem {
    /// Stable identity, unique within one view.
    pub id: u64,
    /// Size in the scroll axis.
    pub extent: f64,
}

/// An in-memory sectioned list (or grid, with `columns > 1`) that lays itself out eagerly.
///
/// Items are placed in rows of `columns` cells; a row is as tall (along the scroll axis) as its
/// largest item, and sections follow each other with no spacing. Offset writes made through
/// [`HostView::set_content_offset`] are counted so tests can check how often the controller
/// touched the scroll position.
#[derive(Clone, Debug)]
pub struct SimulatedCollectionView {
    axis: Axis,
    columns: usize,
    viewport: Size,
    offset: Point,
    sections: Vec<Vec<SimItem>>,
    frames: Vec<Vec<Frame>>,
    content_size: Size,
    next_id: u64,
    offset_writes: usize,
}

impl SimulatedCollectionView {
    pub fn new(viewport: Size) -> Self {
        Self {
            axis: Axis::Vertical,
            columns: 1,
            viewport,
            offset: Point::ZERO,
            sections: Vec::new(),
            frames: Vec::new(),
            content_size: Size::default(),
            next_id: 0,
            offset_writes: 0,
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self.relayout();
        self
    }

    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self.relayout();
        self
    }

    pub fn with_section(mut self, extents: impl IntoIterator<Item = f64>) -> Self {
        self.push_section(extents);
        self
    }

    /// Appends a section and returns its index.
    pub fn push_section(&mut self, extents: impl IntoIterator<Item = f64>) -> usize {
        let items = extents
            .into_iter()
            .map(|extent| self.new_item(extent))
            .collect();
        self.sections.push(items);
        self.relayout();
        self.sections.len() - 1
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn item(&self, index_path: IndexPath) -> Option<SimItem> {
        self.sections
            .get(index_path.section)?
            .get(index_path.item)
            .copied()
    }

    pub fn index_path_of(&self, id: u64) -> Option<IndexPath> {
        self.sections.iter().enumerate().find_map(|(s, items)| {
            items
                .iter()
                .position(|item| item.id == id)
                .map(|i| IndexPath::new(s, i))
        })
    }

    /// Distance from the viewport's leading edge to the item's leading edge.
    pub fn screen_position(&self, id: u64) -> Option<f64> {
        let frame = self.layout_attributes(self.index_path_of(id)?)?;
        Some(frame.leading_edge(self.axis) - self.offset.along(self.axis))
    }

    /// Changes one item's extent and lays out again. Returns `false` if there is no such item.
    pub fn set_extent(&mut self, index_path: IndexPath, extent: f64) -> bool {
        let Some(item) = self
            .sections
            .get_mut(index_path.section)
            .and_then(|items| items.get_mut(index_path.item))
        else {
            return false;
        };
        item.extent = extent;
        self.relayout();
        true
    }

    /// Scrolls as a user would (clamped, not counted as an offset write).
    pub fn scroll_to(&mut self, offset: f64) {
        let max = max_valid_offset(self.content_size, self.viewport, self.axis);
        self.offset = self.offset.with_along(self.axis, offset.clamp(0.0, max));
    }

    pub fn offset_writes(&self) -> usize {
        self.offset_writes
    }

    pub fn visible_index_paths(&self) -> Vec<IndexPath> {
        let mut out = Vec::new();
        self.for_each_visible_index_path(&mut |path| out.push(path));
        out
    }

    /// Applies a batch of updates to the data and lays out again.
    ///
    /// New items (inserted items, and every item of a reloaded section) get their extent from
    /// `extent_for`, called with the item's post-update index path. Inserted sections start empty
    /// and are filled by item inserts targeting them. Reloaded items keep their extent; use
    /// [`Self::set_extent`] afterwards to resize them.
    pub fn apply_updates(
        &mut self,
        operations: &[UpdateOperation],
        mut extent_for: impl FnMut(IndexPath) -> f64,
    ) {
        let remap = IndexPathRemap::new(operations);
        let mut inserted_sections = BTreeSet::new();
        let mut inserted_items = BTreeSet::new();
        let mut reloaded_sections = BTreeMap::new();
        for op in operations {
            match *op {
                UpdateOperation::Insert(UpdateTarget::Section(s)) => {
                    inserted_sections.insert(s);
                }
                UpdateOperation::Insert(UpdateTarget::Item(p)) => {
                    inserted_items.insert(p);
                }
                UpdateOperation::Reload {
                    before: UpdateTarget::Section(b),
                    after: UpdateTarget::Section(a),
                } => {
                    let len = self.sections.get(b).map_or(0, Vec::len);
                    reloaded_sections.insert(a, len);
                }
                _ => {}
            }
        }

        let mut post: BTreeMap<usize, Vec<(usize, SimItem)>> = BTreeMap::new();
        for (s, items) in self.sections.iter().enumerate() {
            if let Some(section) = remap.map_section(s) {
                post.entry(section).or_default();
            }
            for (i, item) in items.iter().enumerate() {
                if let Some(p) = remap.map_item(IndexPath::new(s, i)) {
                    post.entry(p.section).or_default().push((p.item, *item));
                }
            }
        }
        for s in inserted_sections {
            post.entry(s).or_default();
        }
        for (s, len) in reloaded_sections {
            for i in 0..len {
                let item = self.new_item(extent_for(IndexPath::new(s, i)));
                post.entry(s).or_default().push((i, item));
            }
        }
        for p in inserted_items {
            let item = self.new_item(extent_for(p));
            post.entry(p.section).or_default().push((p.item, item));
        }

        self.sections = post
            .into_values()
            .map(|mut items| {
                items.sort_by_key(|(i, _)| *i);
                items.into_iter().map(|(_, item)| item).collect()
            })
            .collect();
        self.relayout();
    }

    fn new_item(&mut self, extent: f64) -> SimItem {
        let id = self.next_id;
        self.next_id += 1;
        SimItem { id, extent }
    }

    fn relayout(&mut self) {
        let cross_total = match self.axis {
            Axis::Vertical => self.viewport.width,
            Axis::Horizontal => self.viewport.height,
        };
        let cell = cross_total / self.columns as f64;
        let axis = self.axis;

        let mut main = 0.0;
        let mut frames = Vec::with_capacity(self.sections.len());
        for items in &self.sections {
            let mut out = Vec::with_capacity(items.len());
            for row in items.chunks(self.columns) {
                let row_extent = row.iter().map(|item| item.extent).fold(0.0, f64::max);
                for (col, item) in row.iter().enumerate() {
                    out.push(cell_frame(axis, main, col as f64 * cell, item.extent, cell));
                }
                main += row_extent;
            }
            frames.push(out);
        }

        self.frames = frames;
        self.content_size = match axis {
            Axis::Vertical => Size::new(cross_total, main),
            Axis::Horizontal => Size::new(main, cross_total),
        };
    }
}

fn cell_frame(axis: Axis, main: f64, cross: f64, extent: f64, cell: f64) -> Frame {
    match axis {
        Axis::Vertical => Frame::new(cross, main, cell, extent),
        Axis::Horizontal => Frame::new(main, cross, extent, cell),
    }
}

impl CollectionViewDataProvider for SimulatedCollectionView {
    fn for_each_visible_index_path(&self, f: &mut dyn FnMut(IndexPath)) {
        let start = self.offset.along(self.axis);
        let end = start + self.viewport.along(self.axis);
        for (s, frames) in self.frames.iter().enumerate() {
            for (i, frame) in frames.iter().enumerate() {
                if frame.trailing_edge(self.axis) > start && frame.leading_edge(self.axis) < end {
                    f(IndexPath::new(s, i));
                }
            }
        }
    }

    fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    fn number_of_items(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, Vec::len)
    }

    fn content_offset(&self) -> Point {
        self.offset
    }
}

impl LayoutAttributesProvider for SimulatedCollectionView {
    fn layout_attributes(&self, index_path: IndexPath) -> Option<Frame> {
        self.frames
            .get(index_path.section)?
            .get(index_path.item)
            .copied()
    }
}

impl HostView for SimulatedCollectionView {
    fn content_size(&self) -> Size {
        self.content_size
    }

    fn viewport_size(&self) -> Size {
        self.viewport
    }

    fn set_content_offset(&mut self, offset: Point) {
        self.offset_writes += 1;
        self.offset = offset;
    }
}
