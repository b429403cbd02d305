use crate::*;

use alloc::boxed::Box;
use alloc::vec::Vec;
use std::cell::RefCell;
use std::rc::Rc;

use stable_layout::{
    Axis, CollectionViewDataProvider, Correction, HostUpdateItem, HostView, IndexPath,
    LayoutAttributesProvider, OffsetController, OffsetControllerOptions, Point, SkipReason, Size,
    UpdateAction, UpdateOperation, UpdateTarget, capture, select_anchor,
};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as usize
    }
}

fn item_record(
    action: UpdateAction,
    before: Option<(usize, usize)>,
    after: Option<(usize, usize)>,
) -> HostUpdateItem {
    let target = |(s, i): (usize, usize)| UpdateTarget::Item(IndexPath::new(s, i));
    HostUpdateItem::new(action, before.map(target), after.map(target))
}

fn apply_records(view: &mut SimulatedCollectionView, records: &[HostUpdateItem], extent: f64) {
    let ops = stable_layout::normalize(records);
    view.apply_updates(&ops, |_| extent);
}

/// The item the controller is expected to anchor on.
fn leading_item_id(view: &SimulatedCollectionView) -> u64 {
    let snapshots: Vec<_> = view
        .visible_index_paths()
        .into_iter()
        .filter_map(|p| capture(view, p))
        .collect();
    let offset = view.content_offset().along(view.axis());
    let anchor = select_anchor(&snapshots, offset, view.axis()).unwrap();
    view.item(anchor.index_path).unwrap().id
}

#[test]
fn insert_at_top_keeps_anchored_item_on_screen() {
    let mut view = SimulatedCollectionView::new(Size::new(320.0, 100.0))
        .with_section(core::iter::repeat_n(20.0, 30));
    assert_eq!(
        view.visible_index_paths(),
        (0..5).map(|i| IndexPath::new(0, i)).collect::<Vec<_>>()
    );
    let anchored = view.item(IndexPath::new(0, 0)).unwrap().id;

    let mut layout = StableLayout::default();
    let records = [item_record(UpdateAction::Insert, None, Some((0, 0)))];
    let correction =
        layout.perform_batch_updates(&mut view, &records, |v| apply_records(v, &records, 50.0));

    assert_eq!(correction.applied_offset(), Some(Point::new(0.0, 50.0)));
    assert_eq!(view.index_path_of(anchored), Some(IndexPath::new(0, 1)));
    assert_eq!(view.screen_position(anchored), Some(0.0));
    assert_eq!(view.offset_writes(), 1);
}

#[test]
fn full_invalidation_skips_correction() {
    let mut view = SimulatedCollectionView::new(Size::new(320.0, 100.0))
        .with_section(core::iter::repeat_n(20.0, 30));
    view.scroll_to(100.0);
    let mut layout = StableLayout::default();

    let records = [item_record(UpdateAction::Insert, None, Some((0, 0)))];
    layout.prepare_for_collection_view_updates(&view, &records);
    layout.invalidate_layout(&view, InvalidationContext::everything());
    apply_records(&mut view, &records, 50.0);

    assert_eq!(
        layout.finalize_collection_view_updates(&mut view),
        Correction::Skipped(SkipReason::NoPendingBatch)
    );
    assert_eq!(view.content_offset(), Point::new(0.0, 100.0));
    assert_eq!(view.offset_writes(), 0);
}

#[test]
fn reloading_every_section_loses_the_anchor() {
    let mut view = SimulatedCollectionView::new(Size::new(320.0, 100.0))
        .with_section(core::iter::repeat_n(20.0, 10))
        .with_section(core::iter::repeat_n(20.0, 10));
    view.scroll_to(150.0);
    let mut layout = StableLayout::default();

    let ops = [UpdateOperation::reload_section(0), UpdateOperation::reload_section(1)];
    let records: Vec<_> = ops
        .iter()
        .map(|op| HostUpdateItem::new(UpdateAction::Reload, op.before(), op.after()))
        .collect();
    let correction = layout.perform_batch_updates(&mut view, &records, |v| {
        v.apply_updates(&ops, |_| 35.0)
    });

    assert_eq!(correction, Correction::Skipped(SkipReason::AnchorLost));
    assert_eq!(view.content_offset().y, 150.0);
}

#[test]
fn disabled_layout_leaves_offset_alone() {
    let mut view = SimulatedCollectionView::new(Size::new(320.0, 100.0))
        .with_section(core::iter::repeat_n(20.0, 30));
    view.scroll_to(200.0);
    let mut layout = StableLayout::default();
    assert!(layout.enable_automatic_content_offset_adjustment());
    layout.set_enable_automatic_content_offset_adjustment(false);
    assert!(!layout.offset_controller().enable_automatic_content_offset_adjustment());

    let records = [
        item_record(UpdateAction::Insert, None, Some((0, 0))),
        item_record(UpdateAction::Delete, Some((0, 3)), None),
    ];
    let correction =
        layout.perform_batch_updates(&mut view, &records, |v| apply_records(v, &records, 45.0));

    assert_eq!(correction, Correction::Skipped(SkipReason::Disabled));
    assert_eq!(view.content_offset().y, 200.0);
}

#[test]
fn partial_invalidation_never_moves_the_offset() {
    let mut view = SimulatedCollectionView::new(Size::new(320.0, 100.0))
        .with_section(core::iter::repeat_n(20.0, 30));
    view.scroll_to(60.0);
    let mut layout = StableLayout::default();

    view.set_extent(IndexPath::new(0, 0), 80.0);
    layout.invalidate_layout(&view, InvalidationContext::partial());
    layout.invalidate_layout(&view, InvalidationContext::partial());

    assert_eq!(view.content_offset().y, 60.0);
    assert_eq!(view.offset_writes(), 0);
    assert_eq!(
        layout.finalize_collection_view_updates(&mut view),
        Correction::Skipped(SkipReason::NoPendingBatch)
    );
}

#[test]
fn grid_anchor_uses_lowest_index_on_a_tied_row() {
    let mut view = SimulatedCollectionView::new(Size::new(300.0, 100.0))
        .with_columns(2)
        .with_section(core::iter::repeat_n(40.0, 40));
    view.scroll_to(80.0);
    let anchored = view.item(IndexPath::new(0, 4)).unwrap().id;
    assert_eq!(leading_item_id(&view), anchored);

    let mut layout = StableLayout::default();
    let records = [
        item_record(UpdateAction::Insert, None, Some((0, 0))),
        item_record(UpdateAction::Insert, None, Some((0, 1))),
    ];
    let correction =
        layout.perform_batch_updates(&mut view, &records, |v| apply_records(v, &records, 30.0));

    // A new 30-tall row above: (0, 4) becomes (0, 6) and sits 30 further down.
    assert_eq!(correction.applied_offset(), Some(Point::new(0.0, 110.0)));
    assert_eq!(view.index_path_of(anchored), Some(IndexPath::new(0, 6)));
    assert_eq!(view.screen_position(anchored), Some(0.0));
}

#[test]
fn horizontal_list_adjusts_x_only() {
    let mut view = SimulatedCollectionView::new(Size::new(200.0, 60.0))
        .with_axis(Axis::Horizontal)
        .with_section(core::iter::repeat_n(50.0, 20));
    view.scroll_to(125.0);
    let anchored = leading_item_id(&view);
    let before = view.screen_position(anchored).unwrap();

    let mut layout =
        StableLayout::with_options(OffsetControllerOptions::new().with_axis(Axis::Horizontal));
    let records = [item_record(UpdateAction::Insert, None, Some((0, 1)))];
    let correction =
        layout.perform_batch_updates(&mut view, &records, |v| apply_records(v, &records, 70.0));

    assert_eq!(correction.applied_offset(), Some(Point::new(195.0, 0.0)));
    assert_eq!(view.screen_position(anchored), Some(before));
}

#[test]
fn moved_anchor_is_followed_to_its_new_section() {
    let mut view = SimulatedCollectionView::new(Size::new(320.0, 100.0))
        .with_section(core::iter::repeat_n(50.0, 10))
        .with_section(core::iter::repeat_n(50.0, 10));
    let anchored = view.item(IndexPath::new(0, 0)).unwrap().id;

    let mut layout = StableLayout::default();
    let records = [item_record(UpdateAction::Move, Some((0, 0)), Some((1, 0)))];
    let correction =
        layout.perform_batch_updates(&mut view, &records, |v| apply_records(v, &records, 0.0));

    assert_eq!(view.index_path_of(anchored), Some(IndexPath::new(1, 0)));
    assert_eq!(correction.applied_offset(), Some(Point::new(0.0, 450.0)));
    assert_eq!(view.screen_position(anchored), Some(0.0));
}

#[derive(Default)]
struct Recorder {
    calls: Vec<&'static str>,
    enabled: bool,
}

struct RecordingController(Rc<RefCell<Recorder>>);

impl OffsetController for RecordingController {
    fn enable_automatic_content_offset_adjustment(&self) -> bool {
        self.0.borrow().enabled
    }

    fn set_enable_automatic_content_offset_adjustment(&mut self, enabled: bool) {
        self.0.borrow_mut().enabled = enabled;
    }

    fn prepare_for_updates(
        &mut self,
        _data: &dyn CollectionViewDataProvider,
        _layout: &dyn LayoutAttributesProvider,
        operations: Vec<UpdateOperation>,
    ) {
        assert_eq!(operations.len(), 1);
        self.0.borrow_mut().calls.push("prepare");
    }

    fn finalize_updates(&mut self, _host: &mut dyn HostView) -> Correction {
        self.0.borrow_mut().calls.push("finalize");
        Correction::Skipped(SkipReason::NoAnchor)
    }

    fn refresh_visible_attributes(
        &mut self,
        _data: &dyn CollectionViewDataProvider,
        _layout: &dyn LayoutAttributesProvider,
    ) {
        self.0.borrow_mut().calls.push("refresh");
    }

    fn invalidate_everything(&mut self) {
        self.0.borrow_mut().calls.push("invalidate_everything");
    }
}

#[test]
fn injected_controller_receives_forwarded_calls() {
    let recorder = Rc::new(RefCell::new(Recorder::default()));
    let mut layout =
        StableLayout::new(Some(Box::new(RecordingController(Rc::clone(&recorder)))));
    let mut view = SimulatedCollectionView::new(Size::new(320.0, 100.0))
        .with_section(core::iter::repeat_n(20.0, 10));

    layout.set_enable_automatic_content_offset_adjustment(true);
    assert!(recorder.borrow().enabled);

    let records = [
        item_record(UpdateAction::None, Some((0, 0)), Some((0, 0))),
        item_record(UpdateAction::Delete, Some((0, 2)), None),
    ];
    layout.invalidate_layout(&view, InvalidationContext::partial());
    let correction =
        layout.perform_batch_updates(&mut view, &records, |v| apply_records(v, &records, 0.0));
    layout.invalidate_layout(&view, InvalidationContext::everything());

    assert_eq!(correction, Correction::Skipped(SkipReason::NoAnchor));
    assert_eq!(
        recorder.borrow().calls,
        ["refresh", "prepare", "finalize", "invalidate_everything"]
    );
}

#[test]
fn randomized_mixed_batches_keep_anchor_in_place() {
    let mut rng = Lcg::new(42);
    for _ in 0..150 {
        let count = rng.gen_range_usize(30, 90);
        let extents: Vec<f64> = (0..count)
            .map(|_| rng.gen_range_usize(10, 61) as f64)
            .collect();
        let mut view = SimulatedCollectionView::new(Size::new(320.0, 120.0)).with_section(extents);
        let max = view.content_size().height - 120.0;
        view.scroll_to(rng.gen_range_usize(0, max as usize) as f64);

        let anchored = leading_item_id(&view);
        let anchor_item = view.index_path_of(anchored).unwrap().item;
        let before = view.screen_position(anchored).unwrap();

        // Deletes anywhere but the anchor (pre-update indexes), inserts anywhere (post-update).
        let mut ops = Vec::new();
        for _ in 0..rng.gen_range_usize(1, 6) {
            let i = rng.gen_range_usize(0, count);
            if i != anchor_item {
                ops.push(UpdateOperation::delete_item(0, i));
            }
        }
        for _ in 0..rng.gen_range_usize(1, 6) {
            ops.push(UpdateOperation::insert_item(0, rng.gen_range_usize(0, count / 2)));
        }
        let records: Vec<_> = ops
            .iter()
            .map(|op| {
                let action = match op {
                    UpdateOperation::Insert(_) => UpdateAction::Insert,
                    _ => UpdateAction::Delete,
                };
                HostUpdateItem::new(action, op.before(), op.after())
            })
            .collect();

        let mut layout = StableLayout::default();
        let inserted = rng.gen_range_usize(10, 61) as f64;
        let correction = layout.perform_batch_updates(&mut view, &records, |v| {
            v.apply_updates(&ops, |_| inserted)
        });

        let offset = view.content_offset().y;
        let max = (view.content_size().height - 120.0).max(0.0);
        assert!(view.offset_writes() <= 1);
        if offset > 0.0 && offset < max {
            assert_eq!(view.screen_position(anchored), Some(before), "{correction:?}");
        } else {
            assert!(offset == 0.0 || offset == max, "{correction:?}");
        }
    }
}
