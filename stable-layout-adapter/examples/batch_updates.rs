use stable_layout::{
    CollectionViewDataProvider, HostUpdateItem, IndexPath, Size, UpdateAction, UpdateTarget,
};
use stable_layout_adapter::{InvalidationContext, SimulatedCollectionView, StableLayout};

fn item(section: usize, item: usize) -> Option<UpdateTarget> {
    Some(UpdateTarget::Item(IndexPath::new(section, item)))
}

fn main() {
    // Example: a mixed batch that deletes the item at the top of the viewport.
    //
    // The controller falls back to the next surviving visible item and keeps that one still.
    let mut view = SimulatedCollectionView::new(Size::new(320.0, 200.0))
        .with_section(std::iter::repeat_n(30.0, 10))
        .with_section(std::iter::repeat_n(50.0, 40));
    view.scroll_to(400.0);

    let mut layout = StableLayout::default();
    // A cell resized itself: refresh the cached visible geometry.
    view.set_extent(IndexPath::new(1, 0), 70.0);
    layout.invalidate_layout(&view, InvalidationContext::partial());

    let visible = view.visible_index_paths();
    let top = visible[0];
    let next = view.item(visible[1]).map(|i| i.id).unwrap_or_default();
    println!(
        "before: offset={:?} top={top} next at {:?}",
        view.content_offset(),
        view.screen_position(next)
    );

    let records = [
        HostUpdateItem::new(UpdateAction::Delete, item(top.section, top.item), None),
        HostUpdateItem::new(UpdateAction::Insert, None, item(0, 0)),
        HostUpdateItem::new(UpdateAction::Move, item(1, 0), item(0, 1)),
        HostUpdateItem::new(UpdateAction::Reload, item(0, 5), None),
    ];
    let correction = layout.perform_batch_updates(&mut view, &records, |v| {
        let ops = stable_layout::normalize(&records);
        v.apply_updates(&ops, |_| 90.0);
    });

    println!(
        "after: offset={:?} next at {:?} ({correction:?})",
        view.content_offset(),
        view.screen_position(next)
    );
}
