use stable_layout::{
    CollectionViewDataProvider, HostUpdateItem, IndexPath, Size, UpdateAction, UpdateTarget,
};
use stable_layout_adapter::{SimulatedCollectionView, StableLayout};

fn main() {
    // Example: a chat/timeline loads older messages above what the user is reading.
    //
    // The adapter flow is:
    // 1) prepare with the batch's update records (the anchor is captured here)
    // 2) apply the data change and lay out again
    // 3) finalize, which moves the scroll offset so the anchored item stays put
    let mut view = SimulatedCollectionView::new(Size::new(320.0, 480.0))
        .with_section((0..100).map(|i| 40.0 + (i % 3) as f64 * 10.0));
    view.scroll_to(600.0);

    let reading = view.visible_index_paths()[1];
    let id = view.item(reading).map(|item| item.id).unwrap_or_default();
    println!(
        "before: offset={:?} reading={reading} at {:?}",
        view.content_offset(),
        view.screen_position(id)
    );

    let records: Vec<_> = (0..20)
        .map(|i| {
            HostUpdateItem::new(
                UpdateAction::Insert,
                None,
                Some(UpdateTarget::Item(IndexPath::new(0, i))),
            )
        })
        .collect();

    let mut layout = StableLayout::default();
    let correction = layout.perform_batch_updates(&mut view, &records, |v| {
        let ops = stable_layout::normalize(&records);
        v.apply_updates(&ops, |_| 64.0);
    });

    println!(
        "after: offset={:?} reading={:?} at {:?} ({correction:?})",
        view.content_offset(),
        view.index_path_of(id),
        view.screen_position(id)
    );
}
