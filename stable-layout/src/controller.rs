use alloc::vec::Vec;

use crate::key::SnapshotMap;
use crate::{
    AnchorResolution, CollectionViewDataProvider, Correction, HostView, IndexPathRemap,
    LayoutAttributesProvider, OffsetControllerOptions, SkipReason, UpdateOperation,
    VisibleItemSnapshot, capture, corrected_offset, resolve_anchor,
};

/// Lifecycle of one stabilization cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Idle,
    /// A non-empty batch has been prepared and awaits finalize.
    Preparing,
}

/// The interface a layout uses to keep the visible content still across batch updates.
///
/// The host drives it:
/// 1. `prepare_for_updates` before applying a batch (pre-update geometry is still current),
/// 2. `finalize_updates` after the batch has been applied and laid out,
/// 3. `refresh_visible_attributes` on minor invalidations outside a batch,
/// 4. `invalidate_everything` on a full invalidation (e.g. a data reload).
pub trait OffsetController {
    fn enable_automatic_content_offset_adjustment(&self) -> bool;

    fn set_enable_automatic_content_offset_adjustment(&mut self, enabled: bool);

    /// Snapshots the anchor for `operations`. A second call before finalize replaces the
    /// pending batch.
    fn prepare_for_updates(
        &mut self,
        data: &dyn CollectionViewDataProvider,
        layout: &dyn LayoutAttributesProvider,
        operations: Vec<UpdateOperation>,
    );

    /// Resolves the anchor's post-update geometry and writes the corrected offset to `host`
    /// (at most once).
    fn finalize_updates(&mut self, host: &mut dyn HostView) -> Correction;

    /// Re-captures the visible-item cache. Never touches the pending batch or the host offset.
    fn refresh_visible_attributes(
        &mut self,
        data: &dyn CollectionViewDataProvider,
        layout: &dyn LayoutAttributesProvider,
    );

    /// Drops the in-flight batch and the visible-item cache; identity cannot be tracked across
    /// a full invalidation.
    fn invalidate_everything(&mut self);
}

#[derive(Clone, Debug)]
struct PendingBatch {
    operations: Vec<UpdateOperation>,
    resolution: AnchorResolution,
}

/// The default [`OffsetController`]: anchors on the leading visible item and tracks it through
/// index-path arithmetic.
#[derive(Clone, Debug, Default)]
pub struct DefaultOffsetController {
    options: OffsetControllerOptions,
    pending: Option<PendingBatch>,
    last_visible_snapshot: SnapshotMap,
}

impl DefaultOffsetController {
    pub fn new(options: OffsetControllerOptions) -> Self {
        Self {
            options,
            pending: None,
            last_visible_snapshot: SnapshotMap::default(),
        }
    }

    pub fn options(&self) -> &OffsetControllerOptions {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::Preparing
        } else {
            Phase::Idle
        }
    }

    /// Operations of the batch awaiting finalize (empty when idle).
    pub fn pending_operations(&self) -> &[UpdateOperation] {
        self.pending
            .as_ref()
            .map(|p| p.operations.as_slice())
            .unwrap_or(&[])
    }

    /// How the pending batch's anchor was resolved, if a batch is pending.
    pub fn anchor_resolution(&self) -> Option<&AnchorResolution> {
        self.pending.as_ref().map(|p| &p.resolution)
    }

    pub fn last_visible_snapshot(&self) -> &SnapshotMap {
        &self.last_visible_snapshot
    }

    /// Visible items in index path order, preferring cached geometry over the layout's current
    /// attributes.
    fn collect_visible(
        &self,
        data: &dyn CollectionViewDataProvider,
        layout: &dyn LayoutAttributesProvider,
    ) -> Vec<VisibleItemSnapshot> {
        let mut out = Vec::new();
        data.for_each_visible_index_path(&mut |path| {
            let snapshot = self
                .last_visible_snapshot
                .get(&path)
                .copied()
                .or_else(|| capture(layout, path));
            if let Some(snapshot) = snapshot {
                out.push(snapshot);
            }
        });
        out.sort_by_key(|s| s.index_path);
        out.dedup_by_key(|s| s.index_path);
        out
    }
}

impl OffsetController for DefaultOffsetController {
    fn enable_automatic_content_offset_adjustment(&self) -> bool {
        self.options.enable_automatic_content_offset_adjustment
    }

    fn set_enable_automatic_content_offset_adjustment(&mut self, enabled: bool) {
        self.options.enable_automatic_content_offset_adjustment = enabled;
    }

    fn prepare_for_updates(
        &mut self,
        data: &dyn CollectionViewDataProvider,
        layout: &dyn LayoutAttributesProvider,
        operations: Vec<UpdateOperation>,
    ) {
        if operations.is_empty() {
            strace!("prepare_for_updates: empty batch");
            self.pending = None;
            return;
        }

        let axis = self.options.axis;
        let scroll_offset = data.content_offset();
        let visible = self.collect_visible(data, layout);
        let remap = IndexPathRemap::new(&operations);
        let resolution = resolve_anchor(&visible, scroll_offset, axis, &remap);
        strace!(
            operations = operations.len(),
            visible = visible.len(),
            ?resolution,
            "prepare_for_updates"
        );

        self.last_visible_snapshot = visible.into_iter().map(|s| (s.index_path, s)).collect();
        self.pending = Some(PendingBatch {
            operations,
            resolution,
        });
    }

    fn finalize_updates(&mut self, host: &mut dyn HostView) -> Correction {
        let pending = self.pending.take();
        self.last_visible_snapshot.clear();

        let Some(batch) = pending else {
            return skipped(SkipReason::NoPendingBatch);
        };
        if !self.options.enable_automatic_content_offset_adjustment {
            return skipped(SkipReason::Disabled);
        }
        let (anchor, post_path) = match batch.resolution {
            AnchorResolution::None => return skipped(SkipReason::NoAnchor),
            AnchorResolution::Lost => return skipped(SkipReason::AnchorLost),
            AnchorResolution::Resolved { anchor, target } => (anchor, target),
        };

        if post_path.section >= host.number_of_sections()
            || post_path.item >= host.number_of_items(post_path.section)
        {
            swarn!(
                %post_path,
                "finalize_updates: resolved anchor is outside the post-update data"
            );
            return skipped(SkipReason::MissingAttributes);
        }
        let Some(new_frame) = host.layout_attributes(post_path) else {
            return skipped(SkipReason::MissingAttributes);
        };

        let axis = self.options.axis;
        let from = host.content_offset();
        let to = corrected_offset(
            &anchor,
            new_frame,
            from,
            host.content_size(),
            host.viewport_size(),
            axis,
        );
        if to == from {
            return skipped(SkipReason::Unchanged);
        }

        host.set_content_offset(to);
        sdebug!(
            anchor = %anchor.index_path(),
            %post_path,
            from = from.along(axis),
            to = to.along(axis),
            "finalize_updates: content offset adjusted"
        );
        Correction::Applied { from, to }
    }

    fn refresh_visible_attributes(
        &mut self,
        data: &dyn CollectionViewDataProvider,
        layout: &dyn LayoutAttributesProvider,
    ) {
        let mut next = SnapshotMap::default();
        data.for_each_visible_index_path(&mut |path| {
            if let Some(snapshot) = capture(layout, path) {
                next.insert(path, snapshot);
            }
        });
        strace!(visible = next.len(), "refresh_visible_attributes");
        self.last_visible_snapshot = next;
    }

    fn invalidate_everything(&mut self) {
        strace!(
            had_pending = self.pending.is_some(),
            "invalidate_everything"
        );
        self.pending = None;
        self.last_visible_snapshot.clear();
    }
}

fn skipped(reason: SkipReason) -> Correction {
    sdebug!(%reason, "finalize_updates: no correction");
    Correction::Skipped(reason)
}
