use alloc::boxed::Box;
use core::fmt;

use stable_layout::{
    Correction, DefaultOffsetController, HostUpdateItem, HostView, OffsetController,
    OffsetControllerOptions, normalize,
};

/// Describes what a layout invalidation affects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvalidationContext {
    /// Everything is invalid (e.g. the data was reloaded wholesale).
    pub invalidate_everything: bool,
}

impl InvalidationContext {
    pub fn everything() -> Self {
        Self {
            invalidate_everything: true,
        }
    }

    /// A partial invalidation, such as a cell adjusting its own size.
    pub fn partial() -> Self {
        Self::default()
    }
}

/// A layout facade that keeps the visible content still across batch updates.
///
/// This type does not compute item geometry. Adapters call it from their layout hooks:
/// - `prepare_for_collection_view_updates` before a batch is applied
/// - `finalize_collection_view_updates` once the batch has been applied and laid out
/// - `invalidate_layout` on every invalidation
///
/// Or use [`StableLayout::perform_batch_updates`] to run all three steps around a mutation.
pub struct StableLayout {
    offset_controller: Box<dyn OffsetController>,
}

impl StableLayout {
    /// Creates a layout driving `offset_controller`, or a [`DefaultOffsetController`] when
    /// `None`.
    pub fn new(offset_controller: Option<Box<dyn OffsetController>>) -> Self {
        let offset_controller = offset_controller
            .unwrap_or_else(|| Box::new(DefaultOffsetController::default()));
        Self { offset_controller }
    }

    pub fn with_options(options: OffsetControllerOptions) -> Self {
        Self::new(Some(Box::new(DefaultOffsetController::new(options))))
    }

    /// If `true`, the content offset is adjusted when the host applies a batch update.
    ///
    /// Default is `true`.
    pub fn enable_automatic_content_offset_adjustment(&self) -> bool {
        self.offset_controller
            .enable_automatic_content_offset_adjustment()
    }

    pub fn set_enable_automatic_content_offset_adjustment(&mut self, enabled: bool) {
        self.offset_controller
            .set_enable_automatic_content_offset_adjustment(enabled);
    }

    pub fn offset_controller(&self) -> &dyn OffsetController {
        self.offset_controller.as_ref()
    }

    pub fn offset_controller_mut(&mut self) -> &mut dyn OffsetController {
        self.offset_controller.as_mut()
    }

    pub fn prepare_for_collection_view_updates<V: HostView>(
        &mut self,
        view: &V,
        update_items: &[HostUpdateItem],
    ) {
        let operations = normalize(update_items);
        atrace!(
            records = update_items.len(),
            operations = operations.len(),
            "prepare_for_collection_view_updates"
        );
        self.offset_controller
            .prepare_for_updates(view, view, operations);
    }

    pub fn finalize_collection_view_updates<V: HostView>(&mut self, view: &mut V) -> Correction {
        self.offset_controller.finalize_updates(view)
    }

    /// Partial invalidations refresh the controller's visible-item cache; a full invalidation
    /// discards any in-flight batch instead.
    pub fn invalidate_layout<V: HostView>(&mut self, view: &V, context: InvalidationContext) {
        atrace!(
            everything = context.invalidate_everything,
            "invalidate_layout"
        );
        if context.invalidate_everything {
            self.offset_controller.invalidate_everything();
        } else {
            self.offset_controller.refresh_visible_attributes(view, view);
        }
    }

    /// Runs prepare, `apply`, then finalize: `apply` must mutate the host's data and re-run its
    /// layout pass.
    pub fn perform_batch_updates<V: HostView>(
        &mut self,
        view: &mut V,
        update_items: &[HostUpdateItem],
        apply: impl FnOnce(&mut V),
    ) -> Correction {
        self.prepare_for_collection_view_updates(view, update_items);
        apply(view);
        self.finalize_collection_view_updates(view)
    }
}

impl Default for StableLayout {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for StableLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StableLayout")
            .field(
                "enable_automatic_content_offset_adjustment",
                &self.enable_automatic_content_offset_adjustment(),
            )
            .finish_non_exhaustive()
    }
}
