use crate::Axis;

/// Configuration for [`crate::DefaultOffsetController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetControllerOptions {
    /// When `false`, the controller keeps tracking batches but never writes the host's
    /// scroll offset.
    pub enable_automatic_content_offset_adjustment: bool,

    /// The host's scroll axis.
    pub axis: Axis,
}

impl Default for OffsetControllerOptions {
    fn default() -> Self {
        Self {
            enable_automatic_content_offset_adjustment: true,
            axis: Axis::Vertical,
        }
    }
}

impl OffsetControllerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enable_automatic_content_offset_adjustment(mut self, enabled: bool) -> Self {
        self.enable_automatic_content_offset_adjustment = enabled;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }
}
