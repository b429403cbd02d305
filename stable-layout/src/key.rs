#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::{IndexPath, VisibleItemSnapshot};

/// Cached visible-item geometry keyed by index path.
#[cfg(feature = "std")]
pub type SnapshotMap = HashMap<IndexPath, VisibleItemSnapshot>;
/// Cached visible-item geometry keyed by index path.
#[cfg(not(feature = "std"))]
pub type SnapshotMap = BTreeMap<IndexPath, VisibleItemSnapshot>;
