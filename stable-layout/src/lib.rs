//! Scroll-offset stabilization for sectioned, virtualized list layouts.
//!
//! When a list view applies a batch of inserts, deletes, moves or reloads, items above the
//! viewport shift while the scroll offset stays put, so the visible content jumps. This crate
//! keeps the content still: before the batch it picks the leading visible item as an anchor,
//! maps that item's index path through the batch, and after the batch moves the scroll offset
//! by however far the anchor moved.
//!
//! It is UI-agnostic. A host view is expected to provide (see [`HostView`]):
//! - visible index paths, section/item counts and the current scroll offset
//! - item frames from its layout pass, before and after the mutation
//! - content/viewport sizes and a direct (non-animated) offset setter
//!
//! For a layout facade and an in-memory host, see the `stable-layout-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod anchor;
mod controller;
mod key;
mod options;
mod provider;
mod reconcile;
mod remap;
mod snapshot;
mod types;
mod update;


pub use anchor::{AnchorResolution, resolve_anchor, select_anchor};
pub use controller::{DefaultOffsetController, OffsetController, Phase};
pub use key::SnapshotMap;
pub use options::OffsetControllerOptions;
pub use provider::{CollectionViewDataProvider, HostView, LayoutAttributesProvider};
pub use reconcile::{Correction, SkipReason, corrected_offset, max_valid_offset};
pub use remap::IndexPathRemap;
pub use snapshot::{AnchorCandidate, VisibleItemSnapshot, capture};
pub use types::{Axis, Frame, IndexPath, Point, Size};
pub use update::{HostUpdateItem, UpdateAction, UpdateOperation, UpdateTarget, normalize};
