//! Adapter utilities for the `stable-layout` crate.
//!
//! `stable-layout` holds the offset-stabilization logic and knows nothing about any particular
//! list view. This crate provides the pieces an adapter usually needs around it:
//!
//! - [`StableLayout`]: a layout facade that forwards a host's update notifications (prepare,
//!   finalize, invalidate) to an injected or default offset controller
//! - [`SimulatedCollectionView`]: an in-memory sectioned list/grid host, useful as a test double
//!   and for experimenting with batch updates
//!
//! This crate is intentionally framework-agnostic (no toolkit bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod layout;
mod sim;

#[cfg(test)]
mod tests;

pub use layout::{InvalidationContext, StableLayout};
pub use sim::{SimItem, SimulatedCollectionView};
