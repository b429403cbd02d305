use alloc::vec::Vec;

use crate::IndexPath;

/// What a single update operation refers to: a whole section or one item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateTarget {
    Section(usize),
    Item(IndexPath),
}

impl UpdateTarget {
    pub fn is_section(&self) -> bool {
        matches!(self, Self::Section(_))
    }

    pub fn section(&self) -> usize {
        match self {
            Self::Section(section) => *section,
            Self::Item(path) => path.section,
        }
    }

    fn same_kind(&self, other: &Self) -> bool {
        self.is_section() == other.is_section()
    }
}

impl From<IndexPath> for UpdateTarget {
    fn from(path: IndexPath) -> Self {
        Self::Item(path)
    }
}

/// A normalized list mutation.
///
/// Index path conventions follow standard list diffing:
/// - `Insert` and the `after` side of `Move`/`Reload` refer to post-update indexes.
/// - `Delete` and the `before` side of `Move`/`Reload` refer to pre-update indexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateOperation {
    Insert(UpdateTarget),
    Delete(UpdateTarget),
    Reload {
        before: UpdateTarget,
        after: UpdateTarget,
    },
    Move {
        before: UpdateTarget,
        after: UpdateTarget,
    },
}

impl UpdateOperation {
    pub fn insert_item(section: usize, item: usize) -> Self {
        Self::Insert(UpdateTarget::Item(IndexPath::new(section, item)))
    }

    pub fn delete_item(section: usize, item: usize) -> Self {
        Self::Delete(UpdateTarget::Item(IndexPath::new(section, item)))
    }

    pub fn reload_item(section: usize, item: usize) -> Self {
        let path = UpdateTarget::Item(IndexPath::new(section, item));
        Self::Reload {
            before: path,
            after: path,
        }
    }

    pub fn move_item(before: IndexPath, after: IndexPath) -> Self {
        Self::Move {
            before: UpdateTarget::Item(before),
            after: UpdateTarget::Item(after),
        }
    }

    pub fn insert_section(section: usize) -> Self {
        Self::Insert(UpdateTarget::Section(section))
    }

    pub fn delete_section(section: usize) -> Self {
        Self::Delete(UpdateTarget::Section(section))
    }

    pub fn reload_section(section: usize) -> Self {
        Self::Reload {
            before: UpdateTarget::Section(section),
            after: UpdateTarget::Section(section),
        }
    }

    pub fn move_section(before: usize, after: usize) -> Self {
        Self::Move {
            before: UpdateTarget::Section(before),
            after: UpdateTarget::Section(after),
        }
    }

    /// The pre-update target, if the operation has one (everything but `Insert`).
    pub fn before(&self) -> Option<UpdateTarget> {
        match self {
            Self::Insert(_) => None,
            Self::Delete(target) => Some(*target),
            Self::Reload { before, .. } | Self::Move { before, .. } => Some(*before),
        }
    }

    /// The post-update target, if the operation has one (everything but `Delete`).
    pub fn after(&self) -> Option<UpdateTarget> {
        match self {
            Self::Insert(target) => Some(*target),
            Self::Delete(_) => None,
            Self::Reload { after, .. } | Self::Move { after, .. } => Some(*after),
        }
    }

    pub fn is_section_level(&self) -> bool {
        match self {
            Self::Insert(target) | Self::Delete(target) => target.is_section(),
            Self::Reload { before, .. } | Self::Move { before, .. } => before.is_section(),
        }
    }
}

/// The kind of change a host update record describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateAction {
    Insert,
    Delete,
    Reload,
    Move,
    /// A no-op record; dropped during normalization.
    None,
}

/// An update record as reported by the host, before normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostUpdateItem {
    pub action: UpdateAction,
    pub before: Option<UpdateTarget>,
    pub after: Option<UpdateTarget>,
}

impl HostUpdateItem {
    pub fn new(
        action: UpdateAction,
        before: Option<UpdateTarget>,
        after: Option<UpdateTarget>,
    ) -> Self {
        Self {
            action,
            before,
            after,
        }
    }

    /// Converts this record into an [`UpdateOperation`].
    ///
    /// Returns `None` for `UpdateAction::None` and for malformed records (a missing required
    /// index path, or a section target paired with an item target).
    pub fn to_operation(&self) -> Option<UpdateOperation> {
        match self.action {
            UpdateAction::None => None,
            UpdateAction::Insert => self.after.map(UpdateOperation::Insert),
            UpdateAction::Delete => self.before.map(UpdateOperation::Delete),
            UpdateAction::Reload => {
                let before = self.before?;
                let after = self.after.unwrap_or(before);
                before
                    .same_kind(&after)
                    .then_some(UpdateOperation::Reload { before, after })
            }
            UpdateAction::Move => {
                let (before, after) = (self.before?, self.after?);
                before
                    .same_kind(&after)
                    .then_some(UpdateOperation::Move { before, after })
            }
        }
    }
}

/// Normalizes host update records into an ordered sequence of [`UpdateOperation`]s.
///
/// Host ordering is preserved. Malformed records are dropped (and logged with the `tracing`
/// feature) rather than failing the whole batch.
pub fn normalize<'a>(items: impl IntoIterator<Item = &'a HostUpdateItem>) -> Vec<UpdateOperation> {
    let items = items.into_iter();
    let mut out = Vec::with_capacity(items.size_hint().0);
    for item in items {
        match item.to_operation() {
            Some(op) => out.push(op),
            None if item.action == UpdateAction::None => {}
            None => {
                swarn!(
                    action = ?item.action,
                    before = ?item.before,
                    after = ?item.after,
                    "normalize: dropping malformed update record"
                );
            }
        }
    }
    out
}
