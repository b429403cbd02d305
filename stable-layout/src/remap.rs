use alloc::collections::{BTreeMap, BTreeSet};

use crate::{IndexPath, UpdateOperation, UpdateTarget};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SectionFate {
    Deleted,
    Moved(usize),
    /// Contents replaced; `after` may differ from the pre-update index.
    Reloaded(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ItemFate {
    Deleted,
    Moved(IndexPath),
    /// Reloaded in place; the item keeps its identity.
    Reloaded,
}

/// Maps pre-update index paths to post-update index paths for one batch of updates.
///
/// Built from a normalized operation sequence. For a given pre-update path (or post-update
/// inserted path) the last operation seen wins.
#[derive(Clone, Debug, Default)]
pub struct IndexPathRemap {
    sections: BTreeMap<usize, SectionFate>,
    inserted_sections: BTreeSet<usize>,
    items: BTreeMap<IndexPath, ItemFate>,
    inserted_items: BTreeSet<IndexPath>,
}

impl IndexPathRemap {
    pub fn new(operations: &[UpdateOperation]) -> Self {
        let mut remap = Self::default();
        for op in operations {
            remap.record(op);
        }
        remap
    }

    fn record(&mut self, op: &UpdateOperation) {
        match *op {
            UpdateOperation::Insert(UpdateTarget::Section(s)) => {
                self.inserted_sections.insert(s);
            }
            UpdateOperation::Insert(UpdateTarget::Item(p)) => {
                self.inserted_items.insert(p);
            }
            UpdateOperation::Delete(UpdateTarget::Section(s)) => {
                self.sections.insert(s, SectionFate::Deleted);
            }
            UpdateOperation::Delete(UpdateTarget::Item(p)) => {
                self.items.insert(p, ItemFate::Deleted);
            }
            UpdateOperation::Move {
                before: UpdateTarget::Section(b),
                after: UpdateTarget::Section(a),
            } => {
                self.sections.insert(b, SectionFate::Moved(a));
            }
            UpdateOperation::Move {
                before: UpdateTarget::Item(b),
                after: UpdateTarget::Item(a),
            } => {
                self.items.insert(b, ItemFate::Moved(a));
            }
            UpdateOperation::Reload {
                before: UpdateTarget::Section(b),
                after: UpdateTarget::Section(a),
            } => {
                self.sections.insert(b, SectionFate::Reloaded(a));
            }
            UpdateOperation::Reload {
                before: UpdateTarget::Item(b),
                after: UpdateTarget::Item(a),
            } => {
                let fate = if a == b {
                    ItemFate::Reloaded
                } else {
                    ItemFate::Moved(a)
                };
                self.items.insert(b, fate);
            }
            UpdateOperation::Move { .. } | UpdateOperation::Reload { .. } => {
                swarn!(?op, "IndexPathRemap: mixed section/item targets ignored");
                debug_assert!(false, "mixed section/item targets in {op:?}");
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
            && self.inserted_sections.is_empty()
            && self.items.is_empty()
            && self.inserted_items.is_empty()
    }

    /// Returns the post-update index of a pre-update section, or `None` if it was deleted.
    ///
    /// A reloaded section still has a post-update index even though its items are lost.
    pub fn map_section(&self, section: usize) -> Option<usize> {
        match self.sections.get(&section) {
            Some(SectionFate::Deleted) => return None,
            Some(SectionFate::Moved(after)) => return Some(*after),
            Some(SectionFate::Reloaded(after)) if *after != section => return Some(*after),
            _ => {}
        }

        let removed_before = self
            .sections
            .range(..section)
            .filter(|(s, fate)| Self::section_vacates(**s, fate))
            .count();
        let mut post = section - removed_before;
        for occupied in self.occupied_sections() {
            if occupied <= post {
                post += 1;
            } else {
                break;
            }
        }
        Some(post)
    }

    /// Returns the post-update index path of a pre-update item, or `None` if the item does not
    /// survive the batch with a trackable identity (deleted, or in a deleted/reloaded section).
    pub fn map_item(&self, path: IndexPath) -> Option<IndexPath> {
        match self.sections.get(&path.section) {
            Some(SectionFate::Deleted) | Some(SectionFate::Reloaded(_)) => return None,
            _ => {}
        }
        match self.items.get(&path) {
            Some(ItemFate::Deleted) => return None,
            Some(ItemFate::Moved(after)) => return Some(*after),
            Some(ItemFate::Reloaded) | None => {}
        }

        let section = self.map_section(path.section)?;
        let removed_before = self
            .items
            .range(IndexPath::section_start(path.section)..path)
            .filter(|(_, fate)| !matches!(fate, ItemFate::Reloaded))
            .count();
        let mut item = path.item - removed_before;
        for occupied in self.occupied_items(section) {
            if occupied <= item {
                item += 1;
            } else {
                break;
            }
        }
        Some(IndexPath::new(section, item))
    }

    /// Returns `true` when the item at `path` loses its identity in this batch.
    pub fn is_removed(&self, path: IndexPath) -> bool {
        self.map_item(path).is_none()
    }

    fn section_vacates(section: usize, fate: &SectionFate) -> bool {
        match fate {
            SectionFate::Deleted | SectionFate::Moved(_) => true,
            SectionFate::Reloaded(after) => *after != section,
        }
    }

    /// Post-update section slots taken by inserted or relocated sections, ascending.
    fn occupied_sections(&self) -> impl Iterator<Item = usize> + '_ {
        let relocated = self
            .sections
            .iter()
            .filter(|(s, fate)| Self::section_vacates(**s, fate))
            .filter_map(|(_, fate)| match fate {
                SectionFate::Moved(after) | SectionFate::Reloaded(after) => Some(*after),
                SectionFate::Deleted => None,
            });
        let mut all: BTreeSet<usize> = self.inserted_sections.clone();
        all.extend(relocated);
        all.into_iter()
    }

    /// Post-update item slots in `section` taken by inserted or moved items, ascending.
    fn occupied_items(&self, section: usize) -> impl Iterator<Item = usize> + '_ {
        let range = IndexPath::section_start(section)..=IndexPath::new(section, usize::MAX);
        let mut all: BTreeSet<usize> = self
            .inserted_items
            .range(range)
            .map(|p| p.item)
            .collect();
        all.extend(self.items.values().filter_map(|fate| match fate {
            ItemFate::Moved(after) if after.section == section => Some(after.item),
            _ => None,
        }));
        all.into_iter()
    }
}
