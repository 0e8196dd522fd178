//! Pending changes to a canonical record.
//!
//! Writing one field of a [`Canonical`] in place is cheap, but keeping the
//! old record around means copying it, and prepending always rebuilds the
//! storage. A [`Diff`] collects those changes so they can be applied to the
//! canonical storage in one pass.

use indexmap::IndexMap;

use crate::canonical::Canonical;

#[derive(Clone, derive_more::Debug)]
pub struct Diff<T> {
    /// Overwrites, keyed by index into the canonical storage.
    updated: IndexMap<usize, T>,
    /// Prepended fields in reverse row order, so that prepending is a push.
    #[debug("{} new", new.len())]
    new: Vec<T>,
}

impl<T> Diff<T> {
    pub fn new() -> Self {
        Self {
            updated: IndexMap::new(),
            new: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.new.is_empty()
    }

    /// Number of fields prepended since the last flush.
    pub fn num_new(&self) -> usize {
        self.new.len()
    }

    /// Read slot `index` of the record `self` applied to `canon` would
    /// produce.
    #[track_caller]
    pub fn get<'a>(&'a self, canon: &'a Canonical<T>, index: usize) -> &'a T {
        let num_new = self.new.len();
        if index < num_new {
            return &self.new[num_new - 1 - index];
        }
        let index = index - num_new;
        match self.updated.get(&index) {
            Some(value) => value,
            None => canon.get(index),
        }
    }

    /// Overwrite slot `index` of the resulting record. The caller checks the
    /// index against the full record.
    pub fn set(&mut self, index: usize, value: T) {
        let num_new = self.new.len();
        if index < num_new {
            self.new[num_new - 1 - index] = value;
        } else {
            self.updated.insert(index - num_new, value);
        }
    }

    /// Prepend `fields`, already in row order.
    pub fn insert(&mut self, fields: Vec<T>) {
        self.new.extend(fields.into_iter().rev());
    }

    /// Apply every pending change to `canon`: one batch of overwrites, then
    /// one prepend.
    #[track_caller]
    pub fn apply(self, canon: Canonical<T>) -> Canonical<T> {
        let Self { updated, mut new } = self;
        log::trace!(
            "flushing {} updates and {} new fields into a record of {} fields",
            updated.len(),
            new.len(),
            canon.len()
        );
        new.reverse();
        canon.set_at_index(updated).insert(new)
    }
}

impl<T> Default for Diff<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_diff_changes_nothing() {
        let canon = Canonical::from_vec(vec![1, 2, 3]);
        let diff = Diff::new();
        assert!(diff.is_empty());
        assert_eq!(*diff.get(&canon, 1), 2);
        assert_eq!(diff.apply(canon.clone()), canon);
    }

    #[test]
    fn prepended_fields_come_first() {
        let canon = Canonical::from_vec(vec![10, 20]);
        let mut diff = Diff::new();
        diff.insert(vec![3, 4]);
        diff.insert(vec![1, 2]);
        assert_eq!(diff.num_new(), 4);
        let seen: Vec<i32> = (0..6).map(|i| *diff.get(&canon, i)).collect();
        assert_eq!(seen, [1, 2, 3, 4, 10, 20]);
        assert_eq!(diff.apply(canon).into_vec(), [1, 2, 3, 4, 10, 20]);
    }

    #[test]
    fn set_lands_in_the_right_place() {
        let canon = Canonical::from_vec(vec![10, 20, 30]);
        let mut diff = Diff::new();
        diff.insert(vec![1]);
        diff.set(0, 100);
        diff.set(2, 200);
        diff.set(2, 250);
        assert_eq!(*diff.get(&canon, 0), 100);
        assert_eq!(*diff.get(&canon, 2), 250);
        assert_eq!(*diff.get(&canon, 3), 30);
        assert_eq!(diff.apply(canon).into_vec(), [100, 10, 250, 30]);
    }

    #[test]
    fn updates_keep_their_canonical_index_after_later_inserts() {
        let canon = Canonical::from_vec(vec!['a', 'b']);
        let mut diff = Diff::new();
        diff.set(1, 'B');
        diff.insert(vec!['x']);
        assert_eq!(*diff.get(&canon, 2), 'B');
        assert_eq!(diff.apply(canon).into_vec(), ['x', 'a', 'B']);
    }
}
