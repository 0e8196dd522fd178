//! Records with pending changes.
//!
//! A [`Record`] is a [`Canonical`] plus a [`Diff`] of changes not yet applied
//! to it. Single-field writes and prepends only touch the diff. Reads go
//! through the diff; traversals flush first so that they see one flat
//! record in row order.

use std::fmt;

use crate::{canonical::Canonical, diff::Diff, effect::Effect};

#[derive(Clone)]
pub struct Record<T> {
    canon: Canonical<T>,
    diff: Diff<T>,
}

impl<T> Record<T> {
    pub fn new() -> Self {
        Self::from_canonical(Canonical::new())
    }

    pub fn from_canonical(canon: Canonical<T>) -> Self {
        Self {
            canon,
            diff: Diff::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.canon.len() + self.diff.num_new()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether there are changes that have not been flushed.
    pub fn is_dirty(&self) -> bool {
        !self.diff.is_empty()
    }

    #[track_caller]
    pub fn get(&self, index: usize) -> &T {
        let len = self.len();
        if index >= len {
            panic!("contract violation: get: index {index} out of bounds for record of length {len}");
        }
        self.diff.get(&self.canon, index)
    }

    #[track_caller]
    pub fn set(mut self, index: usize, value: T) -> Self {
        let len = self.len();
        if index >= len {
            panic!("contract violation: set: index {index} out of bounds for record of length {len}");
        }
        self.diff.set(index, value);
        self
    }

    /// Prepend `fields`, already in row order.
    pub fn insert(mut self, fields: Vec<T>) -> Self {
        self.diff.insert(fields);
        self
    }

    pub fn into_canonical(self) -> Canonical<T> {
        if self.diff.is_empty() {
            return self.canon;
        }
        self.diff.apply(self.canon)
    }

    pub fn to_canonical(&self) -> Canonical<T>
    where
        T: Clone,
    {
        self.clone().into_canonical()
    }

    /// Apply pending changes in place.
    pub fn flush(&mut self) {
        if self.diff.is_empty() {
            return;
        }
        let canon = std::mem::take(&mut self.canon);
        let diff = std::mem::take(&mut self.diff);
        self.canon = diff.apply(canon);
    }

    #[track_caller]
    pub fn project(&self, indices: &[usize]) -> Self
    where
        T: Clone,
    {
        if self.is_dirty() {
            // Read through the diff, the flush can wait.
            return indices.iter().map(|&i| self.get(i).clone()).collect();
        }
        Self::from_canonical(self.canon.project(indices))
    }

    pub fn map<U, F>(self, f: F) -> Record<U>
    where
        F: FnMut(T) -> U,
    {
        Record::from_canonical(self.into_canonical().map(f))
    }

    pub fn try_map<R, F>(self, f: F) -> R::Rewrap<Canonical<R::Output>>
    where
        R: Effect,
        F: FnMut(T) -> R,
    {
        self.into_canonical().try_map(f)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        (0..self.len()).map(|i| self.diff.get(&self.canon, i))
    }

    pub fn to_debug_string(&self) -> String
    where
        T: fmt::Debug,
    {
        format!("{self:?}")
    }
}

impl<T> Default for Record<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Canonical<T>> for Record<T> {
    fn from(canon: Canonical<T>) -> Self {
        Self::from_canonical(canon)
    }
}

impl<T> FromIterator<T> for Record<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_canonical(iter.into_iter().collect())
    }
}

/// Records are equal when they hold equal values in the same row order,
/// whether or not their changes have been flushed.
impl<T: PartialEq> PartialEq for Record<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Record<T> {}

impl<T: fmt::Debug> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record<i32> {
        Record::from_canonical(Canonical::from_vec(vec![10, 20, 30]))
    }

    #[test]
    fn reads_see_pending_writes() {
        let r = record().insert(vec![1, 2]).set(3, 99);
        assert!(r.is_dirty());
        assert_eq!(r.len(), 5);
        assert_eq!(*r.get(0), 1);
        assert_eq!(*r.get(3), 99);
        assert_eq!(r.iter().copied().collect::<Vec<_>>(), [1, 2, 10, 99, 30]);
    }

    #[test]
    fn flush_matches_canonical_operations() {
        let r = record().set(1, 99).insert(vec![1, 2]);
        let expected = Canonical::from_vec(vec![10, 20, 30])
            .set_at_index([(1, 99)])
            .insert(vec![1, 2]);
        assert_eq!(r.to_canonical(), expected);
        assert_eq!(r.into_canonical(), expected);
    }

    #[test]
    fn flush_in_place() {
        let mut r = record().insert(vec![0]);
        r.flush();
        assert!(!r.is_dirty());
        assert_eq!(r, Record::from_iter([0, 10, 20, 30]));
    }

    #[test]
    fn equality_ignores_pending_state() {
        let flushed = Record::from_iter([1, 10, 20, 30]);
        let pending = record().insert(vec![1]);
        assert_eq!(flushed, pending);
        assert_ne!(record(), pending);
    }

    #[test]
    fn project_dirty_and_clean() {
        let clean = record();
        assert_eq!(clean.project(&[2, 0, 0]), Record::from_iter([30, 10, 10]));

        let dirty = record().set(0, 5);
        assert_eq!(dirty.project(&[2, 0]), Record::from_iter([30, 5]));
    }

    #[test]
    fn map_and_try_map_flush_first() {
        let r = record().insert(vec![1]);
        assert_eq!(r.clone().map(|x| x * 2), Record::from_iter([2, 20, 40, 60]));

        let mut order = Vec::new();
        let out = r.try_map(|x| {
            order.push(x);
            Some(x)
        });
        assert_eq!(out, Some(Canonical::from_vec(vec![1, 10, 20, 30])));
        assert_eq!(order, [1, 10, 20, 30]);
    }

    #[test]
    fn debug_renders_in_row_order() {
        assert_eq!(record().insert(vec![1]).to_debug_string(), "[1, 10, 20, 30]");
    }

    #[test]
    #[should_panic(expected = "set: index 3 out of bounds for record of length 3")]
    fn set_out_of_bounds_traps() {
        record().set(3, 0);
    }

    #[test]
    #[should_panic(expected = "get: index 4 out of bounds")]
    fn get_out_of_bounds_traps() {
        record().insert(vec![0]).get(4);
    }
}
