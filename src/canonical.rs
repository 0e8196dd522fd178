//! Canonical record storage.
//!
//! A [`Canonical`] holds the fields of an anonymous record with no pending
//! changes: one slot per field, laid out in row order. It knows nothing about
//! field names. The layer that resolved the record's type translates names to
//! positions once and hands us plain indices, which we trust to be in bounds
//! and in the right order (see [`crate::contract`] for what happens when they
//! are not).
//!
//! Storage is a flat vector. Records are small and their row order is fixed,
//! so O(1) positional access and cheap traversal matter more than avoiding
//! the O(n) copy on a structural change.
//!
//! Every operation produces a new logical record. Operations that consume
//! `self` reuse the storage in place, since ownership proves nobody else can
//! observe the write; the `_ref` variants leave the original untouched.

use std::{fmt, mem::ManuallyDrop, ops::Index, slice, vec};

use crate::{
    constant::K,
    contract,
    effect::{self, Effect},
    error::{Error, Result},
};

#[cfg(feature = "async")]
use futures::{Future, TryFuture, TryFutureExt};

#[derive(Clone, PartialEq, Eq, Hash, derive_more::From)]
pub struct Canonical<T> {
    values: Vec<T>,
}

impl<T> Canonical<T> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Takes ownership of `values`, which must already be in row order.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Like [`Canonical::from_vec`], but for values coming from somewhere
    /// that has not been checked against the record's type.
    pub fn with_field_count(expected: usize, values: Vec<T>) -> Result<Self> {
        if values.len() != expected {
            log::debug!(
                "refusing to build a record of {expected} fields from {} values",
                values.len()
            );
            return Err(Error::wrong_num_of_fields(expected, values.len()));
        }
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.values.clone()
    }

    /// O(1).
    #[track_caller]
    pub fn get(&self, index: usize) -> &T {
        match self.values.get(index) {
            Some(value) => value,
            None => panic!(
                "contract violation: get: index {index} out of bounds for record of length {}",
                self.len()
            ),
        }
    }

    /// Overwrite a batch of slots. Later updates to the same index win.
    ///
    /// An empty batch hands back the record as is. Otherwise each update is
    /// written in place, so the cost is bounded by the size of the record no
    /// matter how many updates there are.
    #[track_caller]
    pub fn set_at_index<I>(mut self, updates: I) -> Self
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        let len = self.len();
        for (index, value) in updates {
            match self.values.get_mut(index) {
                Some(slot) => *slot = value,
                None => panic!(
                    "contract violation: set_at_index: index {index} out of bounds for record of length {len}"
                ),
            }
        }
        self
    }

    /// Copy-and-patch version of [`Canonical::set_at_index`]. The record is
    /// copied once, however many updates there are.
    #[track_caller]
    pub fn set_at_index_ref<I>(&self, updates: I) -> Self
    where
        I: IntoIterator<Item = (usize, T)>,
        T: Clone,
    {
        let mut updates = updates.into_iter().peekable();
        if updates.peek().is_none() {
            return self.clone();
        }
        self.clone().set_at_index(updates)
    }

    /// Prepend `new_fields`. The caller guarantees the concatenation is in row
    /// order; nothing is reordered or checked.
    pub fn insert(self, new_fields: Vec<T>) -> Self {
        if new_fields.is_empty() {
            return self;
        }
        let mut values = new_fields;
        values.reserve_exact(self.values.len());
        values.extend(self.values);
        Self { values }
    }

    /// Build the record whose `i`th slot is `self[indices[i]]`. Indices may
    /// repeat or skip slots, so this covers reordering, duplication and
    /// dropping fields.
    #[track_caller]
    pub fn project(&self, indices: &[usize]) -> Self
    where
        T: Clone,
    {
        contract::check_indices("project", indices, self.len());
        indices.iter().map(|&i| self.get(i).clone()).collect()
    }

    pub fn map<U, F>(self, f: F) -> Canonical<U>
    where
        F: FnMut(T) -> U,
    {
        self.values.into_iter().map(f).collect()
    }

    pub fn map_ref<U, F>(&self, f: F) -> Canonical<U>
    where
        F: FnMut(&T) -> U,
    {
        self.values.iter().map(f).collect()
    }

    /// Combine two records of the same shape slot by slot.
    #[track_caller]
    pub fn zip_with<B, C, F>(self, other: Canonical<B>, mut f: F) -> Canonical<C>
    where
        F: FnMut(T, B) -> C,
    {
        contract::check_shape("zip_with", self.len(), other.len());
        self.values
            .into_iter()
            .zip(other.values)
            .map(|(a, b)| f(a, b))
            .collect()
    }

    #[track_caller]
    pub fn zip_with_ref<B, C, F>(&self, other: &Canonical<B>, mut f: F) -> Canonical<C>
    where
        F: FnMut(&T, &B) -> C,
    {
        contract::check_shape("zip_with", self.len(), other.len());
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| f(a, b))
            .collect()
    }

    /// Apply an effectful `f` to every slot in row order. The first failure
    /// is returned as is and no later slot is visited.
    pub fn try_map<R, F>(self, f: F) -> R::Rewrap<Canonical<R::Output>>
    where
        R: Effect,
        F: FnMut(T) -> R,
    {
        effect::traverse::<_, R, Canonical<R::Output>, _>(self.values, f)
    }

    #[track_caller]
    pub fn try_zip_with<B, R, F>(self, other: Canonical<B>, mut f: F) -> R::Rewrap<Canonical<R::Output>>
    where
        R: Effect,
        F: FnMut(T, B) -> R,
    {
        contract::check_shape("try_zip_with", self.len(), other.len());
        effect::traverse::<_, R, Canonical<R::Output>, _>(
            self.values.into_iter().zip(other.values),
            |(a, b)| f(a, b),
        )
    }

    /// Run the effect held in each slot, in row order.
    pub fn try_sequence(self) -> T::Rewrap<Canonical<T::Output>>
    where
        T: Effect,
    {
        effect::traverse::<_, T, Canonical<T::Output>, _>(self.values, |effect| effect)
    }

    pub fn to_debug_string(&self) -> String
    where
        T: fmt::Debug,
    {
        format!("{self:?}")
    }
}

#[cfg(feature = "async")]
impl<T> Canonical<T> {
    /// Await `f` on each slot in turn. Futures are created and driven one at
    /// a time, never concurrently.
    pub async fn map_async<U, F, Fut>(self, mut f: F) -> Canonical<U>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = U>,
    {
        let mut values = Vec::with_capacity(self.len());
        for value in self.values {
            values.push(f(value).await);
        }
        Canonical { values }
    }

    /// Fallible [`Canonical::map_async`]. After a failure no further future
    /// is created.
    pub async fn try_map_async<U, E, F, Fut>(self, mut f: F) -> Result<Canonical<U>, E>
    where
        F: FnMut(T) -> Fut,
        Fut: TryFuture<Ok = U, Error = E>,
    {
        let mut values = Vec::with_capacity(self.len());
        for value in self.values {
            values.push(TryFutureExt::into_future(f(value)).await?);
        }
        Ok(Canonical { values })
    }

    #[track_caller]
    pub fn zip_with_async<B, C, F, Fut>(
        self,
        other: Canonical<B>,
        mut f: F,
    ) -> impl Future<Output = Canonical<C>>
    where
        F: FnMut(T, B) -> Fut,
        Fut: Future<Output = C>,
    {
        contract::check_shape("zip_with_async", self.len(), other.len());
        async move {
            let mut values = Vec::with_capacity(self.len());
            for (a, b) in self.values.into_iter().zip(other.values) {
                values.push(f(a, b).await);
            }
            Canonical { values }
        }
    }

    #[track_caller]
    pub fn try_zip_with_async<B, C, E, F, Fut>(
        self,
        other: Canonical<B>,
        mut f: F,
    ) -> impl Future<Output = Result<Canonical<C>, E>>
    where
        F: FnMut(T, B) -> Fut,
        Fut: TryFuture<Ok = C, Error = E>,
    {
        contract::check_shape("try_zip_with_async", self.len(), other.len());
        async move {
            let mut values = Vec::with_capacity(self.len());
            for (a, b) in self.values.into_iter().zip(other.values) {
                values.push(TryFutureExt::into_future(f(a, b)).await?);
            }
            Ok(Canonical { values })
        }
    }

    /// Await the future held in each slot, in row order.
    pub async fn sequence_async(self) -> Canonical<T::Output>
    where
        T: Future,
    {
        self.map_async(|fut| fut).await
    }

    /// Await the fallible future held in each slot, in row order. Futures
    /// after the first failure are dropped without being polled.
    pub async fn try_sequence_async(self) -> Result<Canonical<T::Ok>, T::Error>
    where
        T: TryFuture,
    {
        self.try_map_async(|fut| fut).await
    }
}

impl<F> Canonical<F> {
    /// Apply the function in each slot to the value in the same slot of
    /// `args`.
    #[track_caller]
    pub fn ap<A, B>(self, args: Canonical<A>) -> Canonical<B>
    where
        F: FnOnce(A) -> B,
    {
        self.zip_with(args, |f, a| f(a))
    }
}

impl<A> Canonical<K<A>> {
    /// Strip the `K` from every slot. No element is moved or converted; the
    /// storage is handed over as a `Vec<A>`.
    pub fn collapse(self) -> Vec<A> {
        let mut values = ManuallyDrop::new(self.values);
        let (ptr, len, cap) = (values.as_mut_ptr(), values.len(), values.capacity());
        // SAFETY: `K<A>` is `repr(transparent)` over `A`, so the allocation
        // has the same size and alignment for both element types and every
        // initialized `K<A>` is an initialized `A`.
        unsafe { Vec::from_raw_parts(ptr.cast::<A>(), len, cap) }
    }

    /// Inverse of [`Canonical::collapse`].
    pub fn from_constants(values: Vec<A>) -> Self {
        let mut values = ManuallyDrop::new(values);
        let (ptr, len, cap) = (values.as_mut_ptr(), values.len(), values.capacity());
        // SAFETY: see `collapse`.
        let values = unsafe { Vec::from_raw_parts(ptr.cast::<K<A>>(), len, cap) };
        Self { values }
    }
}

impl<T> Default for Canonical<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for Canonical<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        self.get(index)
    }
}

impl<T> FromIterator<T> for Canonical<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Canonical<T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Canonical<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<T> From<Canonical<T>> for Vec<T> {
    fn from(canonical: Canonical<T>) -> Self {
        canonical.values
    }
}

impl<T: fmt::Debug> fmt::Debug for Canonical<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.values).finish()
    }
}
