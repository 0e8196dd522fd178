/// Marks a slot as holding an `A` regardless of which field it belongs to.
///
/// A record whose slots are all `K<A>` can be [collapsed] into a plain
/// `Vec<A>` without touching the elements, since `K<A>` has exactly the
/// layout of `A`.
///
/// [collapsed]: crate::canonical::Canonical::collapse
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct K<A>(pub A);

impl<A> K<A> {
    pub fn into_inner(self) -> A {
        self.0
    }
}
