//! Sequential, short-circuiting effects.
//!
//! The synchronous traversals on [`Canonical`] are written once against
//! [`Effect`] rather than separately for `Result` and `Option`. An effect
//! either produces an output, in which case the traversal moves on to the
//! next slot, or a residual, in which case it stops and hands the residual
//! back unchanged.
//!
//! Asynchronous traversals live on [`Canonical`] directly (behind the `async`
//! feature) and follow the same rules: one effect at a time, in row order.
//!
//! [`Canonical`]: crate::canonical::Canonical

use std::ops::ControlFlow;

pub trait Effect: Sized {
    type Output;
    type Residual;
    /// The same effect producing a `U` instead.
    type Rewrap<U>: Effect<Output = U, Residual = Self::Residual>;

    fn from_output(output: Self::Output) -> Self;

    fn from_residual(residual: Self::Residual) -> Self;

    fn branch(self) -> ControlFlow<Self::Residual, Self::Output>;
}

impl<T, E> Effect for Result<T, E> {
    type Output = T;
    type Residual = E;
    type Rewrap<U> = Result<U, E>;

    fn from_output(output: T) -> Self {
        Ok(output)
    }

    fn from_residual(residual: E) -> Self {
        Err(residual)
    }

    fn branch(self) -> ControlFlow<E, T> {
        match self {
            Ok(output) => ControlFlow::Continue(output),
            Err(residual) => ControlFlow::Break(residual),
        }
    }
}

impl<T> Effect for Option<T> {
    type Output = T;
    type Residual = ();
    type Rewrap<U> = Option<U>;

    fn from_output(output: T) -> Self {
        Some(output)
    }

    fn from_residual((): ()) -> Self {
        None
    }

    fn branch(self) -> ControlFlow<(), T> {
        match self {
            Some(output) => ControlFlow::Continue(output),
            None => ControlFlow::Break(()),
        }
    }
}

/// Run `f` over `iter` in order, collecting outputs until the first
/// residual. Nothing after the failing item is visited.
pub(crate) fn traverse<I, R, C, F>(iter: I, mut f: F) -> R::Rewrap<C>
where
    I: IntoIterator,
    R: Effect,
    C: FromIterator<R::Output>,
    F: FnMut(I::Item) -> R,
{
    let mut residual = None;
    let collected: C = iter
        .into_iter()
        .map_while(|item| match f(item).branch() {
            ControlFlow::Continue(output) => Some(output),
            ControlFlow::Break(r) => {
                residual = Some(r);
                None
            }
        })
        .collect();
    match residual {
        Some(r) => <R::Rewrap<C> as Effect>::from_residual(r),
        None => <R::Rewrap<C> as Effect>::from_output(collected),
    }
}
