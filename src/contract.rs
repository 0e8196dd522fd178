//! Precondition checks for caller-supplied indices and shapes.
//!
//! Index lists and record shapes are computed by whoever resolved the field
//! layout, so a violation here is a bug on their side and we panic. Checks
//! that cost as much as the operation itself only run with debug assertions
//! or the `contracts` feature; release builds still get Rust's bounds checks
//! at the point of access.

/// Whether the full precondition checks are compiled in.
pub const ENABLED: bool = cfg!(any(debug_assertions, feature = "contracts"));

macro_rules! contract {
    ($cond:expr, $($arg:tt)+) => {
        if $crate::contract::ENABLED && !$cond {
            panic!("contract violation: {}", format_args!($($arg)+));
        }
    };
}

pub(crate) use contract;

/// Every index in `indices` addresses a slot of a record of length `len`.
#[track_caller]
pub(crate) fn check_indices<'a>(
    op: &'static str,
    indices: impl IntoIterator<Item = &'a usize>,
    len: usize,
) {
    if !ENABLED {
        return;
    }
    for &i in indices {
        contract!(i < len, "{op}: index {i} out of bounds for record of length {len}");
    }
}

/// Pointwise combinators need records of the same shape. This is O(1), so
/// it is always checked.
#[track_caller]
pub(crate) fn check_shape(op: &'static str, lhs: usize, rhs: usize) {
    if lhs != rhs {
        panic!("contract violation: {op}: records of length {lhs} and {rhs} do not have the same shape");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_bounds_indices_pass() {
        check_indices("project", &[0, 2, 2, 1], 3);
        check_indices("project", &[], 0);
    }

    #[test]
    #[should_panic(expected = "project: index 3 out of bounds for record of length 3")]
    fn out_of_bounds_index_traps() {
        check_indices("project", &[0, 3], 3);
    }

    #[test]
    #[should_panic(expected = "zip_with: records of length 2 and 3")]
    fn shape_mismatch_traps() {
        check_shape("zip_with", 2, 3);
    }
}
