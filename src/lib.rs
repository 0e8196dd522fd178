//! Runtime storage for anonymous records.
//!
//! Field names, row order and the validity of a transformation are all
//! settled before a record gets here. What is left is positional: a
//! [`Canonical`] stores one value per field in row order and implements
//! insertion, projection and the traversals over it; a [`Record`] adds a
//! [`Diff`] of pending changes on top.

pub mod canonical;
pub mod constant;
pub mod contract;
pub mod diff;
pub mod effect;
pub mod error;
pub mod record;
pub mod value;

pub use canonical::Canonical;
pub use constant::K;
pub use diff::Diff;
pub use effect::Effect;
pub use error::{Error, Result};
pub use record::Record;
pub use value::Value;
