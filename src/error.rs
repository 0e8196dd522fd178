//! Recoverable errors.
//!
//! Broken preconditions (an index out of bounds, zipping records of different
//! shapes) are bugs in the caller and panic instead; see [`crate::contract`].

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid type: expected {expected}, provided {provided}")]
    InvalidType {
        expected: &'static str,
        provided: &'static str,
    },
    #[error("wrong number of fields: expected {expected}, provided {provided}")]
    WrongNumberOfFields { expected: usize, provided: usize },
}

impl Error {
    pub fn invalid_type(expected: &'static str, provided: &'static str) -> Self {
        Self::InvalidType { expected, provided }
    }

    pub fn wrong_num_of_fields(expected: usize, provided: usize) -> Self {
        Self::WrongNumberOfFields { expected, provided }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
