//! Type-erased field values.
//!
//! Fields of an anonymous record can have any type, but a [`Canonical`] is a
//! homogeneous container. [`Value`] erases the static type of a field so that
//! every slot has the same representation. Whoever resolved the record's
//! layout knows what type lives in each slot and is responsible for asking
//! for the right one back.
//!
//! [`Canonical`]: crate::canonical::Canonical

use std::{
    any::{Any, type_name},
    fmt,
    sync::Arc,
};

use crate::error::{Error, Result};

type DebugFn = fn(&(dyn Any + Send + Sync), &mut fmt::Formatter<'_>) -> fmt::Result;
type EqFn = fn(&(dyn Any + Send + Sync), &(dyn Any + Send + Sync)) -> bool;

/// A reference counted, type-erased field value. Cloning is O(1).
#[derive(Clone)]
pub struct Value {
    data: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    debug: Option<DebugFn>,
    eq: Option<EqFn>,
}

impl Value {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + fmt::Debug + PartialEq + Send + Sync,
    {
        Self {
            data: Arc::new(value),
            type_name: type_name::<T>(),
            debug: Some(debug_erased::<T>),
            eq: Some(eq_erased::<T>),
        }
    }

    /// Erase a value that can neither be printed nor compared. Opaque values
    /// are only equal to clones of themselves.
    pub fn opaque<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            data: Arc::new(value),
            type_name: type_name::<T>(),
            debug: None,
            eq: None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.data.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    pub fn try_downcast_ref<T: Any>(&self) -> Result<&T> {
        self.data
            .downcast_ref::<T>()
            .ok_or_else(|| Error::invalid_type(type_name::<T>(), self.type_name))
    }

    /// Recover shared ownership of the underlying value.
    pub fn try_downcast<T>(&self) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.data
            .clone()
            .downcast::<T>()
            .map_err(|_| Error::invalid_type(type_name::<T>(), self.type_name))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

fn debug_erased<T>(data: &(dyn Any + Send + Sync), f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    T: Any + fmt::Debug,
{
    match data.downcast_ref::<T>() {
        Some(value) => value.fmt(f),
        None => write!(f, "<{}>", type_name::<T>()),
    }
}

fn eq_erased<T>(lhs: &(dyn Any + Send + Sync), rhs: &(dyn Any + Send + Sync)) -> bool
where
    T: Any + PartialEq,
{
    match (lhs.downcast_ref::<T>(), rhs.downcast_ref::<T>()) {
        (Some(lhs), Some(rhs)) => lhs == rhs,
        _ => false,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self.eq, other.eq) {
            (Some(eq), Some(_)) => eq(&*self.data, &*other.data),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.debug {
            Some(debug) => debug(&*self.data, f),
            None => write!(f, "<opaque {}>", self.type_name),
        }
    }
}
