// ABOUTME: Phantom-typed identifiers for API Gateway resources.
// ABOUTME: Prevents passing a REST API id where a resource id is expected.

use std::fmt;
use std::marker::PhantomData;

pub enum RestApiMarker {}
pub enum GatewayResourceMarker {}

/// An opaque API Gateway id tagged with what it identifies.
///
/// REST APIs and their resources both come back as short strings; the marker
/// keeps them from being swapped at a call site.
#[must_use = "IDs reference resources and should not be ignored"]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<T>,
}

pub type RestApiId = Id<RestApiMarker>;
pub type GatewayResourceId = Id<GatewayResourceMarker>;

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    /// Borrow the raw id for an SDK call.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Take the raw id for storage in deployment info.
    pub fn into_inner(self) -> String {
        self.value
    }
}

// Written by hand so the marker needs no bounds.

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.value).finish()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}
