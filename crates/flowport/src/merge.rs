//! Layered configuration merging.
//!
//! `a.merge(b)` combines two config layers where `b` is the higher-priority
//! layer. Explicitly set values in `b` win; unset values fall back to `a`.

use std::collections::BTreeMap;

pub use flowport_derive::Merge;

pub trait Merge {
    fn merge(self, other: Self) -> Self;
}

impl<T> Merge for Option<T> {
    fn merge(self, other: Self) -> Self {
        other.or(self)
    }
}

impl<K: Ord, V> Merge for BTreeMap<K, V> {
    fn merge(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}
