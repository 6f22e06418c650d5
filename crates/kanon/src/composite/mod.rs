//! Composite schemas
//!
//! All composites walk their children in order and stop at the first
//! failure. When a child coerces, the composite returns a new container
//! holding every already-validated element, the replacement, and every
//! later element. Until the first coercion nothing is allocated.

pub mod array;
pub mod map;
pub mod object;
pub mod record;
pub mod set;
pub mod tuple;

/// Lazily allocated output of a composite walk
pub(crate) struct Rebuild<T> {
    output: Option<Vec<T>>,
}

impl<T: Clone> Rebuild<T> {
    pub(crate) fn new() -> Self {
        Self { output: None }
    }

    /// Record an element that validated unchanged
    pub(crate) fn keep(&mut self, item: &T) {
        if let Some(output) = self.output.as_mut() {
            output.push(item.clone());
        }
    }

    /// Record an unchanged element built on demand
    pub(crate) fn keep_with(&mut self, item: impl FnOnce() -> T) {
        if let Some(output) = self.output.as_mut() {
            output.push(item());
        }
    }

    /// Record a replacement; `before` yields the elements already kept
    pub(crate) fn replace<I>(&mut self, item: T, before: impl FnOnce() -> I)
    where
        I: IntoIterator<Item = T>,
    {
        self.output
            .get_or_insert_with(|| before().into_iter().collect())
            .push(item);
    }

    /// The rebuilt elements, if anything was replaced
    pub(crate) fn finish(self) -> Option<Vec<T>> {
        self.output
    }
}
