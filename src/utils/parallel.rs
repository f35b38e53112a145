//! Abstraction layer for parallel iteration.
//!
//! With the `parallel` feature enabled this module re-exports Rayon's
//! iterator traits; without it, serial shims with the same API take their
//! place. Callers (Wilson row assembly, per-source BFS) are written once
//! against this surface and stay oblivious to the feature flag.

#[cfg(feature = "parallel")]
pub use rayon::prelude::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

#[cfg(not(feature = "parallel"))]
pub use self::fallback::*;

#[cfg(not(feature = "parallel"))]
mod fallback {
    pub use std::iter::Iterator as IndexedParallelIterator;
    pub use std::iter::Iterator as ParallelIterator;

    /// Shim trait to allow `into_par_iter()` on types that implement `IntoIterator`.
    pub trait IntoParallelIterator {
        type Item;
        type Iter: Iterator<Item = Self::Item>;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Item = I::Item;
        type Iter = I::IntoIter;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_par_iter_visits_every_element() {
        let collected: Vec<usize> = (0..5).into_par_iter().map(|i| i * 2).collect();
        assert_eq!(collected, vec![0, 2, 4, 6, 8]);
    }
}
