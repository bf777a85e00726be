use rand::{rngs, Rng, SeedableRng};
use std::cell::RefCell;
use std::fmt;

/// Source of 64-bit trace and span identifiers.
pub trait IdGenerator: Send + Sync + fmt::Debug {
    /// Draw the next identifier.
    fn next_id(&self) -> u64;
}

/// Default [`IdGenerator`] implementation.
///
/// Draws identifiers from a random number generator.
#[derive(Clone, Debug, Default)]
pub struct RandomIdGenerator {
    _private: (),
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> u64 {
        CURRENT_RNG.with(|rng| rng.borrow_mut().gen::<u64>())
    }
}

thread_local! {
    /// Store random number generator for each thread
    static CURRENT_RNG: RefCell<rngs::SmallRng> = RefCell::new(rngs::SmallRng::from_entropy());
}

#[cfg(any(test, feature = "testing"))]
pub use increment::IncrementIdGenerator;

#[cfg(any(test, feature = "testing"))]
mod increment {
    use super::IdGenerator;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// [`IdGenerator`] implementation that increments a counter for each new
    /// id. This helps produce predictable ids for testing.
    #[derive(Clone, Debug)]
    pub struct IncrementIdGenerator(Arc<AtomicU64>);

    impl IncrementIdGenerator {
        /// Create a new [`IncrementIdGenerator`] counting from 1.
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Default for IncrementIdGenerator {
        fn default() -> Self {
            Self(Arc::new(AtomicU64::new(1)))
        }
    }

    impl IdGenerator for IncrementIdGenerator {
        fn next_id(&self) -> u64 {
            self.0.fetch_add(1, Ordering::SeqCst)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_generator_counts_from_one() {
        let generator = IncrementIdGenerator::new();
        assert_eq!(generator.next_id(), 1);
        assert_eq!(generator.next_id(), 2);
        assert_eq!(generator.next_id(), 3);
    }

    #[test]
    fn increment_generator_clones_share_the_counter() {
        let generator = IncrementIdGenerator::new();
        let clone = generator.clone();
        assert_eq!(generator.next_id(), 1);
        assert_eq!(clone.next_id(), 2);
    }

    #[test]
    fn random_generator_draws() {
        let generator = RandomIdGenerator::default();
        // Draws must not panic; values are unconstrained.
        let _ = generator.next_id();
        let _ = generator.next_id();
    }
}
