//! Small shared utilities: hashers for the identity maps.

use std::hash::{BuildHasher, Hasher};

use rustc_hash::FxHasher;

/// A hash map that does not re-hash its keys.
///
/// Used for keys that already carry a well-mixed 64-bit hash,
/// such as [`Uuid`](crate::uuid::Uuid).
pub type NoopHashMap<K, V> = hashbrown::HashMap<K, V, NoopBuildHasher>;

/// A [`BuildHasher`] that creates [`NoopHasher`] instances.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBuildHasher;

impl BuildHasher for NoopBuildHasher {
    type Hasher = NoopHasher;

    fn build_hasher(&self) -> NoopHasher { NoopHasher::new() }
}

/// A [`Hasher`] that passes a single `u64` through unchanged.
///
/// Feeding it anything other than exactly one `u64` is a bug in the key type's
/// `Hash` implementation.
#[derive(Debug)]
pub struct NoopHasher {
    #[cfg(debug_assertions)]
    used: bool,
    hash: u64,
}

impl NoopHasher {
    const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            used: false,
            hash: 0,
        }
    }
}

impl Hasher for NoopHasher {
    fn finish(&self) -> u64 {
        #[cfg(debug_assertions)]
        assert!(self.used, "NoopHasher finished before a value was written");

        self.hash
    }

    fn write(&mut self, _bytes: &[u8]) {
        unreachable!("NoopHasher only accepts a single u64");
    }

    fn write_u64(&mut self, i: u64) {
        #[cfg(debug_assertions)]
        {
            assert!(!self.used, "NoopHasher was written to more than once");
            self.used = true;
        }

        self.hash = i;
    }
}

/// A [`BuildHasher`] that creates [`FxHasher`] instances,
/// used for the archetype-to-table map.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildFxHasher;

impl BuildHasher for BuildFxHasher {
    type Hasher = FxHasher;

    fn build_hasher(&self) -> FxHasher { FxHasher::default() }
}
