//! Fast hash map and set aliases.
//!
//! Engines use these for internal membership checks (visited sets, id to
//! index maps, edge dedup). Step-visible mappings use `IndexMap` instead,
//! where iteration order must be deterministic.

/// Hash map with a fast non-cryptographic hasher.
pub type FxHashMap<K, V> = hashbrown::HashMap<K, V, ahash::RandomState>;

/// Hash set with a fast non-cryptographic hasher.
pub type FxHashSet<T> = hashbrown::HashSet<T, ahash::RandomState>;
