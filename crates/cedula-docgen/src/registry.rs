//! Used-identifier registry.
//!
//! One concurrent set of canonical strings per scheme, scoped to the
//! process lifetime. The registry is mutated only by the generator and
//! never shrinks except through an explicit [`UsedIdentifierRegistry::clear`].
//!
//! Claiming is a single `DashSet::insert`: the presence check and the
//! insertion are one atomic step, so two concurrent callers can never both
//! observe a candidate as absent and both claim it.

use dashmap::{DashMap, DashSet};

use cedula_core::DocumentScheme;

/// Per-scheme sets of canonical identifiers already handed out.
#[derive(Debug, Default)]
pub struct UsedIdentifierRegistry {
    sets: DashMap<DocumentScheme, DashSet<String>>,
}

impl UsedIdentifierRegistry {
    /// Create an empty registry covering every scheme.
    pub fn new() -> Self {
        let sets = DashMap::new();
        for scheme in DocumentScheme::ALL {
            sets.insert(scheme, DashSet::new());
        }
        Self { sets }
    }

    /// Atomically claim `canonical` for `scheme`. Returns `true` when the
    /// value was not present and is now claimed, `false` when someone else
    /// already holds it.
    pub fn try_claim(&self, scheme: DocumentScheme, canonical: &str) -> bool {
        self.sets
            .entry(scheme)
            .or_default()
            .insert(canonical.to_string())
    }

    /// Whether `canonical` has already been handed out for `scheme`.
    pub fn contains(&self, scheme: DocumentScheme, canonical: &str) -> bool {
        self.sets
            .get(&scheme)
            .is_some_and(|set| set.contains(canonical))
    }

    /// Number of identifiers handed out for `scheme` so far.
    pub fn used_count(&self, scheme: DocumentScheme) -> usize {
        self.sets.get(&scheme).map_or(0, |set| set.len())
    }

    /// Forget every identifier handed out for `scheme`.
    pub fn clear(&self, scheme: DocumentScheme) {
        if let Some(set) = self.sets.get(&scheme) {
            set.clear();
        }
    }
}
