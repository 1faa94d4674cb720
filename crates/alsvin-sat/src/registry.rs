//! Interning of canonical generators into dense identifiers.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tableau::GeneratorKey;

/// Dense identifier assigned to a distinct level generator.
///
/// Identifiers start at 0 and are never reassigned, so two circuits that
/// share a registry can compare ids directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GeneratorId(pub u32);

impl GeneratorId {
    /// Get the identifier as a `usize` index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the identifier as a bit-vector constant value.
    #[inline]
    pub fn value(self) -> u64 {
        u64::from(self.0)
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Bidirectional mapping between canonical generators and dense ids.
///
/// The registry is the only state shared between the two circuits of a miter
/// query. It is mutated exclusively by the preprocessor; the encoder only
/// reads. Construct a fresh registry per query so the input watermark stays
/// meaningful.
#[derive(Debug, Default, Clone)]
pub struct GeneratorRegistry {
    /// Forward map for interning.
    ids: FxHashMap<GeneratorKey, GeneratorId>,
    /// Reverse map; index `i` holds the key of id `i`.
    keys: Vec<GeneratorKey>,
    /// Registry size right after the first circuit interned its input
    /// generators. Ids below the watermark denote prepared input states.
    input_watermark: Option<usize>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a generator, returning its stable id and whether this call
    /// allocated a fresh one.
    pub fn intern(&mut self, key: GeneratorKey) -> (GeneratorId, bool) {
        if let Some(&id) = self.ids.get(&key) {
            return (id, false);
        }
        let id = GeneratorId(self.keys.len() as u32);
        self.keys.push(key.clone());
        self.ids.insert(key, id);
        (id, true)
    }

    /// Look up the key of a previously interned id.
    pub fn lookup(&self, id: GeneratorId) -> Option<&GeneratorKey> {
        self.keys.get(id.index())
    }

    /// Number of interned generators.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Freeze the input watermark at the current size.
    ///
    /// Only the first call has an effect; the preprocessor invokes this after
    /// interning the level-0 generators of each circuit.
    pub fn seal_inputs(&mut self) {
        if self.input_watermark.is_none() {
            self.input_watermark = Some(self.keys.len());
        }
    }

    /// Number of ids that correspond to prepared input states.
    pub fn input_count(&self) -> usize {
        self.input_watermark.unwrap_or(self.keys.len())
    }
}
