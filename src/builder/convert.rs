use std::{collections::HashMap, hash::Hash};

use crate::builder::{document::Document, tasks::TaskQueue};

/// A conversion from collaborator-supplied source data to a document entry.
///
/// Sources are plain value types (byte spans, numeric fields, index lists),
/// never handles into someone else's object graph, so the cache key is
/// content identity rather than pointer identity. `convert` must be
/// deterministic for a given sanitized source: the cache assumes asking
/// twice means the same answer.
pub trait Convert {
    type Source: Hash + Eq;
    type Output: Copy;

    /// Normalizes a source before it is used as a cache key, e.g. clamping
    /// a level-of-detail value or resolving a default fallback.
    fn sanitize(&self, _source: &mut Self::Source) {}

    fn convert(
        &mut self,
        document: &mut Document,
        queue: &mut TaskQueue,
        source: &Self::Source,
    ) -> Self::Output;
}

/// Memoizes a [`Convert`] so each distinct sanitized source is converted
/// exactly once and every later request returns the original index.
pub struct ConverterCache<C: Convert> {
    converter: C,
    outputs: HashMap<C::Source, C::Output, ahash::RandomState>,
}

impl<C: Convert> ConverterCache<C> {
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            outputs: HashMap::default(),
        }
    }

    /// The cached output for `source`, if it was converted before.
    pub fn get(&self, mut source: C::Source) -> Option<C::Output> {
        self.converter.sanitize(&mut source);
        self.outputs.get(&source).copied()
    }

    pub fn get_or_add(
        &mut self,
        document: &mut Document,
        queue: &mut TaskQueue,
        mut source: C::Source,
    ) -> C::Output {
        self.converter.sanitize(&mut source);
        if let Some(&output) = self.outputs.get(&source) {
            return output;
        }

        let output = self.converter.convert(document, queue, &source);
        self.outputs.insert(source, output);
        output
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
