use bit_set::BitSet;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{AprioriError, Result};

/// An itemset is a bit mask over universe indices.
///
/// Equality and hashing depend only on which bits are set, so itemsets work
/// both as values and as map keys. Reproducible ordering comes from
/// [`canonical_cmp`](crate::rules::canonical_cmp).
pub type ItemSet = BitSet;

/// The fixed, indexed enumeration of every element the model reasons over.
///
/// Elements are sorted and deduplicated at construction; an element's
/// position doubles as its bit index in [`ItemSet`], so membership checks
/// are O(1) and the index order is the canonical element order.
#[derive(Debug, Clone)]
pub struct Universe<E> {
    elements: Vec<E>,
    index: HashMap<E, usize>,
}

impl<E> Universe<E>
where
    E: Ord + Hash + Eq + Clone + Debug,
{
    pub fn new<I: IntoIterator<Item = E>>(elements: I) -> Self {
        let mut elements: Vec<E> = elements.into_iter().collect();
        elements.sort();
        elements.dedup();
        let index = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.clone(), i))
            .collect();
        Self { elements, index }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, element: &E) -> bool {
        self.index.contains_key(element)
    }

    /// Encode a collection of elements, rejecting anything outside the
    /// universe.
    pub fn encode<I: IntoIterator<Item = E>>(&self, items: I) -> Result<ItemSet> {
        let mut set = ItemSet::new();
        for item in items {
            match self.index.get(&item) {
                Some(&i) => {
                    set.insert(i);
                }
                None => {
                    return Err(AprioriError::InvalidItem(format!(
                        "{item:?} is not in the universal set"
                    )))
                }
            }
        }
        Ok(set)
    }

    /// Encode a transaction, silently dropping elements outside the
    /// universe. Candidates are only ever drawn from the universe, so
    /// foreign elements can never contribute support.
    pub fn project<I: IntoIterator<Item = E>>(&self, items: I) -> ItemSet {
        let mut set = ItemSet::new();
        for item in items {
            if let Some(&i) = self.index.get(&item) {
                set.insert(i);
            }
        }
        set
    }

    /// Decode an itemset back into elements, in canonical order.
    pub fn decode(&self, set: &ItemSet) -> Vec<E> {
        set.iter().map(|i| self.elements[i].clone()).collect()
    }

    /// All one-element itemsets, the seed of the first mining level.
    pub fn singletons(&self) -> impl Iterator<Item = ItemSet> + '_ {
        (0..self.elements.len()).map(|i| {
            let mut set = ItemSet::new();
            set.insert(i);
            set
        })
    }
}
