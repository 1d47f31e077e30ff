use std::collections::HashMap;

use tracing::debug;

use crate::error::{AprioriError, Result};
use crate::itemset::ItemSet;
use crate::mining::SupportTable;

/// An association rule: when the antecedent is observed, the consequent
/// follows with the given confidence.
///
/// Antecedent and consequent are disjoint and their union is a frequent
/// itemset. Confidence is support(antecedent ∪ consequent) divided by
/// support(antecedent).
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: ItemSet,
    pub consequent: ItemSet,
    pub confidence: f64,
}

/// Rules grouped by antecedent, each bucket sorted by descending confidence
/// with ties broken by ascending consequent cardinality and then canonical
/// itemset order.
pub type RuleSet = HashMap<ItemSet, Vec<Rule>>;

/// Canonical itemset order: lexicographic over ascending element indices.
///
/// `BitSet`'s own `Ord` compares raw bit vectors, which ranks a low set bit
/// above a high one; this comparison matches the element order instead.
pub fn canonical_cmp(a: &ItemSet, b: &ItemSet) -> std::cmp::Ordering {
    a.iter().cmp(b.iter())
}

/// Split every frequent itemset of size ≥ 2 into all non-empty proper
/// antecedent/consequent pairs and keep the splits meeting the confidence
/// threshold.
///
/// Subset enumeration is exponential in itemset size, which is fine only
/// because the cardinality cap keeps frequent itemsets small.
pub fn derive_rules(table: &SupportTable, confidence_criterion: f64) -> Result<RuleSet> {
    let mut rules: RuleSet = HashMap::new();
    let mut kept = 0usize;
    for (itemset, &itemset_support) in table {
        if itemset.len() < 2 {
            continue;
        }
        let items: Vec<usize> = itemset.iter().collect();
        for mask in 1..(1u64 << items.len()) - 1 {
            let mut antecedent = ItemSet::new();
            let mut consequent = ItemSet::new();
            for (bit, &item) in items.iter().enumerate() {
                if mask & (1u64 << bit) != 0 {
                    antecedent.insert(item);
                } else {
                    consequent.insert(item);
                }
            }
            // Downward closure guarantees the antecedent was mined.
            let antecedent_support = *table.get(&antecedent).ok_or_else(|| {
                AprioriError::Invariant(format!(
                    "support of {antecedent:?} missing from the frequent itemset table"
                ))
            })?;
            let confidence = itemset_support / antecedent_support;
            if confidence >= confidence_criterion {
                kept += 1;
                rules.entry(antecedent.clone()).or_default().push(Rule {
                    antecedent,
                    consequent,
                    confidence,
                });
            }
        }
    }
    for bucket in rules.values_mut() {
        bucket.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.consequent.len().cmp(&b.consequent.len()))
                .then_with(|| canonical_cmp(&a.consequent, &b.consequent))
        });
    }
    debug!(rules = kept, antecedents = rules.len(), "rule derivation complete");
    Ok(rules)
}
