use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{AprioriError, Result};
use crate::itemset::ItemSet;

/// Every frequent itemset found during mining, mapped to its support.
///
/// Downward closure holds for the finished table: every non-empty subset of
/// a frequent itemset is present, with support at least as high.
pub type SupportTable = HashMap<ItemSet, f64>;

/// Fraction of transactions that contain `candidate`.
pub fn support(candidate: &ItemSet, transactions: &[ItemSet]) -> Result<f64> {
    if transactions.is_empty() {
        return Err(AprioriError::EmptyInput);
    }
    let hits = transactions
        .iter()
        .filter(|transaction| candidate.is_subset(transaction))
        .count();
    Ok(hits as f64 / transactions.len() as f64)
}

/// Join frequent k-itemsets into candidate (k+1)-itemsets.
///
/// Two k-itemsets join when they share exactly k−1 elements, which is the
/// case exactly when their union has k+1 elements. A candidate survives only
/// if all of its k-subsets are frequent: support never grows with itemset
/// size, so a candidate with an infrequent subset cannot be frequent itself.
pub fn next_level(frequent: &HashSet<ItemSet>, k: usize) -> HashSet<ItemSet> {
    let sets: Vec<&ItemSet> = frequent.iter().collect();
    let mut candidates = HashSet::new();
    for (i, a) in sets.iter().enumerate() {
        for b in &sets[i + 1..] {
            let mut joined = (*a).clone();
            joined.union_with(b);
            if joined.len() != k + 1 {
                continue;
            }
            if all_subsets_frequent(&joined, frequent) {
                candidates.insert(joined);
            }
        }
    }
    candidates
}

fn all_subsets_frequent(candidate: &ItemSet, frequent: &HashSet<ItemSet>) -> bool {
    candidate.iter().all(|item| {
        let mut subset = candidate.clone();
        subset.remove(item);
        frequent.contains(&subset)
    })
}

/// Level-wise Apriori mining.
///
/// `seed` supplies the singleton itemsets of level 1; each later level is
/// generated from the survivors of the previous one via [`next_level`].
/// Mining stops when a level retains nothing or the cardinality cap is hit.
pub fn mine<S>(
    seed: S,
    transactions: &[ItemSet],
    support_criterion: f64,
    maximum_cardinality: usize,
) -> Result<SupportTable>
where
    S: IntoIterator<Item = ItemSet>,
{
    if !(0.0..=1.0).contains(&support_criterion) {
        return Err(AprioriError::Configuration(format!(
            "support criterion must be within [0, 1], got {support_criterion}"
        )));
    }
    if maximum_cardinality < 1 {
        return Err(AprioriError::Configuration(
            "maximum cardinality must be at least 1".into(),
        ));
    }
    if transactions.is_empty() {
        return Err(AprioriError::EmptyInput);
    }

    let mut table = SupportTable::new();
    let mut candidates: HashSet<ItemSet> = seed.into_iter().collect();
    for level in 1..=maximum_cardinality {
        let candidate_count = candidates.len();
        let mut retained = HashSet::new();
        for candidate in candidates {
            let s = support(&candidate, transactions)?;
            if s >= support_criterion {
                table.insert(candidate.clone(), s);
                retained.insert(candidate);
            }
        }
        debug!(
            level,
            candidates = candidate_count,
            frequent = retained.len(),
            "mining level complete"
        );
        if retained.is_empty() || level == maximum_cardinality {
            break;
        }
        candidates = next_level(&retained, level);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[usize]) -> ItemSet {
        let mut set = ItemSet::new();
        for &item in items {
            set.insert(item);
        }
        set
    }

    fn transactions() -> Vec<ItemSet> {
        vec![
            set(&[0, 1, 2]),
            set(&[3, 4, 5]),
            set(&[0, 3]),
            set(&[0, 1, 3, 4]),
            set(&[0, 1, 2, 3]),
            set(&[0, 2]),
            set(&[1, 3, 4]),
            set(&[0, 1, 3, 4, 5]),
        ]
    }

    fn singletons(n: usize) -> Vec<ItemSet> {
        (0..n).map(|i| set(&[i])).collect()
    }

    #[test]
    fn support_counts_supersets() {
        let transactions = transactions();
        assert_eq!(support(&set(&[0]), &transactions).unwrap(), 6.0 / 8.0);
        assert_eq!(support(&set(&[0, 1]), &transactions).unwrap(), 4.0 / 8.0);
        assert_eq!(support(&set(&[2, 5]), &transactions).unwrap(), 0.0);
    }

    #[test]
    fn support_of_empty_transactions_is_undefined() {
        assert!(matches!(
            support(&set(&[0]), &[]),
            Err(AprioriError::EmptyInput)
        ));
    }

    #[test]
    fn support_is_monotone_under_inclusion() {
        let transactions = transactions();
        let small = support(&set(&[1]), &transactions).unwrap();
        let large = support(&set(&[1, 3, 4]), &transactions).unwrap();
        assert!(small >= large);
    }

    #[test]
    fn next_level_joins_on_shared_elements() {
        let frequent: HashSet<ItemSet> =
            [set(&[0, 1]), set(&[0, 3]), set(&[1, 3]), set(&[3, 4])]
                .into_iter()
                .collect();
        let candidates = next_level(&frequent, 2);
        // {0,1,3} has all three 2-subsets frequent; {0,3,4} and {1,3,4} get
        // pruned because {0,4} and {1,4} are missing.
        assert_eq!(candidates, [set(&[0, 1, 3])].into_iter().collect());
    }

    #[test]
    fn next_level_of_a_single_itemset_is_empty() {
        let frequent: HashSet<ItemSet> = [set(&[0, 1])].into_iter().collect();
        assert!(next_level(&frequent, 2).is_empty());
        assert!(next_level(&HashSet::new(), 2).is_empty());
    }

    #[test]
    fn mine_matches_the_reference_dataset() {
        let table = mine(singletons(6), &transactions(), 0.5, 5).unwrap();
        let expected: SupportTable = [
            (set(&[0]), 6.0 / 8.0),
            (set(&[1]), 5.0 / 8.0),
            (set(&[3]), 6.0 / 8.0),
            (set(&[4]), 4.0 / 8.0),
            (set(&[0, 1]), 4.0 / 8.0),
            (set(&[0, 3]), 4.0 / 8.0),
            (set(&[1, 3]), 4.0 / 8.0),
            (set(&[3, 4]), 4.0 / 8.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(table, expected);
    }

    #[test]
    fn mine_respects_the_cardinality_cap() {
        let table = mine(singletons(6), &transactions(), 0.5, 1).unwrap();
        assert!(table.keys().all(|itemset| itemset.len() == 1));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn mine_rejects_invalid_thresholds() {
        assert!(matches!(
            mine(singletons(3), &transactions(), 1.5, 3),
            Err(AprioriError::Configuration(_))
        ));
        assert!(matches!(
            mine(singletons(3), &transactions(), 0.5, 0),
            Err(AprioriError::Configuration(_))
        ));
    }
}
