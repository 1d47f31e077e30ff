use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

use crate::error::{AprioriError, Result};
use crate::itemset::{ItemSet, Universe};
use crate::mining::{self, SupportTable};
use crate::rules::{canonical_cmp, derive_rules, RuleSet};

#[derive(Debug)]
struct Model {
    frequent: SupportTable,
    rules: RuleSet,
}

/// The Apriori association-rule mining engine.
///
/// The universal set and the three thresholds are fixed at construction.
/// [`generate_rules`](Apriori::generate_rules) mines a transaction
/// collection and replaces the model wholesale; [`predict`](Apriori::predict)
/// answers queries against the current model. Each engine owns its model
/// outright, so independent engines never share state.
pub struct Apriori<E> {
    universe: Universe<E>,
    support_criterion: f64,
    confidence_criterion: f64,
    maximum_cardinality: usize,
    model: Option<Model>,
}

impl<E> Apriori<E>
where
    E: Ord + Hash + Eq + Clone + Debug,
{
    /// Configure an engine over `universal_set`.
    ///
    /// `support_criterion` is the minimum fraction of transactions an
    /// itemset must appear in to count as frequent, `confidence_criterion`
    /// the minimum conditional probability for a rule to be kept, and
    /// `maximum_cardinality` the hard cap on itemset size explored.
    pub fn new<I: IntoIterator<Item = E>>(
        universal_set: I,
        support_criterion: f64,
        confidence_criterion: f64,
        maximum_cardinality: usize,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&support_criterion) {
            return Err(AprioriError::Configuration(format!(
                "support criterion must be within [0, 1], got {support_criterion}"
            )));
        }
        if !(0.0..=1.0).contains(&confidence_criterion) {
            return Err(AprioriError::Configuration(format!(
                "confidence criterion must be within [0, 1], got {confidence_criterion}"
            )));
        }
        if maximum_cardinality < 1 {
            return Err(AprioriError::Configuration(
                "maximum cardinality must be at least 1".into(),
            ));
        }
        Ok(Self {
            universe: Universe::new(universal_set),
            support_criterion,
            confidence_criterion,
            maximum_cardinality,
            model: None,
        })
    }

    pub fn universe(&self) -> &Universe<E> {
        &self.universe
    }

    /// Mine `transactions` and rebuild the rule set.
    ///
    /// Transaction elements outside the universal set are dropped; they can
    /// never appear in a candidate itemset, so they cannot carry support.
    /// A successful call replaces any previous model wholesale.
    pub fn generate_rules<T, I>(&mut self, transactions: T) -> Result<()>
    where
        T: IntoIterator<Item = I>,
        I: IntoIterator<Item = E>,
    {
        let transactions: Vec<ItemSet> = transactions
            .into_iter()
            .map(|transaction| self.universe.project(transaction))
            .collect();
        let frequent = mining::mine(
            self.universe.singletons(),
            &transactions,
            self.support_criterion,
            self.maximum_cardinality,
        )?;
        let rules = derive_rules(&frequent, self.confidence_criterion)?;
        debug!(
            transactions = transactions.len(),
            frequent = frequent.len(),
            antecedents = rules.len(),
            "model rebuilt"
        );
        self.model = Some(Model { frequent, rules });
        Ok(())
    }

    /// Predict the items most likely associated with `query`.
    ///
    /// Rules whose antecedent equals the query or is a subset of it all
    /// compete; consequents are deduplicated keeping the highest-confidence
    /// entry and ranked by descending confidence. The returned sequence is
    /// finite and owns its results, so re-querying re-derives it from the
    /// rule set.
    pub fn predict<I: IntoIterator<Item = E>>(&self, query: I) -> Result<Predictions<E>> {
        let model = self.model.as_ref().ok_or(AprioriError::NotFitted)?;
        let query = self.universe.encode(query)?;
        let mut best: HashMap<ItemSet, f64> = HashMap::new();
        for (antecedent, bucket) in &model.rules {
            if !antecedent.is_subset(&query) {
                continue;
            }
            for rule in bucket {
                let entry = best.entry(rule.consequent.clone()).or_insert(rule.confidence);
                if rule.confidence > *entry {
                    *entry = rule.confidence;
                }
            }
        }
        let mut ranked: Vec<(ItemSet, f64)> = best.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| a.0.len().cmp(&b.0.len()))
                .then_with(|| canonical_cmp(&a.0, &b.0))
        });
        let ranked: Vec<(Vec<E>, f64)> = ranked
            .into_iter()
            .map(|(consequent, confidence)| (self.universe.decode(&consequent), confidence))
            .collect();
        Ok(Predictions {
            inner: ranked.into_iter(),
        })
    }

    /// Support of `items` over `transactions`, independent of the mined
    /// model. The itemset must lie within the universal set.
    pub fn support_of<I, T, J>(&self, items: I, transactions: T) -> Result<f64>
    where
        I: IntoIterator<Item = E>,
        T: IntoIterator<Item = J>,
        J: IntoIterator<Item = E>,
    {
        let itemset = self.universe.encode(items)?;
        let transactions: Vec<ItemSet> = transactions
            .into_iter()
            .map(|transaction| self.universe.project(transaction))
            .collect();
        mining::support(&itemset, &transactions)
    }

    /// The frequent itemset table built by the last `generate_rules` call.
    pub fn frequent_itemsets(&self) -> Result<&SupportTable> {
        Ok(&self.model.as_ref().ok_or(AprioriError::NotFitted)?.frequent)
    }

    /// Frequent itemsets of one cardinality, decoded to elements and sorted
    /// canonically.
    pub fn frequent_of_size(&self, cardinality: usize) -> Result<Vec<(Vec<E>, f64)>> {
        let table = self.frequent_itemsets()?;
        let mut found: Vec<(ItemSet, f64)> = table
            .iter()
            .filter(|(itemset, _)| itemset.len() == cardinality)
            .map(|(itemset, &support)| (itemset.clone(), support))
            .collect();
        found.sort_by(|a, b| canonical_cmp(&a.0, &b.0));
        Ok(found
            .into_iter()
            .map(|(itemset, support)| (self.universe.decode(&itemset), support))
            .collect())
    }

    /// The rule set built by the last `generate_rules` call.
    pub fn rules(&self) -> Result<&RuleSet> {
        Ok(&self.model.as_ref().ok_or(AprioriError::NotFitted)?.rules)
    }
}

/// Ranked prediction results, highest confidence first.
pub struct Predictions<E> {
    inner: std::vec::IntoIter<(Vec<E>, f64)>,
}

impl<E> Iterator for Predictions<E> {
    type Item = (Vec<E>, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E> ExactSizeIterator for Predictions<E> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Apriori<u32> {
        Apriori::new(1..=9, 0.2, 0.7, 4).unwrap()
    }

    fn baskets() -> Vec<Vec<u32>> {
        vec![vec![1, 2, 5], vec![2, 3, 4], vec![1, 2, 3], vec![2, 10]]
    }

    #[test]
    fn predict_requires_a_fitted_model() {
        let apriori = engine();
        assert!(matches!(apriori.predict(vec![1]), Err(AprioriError::NotFitted)));
        assert!(matches!(apriori.frequent_itemsets(), Err(AprioriError::NotFitted)));
        assert!(matches!(apriori.rules(), Err(AprioriError::NotFitted)));
    }

    #[test]
    fn predict_rejects_foreign_query_items() {
        let mut apriori = engine();
        apriori.generate_rules(baskets()).unwrap();
        assert!(matches!(
            apriori.predict(vec![42]),
            Err(AprioriError::InvalidItem(_))
        ));
    }

    #[test]
    fn predictions_are_restartable() {
        let mut apriori = engine();
        apriori.generate_rules(baskets()).unwrap();
        let first: Vec<_> = apriori.predict(vec![4]).unwrap().collect();
        let second: Vec<_> = apriori.predict(vec![4]).unwrap().collect();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_query_matches_nothing() {
        let mut apriori = engine();
        apriori.generate_rules(baskets()).unwrap();
        assert_eq!(apriori.predict(Vec::<u32>::new()).unwrap().count(), 0);
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        assert!(matches!(
            Apriori::<u32>::new(1..=3, -0.1, 0.7, 4),
            Err(AprioriError::Configuration(_))
        ));
        assert!(matches!(
            Apriori::<u32>::new(1..=3, 0.2, 1.1, 4),
            Err(AprioriError::Configuration(_))
        ));
        assert!(matches!(
            Apriori::<u32>::new(1..=3, 0.2, 0.7, 0),
            Err(AprioriError::Configuration(_))
        ));
        assert!(matches!(
            Apriori::<u32>::new(1..=3, f64::NAN, 0.7, 4),
            Err(AprioriError::Configuration(_))
        ));
    }
}
