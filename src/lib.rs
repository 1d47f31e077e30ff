//! Association rule mining with the Apriori algorithm.
//!
//! The crate mines frequent itemsets from a collection of transactions,
//! derives rules of the form "if antecedent observed, then consequent
//! likely" with a confidence score, and answers prediction queries over the
//! derived rules.
//!
//! ## Modules
//! * [`itemset`] – the [`Universe`] of elements and the bit-mask [`ItemSet`]
//!   representation.
//! * [`mining`] – support counting, candidate generation and the level-wise
//!   Apriori loop.
//! * [`rules`] – rule derivation and the [`RuleSet`] grouping.
//! * [`apriori`] – the [`Apriori`] engine tying the pieces together.
//!
//! ## Quick Start
//! ```
//! use association_rules::Apriori;
//!
//! let mut apriori = Apriori::new(1..=9, 0.2, 0.7, 4).unwrap();
//! apriori
//!     .generate_rules(vec![
//!         vec![1, 2, 5],
//!         vec![2, 3, 4],
//!         vec![1, 2, 3],
//!         vec![2],
//!     ])
//!     .unwrap();
//! for (items, confidence) in apriori.predict(vec![4]).unwrap() {
//!     println!("{{4}} -> {items:?} ({confidence:.2})");
//! }
//! ```

pub mod apriori;
pub mod error;
pub mod itemset;
pub mod mining;
pub mod rules;

pub use apriori::{Apriori, Predictions};
pub use error::{AprioriError, Result};
pub use itemset::{ItemSet, Universe};
pub use mining::SupportTable;
pub use rules::{Rule, RuleSet};
