//! `accumulate`: exhaustive simulation of sequential two-alternative categorization models.
//!
//! A trial is a fixed-length, even-length sequence of `A`/`B` exemplars. A model reads a
//! trial one exemplar at a time, accumulates evidence for each category, and stops at the
//! first exemplar where a decision rule fires. The result is a [`DecisionRecord`]: a
//! category (`A`, `B`, or neutral `N`), the chosen and unchosen scores, and the latency
//! (1-based exemplar index) at which the model decided.
//!
//! The engine runs every model against every trial of a [`TrialSource`], usually the
//! exhaustive [`TrialUniverse`], and collects the records into a [`ModelResultTable`] for
//! comparison against a reference model.
//!
//! **Model families** ([`ModelFamily`]):
//! - counting: [`absolute_count`], [`relative_count`]
//! - run length and likelihood: [`naive_probability`], [`likelihood_ratio`]
//! - fixed-increment information: [`information`]
//! - ballistic accumulators: [`incremental_lba`], [`blca`]
//! - urgency gating: [`urgency_gating`] with [`p_response`]
//! - baselines: [`first_exemplar`], [`last_exemplar`]
//!
//! Score-based families share one decider ([`decide`]) with two policies
//! ([`DeciderPolicy::Absolute`], [`DeciderPolicy::Difference`]). Ties at threshold are
//! recorded as neutral decisions with their scores; nothing is chosen at random.
//!
//! **Determinism.** Enumeration order is lexicographic with `A < B`, tables are keyed by
//! `BTreeMap`, and no model draws random numbers. Two runs of the same request produce
//! identical tables.
//!
//! **Symmetry.** Every family treats `A` and `B` alike, so a trial and its complement get
//! complementary decisions. The engine therefore only visits the half of the universe that
//! starts with `A`.
//!
//! **Features:**
//! - `serde`: `Serialize`/`Deserialize` on requests, records and configs.
//! - `stochastic`: [`SampledTrials`], a seeded sample of the universe for long trials.
//! - `parallel`: per-model trial evaluation on the rayon pool.
//! - `cli` (default): the `accumulate` binary, JSON run plans.
//!
//! ```rust
//! use accumulate::{categorize, CategorizationRequest, Category, ModelFamily};
//!
//! let request = CategorizationRequest {
//!     models: vec![ModelFamily::LastExemplar.into()],
//!     threshold: 0.5,
//!     trial_length: 4,
//!     ..Default::default()
//! };
//! let table = categorize(&request).unwrap();
//! let r = table.get(&"ABBA".parse().unwrap(), "last").unwrap();
//! assert_eq!((r.decision, r.latency), (Category::A, Some(4)));
//! ```
//!
//! **Non-goals:**
//! - Continuous-time (diffusion) dynamics.
//! - A Bayesian decider.
//! - Any persistence beyond flat CSV/TSV export.

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod trial;
pub use trial::*;

mod decision;
pub use decision::*;

mod decider;
pub use decider::*;

mod universe;
pub use universe::*;

mod utils;
pub use utils::*;

mod count;
pub use count::*;

mod likelihood;
pub use likelihood::*;

mod information;
pub use information::*;

mod ballistic;
pub use ballistic::*;

mod urgency;
pub use urgency::*;

mod baseline;
pub use baseline::*;

mod model;
pub use model::*;

mod engine;
pub use engine::*;

pub mod stats;
pub use stats::{agreement, Divergence};

pub mod export;
pub use export::{write_table, write_trials};

mod config;
pub use config::*;

mod run;
pub use run::*;

/// Crate version, printed by the CLI with each batch summary.
pub const ACCUMULATE_VERSION: &str = env!("CARGO_PKG_VERSION");
