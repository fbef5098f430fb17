//! Boolean gene-network simulation with attractor-based fitness.
//!
//! This crate simulates small synchronous Boolean regulatory networks,
//! detects their long-run behavior (point attractors and limit cycles),
//! scores that behavior against target expression states under a pluggable
//! fitness policy, and drives a stochastic search over genome space.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration types, validation, and fitness-policy selection
//! - `compute`: Network dynamics, attractor detection, fitness scoring, and
//!   the drift / hill-climb search driver
//! - `record`: Delimited-text rendering of trial statistics
//!
//! # Example
//!
//! ```rust,no_run
//! use boolnet_drift::{
//!     compute::run_sweep,
//!     schema::{RunConfig, SearchMode},
//! };
//!
//! let config = RunConfig {
//!     generations: 100_000,
//!     mode: SearchMode::HillClimb,
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! for trial in run_sweep(&config).unwrap() {
//!     println!(
//!         "p={}: {} maximally fit genomes in {} generations",
//!         trial.p_flip, trial.f1_count, trial.generations
//!     );
//! }
//! ```

pub mod compute;
pub mod record;
pub mod schema;

// Re-export commonly used types
pub use compute::{
    Attractor, AttractorCensus, FitnessEvaluator, Genome, GenomeRng, NetParams, Trial,
    TrialResult, find_attractor, run_sweep,
};
pub use schema::{RunConfig, ScoringPolicy, SearchMode};
