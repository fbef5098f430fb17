//! Configuration types for simulation and search parameters.

use serde::{Deserialize, Serialize};

/// Largest supported gene count; states are held in a `u8`.
pub const MAX_GENES: u8 = 8;

fn default_n_genes() -> u8 {
    5
}

fn default_generations() -> u64 {
    1_000_000
}

fn default_p_flip() -> Vec<f64> {
    vec![0.1, 0.2, 0.3, 0.4, 0.5]
}

fn default_anterior() -> ContextConfig {
    ContextConfig {
        initial: 0b10000,
        target: 0b10101,
    }
}

fn default_posterior() -> ContextConfig {
    ContextConfig {
        initial: 0b00000,
        target: 0b01010,
    }
}

/// One developmental context: where a trajectory starts and the expression
/// pattern its attractor is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Initial expression state (low G bits).
    pub initial: u8,
    /// Target expression state (low G bits).
    pub target: u8,
}

/// How mutated genomes are accepted during a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Accept every mutation unconditionally.
    #[default]
    Drift,
    /// Accept a mutation only if fitness does not decrease.
    HillClimb,
}

/// How a set of partial scores is reduced to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combine {
    /// Multiply the scores; any persistently-wrong component dominates.
    Product,
    /// Arithmetic mean of the scores.
    Mean,
}

/// Per-context scoring rule applied to a detected attractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    /// Per-gene fraction of the attractor spent matching the target,
    /// combined per the gene combinator. Point attractors score all-or-nothing.
    Occupancy,
    /// Matching-bit fraction against the target; fractional for point
    /// attractors too.
    Hamming,
}

/// A fitness policy: the scoring rule plus the two combinator axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub rule: ScoringRule,
    /// Reduction over the per-gene occupancy fractions of a limit cycle.
    pub gene_combine: Combine,
    /// Reduction over the anterior and posterior context scores.
    pub context_combine: Combine,
}

impl ScoringPolicy {
    /// The reference policy: multiplicative over genes and over contexts.
    pub fn reference() -> Self {
        Self {
            rule: ScoringRule::Occupancy,
            gene_combine: Combine::Product,
            context_combine: Combine::Product,
        }
    }

    /// Short tag used in output file names.
    pub fn name(&self) -> String {
        let rule = match self.rule {
            ScoringRule::Occupancy => "occ",
            ScoringRule::Hamming => "ham",
        };
        let gene = match self.gene_combine {
            Combine::Product => "prod",
            Combine::Mean => "mean",
        };
        let ctx = match self.context_combine {
            Combine::Product => "prod",
            Combine::Mean => "mean",
        };
        format!("{rule}_{gene}_{ctx}")
    }
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self::reference()
    }
}

/// Top-level run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of genes G; the state space has 2^G states.
    #[serde(default = "default_n_genes")]
    pub n_genes: u8,
    /// Generation budget per trial.
    #[serde(default = "default_generations")]
    pub generations: u64,
    /// Per-bit mutation probabilities; one independent trial per value.
    #[serde(default = "default_p_flip")]
    pub p_flip: Vec<f64>,
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default)]
    pub scoring: ScoringPolicy,
    #[serde(default = "default_anterior")]
    pub anterior: ContextConfig,
    #[serde(default = "default_posterior")]
    pub posterior: ContextConfig,
    /// Record every generation with attractor-landscape descriptors.
    /// Meant for short budgets; the event buffer grows per generation.
    #[serde(default)]
    pub record_landscape: bool,
    /// Master RNG seed; trials derive their own seeds from it. Entropy-seeded
    /// when absent.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n_genes: default_n_genes(),
            generations: default_generations(),
            p_flip: default_p_flip(),
            mode: SearchMode::default(),
            scoring: ScoringPolicy::default(),
            anterior: default_anterior(),
            posterior: default_posterior(),
            record_landscape: false,
            random_seed: None,
        }
    }
}

impl RunConfig {
    /// Mask selecting the low G bits of a state.
    #[inline]
    pub fn state_mask(&self) -> u8 {
        (((1u16) << self.n_genes) - 1) as u8
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_genes == 0 || self.n_genes > MAX_GENES {
            return Err(ConfigError::InvalidGeneCount(self.n_genes));
        }
        if self.generations == 0 {
            return Err(ConfigError::InvalidGenerations);
        }
        if self.p_flip.is_empty() {
            return Err(ConfigError::EmptySweep);
        }
        for &p in &self.p_flip {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidFlipProbability(p));
            }
        }
        let mask = self.state_mask();
        for (context, cfg) in [("anterior", self.anterior), ("posterior", self.posterior)] {
            for (field, value) in [("initial", cfg.initial), ("target", cfg.target)] {
                if value & !mask != 0 {
                    return Err(ConfigError::StateOutOfRange {
                        context,
                        field,
                        value,
                        genes: self.n_genes,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Gene count must be between 1 and {MAX_GENES}, got {0}")]
    InvalidGeneCount(u8),
    #[error("Generation budget must be non-zero")]
    InvalidGenerations,
    #[error("Flip probability sweep must not be empty")]
    EmptySweep,
    #[error("Flip probability must be within [0, 1], got {0}")]
    InvalidFlipProbability(f64),
    #[error("{context} {field} state {value:#04x} exceeds the {genes}-gene state mask")]
    StateOutOfRange {
        context: &'static str,
        field: &'static str,
        value: u8,
        genes: u8,
    },
}
