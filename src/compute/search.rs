//! Stochastic search over genome space: drift and hill-climb trials.

use std::collections::HashSet;

use log::{debug, info};
use rayon::prelude::*;

use crate::schema::{ConfigError, RunConfig, SearchMode};

use super::fitness::FitnessEvaluator;
use super::genome::{Genome, GenomeRng};
use super::landscape::AttractorCensus;
use super::net::NetParams;

/// Interval between progress log lines, in generations.
const PROGRESS_INTERVAL: u64 = 1_000_000;

/// One recorded fitness event; in extended recording mode, one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Absolute generation index.
    pub generation: u64,
    /// Generations since the previous recorded event.
    pub since_event: u64,
    /// Generations since the previous fitness-1.0 event.
    pub since_f1: u64,
    pub fitness: f64,
    /// Landscape descriptors, present in extended recording mode.
    pub landscape: Option<LandscapeRecord>,
}

/// Attractor-landscape descriptors attached to an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandscapeRecord {
    /// Distinct attractors of the current genome (full basin census).
    pub attractors: usize,
    /// Distinct attractors seen across the current genome lineage.
    pub lineage_attractors: usize,
    pub mean_period: f64,
    pub max_period: usize,
}

/// Outcome of one trial: the event stream for a single p value.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialResult {
    pub p_flip: f64,
    pub mode: SearchMode,
    /// Generations actually consumed (equals the budget).
    pub generations: u64,
    /// Number of fitness-1.0 genomes found.
    pub f1_count: u64,
    pub events: Vec<EventRecord>,
}

/// A single evolving lineage with its own RNG stream. One logical thread of
/// execution: each generation's genome is a deterministic function of the
/// previous genome and the stream.
pub struct Trial {
    evaluator: FitnessEvaluator,
    rng: GenomeRng,
    mode: SearchMode,
    p_flip: f64,
    budget: u64,
    record_landscape: bool,
}

impl Trial {
    pub fn new(config: &RunConfig, p_flip: f64, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        if !p_flip.is_finite() || !(0.0..=1.0).contains(&p_flip) {
            return Err(ConfigError::InvalidFlipProbability(p_flip));
        }
        Ok(Self {
            evaluator: FitnessEvaluator::from_config(config),
            rng: GenomeRng::new(seed),
            mode: config.mode,
            p_flip,
            budget: config.generations,
            record_landscape: config.record_landscape,
        })
    }

    pub fn run(&mut self) -> TrialResult {
        match self.mode {
            SearchMode::Drift => self.run_drift(),
            SearchMode::HillClimb => self.run_hill_climb(),
        }
    }

    /// Drift: evaluate, record and re-randomize on maximal fitness,
    /// otherwise mutate in place unconditionally.
    fn run_drift(&mut self) -> TrialResult {
        let net = *self.evaluator.net();
        let mut events = Vec::new();
        let mut lineage = LineageTracker::new(self.record_landscape);
        let mut genome = self.rng.random_genome(&net);
        let mut last_event = 0u64;
        let mut last_f1 = 0u64;
        let mut f1_count = 0u64;

        for generation in 0..self.budget {
            let fitness = self.evaluator.evaluate_fitness(&genome);
            let landscape = lineage.observe(&net, &genome);
            if self.record_landscape {
                events.push(EventRecord {
                    generation,
                    since_event: generation - last_event,
                    since_f1: generation - last_f1,
                    fitness,
                    landscape,
                });
            }
            if fitness == 1.0 {
                debug!(
                    "p={} maximally fit genome after {} generations",
                    self.p_flip,
                    generation - last_f1
                );
                if !self.record_landscape {
                    events.push(EventRecord {
                        generation,
                        since_event: generation - last_event,
                        since_f1: generation - last_f1,
                        fitness,
                        landscape: None,
                    });
                }
                last_event = generation;
                last_f1 = generation;
                f1_count += 1;
                genome = self.rng.random_genome(&net);
                lineage.reset();
            } else {
                self.rng.mutate(&mut genome, self.p_flip, &net);
            }
            log_progress(generation + 1, self.budget, self.p_flip);
        }

        TrialResult {
            p_flip: self.p_flip,
            mode: self.mode,
            generations: self.budget,
            f1_count,
            events,
        }
    }

    /// Hill-climb: mutate a copy each generation and accept it only when its
    /// fitness does not decrease; re-randomize after each maximally fit
    /// genome. Both the re-randomization and each mutation consume one
    /// generation from the budget.
    fn run_hill_climb(&mut self) -> TrialResult {
        let net = *self.evaluator.net();
        let mut events = Vec::new();
        let mut lineage = LineageTracker::new(self.record_landscape);
        let mut generation = 0u64;
        let mut last_event = 0u64;
        let mut last_f1 = 0u64;
        let mut f1_count = 0u64;

        while generation < self.budget {
            let mut genome = self.rng.random_genome(&net);
            generation += 1;
            lineage.reset();
            let mut current = self.evaluator.evaluate_fitness(&genome);
            let landscape = lineage.observe(&net, &genome);

            // A freshly drawn genome can already be maximally fit.
            if current == 1.0 {
                events.push(EventRecord {
                    generation,
                    since_event: generation - last_event,
                    since_f1: generation - last_f1,
                    fitness: current,
                    landscape,
                });
                last_event = generation;
                last_f1 = generation;
                f1_count += 1;
            }

            while current < 1.0 {
                let mut candidate = genome.clone();
                self.rng.mutate(&mut candidate, self.p_flip, &net);
                generation += 1;
                log_progress(generation, self.budget, self.p_flip);
                if generation >= self.budget {
                    break;
                }

                let fitness = self.evaluator.evaluate_fitness(&candidate);
                if fitness >= current {
                    genome = candidate;
                    let landscape = lineage.observe(&net, &genome);
                    events.push(EventRecord {
                        generation,
                        since_event: generation - last_event,
                        since_f1: generation - last_f1,
                        fitness,
                        landscape,
                    });
                    last_event = generation;
                    if fitness == 1.0 {
                        last_f1 = generation;
                        f1_count += 1;
                    }
                    current = fitness;
                }
            }
        }

        TrialResult {
            p_flip: self.p_flip,
            mode: self.mode,
            generations: generation,
            f1_count,
            events,
        }
    }
}

/// Tracks distinct attractors across one genome lineage; inert unless
/// extended recording is enabled.
struct LineageTracker {
    enabled: bool,
    seen: HashSet<Vec<u8>>,
}

impl LineageTracker {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            seen: HashSet::new(),
        }
    }

    fn reset(&mut self) {
        self.seen.clear();
    }

    fn observe(&mut self, net: &NetParams, genome: &Genome) -> Option<LandscapeRecord> {
        if !self.enabled {
            return None;
        }
        let census = AttractorCensus::of_genome(net, genome);
        for key in census.attractors() {
            self.seen.insert(key.clone());
        }
        Some(LandscapeRecord {
            attractors: census.count(),
            lineage_attractors: self.seen.len(),
            mean_period: census.mean_period(),
            max_period: census.max_period(),
        })
    }
}

fn log_progress(generation: u64, budget: u64, p_flip: f64) {
    if generation % PROGRESS_INTERVAL == 0 {
        info!(
            "p={} completed {}M of {}M generations",
            p_flip,
            generation / 1_000_000,
            budget / 1_000_000
        );
    }
}

/// Run one trial per configured flip probability. Trials share no mutable
/// state and run on the rayon pool, each seeded from the master RNG; results
/// are aggregated per trial, never interleaved.
pub fn run_sweep(config: &RunConfig) -> Result<Vec<TrialResult>, ConfigError> {
    config.validate()?;
    let mut seeder = match config.random_seed {
        Some(seed) => GenomeRng::new(seed),
        None => GenomeRng::random(),
    };
    let seeds: Vec<u64> = config.p_flip.iter().map(|_| seeder.next_seed()).collect();
    config
        .p_flip
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(&p_flip, &seed)| {
            let mut trial = Trial::new(config, p_flip, seed)?;
            Ok(trial.run())
        })
        .collect()
}
