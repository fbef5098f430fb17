//! Basin census: the full attractor landscape of one genome.

use std::collections::HashSet;

use super::attractor::find_attractor;
use super::genome::Genome;
use super::net::NetParams;

/// Every distinct attractor reachable in a genome's state space, found by
/// simulating from all 2^G initial states and deduplicating canonical forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttractorCensus {
    attractors: Vec<Vec<u8>>,
}

impl AttractorCensus {
    pub fn of_genome(net: &NetParams, genome: &Genome) -> Self {
        let mut seen = HashSet::new();
        let mut attractors = Vec::new();
        for state in 0..net.state_count() {
            let key = find_attractor(net, genome, state as u8).canonical();
            if seen.insert(key.clone()) {
                attractors.push(key);
            }
        }
        Self { attractors }
    }

    /// Canonical forms of the distinct attractors, in discovery order.
    pub fn attractors(&self) -> &[Vec<u8>] {
        &self.attractors
    }

    pub fn count(&self) -> usize {
        self.attractors.len()
    }

    pub fn mean_period(&self) -> f64 {
        if self.attractors.is_empty() {
            return 0.0;
        }
        let total: usize = self.attractors.iter().map(Vec::len).sum();
        total as f64 / self.attractors.len() as f64
    }

    pub fn max_period(&self) -> usize {
        self.attractors.iter().map(Vec::len).max().unwrap_or(0)
    }
}
