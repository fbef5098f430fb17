//! Attractor detection: classify the long-run behavior of one trajectory.

use super::genome::Genome;
use super::net::{NetParams, StateSet};

/// Long-run behavior reached from one initial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attractor {
    /// A state the update rule maps to itself.
    Point(u8),
    /// A cyclic sequence of at least two distinct states, in traversal order.
    Cycle(Vec<u8>),
}

impl Attractor {
    /// Number of states on the attractor: 1 for a point, L for a cycle.
    pub fn period(&self) -> usize {
        match self {
            Attractor::Point(_) => 1,
            Attractor::Cycle(states) => states.len(),
        }
    }

    /// States on the attractor in traversal order.
    pub fn states(&self) -> &[u8] {
        match self {
            Attractor::Point(state) => std::slice::from_ref(state),
            Attractor::Cycle(states) => states,
        }
    }

    /// Canonical form: the cycle rotated to start at its smallest state.
    /// Equal attractors reached from different entry points compare equal
    /// under this key.
    pub fn canonical(&self) -> Vec<u8> {
        match self {
            Attractor::Point(state) => vec![*state],
            Attractor::Cycle(states) => {
                let smallest = states.iter().copied().min().unwrap_or(0);
                let start = states.iter().position(|&s| s == smallest).unwrap_or(0);
                let mut rotated = Vec::with_capacity(states.len());
                rotated.extend_from_slice(&states[start..]);
                rotated.extend_from_slice(&states[..start]);
                rotated
            }
        }
    }
}

/// Iterate the update rule from `initial` until a state recurs. A recurrence
/// equal to the immediately preceding state is a point attractor; otherwise
/// the cycle is walked once more to collect its members in order. The state
/// space is finite, so this terminates within 2^G + 1 transitions.
pub fn find_attractor(net: &NetParams, genome: &Genome, initial: u8) -> Attractor {
    let mut visited = StateSet::new();
    visited.insert(initial);
    let mut state = initial;
    loop {
        let previous = state;
        state = net.next_state(genome, state);
        if visited.contains(state) {
            if state == previous {
                return Attractor::Point(state);
            }
            let mut members = StateSet::new();
            let mut cycle = Vec::new();
            let mut s = state;
            while members.insert(s) {
                cycle.push(s);
                s = net.next_state(genome, s);
            }
            return Attractor::Cycle(cycle);
        }
        visited.insert(state);
    }
}
