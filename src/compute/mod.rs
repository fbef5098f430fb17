//! Compute module - Network dynamics, attractor detection, fitness
//! scoring, and stochastic search.

mod attractor;
mod fitness;
mod genome;
mod landscape;
mod net;
mod search;

pub use attractor::*;
pub use fitness::*;
pub use genome::*;
pub use landscape::*;
pub use net::*;
pub use search::*;
