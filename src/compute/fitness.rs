//! Fitness evaluation: reduce attractors to a score against target states.
//!
//! The scoring policy is a strategy chosen once per run from configuration;
//! a policy is the per-context rule (occupancy or Hamming) plus two
//! combinators: one over the per-gene fractions of a limit cycle and one
//! over the anterior/posterior context scores.

use crate::schema::{Combine, ContextConfig, RunConfig, ScoringPolicy, ScoringRule};

use super::attractor::{Attractor, find_attractor};
use super::genome::Genome;
use super::net::NetParams;

/// Evaluates genomes against the anterior and posterior contexts under a
/// configured scoring policy.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    net: NetParams,
    policy: ScoringPolicy,
    anterior: ContextConfig,
    posterior: ContextConfig,
}

impl FitnessEvaluator {
    pub fn new(
        net: NetParams,
        policy: ScoringPolicy,
        anterior: ContextConfig,
        posterior: ContextConfig,
    ) -> Self {
        Self {
            net,
            policy,
            anterior,
            posterior,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            NetParams::from_config(config),
            config.scoring,
            config.anterior,
            config.posterior,
        )
    }

    pub fn net(&self) -> &NetParams {
        &self.net
    }

    /// Score one context in [0, 1]: simulate to the attractor and apply the
    /// policy's per-context rule.
    pub fn evaluate_context(&self, genome: &Genome, context: ContextConfig) -> f64 {
        let attractor = find_attractor(&self.net, genome, context.initial);
        self.score_attractor(&attractor, context.target)
    }

    /// Apply the per-context rule to an already-detected attractor.
    pub fn score_attractor(&self, attractor: &Attractor, target: u8) -> f64 {
        let score = match (attractor, self.policy.rule) {
            (Attractor::Point(state), ScoringRule::Occupancy) => {
                if *state == target { 1.0 } else { 0.0 }
            }
            (Attractor::Point(state), ScoringRule::Hamming) => {
                matching_fraction(*state, target, &self.net)
            }
            (Attractor::Cycle(states), rule) => {
                let occupancy = gene_occupancy(states, target, &self.net);
                let combinator = match rule {
                    ScoringRule::Occupancy => self.policy.gene_combine,
                    // Mean matching fraction over the cycle equals the mean
                    // of the per-gene occupancies.
                    ScoringRule::Hamming => Combine::Mean,
                };
                reduce(&occupancy, combinator)
            }
        };
        debug_assert!((0.0..=1.0).contains(&score));
        score
    }

    /// Combined fitness over both contexts, in [0, 1].
    pub fn evaluate_fitness(&self, genome: &Genome) -> f64 {
        let anterior = self.evaluate_context(genome, self.anterior);
        let posterior = self.evaluate_context(genome, self.posterior);
        let fitness = match self.policy.context_combine {
            Combine::Product => anterior * posterior,
            Combine::Mean => 0.5 * (anterior + posterior),
        };
        debug_assert!((0.0..=1.0).contains(&fitness));
        fitness
    }
}

/// For each gene, the fraction of cycle states whose bit agrees with the
/// target. Double precision throughout: products over long cycles get very
/// small.
fn gene_occupancy(states: &[u8], target: u8, net: &NetParams) -> Vec<f64> {
    let mut counts = vec![0u32; usize::from(net.n_genes())];
    for &state in states {
        // A set bit marks agreement with the target at that position.
        let agree = (state ^ !target) & net.state_mask();
        for (gene, count) in counts.iter_mut().enumerate() {
            *count += u32::from(agree >> gene) & 1;
        }
    }
    let period = states.len() as f64;
    counts.into_iter().map(|c| f64::from(c) / period).collect()
}

/// Fraction of gene bits on which `state` agrees with `target`.
fn matching_fraction(state: u8, target: u8, net: &NetParams) -> f64 {
    let agree = (state ^ !target) & net.state_mask();
    f64::from(agree.count_ones()) / f64::from(net.n_genes())
}

fn reduce(scores: &[f64], combinator: Combine) -> f64 {
    match combinator {
        Combine::Product => scores.iter().product(),
        Combine::Mean => scores.iter().sum::<f64>() / scores.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::genome::GenomeRng;
    use proptest::prelude::*;

    const ANTERIOR: ContextConfig = ContextConfig {
        initial: 0b10000,
        target: 0b10101,
    };
    const POSTERIOR: ContextConfig = ContextConfig {
        initial: 0b00000,
        target: 0b01010,
    };

    fn evaluator(policy: ScoringPolicy) -> FitnessEvaluator {
        FitnessEvaluator::new(NetParams::new(5), policy, ANTERIOR, POSTERIOR)
    }

    fn policy(rule: ScoringRule, gene: Combine, context: Combine) -> ScoringPolicy {
        ScoringPolicy {
            rule,
            gene_combine: gene,
            context_combine: context,
        }
    }

    fn oracle_genome(net: &NetParams) -> Genome {
        Genome::from_low_words(net, &[0xdeadbeef, 0x12345678, 0xcafebabe, 0x0f0f0f0f, 0x87654321])
    }

    #[test]
    fn reference_genome_is_maximally_fit() {
        let eval = evaluator(ScoringPolicy::reference());
        let genome = Genome::from_low_words(
            eval.net(),
            &[0x8875517a, 0x5c1e87e1, 0x8eef99d4, 0x1a3c467f, 0xdf7235c6],
        );
        assert_eq!(eval.evaluate_context(&genome, ANTERIOR), 1.0);
        assert_eq!(eval.evaluate_context(&genome, POSTERIOR), 1.0);
        assert_eq!(eval.evaluate_fitness(&genome), 1.0);
    }

    #[test]
    fn reference_genome_encoding_is_maximally_fit_too() {
        let eval = evaluator(ScoringPolicy::reference());
        let encoded = "1000100001110101010100010111101001011100000111101000011111100001100011101110111110011001110101000001101000111100010001100111111111011111011100100011010111000110";
        let genome = Genome::decode(encoded, eval.net()).unwrap();
        assert_eq!(eval.evaluate_fitness(&genome), 1.0);
    }

    // Hand-tabulated scores for the oracle genome: the anterior context
    // reaches point attractor 21 (= its target), the posterior context an
    // 8-cycle with per-gene occupancies [0.625, 0.375, 0.5, 0.375, 0.375].
    #[test]
    fn multiplicative_gene_combinator_matches_oracle() {
        let eval = evaluator(ScoringPolicy::reference());
        let genome = oracle_genome(eval.net());
        assert_eq!(eval.evaluate_context(&genome, ANTERIOR), 1.0);
        assert_eq!(eval.evaluate_context(&genome, POSTERIOR), 0.0164794921875);
        assert_eq!(eval.evaluate_fitness(&genome), 0.0164794921875);
    }

    #[test]
    fn mean_gene_combinator_matches_oracle() {
        let eval = evaluator(policy(
            ScoringRule::Occupancy,
            Combine::Mean,
            Combine::Product,
        ));
        let genome = oracle_genome(eval.net());
        assert_eq!(eval.evaluate_context(&genome, POSTERIOR), 0.45);
        assert_eq!(eval.evaluate_fitness(&genome), 0.45);
    }

    #[test]
    fn mean_context_combinator_averages_the_two_scores() {
        let genome = oracle_genome(&NetParams::new(5));

        let eval = evaluator(policy(
            ScoringRule::Occupancy,
            Combine::Product,
            Combine::Mean,
        ));
        assert_eq!(eval.evaluate_fitness(&genome), 0.5 * (1.0 + 0.0164794921875));

        let eval = evaluator(policy(ScoringRule::Occupancy, Combine::Mean, Combine::Mean));
        assert_eq!(eval.evaluate_fitness(&genome), 0.5 * (1.0 + 0.45));
    }

    #[test]
    fn point_attractor_occupancy_score_is_binary() {
        let eval = evaluator(ScoringPolicy::reference());
        // Every gene always on: point attractor 0b11111, close to the
        // anterior target but not equal.
        let genome = Genome::from_low_words(eval.net(), &[u64::MAX; 5]);
        assert_eq!(eval.evaluate_context(&genome, ANTERIOR), 0.0);
    }

    #[test]
    fn point_attractor_hamming_score_is_fractional() {
        let eval = evaluator(policy(ScoringRule::Hamming, Combine::Product, Combine::Product));
        // Point attractor 0b11111 vs target 0b10101: three of five genes agree.
        let genome = Genome::from_low_words(eval.net(), &[u64::MAX; 5]);
        assert_eq!(eval.evaluate_context(&genome, ANTERIOR), 0.6);
    }

    #[test]
    fn hamming_cycle_score_equals_mean_occupancy() {
        let eval = evaluator(policy(ScoringRule::Hamming, Combine::Product, Combine::Product));
        let genome = oracle_genome(eval.net());
        assert_eq!(eval.evaluate_context(&genome, POSTERIOR), 0.45);
    }

    proptest! {
        #[test]
        fn fitness_is_bounded_for_all_policies(
            seed in any::<u64>(),
            rule in prop::sample::select(vec![ScoringRule::Occupancy, ScoringRule::Hamming]),
            gene in prop::sample::select(vec![Combine::Product, Combine::Mean]),
            context in prop::sample::select(vec![Combine::Product, Combine::Mean]),
        ) {
            let eval = evaluator(policy(rule, gene, context));
            let genome = GenomeRng::new(seed).random_genome(eval.net());
            let fitness = eval.evaluate_fitness(&genome);
            prop_assert!((0.0..=1.0).contains(&fitness));
        }

        #[test]
        fn point_scores_under_occupancy_are_exactly_zero_or_one(seed in any::<u64>()) {
            let eval = evaluator(ScoringPolicy::reference());
            let genome = GenomeRng::new(seed).random_genome(eval.net());
            for context in [ANTERIOR, POSTERIOR] {
                let attractor =
                    crate::compute::attractor::find_attractor(eval.net(), &genome, context.initial);
                if let Attractor::Point(_) = attractor {
                    let score = eval.score_attractor(&attractor, context.target);
                    prop_assert!(score == 0.0 || score == 1.0);
                }
            }
        }
    }
}
