//! Synchronous network update rule and visited-state bookkeeping.

use crate::schema::RunConfig;

use super::genome::Genome;

/// Mask parameters derived from the gene count, built once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetParams {
    n_genes: u8,
    state_mask: u8,
    section_bits: usize,
}

impl NetParams {
    /// Derive masks for a validated gene count (1..=8).
    pub fn new(n_genes: u8) -> Self {
        debug_assert!((1..=8).contains(&n_genes));
        Self {
            n_genes,
            state_mask: ((1u16 << n_genes) - 1) as u8,
            section_bits: 1 << n_genes,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.n_genes)
    }

    #[inline]
    pub fn n_genes(&self) -> u8 {
        self.n_genes
    }

    /// Mask selecting the low G bits of a state.
    #[inline]
    pub fn state_mask(&self) -> u8 {
        self.state_mask
    }

    /// Truth-table width of one gene section: 2^G bits.
    #[inline]
    pub fn section_bits(&self) -> usize {
        self.section_bits
    }

    /// Number of states in the state space: 2^G.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.section_bits
    }

    /// Apply the update rule once. Gene i reads the full state rotated left
    /// by i positions within G bits (its own bit included) as a truth-table
    /// address, and writes its output at bit position G-1-i. All outputs are
    /// computed from the same input state.
    pub fn next_state(&self, genome: &Genome, state: u8) -> u8 {
        let g = u32::from(self.n_genes);
        let s = u32::from(state) & u32::from(self.state_mask);
        let mut next = 0u8;
        for i in 0..g {
            let addr = ((s << i) & u32::from(self.state_mask)) | (s >> (g - i));
            if genome.section(i as usize).bit(addr as usize) {
                next |= 1 << (g - 1 - i);
            }
        }
        next
    }
}

/// Fixed-size presence bitmap over the at-most-256-state space.
/// Allocation free; discarded after each trajectory.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateSet {
    words: [u64; 4],
}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a state; returns true if it was not already present.
    #[inline]
    pub fn insert(&mut self, state: u8) -> bool {
        let word = usize::from(state >> 6);
        let bit = 1u64 << (state & 63);
        let fresh = self.words[word] & bit == 0;
        self.words[word] |= bit;
        fresh
    }

    #[inline]
    pub fn contains(&self, state: u8) -> bool {
        self.words[usize::from(state >> 6)] & (1u64 << (state & 63)) != 0
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Fixed genome with independently tabulated transitions.
    fn oracle_genome(net: &NetParams) -> Genome {
        Genome::from_low_words(net, &[0xdeadbeef, 0x12345678, 0xcafebabe, 0x0f0f0f0f, 0x87654321])
    }

    #[test]
    fn next_state_matches_oracle_vectors() {
        let net = NetParams::new(5);
        let genome = oracle_genome(&net);
        for (state, expected) in [(0, 19), (1, 23), (9, 30), (16, 21), (21, 21), (31, 21)] {
            assert_eq!(net.next_state(&genome, state), expected, "from {state}");
        }
    }

    #[test]
    fn point_attractor_state_maps_to_itself() {
        let net = NetParams::new(5);
        let genome = oracle_genome(&net);
        assert_eq!(net.next_state(&genome, 21), 21);
    }

    #[test]
    fn all_ones_sections_drive_every_gene_on() {
        let net = NetParams::new(5);
        let genome = Genome::from_low_words(&net, &[u64::MAX; 5]);
        for state in 0..32u8 {
            assert_eq!(net.next_state(&genome, state), 0b11111);
        }
    }

    #[test]
    fn zero_sections_drive_every_gene_off() {
        let net = NetParams::new(5);
        let genome = Genome::from_low_words(&net, &[0; 5]);
        for state in 0..32u8 {
            assert_eq!(net.next_state(&genome, state), 0);
        }
    }

    #[test]
    fn state_set_tracks_membership() {
        let mut set = StateSet::new();
        assert!(set.is_empty());
        assert!(set.insert(0));
        assert!(set.insert(255));
        assert!(!set.insert(0));
        assert!(set.contains(255));
        assert!(!set.contains(7));
        assert_eq!(set.len(), 2);
    }

    proptest! {
        #[test]
        fn next_state_is_deterministic(
            words in prop::collection::vec(any::<u64>(), 5),
            state in 0u8..32,
        ) {
            let net = NetParams::new(5);
            let genome = Genome::from_low_words(&net, &words);
            prop_assert_eq!(
                net.next_state(&genome, state),
                net.next_state(&genome, state)
            );
        }

        #[test]
        fn next_state_stays_within_the_state_mask(
            words in prop::collection::vec(any::<u64>(), 5),
            state in any::<u8>(),
        ) {
            let net = NetParams::new(5);
            let genome = Genome::from_low_words(&net, &words);
            prop_assert_eq!(net.next_state(&genome, state) & !net.state_mask(), 0);
        }
    }
}
