//! Genome storage, random sampling, mutation, and the textual codec.

use rand::prelude::*;

use super::net::NetParams;

/// Table storage per section: 4 x 64 = 256 bits, enough for 8 genes.
const SECTION_WORDS: usize = 4;

/// One gene's truth table. Bit at address `a` is the gene's next output when
/// its rotated input address equals `a`. Only the low 2^G bits are
/// meaningful; higher bits are kept zero and never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneSection {
    words: [u64; SECTION_WORDS],
}

impl GeneSection {
    #[inline]
    pub fn bit(&self, addr: usize) -> bool {
        self.words[addr >> 6] >> (addr & 63) & 1 == 1
    }

    #[inline]
    fn set(&mut self, addr: usize) {
        self.words[addr >> 6] |= 1 << (addr & 63);
    }

    #[inline]
    fn flip(&mut self, addr: usize) {
        self.words[addr >> 6] ^= 1 << (addr & 63);
    }

    /// Zero every bit at or above `bits`.
    fn truncate(&mut self, bits: usize) {
        for (i, word) in self.words.iter_mut().enumerate() {
            let lo = i * 64;
            if bits <= lo {
                *word = 0;
            } else if bits < lo + 64 {
                *word &= (1u64 << (bits - lo)) - 1;
            }
        }
    }
}

/// An ordered sequence of gene sections, one per gene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    sections: Vec<GeneSection>,
}

impl Genome {
    /// Genome with every table bit off.
    pub fn zeroed(net: &NetParams) -> Self {
        Self {
            sections: vec![GeneSection::default(); usize::from(net.n_genes())],
        }
    }

    /// Build from one word per section holding its low 64 table bits
    /// (sufficient for runs of up to 6 genes). Bits beyond the table width
    /// are discarded.
    pub fn from_low_words(net: &NetParams, words: &[u64]) -> Self {
        debug_assert_eq!(words.len(), usize::from(net.n_genes()));
        let sections = words
            .iter()
            .map(|&w| {
                let mut section = GeneSection {
                    words: [w, 0, 0, 0],
                };
                section.truncate(net.section_bits());
                section
            })
            .collect();
        Self { sections }
    }

    #[inline]
    pub fn section(&self, i: usize) -> &GeneSection {
        &self.sections[i]
    }

    pub fn n_sections(&self) -> usize {
        self.sections.len()
    }

    /// Serialize to '0'/'1' characters, most significant table bit first
    /// within each section, sections concatenated in gene order. Total
    /// length is G * 2^G.
    pub fn encode(&self, net: &NetParams) -> String {
        let width = net.section_bits();
        let mut out = String::with_capacity(width * self.sections.len());
        for section in &self.sections {
            for addr in (0..width).rev() {
                out.push(if section.bit(addr) { '1' } else { '0' });
            }
        }
        out
    }

    /// Exact inverse of [`Genome::encode`]. Fails on wrong length or any
    /// character other than '0'/'1', without constructing a partial genome.
    pub fn decode(s: &str, net: &NetParams) -> Result<Self, GenomeStringError> {
        let width = net.section_bits();
        let expected = width * usize::from(net.n_genes());
        let count = s.chars().count();
        if count != expected {
            return Err(GenomeStringError::WrongLength {
                expected,
                got: count,
            });
        }
        let mut genome = Self {
            sections: vec![GeneSection::default(); usize::from(net.n_genes())],
        };
        for (pos, ch) in s.chars().enumerate() {
            match ch {
                '0' => {}
                '1' => genome.sections[pos / width].set(width - 1 - pos % width),
                _ => return Err(GenomeStringError::InvalidChar { ch, pos }),
            }
        }
        Ok(genome)
    }
}

/// Genome textual-encoding errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenomeStringError {
    #[error("expected {expected} characters, got {got}")]
    WrongLength { expected: usize, got: usize },
    #[error("invalid character {ch:?} at position {pos}; expected '0' or '1'")]
    InvalidChar { ch: char, pos: usize },
}

/// Random number generator context owned by one trial. All genome sampling
/// and mutation draws come from this stream, keeping trials independently
/// reproducible.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with an entropy seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Sample a genome with every table bit drawn uniformly.
    pub fn random_genome(&mut self, net: &NetParams) -> Genome {
        let width = net.section_bits();
        let sections = (0..net.n_genes())
            .map(|_| {
                let mut words = [0u64; SECTION_WORDS];
                for word in words.iter_mut().take(width.div_ceil(64)) {
                    *word = self.rng.r#gen();
                }
                let mut section = GeneSection { words };
                section.truncate(width);
                section
            })
            .collect();
        Genome { sections }
    }

    /// Flip every table bit independently with probability `p_flip`.
    /// Draws are uncorrelated Bernoulli trials with no bias toward fitness.
    pub fn mutate(&mut self, genome: &mut Genome, p_flip: f64, net: &NetParams) {
        let width = net.section_bits();
        for section in &mut genome.sections {
            for addr in 0..width {
                if self.rng.gen_bool(p_flip) {
                    section.flip(addr);
                }
            }
        }
    }

    /// Next u64 for seeding child RNGs.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }
}
