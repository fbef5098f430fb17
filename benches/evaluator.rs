//! Benchmarks for the network update rule and fitness evaluation.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use boolnet_drift::{
    compute::{FitnessEvaluator, Genome, GenomeRng, NetParams},
    schema::RunConfig,
};

fn bench_next_state(c: &mut Criterion) {
    let net = NetParams::new(5);
    let genome = Genome::from_low_words(
        &net,
        &[0x8875517a, 0x5c1e87e1, 0x8eef99d4, 0x1a3c467f, 0xdf7235c6],
    );

    c.bench_function("next_state_full_sweep", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for state in 0..32u8 {
                acc += u32::from(net.next_state(black_box(&genome), state));
            }
            acc
        });
    });
}

fn bench_evaluate_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_fitness");
    let evaluator = FitnessEvaluator::from_config(&RunConfig::default());
    let mut rng = GenomeRng::new(42);

    let genomes: Vec<Genome> = (0..64).map(|_| rng.random_genome(evaluator.net())).collect();

    group.bench_with_input(BenchmarkId::from_parameter("random_x64"), &genomes, |b, genomes| {
        b.iter(|| {
            genomes
                .iter()
                .map(|g| evaluator.evaluate_fitness(black_box(g)))
                .sum::<f64>()
        });
    });

    group.finish();
}

fn bench_mutation(c: &mut Criterion) {
    let net = NetParams::new(5);
    let mut rng = GenomeRng::new(7);
    let mut genome = rng.random_genome(&net);

    c.bench_function("mutate_p_0_1", |b| {
        b.iter(|| {
            rng.mutate(black_box(&mut genome), 0.1, &net);
        });
    });
}

criterion_group!(benches, bench_next_state, bench_evaluate_fitness, bench_mutation);
criterion_main!(benches);
