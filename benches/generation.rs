use criterion::{criterion_group, criterion_main, Criterion, BenchmarkId};
use crossword_layout::generator::{GeneratorSettings, PuzzleGenerator};

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossword");

    group.bench_function(BenchmarkId::new("Backtracking", ""),
        |b| b.iter(||
        {
            let generator = PuzzleGenerator::new(
                vec!["planet", "lantern", "antenna", "network", "tone", "rental", "learn"]
                    .into_iter().map(str::to_owned).collect(),
                GeneratorSettings::default());

            generator.generate().unwrap()
        }));

    group.finish();

}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
