#[macro_use]
extern crate criterion;

use criterion::Criterion;
use multiscan_ac::AcAutomaton;
use multiscan_common::Pattern;

fn build_patterns(words: &[&str]) -> Vec<Pattern> {
    words
        .iter()
        .enumerate()
        .map(|(i, w)| Pattern::new(i, w.as_bytes().to_vec()).unwrap())
        .collect()
}

fn bench_ac_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("ac_automaton_search");

    let patterns = build_patterns(&[
        "error", "warning", "panic", "timeout", "retry", "banana", "she", "his", "hers",
    ]);
    let automaton = AcAutomaton::build(&patterns).unwrap();

    for size in [1024usize, 16384, 131072] {
        let text = "the quick brown fox jumped over error timeout hers ".repeat(size / 48 + 1);
        let text = text.as_bytes();
        group.throughput(criterion::Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("bytes_{}", text.len()), |b| {
            b.iter(|| automaton.search(text));
        });
    }
    group.finish();
}

fn bench_ac_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("ac_automaton_build");

    for pattern_count in [16usize, 256, 4096] {
        let words: Vec<String> = (0..pattern_count).map(|i| format!("pattern{i}")).collect();
        let patterns: Vec<Pattern> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Pattern::new(i, w.as_bytes().to_vec()).unwrap())
            .collect();
        group.bench_function(format!("patterns_{}", pattern_count), |b| {
            b.iter(|| AcAutomaton::build(&patterns).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ac_search, bench_ac_build);
criterion_main!(benches);
