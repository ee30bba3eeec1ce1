use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reg_nfa::matching::Matcher;
use reg_nfa::{serialize, RegexNFA};

fn compile_and_serialize(pattern: &str) -> usize {
    let mut regex = RegexNFA::new(pattern);
    regex.compile().unwrap();
    let fragment = regex.fragment().unwrap();
    serialize(fragment).as_object().map_or(0, |document| document.len())
}

fn criterion_benchmark_compile(c: &mut Criterion) {
    let pattern = "((a|b)*abb(c|d)*)*".repeat(20);
    c.bench_function("compile and serialize nested pattern", |b| {
        b.iter(|| compile_and_serialize(black_box(&pattern)))
    });
}

fn criterion_benchmark_simulate(c: &mut Criterion) {
    let mut regex = RegexNFA::new("(a|b)*abb");
    regex.compile().unwrap();
    let text: String = "ab".repeat(5000) + "abb";
    c.bench_function("simulate (a|b)*abb on 10k symbols", |b| {
        b.iter(|| assert!(regex.is_match(black_box(&text))))
    });
}

criterion_group!(
    benches,
    criterion_benchmark_compile,
    criterion_benchmark_simulate
);
criterion_main!(benches);
