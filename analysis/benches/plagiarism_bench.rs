use analysis::plagiarism::check;
use analysis::tokenizer::normalize;
use analysis::Corpus;
use criterion::{criterion_group, criterion_main, Criterion};

const INPUT: &str = "Python is a versatile and widely used programming language, great for web dev and data science. \
Space exploration began with the launch of Sputnik 1 in 1957.";

fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize_input", |b| b.iter(|| normalize(INPUT)));
}

fn bench_check(c: &mut Criterion) {
    let corpus = Corpus::reference();
    c.bench_function("plagiarism_check_reference", |b| b.iter(|| check(&corpus, INPUT)));
}

criterion_group!(benches, bench_normalize, bench_check);
criterion_main!(benches);
