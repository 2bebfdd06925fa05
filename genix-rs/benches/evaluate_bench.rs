use criterion::{black_box, criterion_group, criterion_main, Criterion};
use genix::calc::{self, compile, eval_postfix};

const SIMPLE: &str = "2+3*4";
const MIXED: &str = "sin(30) + cos(60) * sqrt(16) - log(2.718281828) ^ 2 / 3!";

fn nested(depth: usize) -> String {
    let mut s = String::from("1");
    for i in 0..depth {
        s = format!("({s}+{i})*2");
    }
    s
}

fn bench_evaluate(c: &mut Criterion) {
    let deep = nested(20);

    let mut g = c.benchmark_group("evaluate");
    g.bench_function("simple", |b| b.iter(|| calc::evaluate(black_box(SIMPLE))));
    g.bench_function("mixed", |b| b.iter(|| calc::evaluate(black_box(MIXED))));
    g.bench_function("nested_20", |b| b.iter(|| calc::evaluate(black_box(&deep))));
    g.finish();

    // Evaluation alone, with tokenizing and shunting done up front.
    let postfix = compile(MIXED).unwrap();
    c.bench_function("eval_postfix_mixed", |b| {
        b.iter(|| eval_postfix(black_box(&postfix)))
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
