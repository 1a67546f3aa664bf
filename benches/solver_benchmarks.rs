use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zebra_solver::examples::classic;
use zebra_solver::puzzle::parser::parse_source;
use zebra_solver::solver::engine::SolverEngine;
use zebra_solver::solver::matrix::RowTable;

fn parse_classic(c: &mut Criterion) {
    c.bench_function("parse_classic", |b| {
        b.iter(|| parse_source(black_box(classic::SOURCE)).unwrap())
    });
}

fn solve_classic(c: &mut Criterion) {
    c.bench_function("solve_classic", |b| {
        b.iter(|| {
            let parsed = parse_source(classic::SOURCE).unwrap();
            let table = Arc::new(RowTable::build(parsed.categories).unwrap());
            let engine = SolverEngine::new(table, parsed.clues);
            let report = engine.solve(2000, None).unwrap();
            assert_eq!(report.solutions.len(), 1);
            black_box(report)
        })
    });
}

criterion_group!(benches, parse_classic, solve_classic);
criterion_main!(benches);
