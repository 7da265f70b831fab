//! Criterion timings for the statement builders and client-side parameter rendering.
//! Nothing here touches a database, so the numbers are pure text-generation cost.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sql_handle::emulation::interpolate_params;
use sql_handle::prelude::*;
use sql_handle::statement::{make_insert, make_update};

fn wide_row(width: usize) -> ColumnValues {
    (0..width)
        .map(|i| {
            let value = match i % 4 {
                0 => Value::Null,
                1 => Value::Int(i64::try_from(i).unwrap_or_default()),
                2 => Value::Text(format!("value '{i}'")),
                _ => Value::Bool(i % 2 == 0),
            };
            (format!("col_{i}"), value)
        })
        .collect()
}

fn builders(c: &mut Criterion) {
    let mut group = c.benchmark_group("builders");
    for width in [2_usize, 16, 128] {
        let cols = wide_row(width);
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::new("make_insert", width), &cols, |b, cols| {
            b.iter(|| make_insert(DatabaseType::Sqlite, black_box("foo"), black_box(cols)));
        });
        group.bench_with_input(BenchmarkId::new("make_update", width), &cols, |b, cols| {
            b.iter(|| {
                make_update(
                    DatabaseType::Postgres,
                    black_box("foo"),
                    black_box(cols),
                    Some("id = 5"),
                )
            });
        });
    }
    group.finish();
}

fn emulated_prepares(c: &mut Criterion) {
    let sql = "update foo set mytext = ?, qty = ? where id = ? and note <> 'a ? b' -- ?";
    let params = Params::from(vec![
        Value::from("it's"),
        Value::Int(-4),
        Value::Int(99),
    ]);
    c.bench_function("interpolate_params", |b| {
        b.iter(|| interpolate_params(black_box(sql), black_box(&params), DatabaseType::Sqlite));
    });
}

criterion_group!(benches, builders, emulated_prepares);
criterion_main!(benches);
