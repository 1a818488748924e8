use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tablematch::datatype::KeyValue;
use tablematch::engine::QueryOptions;
use tablematch::table::Table;

fn grid(rows: usize) -> String {
    let mut text = String::from("A.EQ B.LE = X\n");
    for i in 0..rows {
        text.push_str(&format!("{} {} = value{}\n", i % 100, (i % 50) * 10, i));
    }
    text
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let kvs = vec![
        KeyValue::number("A", "42".parse().unwrap()),
        KeyValue::number("B", "5".parse().unwrap()),
    ];
    for rows in [10usize, 100, 1_000, 10_000] {
        let mut table = Table::new();
        table.parse(grid(rows)).unwrap();
        c.bench_function(&format!("query {rows} rows"), |b| {
            b.iter(|| {
                black_box(&table)
                    .query(black_box(&kvs), QueryOptions::default())
                    .unwrap()
            })
        });
    }

    let mut table = Table::new();
    c.bench_function("parse 1k rows", |b| {
        let text = grid(1_000);
        b.iter(|| table.parse(black_box(text.clone())).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
