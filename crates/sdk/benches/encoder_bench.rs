//! Benchmarks for `TextStream` formatting using criterion.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arena_sdk::encoder::TextStream;
use arena_sdk::types::Decimal;

fn bench_put_integers(c: &mut Criterion) {
    let mut stream = TextStream::new();

    c.bench_function("append_i64", |b| {
        b.iter(|| {
            stream.clear();
            stream.append(&black_box(-9_007_199_254_740_993i64));
            black_box(stream.view());
        })
    });

    c.bench_function("append_u64_small", |b| {
        b.iter(|| {
            stream.clear();
            stream.append(&black_box(42u64));
            black_box(stream.view());
        })
    });
}

fn bench_put_decimal(c: &mut Criterion) {
    let mut stream = TextStream::new();
    let price = Decimal::from_f64(12345.6789);

    c.bench_function("append_decimal", |b| {
        b.iter(|| {
            stream.clear();
            stream.append(&black_box(price));
            black_box(stream.view());
        })
    });
}

fn bench_put_float(c: &mut Criterion) {
    let mut stream = TextStream::new();

    c.bench_function("append_f64", |b| {
        b.iter(|| {
            stream.clear();
            stream.append(&black_box(-12345.678901f64));
            black_box(stream.view());
        })
    });
}

fn bench_quote_line(c: &mut Criterion) {
    let mut stream = TextStream::new();
    let bid = Decimal::from_f64(99.5);
    let ask = Decimal::from_f64(101.25);

    // A realistic log line: two prices, two volumes, separators.
    c.bench_function("append_quote_line", |b| {
        b.iter(|| {
            stream.clear();
            stream
                .append(&("bid", bid))
                .append(&' ')
                .append(&("ask", ask))
                .append(&' ')
                .append(&black_box(17i32));
            black_box(stream.view());
        })
    });
}

criterion_group!(
    benches,
    bench_put_integers,
    bench_put_decimal,
    bench_put_float,
    bench_quote_line
);
criterion_main!(benches);
