use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ledgerkit::{LedgerRecord, TransactionBody};
use ledgerkit_core::{CborRecord, Profile, ScriptDatum};
use ledgerkit_testkit::fixtures::{deep_array, deep_datum, wide_datum, TestFixture};

fn bench_body(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction_body");
    for outputs in [1u8, 8, 64] {
        let body = TestFixture::new().body(4, outputs);
        let bytes = body.encode();
        group.bench_with_input(BenchmarkId::new("encode", outputs), &body, |b, body| {
            b.iter(|| black_box(body.encode()))
        });
        group.bench_with_input(BenchmarkId::new("decode", outputs), &bytes, |b, bytes| {
            b.iter(|| TransactionBody::decode(black_box(bytes)))
        });
    }
    group.finish();
}

fn bench_datum(c: &mut Criterion) {
    let mut group = c.benchmark_group("script_datum");
    for len in [16usize, 256, 4096] {
        let bytes = wide_datum(len).to_bytes();
        group.bench_with_input(BenchmarkId::new("decode_wide", len), &bytes, |b, bytes| {
            b.iter(|| ScriptDatum::from_bytes(black_box(bytes)))
        });
    }
    let deep = deep_datum(200).to_bytes();
    group.bench_function("decode_deep", |b| {
        b.iter(|| ScriptDatum::from_bytes(black_box(&deep)))
    });
    group.finish();
}

fn bench_depth_rejection(c: &mut Criterion) {
    let bytes = deep_array(100_000);
    c.bench_function("reject_deep_array", |b| {
        b.iter(|| Profile::Ledger.decode(black_box(&bytes)))
    });
}

criterion_group!(benches, bench_body, bench_datum, bench_depth_rejection);
criterion_main!(benches);
