//! Benchmarks for the atom codec

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use atomkit_core::Atom;
use atomkit_test::{CodecFuzzer, FuzzerConfig};
use atomkit_wire::{decode, encode, encode_all, AtomHeader, AtomStream};

fn sample_table() -> Atom {
    Atom::list(
        (0..32)
            .map(|i| {
                Atom::dictionary(vec![
                    (Atom::string("id"), Atom::integer(i)),
                    (Atom::string("name"), Atom::string(format!("row-{}", i))),
                    (
                        Atom::string("values"),
                        Atom::list((0..8).map(|v| Atom::integer(i * v)).collect::<Vec<_>>()),
                    ),
                ])
            })
            .collect::<Vec<_>>(),
    )
}

fn bench_header_parse(c: &mut Criterion) {
    let bytes = encode(&Atom::integer(0x1234_5678)).unwrap();

    c.bench_function("header_parse", |b| {
        b.iter(|| AtomHeader::parse(black_box(&bytes)))
    });
}

fn bench_scalar_roundtrip(c: &mut Criterion) {
    let atom = Atom::string("a moderately sized string payload");

    c.bench_function("scalar_roundtrip", |b| {
        b.iter(|| {
            let bytes = encode(black_box(&atom)).unwrap();
            black_box(decode(&bytes).unwrap())
        })
    });
}

fn bench_table_encode(c: &mut Criterion) {
    let atom = sample_table();

    c.bench_function("table_encode", |b| b.iter(|| encode(black_box(&atom))));
}

fn bench_table_decode(c: &mut Criterion) {
    let bytes = encode(&sample_table()).unwrap();

    c.bench_function("table_decode", |b| b.iter(|| decode(black_box(&bytes))));
}

fn bench_stream_decode(c: &mut Criterion) {
    let mut fuzzer = CodecFuzzer::new(FuzzerConfig::light());
    let atoms: Vec<Atom> = (0..100).map(|_| fuzzer.generate_atom()).collect();
    let bytes = encode_all(&atoms).unwrap();

    c.bench_function("stream_decode", |b| {
        b.iter(|| AtomStream::new(black_box(&bytes)).count())
    });
}

criterion_group!(
    benches,
    bench_header_parse,
    bench_scalar_roundtrip,
    bench_table_encode,
    bench_table_decode,
    bench_stream_decode
);
criterion_main!(benches);
