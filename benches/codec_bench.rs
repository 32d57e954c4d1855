use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use wire_router::core::any::Any;
use wire_router::core::skip::skip_field;
use wire_router::core::varint;
use wire_router::core::wire::Message;
use wire_router::protocol::messages::MsgGrantFeeAllowance;

fn grant(payload: usize) -> MsgGrantFeeAllowance {
    MsgGrantFeeAllowance {
        granter: vec![0xA1; 20],
        grantee: vec![0xB2; 20],
        allowance: Some(Any::new(
            "/cosmos.feegrant.v1beta1.BasicAllowance",
            vec![0x5C; payload],
        )),
    }
}

fn bench_varint(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");
    let values = [0u64, 127, 16_383, 1 << 35, u64::MAX];

    group.bench_function("encode", |b| {
        let mut out = Vec::with_capacity(64);
        b.iter(|| {
            out.clear();
            for &v in &values {
                varint::encode_into(black_box(v), &mut out);
            }
        })
    });

    let encoded: Vec<Vec<u8>> = values.iter().map(|&v| varint::encode(v)).collect();
    group.bench_function("decode", |b| {
        b.iter(|| {
            for bytes in &encoded {
                let _ = varint::decode(black_box(bytes)).unwrap();
            }
        })
    });

    group.finish();
}

fn bench_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("grant_message");

    for payload in [16usize, 1024, 64 * 1024] {
        let msg = grant(payload);
        let bytes = msg.encode().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_function(format!("encode_{payload}"), |b| {
            b.iter(|| msg.encode().unwrap())
        });

        group.bench_function(format!("decode_{payload}"), |b| {
            b.iter_batched(
                || bytes.clone(),
                |blob| MsgGrantFeeAllowance::decode(&blob).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_skip(c: &mut Criterion) {
    let mut group = c.benchmark_group("skip");

    // 64 nested groups with a varint at each level
    let mut nested = Vec::new();
    for _ in 0..64 {
        nested.extend_from_slice(&[0x5B, 0x08, 0x96, 0x01]);
    }
    nested.extend(std::iter::repeat(0x5C).take(64));

    group.bench_function("nested_groups", |b| {
        b.iter(|| skip_field(black_box(&nested), 0).unwrap())
    });

    let bytes = grant(4096).encode().unwrap();
    group.bench_function("length_delimited", |b| {
        b.iter(|| {
            let mut pos = 0;
            while pos < bytes.len() {
                pos = skip_field(black_box(&bytes), pos).unwrap();
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_varint, bench_message, bench_skip);
criterion_main!(benches);
