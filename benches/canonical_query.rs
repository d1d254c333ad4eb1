use criterion::{criterion_group, criterion_main, Criterion};
use signal_viewer::signer::{build_signed_url, QueryParams, QueryValue};
use std::hint::black_box;

fn sigv4_params() -> QueryParams {
    QueryParams::new()
        .with("X-Amz-Signature", "9f2b0c1d4e5a6b7c8d9e0f1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c")
        .with("X-Amz-Algorithm", "AWS4-HMAC-SHA256")
        .with(
            "X-Amz-Credential",
            "AKIDEXAMPLE/20240101/us-west-2/kinesisvideo/aws4_request",
        )
        .with("X-Amz-Date", "20240101T000000Z")
        .with("X-Amz-Expires", 299_i64)
        .with("X-Amz-SignedHeaders", "host")
        .with("X-Amz-Security-Token", QueryValue::Absent)
        .with(
            "X-Amz-ChannelARN",
            "arn:aws:kinesisvideo:us-west-2:123456789012:channel/demo/1700000000000",
        )
}

fn bench_canonical_query(c: &mut Criterion) {
    let endpoint = "wss://v-1234.kinesisvideo.us-west-2.amazonaws.com";

    c.bench_function("signed_url_sigv4_params", |b| {
        let params = sigv4_params();
        b.iter(|| black_box(build_signed_url(black_box(endpoint), black_box(&params))));
    });

    c.bench_function("signed_url_wide_map", |b| {
        let params: QueryParams = (0..256u32)
            .rev()
            .map(|i| (format!("param-{i:03}"), format!("value {i} / with reserved&chars")))
            .collect();
        b.iter(|| black_box(build_signed_url(black_box(endpoint), black_box(&params))));
    });
}

criterion_group!(canonical_query, bench_canonical_query);
criterion_main!(canonical_query);
