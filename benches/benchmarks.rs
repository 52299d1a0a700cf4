criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        hashing_password,
        verifying_password,
        issuing_grant,
        decoding_access_token,
        decoding_refresh_token,
        fingerprinting_token,
}

fn hashing_password(c: &mut criterion::Criterion) {
    c.bench_function("hash a password with Argon2", |b| {
        b.iter(|| password::hash("correct horse battery staple"))
    });
}

fn verifying_password(c: &mut criterion::Criterion) {
    let hashword = password::hash("correct horse battery staple").unwrap();
    c.bench_function("verify a password against its hash", |b| {
        b.iter(|| password::verify("correct horse battery staple", &hashword))
    });
}

fn issuing_grant(c: &mut criterion::Criterion) {
    let crypto = Crypto::new(b"access-bench-secret", b"refresh-bench-secret");
    let user = ID::default();
    c.bench_function("issue an access/refresh pair", |b| {
        b.iter(|| crypto.issue(user))
    });
}

fn decoding_access_token(c: &mut criterion::Criterion) {
    let crypto = Crypto::new(b"access-bench-secret", b"refresh-bench-secret");
    let grant = crypto.issue(ID::default()).unwrap();
    c.bench_function("decode and verify an access token", |b| {
        b.iter(|| crypto.decode_access(&grant.access))
    });
}

fn decoding_refresh_token(c: &mut criterion::Criterion) {
    let crypto = Crypto::new(b"access-bench-secret", b"refresh-bench-secret");
    let grant = crypto.issue(ID::default()).unwrap();
    c.bench_function("decode and verify a refresh token", |b| {
        b.iter(|| crypto.decode_refresh(&grant.refresh))
    });
}

fn fingerprinting_token(c: &mut criterion::Criterion) {
    let crypto = Crypto::new(b"access-bench-secret", b"refresh-bench-secret");
    let grant = crypto.issue(ID::default()).unwrap();
    c.bench_function("fingerprint a token for logging", |b| {
        b.iter(|| Crypto::fingerprint(&grant.refresh))
    });
}

use warble::auth::Crypto;
use warble::auth::password;
use warble::core::ID;
