use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ntru_sves::params::EncryptionParameters;
use ntru_sves::{decrypt, encrypt, generate_key_pair};
use rand::rngs::OsRng;

fn bench_params() -> Vec<(&'static str, EncryptionParameters)> {
    vec![
        ("apr2011_439", EncryptionParameters::apr2011_439()),
        ("apr2011_439_fast", EncryptionParameters::apr2011_439_fast()),
        ("ees1087ep2", EncryptionParameters::ees1087ep2()),
    ]
}

fn keygen_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("keygen");
    group.sample_size(10);
    for (name, params) in bench_params() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &params, |b, params| {
            b.iter(|| generate_key_pair(params, &mut OsRng).unwrap());
        });
    }
    group.finish();
}

fn encrypt_decrypt_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt_decrypt");
    for (name, params) in bench_params() {
        let kp = generate_key_pair(&params, &mut OsRng).unwrap();
        let message = vec![0x42u8; params.max_msg_len_bytes() / 2];

        group.bench_with_input(
            BenchmarkId::new("encrypt", name),
            &params,
            |b, params| {
                b.iter(|| encrypt(params, &kp.public, &message, &mut OsRng).unwrap());
            },
        );

        let ciphertext = encrypt(&params, &kp.public, &message, &mut OsRng).unwrap();
        group.bench_with_input(
            BenchmarkId::new("decrypt", name),
            &params,
            |b, params| {
                b.iter(|| decrypt(params, &kp, &ciphertext).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, keygen_benchmark, encrypt_decrypt_benchmark);
criterion_main!(benches);
