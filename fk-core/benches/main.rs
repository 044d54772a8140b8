use fk_core::keys::{FormKey, SecretKey};
use fk_core::test::{TestSetup, NOW};
use fk_core::token::EmailToken;
use fk_core::DEFAULT_TOKEN_MAX_AGE;

use criterion::*;

fn bench(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let setup = TestSetup::new(&mut rng);

    c.bench_function("derive form key", |b| {
        let secret = SecretKey::generate(&mut rng);
        b.iter(|| FormKey::derive(black_box(&secret), &setup.server_key))
    });

    let mut group = c.benchmark_group("email token");

    group.bench_function("issue", |b| {
        b.iter(|| {
            EmailToken::issue(
                black_box("owner@example.com"),
                &setup.secret,
                &setup.server_key,
                &setup.token_key,
                NOW,
                &mut rng,
            )
            .unwrap()
        })
    });

    let token = EmailToken::issue(
        "owner@example.com",
        &setup.secret,
        &setup.server_key,
        &setup.token_key,
        NOW,
        &mut rng,
    )
    .unwrap();

    group.bench_function("verify", |b| {
        b.iter(|| black_box(&token).verify(&setup.token_key, NOW, DEFAULT_TOKEN_MAX_AGE))
    });

    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
