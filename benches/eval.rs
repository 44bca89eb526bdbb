//! Benchmarks for the evaluator's hot paths: ring multiplication, the
//! homomorphic tensor product, relinearization, and modulus switching.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use leveled_bgv::{
    encode, encrypt, mod_switch, multiply, relinearize, BgvContext, BgvParams, ErrorDistribution,
    KeyGenerator, RingElement, Sampler,
};

fn bench_ctx() -> BgvContext {
    BgvContext::new(BgvParams {
        ring_dim: 256,
        moduli: vec![1 << 44, 1 << 32],
        plain_modulus: 257,
        sigma: 3.2,
        error: ErrorDistribution::Gaussian,
        relin_base: 1 << 11,
    })
    .unwrap()
}

fn bench_ring_mul(c: &mut Criterion) {
    let ctx = bench_ctx();
    let q = ctx.moduli()[0];
    let mut sampler = Sampler::with_seed(ErrorDistribution::Gaussian, 3.2, 1);

    let a = RingElement::sample_uniform(ctx.ring_dim(), q, &mut sampler);
    let b = RingElement::sample_uniform(ctx.ring_dim(), q, &mut sampler);

    c.bench_function("ring_mul_n256", |bench| {
        bench.iter(|| black_box(a.mul(&b)))
    });
}

fn bench_homomorphic_ops(c: &mut Criterion) {
    let ctx = bench_ctx();
    let mut sampler = Sampler::with_seed(ErrorDistribution::Gaussian, 3.2, 2);
    let keys = KeyGenerator::generate(&ctx, &mut sampler);

    let ct1 = encrypt(&keys.public, &encode(&[3], &ctx).unwrap(), &ctx, &mut sampler);
    let ct2 = encrypt(&keys.public, &encode(&[5], &ctx).unwrap(), &ctx, &mut sampler);
    let product = multiply(&ct1, &ct2, &ctx).unwrap();
    let relined = relinearize(&product, &keys.relin, &ctx);

    c.bench_function("multiply_n256", |bench| {
        bench.iter(|| black_box(multiply(&ct1, &ct2, &ctx).unwrap()))
    });

    c.bench_function("relinearize_n256", |bench| {
        bench.iter(|| black_box(relinearize(&product, &keys.relin, &ctx)))
    });

    c.bench_function("mod_switch_n256", |bench| {
        bench.iter(|| black_box(mod_switch(&relined, &ctx).unwrap()))
    });
}

criterion_group!(benches, bench_ring_mul, bench_homomorphic_ops);
criterion_main!(benches);
