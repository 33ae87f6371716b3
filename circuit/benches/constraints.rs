use circuit::{
    ecdsa, elliptic_curve, foreign_field, range_check, scale, ConstraintSystem, EcdsaConfig, EcdsaSignature,
    Field3, Point, ShapeConstraintSystem, TestConstraintSystem,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use curve::{ed25519, secp256k1, CurveArithmetic};
use rand::rngs::StdRng;
use rand::SeedableRng;
use signatures::SigningKey;

fn bench_foreign_mul(c: &mut Criterion) {
    let curve = secp256k1();
    let f = curve.modulus().clone();
    let mut rng = StdRng::seed_from_u64(42);
    let a = curve.base_field().random(&mut rng);
    let b = curve.base_field().random(&mut rng);
    c.bench_function("foreign_mul_witness", |bencher| {
        bencher.iter(|| {
            let mut cs = TestConstraintSystem::new();
            let x = Field3::witness(&mut cs, |_| a.clone());
            let y = Field3::witness(&mut cs, |_| b.clone());
            black_box(foreign_field::mul(&mut cs, &x, &y, &f).unwrap())
        })
    });
}

fn scale_circuit<CS: ConstraintSystem>(cs: &mut CS) {
    let curve = secp256k1();
    let k = Field3::witness(cs, |_| curve.order() - 2u32);
    range_check::range_check_field3(cs, &k).unwrap();
    let p = Point::witness(cs, |_| curve.generator().clone());
    elliptic_curve::assert_on_curve(cs, &curve, &p).unwrap();
    black_box(scale(cs, &curve, &k, &p, None, None).unwrap());
}

fn bench_scale(c: &mut Criterion) {
    let mut group = c.benchmark_group("scale");
    group.sample_size(10);
    group.bench_function("secp256k1_shape", |bencher| {
        bencher.iter(|| {
            let mut cs = ShapeConstraintSystem::new();
            scale_circuit(&mut cs);
            black_box(cs.counts())
        })
    });
    group.bench_function("secp256k1_witness", |bencher| {
        bencher.iter(|| {
            let mut cs = TestConstraintSystem::new();
            scale_circuit(&mut cs);
            black_box(cs.counts())
        })
    });

    let ed = ed25519();
    group.bench_function("ed25519_shape", |bencher| {
        bencher.iter(|| {
            let mut cs = ShapeConstraintSystem::new();
            let k = Field3::witness(&mut cs, |_| ed.order() - 1u32);
            range_check::range_check_field3(&mut cs, &k).unwrap();
            let p = Point::witness(&mut cs, |_| ed.generator().clone());
            black_box(scale(&mut cs, &ed, &k, &p, None, None).unwrap());
            black_box(cs.counts())
        })
    });
    group.finish();
}

fn bench_ecdsa(c: &mut Criterion) {
    let curve = secp256k1();
    let mut rng = StdRng::seed_from_u64(42);
    let key = SigningKey::random(&curve, &mut rng);
    let pk = key.verifying_key(&curve).point().clone();
    let msg_hash = curve.scalar_field().random(&mut rng);
    let sig = ecdsa::sign(&curve, &msg_hash, &key, &mut rng).unwrap();
    let config = EcdsaConfig::default();

    let mut group = c.benchmark_group("ecdsa_verify");
    group.sample_size(10);
    group.bench_function("secp256k1_shape", |bencher| {
        bencher.iter(|| {
            let mut cs = ShapeConstraintSystem::new();
            let s = EcdsaSignature::witness(&mut cs, |_| sig.clone());
            let h = Field3::witness(&mut cs, |_| msg_hash.clone());
            let p = Point::witness(&mut cs, |_| pk.clone());
            black_box(ecdsa::verify(&mut cs, &curve, &s, &h, &p, &config).unwrap());
            black_box(cs.counts())
        })
    });
    group.finish();
}

criterion_group!(benches, bench_foreign_mul, bench_scale, bench_ecdsa);
criterion_main!(benches);
