use super::*;
use curve::{CurveArithmetic, ed25519, secp256k1, secp256r1};
use num_bigint::BigUint;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_ecdsa_sign_verify() {
    let mut rng = StdRng::seed_from_u64(42);
    for curve in [secp256k1(), secp256r1()] {
        let sk = SigningKey::random(&curve, &mut rng);
        let pk = sk.verifying_key(&curve);
        let msg_hash = curve.random_scalar(&mut rng);

        let sig = sk.sign_ecdsa(&curve, &msg_hash, &mut rng).expect("sign");
        assert!(pk.verify_ecdsa(&curve, &msg_hash, &sig), "{}", curve.name);
    }
}

#[test]
fn test_ecdsa_rejects_wrong_message() {
    let curve = secp256k1();
    let mut rng = StdRng::seed_from_u64(42);
    let sk = SigningKey::random(&curve, &mut rng);
    let pk = sk.verifying_key(&curve);
    let msg_hash = BigUint::from(1234u32);
    let sig = ecdsa::sign(&curve, &msg_hash, &sk, &mut rng).expect("sign");

    assert!(!ecdsa::verify(&curve, &sig, &BigUint::from(1235u32), pk.point()));
}

#[test]
fn test_ecdsa_rejects_wrong_key() {
    let curve = secp256k1();
    let mut rng = StdRng::seed_from_u64(42);
    let sk = SigningKey::random(&curve, &mut rng);
    let msg_hash = BigUint::from(77u32);
    let sig = ecdsa::sign(&curve, &msg_hash, &sk, &mut rng).expect("sign");

    let wrong_pk = SigningKey::random(&curve, &mut rng).verifying_key(&curve);
    assert!(!ecdsa::verify(&curve, &sig, &msg_hash, wrong_pk.point()));
}

#[test]
fn test_ecdsa_rejects_out_of_range_scalars() {
    let curve = secp256k1();
    let mut rng = StdRng::seed_from_u64(9);
    let sk = SigningKey::random(&curve, &mut rng);
    let pk = sk.verifying_key(&curve);
    let msg_hash = BigUint::from(5u32);
    let sig = ecdsa::sign(&curve, &msg_hash, &sk, &mut rng).expect("sign");

    let zero_r = ecdsa::Signature::new(BigUint::from(0u32), sig.s.clone());
    let zero_s = ecdsa::Signature::new(sig.r.clone(), BigUint::from(0u32));
    let big_s = ecdsa::Signature::new(sig.r.clone(), &sig.s + curve.order());
    assert!(!ecdsa::verify(&curve, &zero_r, &msg_hash, pk.point()));
    assert!(!ecdsa::verify(&curve, &zero_s, &msg_hash, pk.point()));
    assert!(!ecdsa::verify(&curve, &big_s, &msg_hash, pk.point()));
    assert!(!ecdsa::verify(&curve, &sig, &msg_hash, &curve::Affine::infinity()));
}

#[test]
fn test_signature_hex_roundtrip() {
    let curve = secp256k1();
    let mut rng = StdRng::seed_from_u64(1);
    let sk = SigningKey::random(&curve, &mut rng);
    let sig = ecdsa::sign(&curve, &BigUint::from(3u32), &sk, &mut rng).expect("sign");

    let hex = sig.to_hex();
    assert_eq!(hex.len(), SIGNATURE_HEX_LEN);
    assert_eq!(ecdsa::Signature::from_hex(&hex), Ok(sig.clone()));
    // a trailing recovery byte is ignored
    assert_eq!(ecdsa::Signature::from_hex(&format!("{hex}1b")), Ok(sig));
}

#[test]
fn test_signature_hex_rejects_malformed_input() {
    let body = "ab".repeat(64);
    assert_eq!(
        ecdsa::Signature::from_hex(&body),
        Err(SignatureError::InvalidHex)
    );
    assert_eq!(
        ecdsa::Signature::from_hex(&format!("0x{}", &body[..126])),
        Err(SignatureError::InvalidHex)
    );
    assert_eq!(
        ecdsa::Signature::from_hex(&format!("0x{}zz", &body[..126])),
        Err(SignatureError::InvalidHex)
    );
}

#[test]
fn test_eddsa_sign_verify() {
    let curve = ed25519();
    let mut rng = StdRng::seed_from_u64(42);
    let sk = SigningKey::random(&curve, &mut rng);
    let pk = sk.verifying_key(&curve);
    let msg = b"hello edwards";

    let sig = sk.sign_eddsa(&curve, msg).expect("sign");
    assert!(pk.verify_eddsa(&curve, msg, &sig));
    assert!(!pk.verify_eddsa(&curve, b"hello edwardz", &sig));
}

#[test]
fn test_eddsa_rejects_tampered_signature() {
    let curve = ed25519();
    let mut rng = StdRng::seed_from_u64(8);
    let sk = SigningKey::random(&curve, &mut rng);
    let pk = sk.verifying_key(&curve);
    let msg = b"payload";
    let sig = eddsa::sign(&curve, &sk, msg).expect("sign");

    let mut bumped = sig.clone();
    bumped.s = curve.scalar_field().add(&sig.s, &BigUint::from(1u32));
    assert!(!eddsa::verify(&curve, &bumped, pk.point(), msg));

    // s + ℓ is the same scalar but is not canonical
    let mut non_canonical = sig.clone();
    non_canonical.s = &sig.s + curve.order();
    assert!(!eddsa::verify(&curve, &non_canonical, pk.point(), msg));

    let other = SigningKey::random(&curve, &mut rng).verifying_key(&curve);
    assert!(!eddsa::verify(&curve, &sig, other.point(), msg));
}

#[test]
fn test_keys_serde_roundtrip() {
    let curve = secp256r1();
    let mut rng = StdRng::seed_from_u64(99);
    let sk = SigningKey::random(&curve, &mut rng);
    let pk = sk.verifying_key(&curve);

    let sk_json = serde_json::to_string(&sk).expect("serialize");
    let pk_json = serde_json::to_string(&pk).expect("serialize");
    assert_eq!(serde_json::from_str::<SigningKey>(&sk_json).expect("deserialize"), sk);
    assert_eq!(serde_json::from_str::<VerifyingKey>(&pk_json).expect("deserialize"), pk);
}

#[test]
fn test_generate_matches_derived_key() {
    let mut rng = StdRng::seed_from_u64(5);
    for curve in [secp256k1(), secp256r1()] {
        let (sk, pk) = SigningKey::generate(&curve, &mut rng);
        assert_eq!(sk.verifying_key(&curve), pk);
        assert!(curve.is_on_curve(pk.point()));
    }
}
