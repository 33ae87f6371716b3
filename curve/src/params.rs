//! Named curve parameter sets.

use num_bigint::BigUint;
use num_traits::One;

use crate::field::{dec_constant, hex_constant};
use crate::{Affine, TwistedEdwardsCurve, WeierstrassCurve};

/// secp256k1 (SEC 2), with its GLV endomorphism attached.
pub fn secp256k1() -> WeierstrassCurve {
    let curve = WeierstrassCurve::new(
        "secp256k1",
        hex_constant("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F"),
        hex_constant("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"),
        BigUint::from(0u32),
        BigUint::from(7u32),
        Affine::new(
            hex_constant("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798"),
            hex_constant("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8"),
        ),
        None,
    );
    // p = n = 1 (mod 3) and a = 0, so the endomorphism always exists
    curve.clone().with_endomorphism().unwrap_or(curve)
}

/// NIST P-256. No efficient endomorphism.
pub fn secp256r1() -> WeierstrassCurve {
    let p = hex_constant("FFFFFFFF00000001000000000000000000000000FFFFFFFFFFFFFFFFFFFFFFFF");
    let a = &p - 3u32;
    WeierstrassCurve::new(
        "secp256r1",
        p,
        hex_constant("FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551"),
        a,
        hex_constant("5AC635D8AA3A93E7B3EBBD55769886BC651D06B0CC53B0F63BCE3C3E27D2604B"),
        Affine::new(
            hex_constant("6B17D1F2E12C4247F8BCE6E563A440F277037D812DEB33A0F4A13945D898C296"),
            hex_constant("4FE342E2FE1A7F9B8EE7EB4A7C0F9E162BCE33576B315ECECBB6406837BF51F5"),
        ),
        None,
    )
}

/// BN254 G1, with its GLV endomorphism attached.
pub fn bn254() -> WeierstrassCurve {
    let curve = WeierstrassCurve::new(
        "bn254",
        dec_constant(
            "21888242871839275222246405745257275088696311157297823662689037894645226208583",
        ),
        dec_constant(
            "21888242871839275222246405745257275088548364400416034343698204186575808495617",
        ),
        BigUint::from(0u32),
        BigUint::from(3u32),
        Affine::from_u64(1, 2),
        None,
    );
    curve.clone().with_endomorphism().unwrap_or(curve)
}

/// Edwards25519 in twisted form, `-x^2 + y^2 = 1 + d x^2 y^2`.
pub fn ed25519() -> TwistedEdwardsCurve {
    let p = (BigUint::one() << 255u32) - 19u32;
    let minus_one = &p - 1u32;
    let order = (BigUint::one() << 252u32)
        + dec_constant("27742317777372353535851937790883648493");
    TwistedEdwardsCurve::new(
        "ed25519",
        p,
        order,
        minus_one,
        dec_constant(
            "37095705934669439343138083508754565189542113879843219016388785533085940283555",
        ),
        Affine::new(
            dec_constant(
                "15112221349535400772501151409588531511454012693041857206046113283949847762202",
            ),
            dec_constant(
                "46316835694926478169428394003475163141307993866256225615783033603165251855960",
            ),
        ),
        Some(BigUint::from(8u32)),
    )
}
