//! Windowed multi-scalar multiplication, generic over the curve family.
//!
//! Each point gets a table `[0, P, 2P, …, (2^w - 1)·P]`. Scalars are cut
//! into `w`-bit windows and the running sum is scanned from the top bit
//! down, adding one table entry per window and doubling once per bit.
//!
//! Weierstrass sums start at an initial aggregator `IA` instead of the point
//! at infinity, which [`Point`] cannot hold. After `b` bits the sum carries
//! an extra `2^(b-1)·IA`, which is compared against and subtracted at the
//! end. Twisted Edwards curves have a complete addition law and start from
//! their neutral point.

use curve::{Affine, CurveArithmetic, Endomorphism};
use ff::Field as _;
use num_bigint::BigUint;
use num_traits::One;
use tracing::debug;

use crate::basic::{array_get_generic, is_zero, select};
use crate::bit_slices::slice_field3;
use crate::config::{MsmMode, TableConfig};
use crate::engine::ConstraintSystem;
use crate::error::{GadgetError, Result};
use crate::field::{Bool, Field, Fp};
use crate::foreign_field;
use crate::glv::{decompose_no_range_check, endomorphism, negate_if, reduce_mrc_stack};
use crate::limbs::Field3;
use crate::point::Point;

/// Largest supported window; a table holds `2^w` points.
pub const MAX_WINDOW_SIZE: usize = 16;

/// Point gadgets and MSM parameters of a curve family.
pub trait CurveGadget: CurveArithmetic {
    fn add_gadget<CS: ConstraintSystem>(&self, cs: &mut CS, p: &Point, q: &Point) -> Result<Point>;
    fn double_gadget<CS: ConstraintSystem>(&self, cs: &mut CS, p: &Point) -> Result<Point>;
    fn negate_gadget<CS: ConstraintSystem>(&self, cs: &mut CS, p: &Point) -> Result<Point>;
    fn assert_on_curve_gadget<CS: ConstraintSystem>(&self, cs: &mut CS, p: &Point) -> Result<()>;

    /// Where the running sum starts; `None` means the neutral point.
    ///
    /// Curves with a start point have incomplete addition, so windows whose
    /// chunk is zero skip the addition instead of adding the zero entry.
    fn msm_start(&self, ia: Option<&Affine>) -> Option<Affine>;

    /// Mode used when the caller passes none.
    fn default_mode(&self) -> Option<MsmMode>;

    fn endomorphism(&self) -> Option<&Endomorphism> {
        None
    }

    /// Off-circuit `k·P` for the constant path.
    fn scale_constant(&self, p: &Affine, k: &BigUint) -> Affine {
        self.scale(p, k)
    }
}

fn check_window_size(window_size: usize) -> Result<()> {
    if window_size == 0 || window_size > MAX_WINDOW_SIZE {
        return Err(GadgetError::InvalidWindowSize(window_size));
    }
    Ok(())
}

/// `[0, P, 2P, …, (2^w - 1)·P]`, or the given `multiples` after a length
/// check. Free for a constant `P`.
pub fn get_point_table<CS: ConstraintSystem, C: CurveGadget>(
    cs: &mut CS,
    curve: &C,
    p: &Point,
    window_size: usize,
    multiples: Option<&[Point]>,
) -> Result<Vec<Point>> {
    check_window_size(window_size)?;
    let len = 1usize << window_size;
    if let Some(table) = multiples {
        if table.len() != len {
            return Err(GadgetError::InvalidTable {
                expected: len,
                actual: table.len(),
            });
        }
        return Ok(table.to_vec());
    }

    let mut table = Vec::with_capacity(len);
    table.push(Point::from_affine(&curve.zero())?);
    table.push(p.clone());
    if len == 2 {
        return Ok(table);
    }
    let mut multiple = curve.double_gadget(cs, p)?;
    table.push(multiple.clone());
    for _ in 3..len {
        multiple = curve.add_gadget(cs, &multiple, p)?;
        table.push(multiple.clone());
    }
    Ok(table)
}

/// Whether the almost reduced `p` equals the constant `c`.
pub fn point_equals<CS: ConstraintSystem>(cs: &mut CS, f: &BigUint, p: &Point, c: &Affine) -> Result<Bool> {
    let x = foreign_field::equals(cs, &p.x, &c.x, f)?;
    let y = foreign_field::equals(cs, &p.y, &c.y, f)?;
    Ok(x.and(cs, &y))
}

/// `Σ sᵢ·Pᵢ`.
///
/// Scalars must have range-checked limbs and are proven to fit in the bit
/// length of the group order. Points must be almost reduced and on the
/// curve. `table_configs` may be shorter than `points`; missing entries use
/// window size 1. `mode` falls back to the curve's default; without a mode
/// the result is returned unchecked.
pub fn multi_scalar_mul<CS: ConstraintSystem, C: CurveGadget>(
    cs: &mut CS,
    curve: &C,
    scalars: &[Field3],
    points: &[Point],
    table_configs: &[TableConfig],
    mode: Option<MsmMode>,
    ia: Option<&Affine>,
) -> Result<Point> {
    let n = points.len();
    if scalars.len() != n {
        return Err(GadgetError::LengthMismatch {
            expected: n,
            actual: scalars.len(),
        });
    }
    if n == 0 {
        return Err(GadgetError::EmptyInput);
    }
    if table_configs.len() > n {
        return Err(GadgetError::LengthMismatch {
            expected: n,
            actual: table_configs.len(),
        });
    }
    let mode = mode.or(curve.default_mode());

    if let Some(pairs) = constant_pairs(scalars, points) {
        return msm_constant(curve, &pairs, mode);
    }

    let default_config = TableConfig::default();
    let configs: Vec<&TableConfig> = (0..n)
        .map(|i| table_configs.get(i).unwrap_or(&default_config))
        .collect();
    let mut windows: Vec<usize> = configs.iter().map(|c| c.window_size).collect();
    let mut tables = points
        .iter()
        .zip(&configs)
        .map(|(p, c)| get_point_table(cs, curve, p, c.window_size, c.multiples.as_deref()))
        .collect::<Result<Vec<_>>>()?;
    let mut scalars = scalars.to_vec();
    let mut max_bits = curve.scalar_field().size_in_bits();

    debug!(
        points = n,
        windows = ?windows,
        glv = curve.endomorphism().is_some(),
        "multi-scalar multiplication"
    );

    if let Some(endo) = curve.endomorphism() {
        max_bits = endo.decompose_max_bits();
        let f = curve.modulus();
        let mut mrc_stack = Vec::new();
        let mut split_scalars = Vec::with_capacity(2 * n);
        let mut split_tables = Vec::with_capacity(2 * n);

        for (s, table) in scalars.iter().zip(&tables) {
            let [s0, s1] = decompose_no_range_check(cs, endo, curve.order(), s)?;
            let mut endo_table = vec![table[0].clone()];
            for p in &table[1..] {
                let (phi, bound) = endomorphism(cs, endo, f, p)?;
                mrc_stack.push(bound);
                endo_table.push(phi);
            }
            split_tables.push(negate_table(cs, &s0.is_negative, table, f, &mut mrc_stack)?);
            split_tables.push(negate_table(cs, &s1.is_negative, &endo_table, f, &mut mrc_stack)?);
            split_scalars.push(s0.abs);
            split_scalars.push(s1.abs);
        }
        reduce_mrc_stack(cs, &mrc_stack)?;

        windows = windows.iter().flat_map(|&w| [w, w]).collect();
        scalars = split_scalars;
        tables = split_tables;
    }
    debug!(max_bits, "scanning scalars");

    let chunks = scalars
        .iter()
        .zip(&windows)
        .map(|(s, &w)| slice_field3(cs, s, max_bits, w))
        .collect::<Result<Vec<_>>>()?;

    let start = curve.msm_start(ia);
    let guarded = start.is_some();
    let mut sum = Point::from_affine(&start.clone().unwrap_or_else(|| curve.zero()))?;

    for i in (0..max_bits).rev() {
        for ((table, scalar_chunks), &w) in tables.iter().zip(&chunks).zip(&windows) {
            if i % w != 0 {
                continue;
            }
            let chunk = &scalar_chunks[i / w];
            if chunk.to_constant() == Some(Fp::ZERO) {
                continue;
            }
            sum = add_window(cs, curve, &sum, table, chunk, guarded)?;
        }
        if i > 0 {
            sum = curve.double_gadget(cs, &sum)?;
        }
    }

    let f = curve.modulus();
    match start {
        Some(start) => {
            let offset = curve.scale_constant(&start, &(BigUint::one() << (max_bits - 1)));
            let is_offset = point_equals(cs, f, &sum, &offset)?;
            if mode == Some(MsmMode::AssertZero) {
                is_offset.assert_true(cs)?;
                return Point::from_affine(&curve.zero());
            }
            is_offset.assert_false(cs)?;
            let minus_offset = Point::from_affine(&curve.negate(&offset))?;
            curve.add_gadget(cs, &sum, &minus_offset)
        }
        None => {
            match mode {
                Some(MsmMode::AssertZero) => point_equals(cs, f, &sum, &curve.zero())?.assert_true(cs)?,
                Some(MsmMode::AssertNonZero) => point_equals(cs, f, &sum, &curve.zero())?.assert_false(cs)?,
                None => {}
            }
            Ok(sum)
        }
    }
}

/// Adds `table[chunk]` into `sum`. With `guarded` set, a zero chunk keeps
/// `sum` unchanged and a one-bit window adds `P` directly.
fn add_window<CS: ConstraintSystem, C: CurveGadget>(
    cs: &mut CS,
    curve: &C,
    sum: &Point,
    table: &[Point],
    chunk: &Field,
    guarded: bool,
) -> Result<Point> {
    if !guarded {
        let entry = array_get_generic(cs, table, chunk)?;
        return curve.add_gadget(cs, sum, &entry);
    }
    let entry = if table.len() == 2 {
        table[1].clone()
    } else {
        array_get_generic(cs, table, chunk)?
    };
    let added = curve.add_gadget(cs, sum, &entry)?;
    let chunk_is_zero = is_zero(cs, chunk);
    select(cs, &chunk_is_zero, sum, &added)
}

/// `cond ? -T : T` entry by entry, leaving the zero entry alone.
fn negate_table<CS: ConstraintSystem>(
    cs: &mut CS,
    cond: &Bool,
    table: &[Point],
    f: &BigUint,
    mrc_stack: &mut Vec<Field>,
) -> Result<Vec<Point>> {
    let mut negated = vec![table[0].clone()];
    for p in &table[1..] {
        let (q, bound) = negate_if(cs, cond, p, f)?;
        mrc_stack.push(bound);
        negated.push(q);
    }
    Ok(negated)
}

fn constant_pairs(scalars: &[Field3], points: &[Point]) -> Option<Vec<(BigUint, Affine)>> {
    scalars
        .iter()
        .zip(points)
        .map(|(s, p)| Some((s.to_bigint()?, p.to_affine()?)))
        .collect()
}

fn msm_constant<C: CurveGadget>(curve: &C, pairs: &[(BigUint, Affine)], mode: Option<MsmMode>) -> Result<Point> {
    let sum = pairs.iter().fold(curve.zero(), |acc, (s, p)| {
        curve.add(&acc, &curve.scale_constant(p, s))
    });
    match mode {
        Some(MsmMode::AssertZero) => {
            if !curve.is_zero(&sum) {
                return Err(GadgetError::ConstantAssertion(
                    "scalar multiplication: expected zero result".to_string(),
                ));
            }
            Point::from_affine(&curve.zero())
        }
        Some(MsmMode::AssertNonZero) if curve.is_zero(&sum) => Err(GadgetError::ConstantAssertion(
            "scalar multiplication: expected non-zero result".to_string(),
        )),
        _ => Point::from_affine(&sum),
    }
}

/// `k·P`. The window defaults to 4 for a constant point and 3 otherwise.
pub fn scale<CS: ConstraintSystem, C: CurveGadget>(
    cs: &mut CS,
    curve: &C,
    k: &Field3,
    p: &Point,
    config: Option<TableConfig>,
    mode: Option<MsmMode>,
) -> Result<Point> {
    let config = config.unwrap_or_else(|| TableConfig::new(if p.is_constant() { 4 } else { 3 }));
    multi_scalar_mul(
        cs,
        curve,
        std::slice::from_ref(k),
        std::slice::from_ref(p),
        std::slice::from_ref(&config),
        mode,
        None,
    )
}

/// Proves `order·P = 0`. Nothing to do on curves without a cofactor.
pub fn assert_in_subgroup<CS: ConstraintSystem, C: CurveGadget>(cs: &mut CS, curve: &C, p: &Point) -> Result<()> {
    if curve.cofactor().is_none() {
        return Ok(());
    }
    let order = Field3::from_bigint(curve.order())?;
    scale(cs, curve, &order, p, None, Some(MsmMode::AssertZero))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range_check::range_check_field3;
    use crate::{ShapeConstraintSystem, TestConstraintSystem};
    use curve::{random_point, secp256k1, secp256r1, WeierstrassCurve};
    use ff::Field as _;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scalar<CS: ConstraintSystem>(cs: &mut CS, k: &BigUint) -> Field3 {
        let s = Field3::witness(cs, |_| k.clone());
        range_check_field3(cs, &s).unwrap();
        s
    }

    fn hex(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
    }

    #[test]
    fn test_scale_two_g() {
        crate::init_tracing();
        let curve = secp256k1();
        let mut cs = TestConstraintSystem::new();
        let k = scalar(&mut cs, &BigUint::from(2u32));
        let g = Point::from_affine(curve.generator()).unwrap();
        let two_g = scale(&mut cs, &curve, &k, &g, None, None).unwrap();
        assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
        assert_eq!(
            two_g.value(&cs),
            Affine::new(
                hex("c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5"),
                hex("1ae168fea63dc339a3c58419466ceaeef7f632653266d0e1236431a950cfe52a"),
            )
        );
    }

    fn check_boundary_scalars(curve: &WeierstrassCurve, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let p = random_point(curve, &mut rng);
        let n = curve.order().clone();
        let ks = [
            BigUint::one(),
            &n - 1u32,
            curve.scalar_field().random(&mut rng),
        ];
        for k in ks {
            let mut cs = TestConstraintSystem::new();
            let kv = scalar(&mut cs, &k);
            let pv = Point::witness(&mut cs, |_| p.clone());
            let result = scale(&mut cs, curve, &kv, &pv, None, None).unwrap();
            assert!(cs.is_satisfied(), "{} k={k:#x}: {:?}", curve.name, cs.which_is_unsatisfied());
            assert_eq!(result.value(&cs), curve.scale(&p, &k));
        }

        let mut cs = TestConstraintSystem::new();
        let zero = scalar(&mut cs, &BigUint::from(0u32));
        let pv = Point::witness(&mut cs, |_| p.clone());
        let result = scale(&mut cs, curve, &zero, &pv, None, Some(MsmMode::AssertZero)).unwrap();
        assert!(cs.is_satisfied(), "{} k=0: {:?}", curve.name, cs.which_is_unsatisfied());
        assert_eq!(result.to_affine(), Some(Affine::infinity()));
    }

    #[test]
    fn test_scale_boundary_scalars_glv() {
        check_boundary_scalars(&secp256k1(), 1);
    }

    #[test]
    fn test_scale_boundary_scalars_plain() {
        check_boundary_scalars(&secp256r1(), 2);
    }

    #[test]
    fn test_zero_scalar_cannot_claim_non_zero() {
        let curve = secp256k1();
        let mut cs = TestConstraintSystem::new();
        let zero = scalar(&mut cs, &BigUint::from(0u32));
        let g = Point::witness(&mut cs, |_| curve.generator().clone());
        scale(&mut cs, &curve, &zero, &g, None, None).unwrap();
        assert!(!cs.is_satisfied());
    }

    #[test]
    fn test_msm_matches_off_circuit() {
        let curve = secp256k1();
        let mut rng = StdRng::seed_from_u64(5);
        let points: Vec<Affine> = (0..3).map(|_| random_point(&curve, &mut rng)).collect();
        let ks: Vec<BigUint> = (0..3).map(|_| curve.scalar_field().random(&mut rng)).collect();
        let expected = curve.multi_scalar_mul(&points, &ks);

        let mut cs = TestConstraintSystem::new();
        let scalars: Vec<Field3> = ks.iter().map(|k| scalar(&mut cs, k)).collect();
        let mut pv: Vec<Point> = points.iter().map(|p| Point::witness(&mut cs, |_| p.clone())).collect();
        pv[0] = Point::from_affine(&points[0]).unwrap();
        let configs = [TableConfig::new(4), TableConfig::new(2)];
        let result = multi_scalar_mul(&mut cs, &curve, &scalars, &pv, &configs, None, None).unwrap();
        assert!(cs.is_satisfied(), "{:?}", cs.which_is_unsatisfied());
        assert_eq!(result.value(&cs), expected);

        let constants: Vec<Field3> = ks.iter().map(|k| Field3::from_bigint(k).unwrap()).collect();
        let cpoints: Vec<Point> = points.iter().map(|p| Point::from_affine(p).unwrap()).collect();
        let before = cs.counts();
        let constant = multi_scalar_mul(&mut cs, &curve, &constants, &cpoints, &[], None, None).unwrap();
        assert_eq!(constant.to_affine(), Some(expected));
        assert_eq!(cs.counts(), before);
    }

    #[test]
    fn test_precomputed_multiples() {
        let curve = secp256r1();
        let g = curve.generator().clone();
        let multiples: Vec<Point> = (0..4u32)
            .map(|i| Point::from_affine(&curve.scale(&g, &BigUint::from(i))).unwrap())
            .collect();
        let config = TableConfig::new(2).with_multiples(multiples.clone());

        let mut cs = TestConstraintSystem::new();
        let k = BigUint::from(0xabcdefu32);
        let kv = scalar(&mut cs, &k);
        let gv = Point::from_affine(&g).unwrap();
        let result = scale(&mut cs, &curve, &kv, &gv, Some(config), None).unwrap();
        assert!(cs.is_satisfied());
        assert_eq!(result.value(&cs), curve.scale(&g, &k));

        let short = TableConfig::new(3).with_multiples(multiples);
        assert_eq!(
            scale(&mut cs, &curve, &kv, &gv, Some(short), None),
            Err(GadgetError::InvalidTable { expected: 8, actual: 4 })
        );
    }

    #[test]
    fn test_structural_errors() {
        let curve = secp256k1();
        let mut cs = TestConstraintSystem::new();
        let k = scalar(&mut cs, &BigUint::from(3u32));
        let g = Point::from_affine(curve.generator()).unwrap();

        assert_eq!(
            multi_scalar_mul(&mut cs, &curve, &[], &[], &[], None, None),
            Err(GadgetError::EmptyInput)
        );
        assert_eq!(
            multi_scalar_mul(&mut cs, &curve, &[k.clone(), k.clone()], &[g.clone()], &[], None, None),
            Err(GadgetError::LengthMismatch { expected: 1, actual: 2 })
        );
        for w in [0, MAX_WINDOW_SIZE + 1] {
            assert_eq!(
                scale(&mut cs, &curve, &k, &g, Some(TableConfig::new(w)), None),
                Err(GadgetError::InvalidWindowSize(w))
            );
        }
    }

    #[test]
    fn test_constant_mode_checks() {
        let curve = secp256k1();
        let mut cs = TestConstraintSystem::new();
        let g = Point::from_affine(curve.generator()).unwrap();
        let n = Field3::from_bigint(curve.order()).unwrap();
        let one = Field3::one();

        let zero = scale(&mut cs, &curve, &n, &g, None, Some(MsmMode::AssertZero)).unwrap();
        assert_eq!(zero.to_affine(), Some(Affine::infinity()));
        match scale(&mut cs, &curve, &n, &g, None, None) {
            Err(GadgetError::ConstantAssertion(msg)) => assert!(msg.contains("expected non-zero result")),
            other => panic!("unexpected result {other:?}"),
        }
        match scale(&mut cs, &curve, &one, &g, None, Some(MsmMode::AssertZero)) {
            Err(GadgetError::ConstantAssertion(msg)) => assert!(msg.contains("expected zero result")),
            other => panic!("unexpected result {other:?}"),
        }
        assert!(assert_in_subgroup(&mut cs, &curve, &g).is_ok());
        assert_eq!(cs.counts().constraints, 0);
    }

    #[test]
    fn test_point_equals() {
        let curve = secp256k1();
        let g = curve.generator().clone();
        let mut cs = TestConstraintSystem::new();
        let gv = Point::witness(&mut cs, |_| g.clone());
        let same = point_equals(&mut cs, curve.modulus(), &gv, &g).unwrap();
        let other = point_equals(&mut cs, curve.modulus(), &gv, &curve.double(&g)).unwrap();
        assert!(cs.is_satisfied());
        assert_eq!(cs.value(same.field()), Fp::ONE);
        assert_eq!(cs.value(other.field()), Fp::ZERO);
    }

    #[test]
    fn test_shape_matches() {
        fn circuit<CS: ConstraintSystem>(cs: &mut CS) {
            let curve = secp256k1();
            let g = curve.generator().clone();
            let h = curve.double(&g);
            let k = scalar(cs, &BigUint::from(0x1234_5678u32));
            let p = Point::witness(cs, |_| h.clone());
            let g = Point::from_affine(&g).unwrap();
            let configs = [TableConfig::new(4), TableConfig::new(3)];
            multi_scalar_mul(cs, &curve, &[k.clone(), k], &[g, p], &configs, None, None).unwrap();
        }
        let mut test = TestConstraintSystem::new();
        let mut shape = ShapeConstraintSystem::new();
        circuit(&mut test);
        circuit(&mut shape);
        assert!(test.is_satisfied());
        assert_eq!(test.counts(), shape.counts());
    }
}
