#![no_main]
// Group law consistency between the Jacobian and affine code paths.
use libfuzzer_sys::fuzz_target;
use shangmi_sm2::{BigUint, CurveParams, ProjectivePoint};

fuzz_target!(|data: &[u8]| {
    if data.len() < 64 {
        return;
    }

    let k1 = BigUint::from_bytes_be(&data[..32]);
    let k2 = BigUint::from_bytes_be(&data[32..64]);

    for curve in [CurveParams::sm2(), CurveParams::sm2_example()] {
        let p1 = curve.mul_generator(&k1).expect("prime modulus");
        let p2 = curve.mul_generator(&k2).expect("prime modulus");
        assert!(p1.is_identity() || curve.is_on_curve(&p1));

        // affine and Jacobian addition agree
        let sum = curve.add_affine(&p1, &p2).expect("points are on the curve");
        let jacobian = curve.add(&ProjectivePoint::from(&p1), &ProjectivePoint::from(&p2));
        assert_eq!(curve.to_affine(&jacobian), Ok(sum.clone()));

        // scalar multiplication distributes over scalar addition
        assert_eq!(curve.mul_generator(&(&k1 + &k2)), Ok(sum.clone()));

        // negation
        assert!(curve.add_affine(&sum, &curve.neg(&sum)).expect("on curve").is_identity());
    }
});
