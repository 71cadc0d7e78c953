use num_complex::Complex64;
use proptest::prelude::*;
use zbessel::*;

fn polar() -> impl Strategy<Value = Complex64> {
    (0.5f64..30.0, -3.1f64..3.1).prop_map(|(r, t)| Complex64::from_polar(r, t))
}

/// Residual of an identity measured against the size of the terms that form it.
fn small(residual: Complex64, terms: &[Complex64], rel: f64) -> bool {
    let scale: f64 = terms.iter().map(|t| t.norm()).sum();
    residual.norm() <= rel * scale
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn j_y_wronskian(re in 0.5f64..30.0, im in -5.0f64..5.0, nu in 0.0f64..10.0) {
        let z = Complex64::new(re, im);
        let j = besselj_seq(nu, z, 2, Scaling::Unscaled).unwrap().values;
        let y = bessely_seq(nu, z, 2, Scaling::Unscaled).unwrap().values;
        let a = j[0] * y[1];
        let b = j[1] * y[0];
        let w = 2.0 / (core::f64::consts::PI * z);
        prop_assert!(small(a - b + w, &[a, b, w], 1e-11), "z = {z}, nu = {nu}");
    }

    #[test]
    fn i_k_wronskian(z in polar(), nu in 0.0f64..10.0) {
        let i = besseli_seq(nu, z, 2, Scaling::Unscaled).unwrap().values;
        let k = besselk_seq(nu, z, 2, Scaling::Unscaled).unwrap().values;
        let a = i[0] * k[1];
        let b = i[1] * k[0];
        let w = 1.0 / z;
        prop_assert!(small(a + b - w, &[a, b, w], 1e-11), "z = {z}, nu = {nu}");
    }

    #[test]
    fn k_recurrence(z in polar(), nu in 0.0f64..10.0) {
        let k = besselk_seq(nu, z, 3, Scaling::Exponential).unwrap().values;
        let mid = k[1] * (2.0 * (nu + 1.0) / z);
        prop_assert!(small(k[2] - mid - k[0], &[k[2], mid, k[0]], 1e-11));
    }

    #[test]
    fn j_reflects_under_conjugation(z in polar(), nu in 0.0f64..10.0) {
        let a = besselj(nu, z.conj()).unwrap();
        let b = besselj(nu, z).unwrap().conj();
        prop_assert!(small(a - b, &[a, b], 1e-12));
    }

    #[test]
    fn hankel_scaling_factor(z in polar(), nu in 0.0f64..10.0) {
        let u = hankel1(nu, z).unwrap();
        let s = hankel1_scaled(nu, z).unwrap();
        let e = u * (Complex64::new(0.0, -1.0) * z).exp();
        prop_assert!(small(s - e, &[s, e], 1e-12));
    }

    #[test]
    fn airy_wronskian(r in 0.0f64..10.0, t in -3.1f64..3.1) {
        let z = Complex64::from_polar(r, t);
        let a = airy(z).unwrap() * biryprime(z).unwrap();
        let b = airyprime(z).unwrap() * biry(z).unwrap();
        let w = Complex64::new(core::f64::consts::FRAC_1_PI, 0.0);
        prop_assert!(small(a - b - w, &[a, b, w], 1e-11), "z = {z}");
    }

    #[test]
    fn runs_agree_with_single_values(z in polar(), nu in 0.0f64..5.0, n in 2usize..6) {
        let run = besseli_seq(nu, z, n, Scaling::Unscaled).unwrap();
        prop_assert_eq!(run.values.len(), n);
        let last = besseli(nu + (n - 1) as f64, z).unwrap();
        let v = run.values[n - 1];
        prop_assert!(small(v - last, &[v, last], 1e-11));
    }
}
