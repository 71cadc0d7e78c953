//! Recurrences, Wronskians, connection formulas and scaling factors.

use num_complex::Complex64;
use zbessel::*;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn close(a: Complex64, b: Complex64, rel: f64) {
    assert!((a - b).norm() <= rel * b.norm(), "{a} vs {b}");
}

/// `|f_{k+1} - a (2(nu+k)/z) f_k + b f_{k-1}|` against the size of its terms.
fn check_recurrence(v: &[Complex64], nu: f64, z: Complex64, a: f64, b: f64, rel: f64) {
    for k in 1..v.len() - 1 {
        let mid = v[k] * (2.0 * (nu + k as f64) / z);
        let r = v[k + 1] - mid * a + v[k - 1] * b;
        let scale = v[k + 1].norm() + mid.norm() + v[k - 1].norm();
        assert!(r.norm() <= rel * scale, "k = {k}: residual {r} against {scale}");
    }
}

#[test]
fn runs_satisfy_three_term_recurrence() {
    for (z, nu) in [(c(3.0, 2.0), 0.2), (c(-5.0, 1.0), 1.7), (c(25.0, -8.0), 0.0), (c(0.8, -0.3), 2.5)] {
        let n = 8;
        let j = besselj_seq(nu, z, n, Scaling::Unscaled).unwrap().values;
        check_recurrence(&j, nu, z, 1.0, 1.0, 1e-12);
        let y = bessely_seq(nu, z, n, Scaling::Unscaled).unwrap().values;
        check_recurrence(&y, nu, z, 1.0, 1.0, 1e-12);
        let h = hankel1_seq(nu, z, n, Scaling::Exponential).unwrap().values;
        check_recurrence(&h, nu, z, 1.0, 1.0, 1e-12);
        // I_{v+1} = I_{v-1} - (2v/z) I_v and K_{v+1} = K_{v-1} + (2v/z) K_v
        let i = besseli_seq(nu, z, n, Scaling::Unscaled).unwrap().values;
        check_recurrence(&i, nu, z, -1.0, -1.0, 1e-12);
        let k = besselk_seq(nu, z, n, Scaling::Unscaled).unwrap().values;
        check_recurrence(&k, nu, z, 1.0, -1.0, 1e-12);
    }
}

#[test]
fn bessel_wronskian() {
    let pi = core::f64::consts::PI;
    for (z, nu) in [(c(1.5, 0.5), 0.0), (c(7.0, -2.0), 2.3), (c(-3.0, 4.0), 0.5), (c(12.0, 1.0), 10.0)] {
        let j = besselj_seq(nu, z, 2, Scaling::Unscaled).unwrap().values;
        let y = bessely_seq(nu, z, 2, Scaling::Unscaled).unwrap().values;
        let w = j[0] * y[1] - j[1] * y[0];
        let scale = (j[0] * y[1]).norm() + (j[1] * y[0]).norm();
        assert!((w + 2.0 / (pi * z)).norm() <= 1e-13 * scale.max(1.0 / z.norm()), "{w}");
    }
}

#[test]
fn modified_wronskian() {
    for (z, nu) in [(c(1.5, 0.5), 0.0), (c(7.0, -2.0), 2.3), (c(0.5, 4.0), 0.5), (c(40.0, 10.0), 3.0)] {
        let i = besseli_seq(nu, z, 2, Scaling::Unscaled).unwrap().values;
        let k = besselk_seq(nu, z, 2, Scaling::Unscaled).unwrap().values;
        close(i[0] * k[1] + i[1] * k[0], 1.0 / z, 1e-13);
    }
}

#[test]
fn hankel_is_j_plus_i_y() {
    for (z, nu) in [(c(2.0, 1.0), 0.0), (c(-6.0, -2.0), 1.25), (c(0.2, 0.1), 3.0)] {
        let j = besselj(nu, z).unwrap();
        let y = bessely(nu, z).unwrap();
        close(hankel1(nu, z).unwrap(), j + c(0.0, 1.0) * y, 1e-13);
        close(hankel2(nu, z).unwrap(), j - c(0.0, 1.0) * y, 1e-13);
    }
}

#[test]
fn two_paths_to_j() {
    // J is the mean of the two Hankel functions
    for (z, nu) in [(c(4.0, 3.0), 0.6), (c(-2.0, 0.5), 1.0), (c(30.0, -4.0), 2.0)] {
        let j = besselj(nu, z).unwrap();
        let h = (hankel1(nu, z).unwrap() + hankel2(nu, z).unwrap()) * 0.5;
        close(j, h, 1e-12);
    }
}

#[test]
fn k_continuation_matches_reflection() {
    // K_v(z e^{iπ}) = e^{-iπv} K_v(z) - iπ I_v(z) for Im z > 0 reached from the right
    let pi = core::f64::consts::PI;
    let z = c(2.0, -1.0);
    let nu = 0.4;
    let left = besselk(nu, -z).unwrap();
    let k = besselk(nu, z).unwrap();
    let i = besseli(nu, z).unwrap();
    let e = Complex64::from_polar(1.0, -pi * nu) * k - c(0.0, pi) * i;
    close(left, e, 1e-13);
}

#[test]
fn negative_orders_by_reflection() {
    let pi = core::f64::consts::PI;
    let z = c(1.7, 0.9);
    let root = (2.0 / (pi * z)).sqrt();
    close(besselj(-0.5, z).unwrap(), root * z.cos(), 1e-13);
    close(bessely(-0.5, z).unwrap(), root * z.sin(), 1e-13);
    close(besseli(-0.5, z).unwrap(), root * z.cosh(), 1e-13);
    close(besselk(-2.3, z).unwrap(), besselk(2.3, z).unwrap(), 0.0);
    close(besselj(-3.0, z).unwrap(), -besselj(3.0, z).unwrap(), 1e-15);
    close(bessely(-2.0, z).unwrap(), bessely(2.0, z).unwrap(), 1e-15);
    close(besseli(-3.0, z).unwrap(), besseli(3.0, z).unwrap(), 1e-15);
    let h = hankel1(0.7, z).unwrap();
    close(hankel1(-0.7, z).unwrap(), Complex64::from_polar(1.0, 0.7 * pi) * h, 1e-14);
    let h = hankel2(0.7, z).unwrap();
    close(hankel2(-0.7, z).unwrap(), Complex64::from_polar(1.0, -0.7 * pi) * h, 1e-14);
}

#[test]
fn negative_order_i_scaled() {
    for z in [c(2.0, 1.0), c(-3.0, 0.5)] {
        let u = besseli(-1.3, z).unwrap();
        let s = besseli_scaled(-1.3, z).unwrap();
        close(s, u * (-z.re.abs()).exp(), 1e-13);
    }
}

#[test]
fn scaling_factors() {
    let z = c(3.0, -2.5);
    let nu = 0.75;
    let ei = |w: Complex64| w.exp();
    close(besselj_scaled(nu, z).unwrap(), besselj(nu, z).unwrap() * (-z.im.abs()).exp(), 1e-14);
    close(bessely_scaled(nu, z).unwrap(), bessely(nu, z).unwrap() * (-z.im.abs()).exp(), 1e-13);
    close(besseli_scaled(nu, z).unwrap(), besseli(nu, z).unwrap() * (-z.re.abs()).exp(), 1e-14);
    close(besselk_scaled(nu, z).unwrap(), besselk(nu, z).unwrap() * ei(z), 1e-14);
    close(hankel1_scaled(nu, z).unwrap(), hankel1(nu, z).unwrap() * ei(c(0.0, -1.0) * z), 1e-14);
    close(hankel2_scaled(nu, z).unwrap(), hankel2(nu, z).unwrap() * ei(c(0.0, 1.0) * z), 1e-14);

    let zta = z * z.sqrt() * (2.0 / 3.0);
    close(airy_scaled(z).unwrap(), airy(z).unwrap() * ei(zta), 1e-13);
    close(airyprime_scaled(z).unwrap(), airyprime(z).unwrap() * ei(zta), 1e-13);
    close(biry_scaled(z).unwrap(), biry(z).unwrap() * (-zta.re.abs()).exp(), 1e-13);
    close(biryprime_scaled(z).unwrap(), biryprime(z).unwrap() * (-zta.re.abs()).exp(), 1e-13);
}

#[test]
fn airy_wronskian_and_bessel_link() {
    let pi = core::f64::consts::PI;
    for z in [c(0.4, 0.2), c(3.0, 1.0), c(-2.5, -0.5), c(-6.0, 2.0)] {
        let p = airy(z).unwrap() * biryprime(z).unwrap();
        let q = airyprime(z).unwrap() * biry(z).unwrap();
        let r = p - q - c(1.0 / pi, 0.0);
        assert!(r.norm() <= 1e-13 * (p.norm() + q.norm()), "z = {z}: residual {r}");
    }
    // Ai(z) = sqrt(z/3)/π K_{1/3}(ζ) for |arg z| < 2π/3
    let z = c(2.0, 1.0);
    let zta = z * z.sqrt() * (2.0 / 3.0);
    let e = (z / 3.0).sqrt() / pi * besselk(1.0 / 3.0, zta).unwrap();
    close(airy(z).unwrap(), e, 1e-13);
}

#[test]
fn conjugate_symmetry() {
    let z = c(4.0, 6.0);
    for nu in [0.0, 0.3, 5.5] {
        close(besselj(nu, z.conj()).unwrap(), besselj(nu, z).unwrap().conj(), 1e-14);
        close(besselk(nu, z.conj()).unwrap(), besselk(nu, z).unwrap().conj(), 1e-14);
        close(besseli(nu, z.conj()).unwrap(), besseli(nu, z).unwrap().conj(), 1e-14);
        close(hankel2(nu, z.conj()).unwrap(), hankel1(nu, z).unwrap().conj(), 1e-14);
    }
}
