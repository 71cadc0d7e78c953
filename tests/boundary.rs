//! Range limits, underflow accounting and the integer status convention.

use num_complex::Complex64;
use zbessel::contract::{self, Status};
use zbessel::*;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

#[test]
fn invalid_arguments() {
    let z = c(1.0, 1.0);
    assert_eq!(besselj_seq(-1.0, z, 1, Scaling::Unscaled).unwrap_err(), Error::InvalidInput);
    assert_eq!(besseli_seq(0.0, z, 0, Scaling::Unscaled).unwrap_err(), Error::InvalidInput);
    assert_eq!(besselk_seq(f64::NAN, z, 1, Scaling::Unscaled).unwrap_err(), Error::InvalidInput);
    let zero = c(0.0, 0.0);
    assert_eq!(besselk(0.0, zero).unwrap_err(), Error::InvalidInput);
    assert_eq!(bessely(1.0, zero).unwrap_err(), Error::InvalidInput);
    assert_eq!(hankel1(0.5, zero).unwrap_err(), Error::InvalidInput);
    let mut empty: [Complex64; 0] = [];
    assert_eq!(besselj_into(0.0, z, Scaling::Unscaled, &mut empty).unwrap_err(), Error::InvalidInput);
}

#[test]
fn values_at_zero() {
    let zero = c(0.0, 0.0);
    assert_eq!(besselj(0.0, zero).unwrap(), c(1.0, 0.0));
    assert_eq!(besselj(2.5, zero).unwrap(), zero);
    assert_eq!(besseli(0.0, zero).unwrap(), c(1.0, 0.0));
    assert_eq!(besseli(1.0, zero).unwrap(), zero);
}

#[test]
fn tiny_arguments() {
    let st = contract::zbesj(c(1e-300, 0.0), 0.0, 1, 1, &mut [c(0.0, 0.0)]);
    assert_eq!(st, Status { nz: 0, ierr: 0 });
    // K_0 still representable just above the cutoff, K_5 is not
    assert!(besselk(0.0, c(1e-300, 0.0)).unwrap().re.is_finite());
    assert_eq!(besselk(5.0, c(1e-300, 0.0)).unwrap_err(), Error::Overflow);
    assert_eq!(besselk(0.0, c(1e-310, 0.0)).unwrap_err(), Error::Overflow);
    assert_eq!(bessely(3.0, c(1e-300, 0.0)).unwrap_err(), Error::Overflow);
}

#[test]
fn k_far_out_on_the_real_axis() {
    let mut cy = [c(0.0, 0.0)];
    let st = contract::zbesk(c(1e3, 0.0), 0.0, 2, 1, &mut cy);
    assert_eq!(st, Status { nz: 0, ierr: 0 });
    assert!((cy[0].re - (core::f64::consts::PI / 2e3).sqrt()).abs() < 2e-4 * cy[0].re);
    let st = contract::zbesk(c(1e3, 0.0), 0.0, 1, 1, &mut cy);
    assert_eq!(st, Status { nz: 1, ierr: 0 });
    assert_eq!(cy[0], c(0.0, 0.0));
}

#[test]
fn overflow_is_an_error() {
    init_tracing();
    assert_eq!(besseli(0.0, c(800.0, 0.0)).unwrap_err(), Error::Overflow);
    assert!(besseli_scaled(0.0, c(800.0, 0.0)).unwrap().re > 0.0);
    assert_eq!(besselj(0.0, c(0.0, 800.0)).unwrap_err(), Error::Overflow);
    assert_eq!(besselk(0.0, c(-800.0, 1.0)).unwrap_err(), Error::Overflow);
    // representable Y just inside the exponent limit on the imaginary axis
    for nu in [2.0, 10.0] {
        let u = bessely(nu, c(0.0, 699.0)).unwrap();
        let s = bessely_scaled(nu, c(0.0, 699.0)).unwrap();
        assert!((u - s * 699f64.exp()).norm() <= 1e-12 * u.norm());
    }
    assert_eq!(biry(c(200.0, 0.0)).unwrap_err(), Error::Overflow);
}

#[test]
fn precision_bounds() {
    init_tracing();
    let r = besseli_seq(0.0, c(4e4, 0.0), 1, Scaling::Exponential).unwrap();
    assert_eq!(r.status, Accuracy::Reduced);
    let r = besselj_seq(0.0, c(100.0, 0.0), 1, Scaling::Unscaled).unwrap();
    assert_eq!(r.status, Accuracy::Normal);
    assert_eq!(besselj(0.0, c(2e9, 0.0)).unwrap_err(), Error::TotalPrecisionLoss);
    assert_eq!(besselk(0.0, c(2e9, 0.0)).unwrap_err(), Error::TotalPrecisionLoss);
    assert_eq!(airy(c(1e7, 0.0)).unwrap_err(), Error::TotalPrecisionLoss);
    let a = airy_raw(c(3e3, 0.0), AiryDerivative::Value, Scaling::Exponential).unwrap();
    assert_eq!(a.status, Accuracy::Reduced);
}

#[test]
fn i_underflow_grows_with_order() {
    let z = c(1.0, 0.0);
    let mut last = 0;
    for fnu in (120..=220).step_by(10) {
        let r = besseli_seq(fnu as f64, z, 5, Scaling::Unscaled).unwrap();
        assert!(r.underflow_count >= last, "fnu = {fnu}");
        // zeros sit at the top of the run
        for v in &r.values[5 - r.underflow_count..] {
            assert_eq!(*v, c(0.0, 0.0));
        }
        last = r.underflow_count;
    }
    assert_eq!(last, 5);
}

#[test]
fn k_underflow_grows_with_run_and_argument() {
    init_tracing();
    let mut last = 0;
    for n in 1..=6 {
        let r = besselk_seq(0.0, c(750.0, 0.0), n, Scaling::Unscaled).unwrap();
        assert!(r.underflow_count >= last);
        assert!(r.values[..r.underflow_count].iter().all(|v| *v == c(0.0, 0.0)));
        last = r.underflow_count;
    }
    let mut last = 0;
    for x in (680..=730).step_by(5) {
        let r = besselk_seq(0.0, c(x as f64, 0.0), 1, Scaling::Unscaled).unwrap();
        assert!(r.underflow_count >= last, "x = {x}");
        last = r.underflow_count;
    }
    assert_eq!(last, 1);
}

#[test]
fn airy_underflow_is_a_count() {
    let r = airy_raw(c(120.0, 0.0), AiryDerivative::Value, Scaling::Unscaled).unwrap();
    assert_eq!(r.underflow_count, 1);
    assert_eq!(r.value, c(0.0, 0.0));
    let (v, st) = contract::zairy(c(120.0, 0.0), 0, 2);
    assert!(st.is_ok());
    assert!(v.re > 0.0);
}

#[test]
fn stack_buffers() {
    let mut y = [c(0.0, 0.0); 20];
    let (nz, status) = bessely_into(0.5, c(3.0, 1.0), Scaling::Unscaled, &mut y).unwrap();
    assert_eq!((nz, status), (0, Accuracy::Normal));
    let mut h = [c(0.0, 0.0); 3];
    hankel_into(HankelKind::Second, 1.0, c(3.0, 1.0), Scaling::Unscaled, &mut h).unwrap();
    let j = besselj(1.0, c(3.0, 1.0)).unwrap();
    let yv = bessely(1.0, c(3.0, 1.0)).unwrap();
    assert!((h[0] - (j - c(0.0, 1.0) * yv)).norm() < 1e-13 * h[0].norm());
}
