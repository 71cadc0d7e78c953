use num_complex::Complex;
use zbessel::contract;
use zbessel::*;

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let z = Complex::new(1.0_f64, 2.0);

    println!("=== Single values ===");
    println!("J_0.5({z}) = {}", besselj(0.5, z).unwrap());
    println!("Y_1({z}) = {}", bessely(1.0, z).unwrap());
    println!("I_0({z}) = {}", besseli(0.0, z).unwrap());
    println!("K_1({z}) = {}", besselk(1.0, z).unwrap());
    println!("H1_0({z}) = {}", hankel1(0.0, z).unwrap());
    println!("H2_0({z}) = {}", hankel2(0.0, z).unwrap());

    println!("\n=== Negative orders ===");
    println!("J_-0.5({z}) = {}", besselj(-0.5, z).unwrap());
    println!("I_-1.3({z}) = {}", besseli(-1.3, z).unwrap());
    println!("K_-3({z}) = {}  K_3 = {}", besselk(-3.0, z).unwrap(), besselk(3.0, z).unwrap());

    println!("\n=== Scaled ===");
    println!("exp(z) K_1({z}) = {}", besselk_scaled(1.0, z).unwrap());
    println!("exp(-|Im z|) J_0.5({z}) = {}", besselj_scaled(0.5, z).unwrap());

    println!("\n=== Run K_0..K_2 ===");
    let run = besselk_seq(0.0, z, 3, Scaling::Unscaled).unwrap();
    for (j, v) in run.values.iter().enumerate() {
        println!("  K_{j}({z}) = {v}");
    }
    println!("  underflow_count = {}, status = {:?}", run.underflow_count, run.status);

    println!("\n=== Run into a stack buffer ===");
    let mut h = [Complex::new(0.0, 0.0); 4];
    let (nz, status) = hankel_into(HankelKind::First, 0.25, z, Scaling::Exponential, &mut h).unwrap();
    for (j, v) in h.iter().enumerate() {
        println!("  exp(-iz) H1_{}({z}) = {v}", 0.25 + j as f64);
    }
    println!("  nz = {nz}, status = {status:?}");

    println!("\n=== Airy ===");
    println!("Ai({z}) = {}", airy(z).unwrap());
    println!("Ai'({z}) = {}", airyprime(z).unwrap());
    println!("Bi({z}) = {}", biry(z).unwrap());
    println!("Bi'({z}) = {}", biryprime(z).unwrap());

    println!("\n=== Integer status convention ===");
    let mut cy = [Complex::new(0.0, 0.0); 2];
    let st = contract::zbesk(Complex::new(1e3, 0.0), 0.0, 1, 2, &mut cy);
    println!("K_0,1(1000), kode=1: nz = {}, ierr = {}", st.nz, st.ierr);
    let st = contract::zbesk(Complex::new(1e3, 0.0), 0.0, 2, 2, &mut cy);
    println!("K_0,1(1000), kode=2: {:?}, ierr = {}", cy, st.ierr);

    println!("\n=== f32 ===");
    let z32 = Complex::new(1.0_f32, 2.0);
    println!("J_0.5({z32}) = {} (f32)", besselj(0.5, z32).unwrap());
}
