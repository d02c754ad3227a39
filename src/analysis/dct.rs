use std::f64::consts::PI;

/// Type-II DCT, `y[k] = 2 Σ x[n] cos(π k (2n + 1) / 2N)`.
///
/// With `normalize`, `y[0]` is scaled by `sqrt(1 / 4N)` and the rest by
/// `sqrt(1 / 2N)`, which makes the transform orthonormal.
pub fn dct_ii(values: &[f64], normalize: bool) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let len = n as f64;
    let mut out = Vec::with_capacity(n);
    for k in 0..n {
        let mut sum = 0.0_f64;
        for (m, &v) in values.iter().enumerate() {
            let angle = PI * k as f64 * (2 * m + 1) as f64 / (2.0 * len);
            sum += v * angle.cos();
        }
        out.push(2.0 * sum);
    }
    if normalize {
        out[0] *= (1.0 / (4.0 * len)).sqrt();
        let rest = (1.0 / (2.0 * len)).sqrt();
        for value in &mut out[1..] {
            *value *= rest;
        }
    }
    out
}

/// Inverse of the orthonormal [`dct_ii`] (an orthonormal DCT-III).
pub fn inverse_dct_ii(coefs: &[f64]) -> Vec<f64> {
    let n = coefs.len();
    if n == 0 {
        return Vec::new();
    }
    let len = n as f64;
    let dc = coefs[0] / len.sqrt();
    let ac_scale = (2.0 / len).sqrt();
    (0..n)
        .map(|m| {
            let mut sum = dc;
            for (k, &c) in coefs.iter().enumerate().skip(1) {
                let angle = PI * k as f64 * (2 * m + 1) as f64 / (2.0 * len);
                sum += ac_scale * c * angle.cos();
            }
            sum
        })
        .collect()
}
