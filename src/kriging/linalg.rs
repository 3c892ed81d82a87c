//! Dense row-major matrix helpers for the kriging solve
//!
//! Matrices are flat `Vec<f64>` in row-major order with explicit dimensions.

use crate::error::{KrigingError, Result};

/// How a matrix inverse was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InverseMethod {
    /// Cholesky factorisation (symmetric positive definite input)
    Cholesky,
    /// Gauss-Jordan elimination with partial pivoting
    GaussJordan,
}

/// Transpose of the `rows × cols` matrix `a`
pub fn transpose(a: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    let mut t = vec![0.0; rows * cols];
    for i in 0..rows {
        for j in 0..cols {
            t[j * rows + i] = a[i * cols + j];
        }
    }
    t
}

/// Product of `a` (`n × m`) and `b` (`m × p`)
pub fn multiply(a: &[f64], b: &[f64], n: usize, m: usize, p: usize) -> Vec<f64> {
    let mut c = vec![0.0; n * p];
    for i in 0..n {
        for k in 0..m {
            let aik = a[i * m + k];
            if aik == 0.0 {
                continue;
            }
            for j in 0..p {
                c[i * p + j] += aik * b[k * p + j];
            }
        }
    }
    c
}

/// Add `value` to every diagonal entry of the `n × n` matrix `a`
pub fn add_diagonal(a: &mut [f64], n: usize, value: f64) {
    for i in 0..n {
        a[i * n + i] += value;
    }
}

/// Factor `a = L·Lᵀ` in place, leaving `L` in the lower triangle
///
/// Returns `false` as soon as a non-positive pivot shows the matrix is not
/// positive definite; `a` is then partially overwritten.
fn cholesky_in_place(a: &mut [f64], n: usize) -> bool {
    for i in 0..n {
        let mut diag = a[i * n + i];
        for k in 0..i {
            diag -= a[i * n + k] * a[i * n + k];
        }
        if !(diag > 0.0) {
            return false;
        }
        let pivot = diag.sqrt();
        a[i * n + i] = pivot;
        for j in (i + 1)..n {
            let mut v = a[j * n + i];
            for k in 0..i {
                v -= a[j * n + k] * a[i * n + k];
            }
            a[j * n + i] = v / pivot;
        }
    }
    true
}

/// Turn a Cholesky factor (lower triangle of `a`) into the full inverse
fn cholesky_to_inverse(a: &mut [f64], n: usize) {
    // L⁻¹ overwrites L, column by column
    for i in 0..n {
        a[i * n + i] = 1.0 / a[i * n + i];
        for j in (i + 1)..n {
            let mut v = 0.0;
            for k in i..j {
                v -= a[j * n + k] * a[k * n + i];
            }
            a[j * n + i] = v / a[j * n + j];
        }
    }
    for i in 0..n {
        for j in (i + 1)..n {
            a[i * n + j] = 0.0;
        }
    }
    // upper triangle of (L⁻¹)ᵀ·L⁻¹
    for i in 0..n {
        let lii = a[i * n + i];
        let mut diag = lii * lii;
        for k in (i + 1)..n {
            diag += a[k * n + i] * a[k * n + i];
        }
        for j in (i + 1)..n {
            let mut v = 0.0;
            for k in j..n {
                v += a[k * n + i] * a[k * n + j];
            }
            a[i * n + j] = v;
        }
        a[i * n + i] = diag;
    }
    for i in 0..n {
        for j in 0..i {
            a[i * n + j] = a[j * n + i];
        }
    }
}

/// Inverse via Gauss-Jordan elimination with partial pivoting
///
/// Returns `None` when a pivot vanishes relative to the matrix scale.
pub fn gauss_jordan_inverse(a: &[f64], n: usize) -> Option<Vec<f64>> {
    let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if !scale.is_finite() {
        return None;
    }
    let eps = scale * n as f64 * f64::EPSILON;

    let mut m = a.to_vec();
    let mut inv = vec![0.0; n * n];
    for i in 0..n {
        inv[i * n + i] = 1.0;
    }

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = m[col * n + col].abs();
        for row in (col + 1)..n {
            let val = m[row * n + col].abs();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }
        if !(max_val > eps) {
            return None;
        }

        if max_row != col {
            for j in 0..n {
                m.swap(col * n + j, max_row * n + j);
                inv.swap(col * n + j, max_row * n + j);
            }
        }

        let pivot = m[col * n + col];
        for j in 0..n {
            m[col * n + j] /= pivot;
            inv[col * n + j] /= pivot;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = m[row * n + col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                m[row * n + j] -= factor * m[col * n + j];
                inv[row * n + j] -= factor * inv[col * n + j];
            }
        }
    }
    Some(inv)
}

/// Invert the symmetric `n × n` matrix `a`
///
/// Tries Cholesky first and falls back to Gauss-Jordan when the matrix is
/// not positive definite.
///
/// # Errors
///
/// `SingularMatrix` if both methods fail.
pub fn invert_symmetric(a: &[f64], n: usize) -> Result<(Vec<f64>, InverseMethod)> {
    let mut work = a.to_vec();
    if cholesky_in_place(&mut work, n) {
        cholesky_to_inverse(&mut work, n);
        return Ok((work, InverseMethod::Cholesky));
    }
    gauss_jordan_inverse(a, n)
        .map(|inv| (inv, InverseMethod::GaussJordan))
        .ok_or_else(|| KrigingError::SingularMatrix(format!("{n}x{n} system has no inverse")))
}
