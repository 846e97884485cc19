//! Dense Cholesky factorisation for the symmetric positive-definite
//! normal equations of weighted least squares.

use ndarray::{Array1, Array2};

/// A pivot this small relative to its diagonal entry means the column
/// is (numerically) a combination of the earlier ones.
const PIVOT_EPS: f64 = 1e-10;

/// Lower-triangular factor `L` with `A = L Lᵀ`.
#[derive(Debug, Clone)]
pub struct Cholesky {
    l: Array2<f64>,
}

impl Cholesky {
    /// Factorise `a`. Returns None when `a` is not (numerically)
    /// positive definite, which for X'WX means a rank-deficient design.
    pub fn factor(a: &Array2<f64>) -> Option<Self> {
        let n = a.nrows();
        debug_assert_eq!(n, a.ncols());
        let mut l = Array2::<f64>::zeros((n, n));

        for j in 0..n {
            let mut d = a[[j, j]];
            for k in 0..j {
                d -= l[[j, k]] * l[[j, k]];
            }
            if !d.is_finite() || d <= PIVOT_EPS * a[[j, j]].abs() || d <= 0.0 {
                return None;
            }
            let d = d.sqrt();
            l[[j, j]] = d;
            for i in (j + 1)..n {
                let mut s = a[[i, j]];
                for k in 0..j {
                    s -= l[[i, k]] * l[[j, k]];
                }
                l[[i, j]] = s / d;
            }
        }
        Some(Self { l })
    }

    /// Solve `A x = b`.
    pub fn solve(&self, b: &Array1<f64>) -> Array1<f64> {
        let n = self.l.nrows();
        let mut y = Array1::<f64>::zeros(n);
        for i in 0..n {
            let mut s = b[i];
            for k in 0..i {
                s -= self.l[[i, k]] * y[k];
            }
            y[i] = s / self.l[[i, i]];
        }
        let mut x = Array1::<f64>::zeros(n);
        for i in (0..n).rev() {
            let mut s = y[i];
            for k in (i + 1)..n {
                s -= self.l[[k, i]] * x[k];
            }
            x[i] = s / self.l[[i, i]];
        }
        x
    }

    /// `A⁻¹`, column by column.
    pub fn inverse(&self) -> Array2<f64> {
        let n = self.l.nrows();
        let mut inv = Array2::<f64>::zeros((n, n));
        for j in 0..n {
            let mut e = Array1::<f64>::zeros(n);
            e[j] = 1.0;
            inv.column_mut(j).assign(&self.solve(&e));
        }
        inv
    }
}
