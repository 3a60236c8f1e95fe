//! Dense matrices and row-vector arithmetic for small lattice dimensions
//! Integer bases are kept exact; everything derived from an inverse is `f64`

use crate::utils::error::{Result, EngineError};
use serde::{Deserialize, Serialize};

/// Row-major matrix. Rows are lattice basis vectors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix<T> {
    rows: Vec<Vec<T>>,
}

pub type IntMatrix = Matrix<i64>;
pub type RealMatrix = Matrix<f64>;

impl<T: Copy> Matrix<T> {
    /// Build a matrix from rows, rejecting empty and ragged input
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(EngineError::InvalidInput("Matrix must not be empty".into()));
        }
        if let Some(bad) = rows.iter().find(|row| row.len() != cols) {
            return Err(EngineError::DimensionMismatch {
                expected: cols,
                found: bad.len(),
            });
        }
        Ok(Self { rows })
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.rows[i]
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        self.rows[i][j]
    }

    /// Rows and columns are consistent; used after deserialization
    pub fn check_shape(&self) -> Result<()> {
        let cols = self.ncols();
        if self.rows.is_empty() || cols == 0 {
            return Err(EngineError::InvalidInput("Matrix must not be empty".into()));
        }
        match self.rows.iter().find(|row| row.len() != cols) {
            Some(bad) => Err(EngineError::DimensionMismatch {
                expected: cols,
                found: bad.len(),
            }),
            None => Ok(()),
        }
    }
}

impl IntMatrix {
    pub fn to_real(&self) -> RealMatrix {
        Matrix {
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(|&x| x as f64).collect())
                .collect(),
        }
    }

    pub fn rank(&self) -> usize {
        self.to_real().rank()
    }

    pub fn is_full_rank(&self) -> bool {
        self.is_square() && self.rank() == self.nrows()
    }
}

impl RealMatrix {
    pub fn identity(n: usize) -> Self {
        let mut rows = vec![vec![0.0; n]; n];
        for (i, row) in rows.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self { rows }
    }

    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            rows: vec![vec![0.0; ncols]; nrows],
        }
    }

    /// Matrix product `self · other`
    pub fn mul(&self, other: &RealMatrix) -> Result<RealMatrix> {
        if self.ncols() != other.nrows() {
            return Err(EngineError::DimensionMismatch {
                expected: self.ncols(),
                found: other.nrows(),
            });
        }
        let rows = self
            .rows
            .iter()
            .map(|row| vec_mat(row, other))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    /// Pivots at or below this count as zero. numpy's `matrix_rank` default
    /// `max(M, N) * eps * max|a_ij|`, widened for elimination round-off
    fn tolerance(&self) -> f64 {
        let max_abs = self
            .rows
            .iter()
            .flatten()
            .fold(0.0_f64, |acc, x| acc.max(x.abs()));
        self.nrows().max(self.ncols()) as f64 * f64::EPSILON * max_abs.max(1.0) * 16.0
    }

    /// Rank by Gaussian elimination with partial pivoting
    pub fn rank(&self) -> usize {
        let tol = self.tolerance();
        let mut a = self.rows.clone();
        let (nrows, ncols) = (self.nrows(), self.ncols());
        let mut rank = 0;

        for col in 0..ncols {
            if rank == nrows {
                break;
            }
            let pivot = (rank..nrows)
                .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
                .unwrap_or(rank);
            if a[pivot][col].abs() <= tol {
                continue;
            }
            a.swap(rank, pivot);
            for i in (rank + 1)..nrows {
                let factor = a[i][col] / a[rank][col];
                for j in col..ncols {
                    a[i][j] -= factor * a[rank][j];
                }
            }
            rank += 1;
        }

        rank
    }

    /// Determinant by LU decomposition with partial pivoting
    pub fn determinant(&self) -> Result<f64> {
        if !self.is_square() {
            return Err(EngineError::DimensionMismatch {
                expected: self.nrows(),
                found: self.ncols(),
            });
        }
        let n = self.nrows();
        let mut a = self.rows.clone();
        let mut det = 1.0;

        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
                .unwrap_or(col);
            if a[pivot][col] == 0.0 {
                return Ok(0.0);
            }
            if pivot != col {
                a.swap(pivot, col);
                det = -det;
            }
            det *= a[col][col];
            for i in (col + 1)..n {
                let factor = a[i][col] / a[col][col];
                for j in col..n {
                    a[i][j] -= factor * a[col][j];
                }
            }
        }

        Ok(det)
    }

    /// Inverse by Gauss-Jordan elimination with partial pivoting
    pub fn inverse(&self) -> Result<RealMatrix> {
        if !self.is_square() {
            return Err(EngineError::DimensionMismatch {
                expected: self.nrows(),
                found: self.ncols(),
            });
        }
        let n = self.nrows();
        let tol = self.tolerance();
        let mut a = self.rows.clone();
        let mut inv = RealMatrix::identity(n).rows;

        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
                .unwrap_or(col);
            if a[pivot][col].abs() <= tol {
                return Err(EngineError::SingularMatrix);
            }
            a.swap(pivot, col);
            inv.swap(pivot, col);

            let p = a[col][col];
            for j in 0..n {
                a[col][j] /= p;
                inv[col][j] /= p;
            }

            for i in 0..n {
                if i == col {
                    continue;
                }
                let factor = a[i][col];
                if factor == 0.0 {
                    continue;
                }
                for j in 0..n {
                    a[i][j] -= factor * a[col][j];
                    inv[i][j] -= factor * inv[col][j];
                }
            }
        }

        Ok(Self { rows: inv })
    }

    /// Largest element-wise distance to `other`
    pub fn max_abs_diff(&self, other: &RealMatrix) -> Result<f64> {
        if self.nrows() != other.nrows() || self.ncols() != other.ncols() {
            return Err(EngineError::DimensionMismatch {
                expected: self.nrows(),
                found: other.nrows(),
            });
        }
        Ok(self
            .rows
            .iter()
            .zip(&other.rows)
            .flat_map(|(a, b)| a.iter().zip(b).map(|(x, y)| (x - y).abs()))
            .fold(0.0, f64::max))
    }
}

/// Row-vector times matrix, `v · M`
pub fn vec_mat(v: &[f64], m: &RealMatrix) -> Result<Vec<f64>> {
    if v.len() != m.nrows() {
        return Err(EngineError::DimensionMismatch {
            expected: m.nrows(),
            found: v.len(),
        });
    }
    let mut out = vec![0.0; m.ncols()];
    for (x, row) in v.iter().zip(m.rows()) {
        for (acc, a) in out.iter_mut().zip(row) {
            *acc += x * a;
        }
    }
    Ok(out)
}

pub fn dot(a: &[f64], b: &[f64]) -> Result<f64> {
    check_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

pub fn add(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    check_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

pub fn sub(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    check_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}

/// Round to the nearest integer, ties to even
pub fn round_vector(v: &[f64]) -> Vec<i64> {
    v.iter().map(|x| x.round_ties_even() as i64).collect()
}

pub fn to_real(v: &[i64]) -> Vec<f64> {
    v.iter().map(|&x| x as f64).collect()
}

pub fn max_abs_diff(a: &[f64], b: &[f64]) -> Result<f64> {
    check_len(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max))
}

fn check_len(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(EngineError::DimensionMismatch { expected, found });
    }
    Ok(())
}
