//! Sparse linear solvers for `G * x = I`.
//!
//! The matrix only changes when the universe does, while a solve happens for
//! every simulated commodity on every update. Solvers therefore split the work
//! into [`SparseSolver::prepare`] (once per refresh) and
//! [`SparseSolver::solve`] (once per commodity per update).

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::factorization::CscCholesky;

use crate::admittance::AdmittanceMatrix;
use crate::error::{BuildError, SolveError};

/// A solver for symmetric positive definite systems.
pub trait SparseSolver {
    /// Whatever the solver keeps between solves (a factorization, a copy of
    /// the matrix, ...).
    type Prepared: std::fmt::Debug;

    /// Prepare `matrix` for repeated solves.
    ///
    /// Only structural problems are errors here. A numerically unusable
    /// matrix may still be accepted and reported by every later solve.
    fn prepare(&self, matrix: &AdmittanceMatrix) -> Result<Self::Prepared, BuildError>;

    /// Solve in place. On error `rhs` is left untouched.
    fn solve(&self, prepared: &Self::Prepared, rhs: &mut [f64]) -> Result<(), SolveError>;
}

fn check_finite(values: &[f64], what: &'static str) -> Result<(), SolveError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(SolveError::NonFinite(what))
    }
}

fn check_dim(expected: usize, rhs: &[f64]) -> Result<(), SolveError> {
    if rhs.len() == expected {
        Ok(())
    } else {
        Err(SolveError::DimensionMismatch {
            expected,
            got: rhs.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Sparse Cholesky
// ---------------------------------------------------------------------------

/// Sparse Cholesky factorization via `nalgebra-sparse`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CholeskySolver;

/// A factorized matrix, or the reason factorization failed.
pub struct CholeskyFactor {
    dim: usize,
    factor: Result<Option<CscCholesky<f64>>, String>,
}

impl CholeskyFactor {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn is_factorized(&self) -> bool {
        self.factor.is_ok()
    }
}

impl std::fmt::Debug for CholeskyFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CholeskyFactor")
            .field("dim", &self.dim)
            .field("factorized", &self.factor.is_ok())
            .finish()
    }
}

impl SparseSolver for CholeskySolver {
    type Prepared = CholeskyFactor;

    fn prepare(&self, matrix: &AdmittanceMatrix) -> Result<CholeskyFactor, BuildError> {
        let dim = matrix.dim();
        if dim == 0 {
            return Ok(CholeskyFactor {
                dim,
                factor: Ok(None),
            });
        }
        let factor = match CscCholesky::factor(matrix.csc()) {
            Ok(chol) => Ok(Some(chol)),
            Err(e) => {
                tracing::warn!(dim, error = ?e, "admittance matrix could not be factorized");
                Err(format!("{e:?}"))
            }
        };
        Ok(CholeskyFactor { dim, factor })
    }

    fn solve(&self, prepared: &CholeskyFactor, rhs: &mut [f64]) -> Result<(), SolveError> {
        check_dim(prepared.dim, rhs)?;
        check_finite(rhs, "right-hand side")?;
        let chol = match &prepared.factor {
            Ok(Some(chol)) => chol,
            Ok(None) => return Ok(()),
            Err(reason) => return Err(SolveError::NotFactorized(reason.clone())),
        };
        let b = DMatrix::from_column_slice(prepared.dim, 1, rhs);
        let x = chol.solve(&b);
        check_finite(x.as_slice(), "solution")?;
        rhs.copy_from_slice(x.as_slice());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Conjugate gradient
// ---------------------------------------------------------------------------

/// Conjugate gradient over the compressed matrix. Needs no factorization
/// but may fail to converge on badly conditioned or indefinite matrices.
#[derive(Debug, Clone, Copy)]
pub struct ConjugateGradientSolver {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for ConjugateGradientSolver {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 1000,
        }
    }
}

impl SparseSolver for ConjugateGradientSolver {
    type Prepared = AdmittanceMatrix;

    fn prepare(&self, matrix: &AdmittanceMatrix) -> Result<AdmittanceMatrix, BuildError> {
        Ok(matrix.clone())
    }

    fn solve(&self, matrix: &AdmittanceMatrix, rhs: &mut [f64]) -> Result<(), SolveError> {
        check_dim(matrix.dim(), rhs)?;
        check_finite(rhs, "right-hand side")?;

        let b = DVector::from_column_slice(rhs);
        let b_norm = b.norm();
        if b_norm == 0.0 {
            rhs.fill(0.0);
            return Ok(());
        }

        let mut x = DVector::zeros(rhs.len());
        let mut r = b;
        let mut p = r.clone();
        let mut rs_old = r.norm_squared();

        // Conjugate gradient may need up to `dim` steps.
        let iterations = self.max_iterations.max(rhs.len());
        for _ in 0..iterations {
            let ap = matrix.csc() * &p;
            let curvature = p.dot(&ap);
            if !(curvature.is_finite() && curvature > 0.0) {
                return Err(SolveError::NotFactorized(
                    "matrix is not positive definite".to_string(),
                ));
            }
            let alpha = rs_old / curvature;
            x.axpy(alpha, &p, 1.0);
            r.axpy(-alpha, &ap, 1.0);
            let rs_new = r.norm_squared();
            if rs_new.sqrt() <= self.tolerance * b_norm {
                check_finite(x.as_slice(), "solution")?;
                rhs.copy_from_slice(x.as_slice());
                return Ok(());
            }
            p.axpy(1.0, &r, rs_new / rs_old);
            rs_old = rs_new;
        }
        Err(SolveError::NotFactorized(format!(
            "conjugate gradient did not converge in {iterations} iterations"
        )))
    }
}
