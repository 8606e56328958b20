//! Lower-bounded linear least squares: minimize ½‖A x‖² subject to x ≥ lb.

use tracing::{debug, info, instrument, warn};

use crate::error::RgtError;
use crate::sparse::ConstraintMatrix;

const ARMIJO: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 40;

/// Outcome of a bounded least-squares solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    /// Whether a stopping criterion other than the iteration budget was met.
    pub converged: bool,
    /// Outer iterations performed.
    pub iterations: usize,
    /// Final value of ½‖A x‖².
    pub cost: f64,
    /// Infinity norm of the projected gradient at the returned iterate.
    pub projected_gradient_norm: f64,
}

/// Solver output: the best iterate and how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Solution vector, every entry at or above the lower bound.
    pub x: Vec<f64>,
    /// Convergence summary.
    pub report: SolveReport,
}

/// Projected Newton–Krylov active-set solver for `min ½‖A x‖², x ≥ lb`.
///
/// Starting from `x = lb`, each outer iteration fixes the variables held at
/// the bound by an outward gradient, solves the least-squares subproblem on
/// the remaining variables inexactly with CGLS, and takes a projected
/// backtracking step along that direction. When backtracking fails a
/// projected steepest-descent step with exact step length is taken instead.
/// If neither lowers the cost the solve stops, and counts as converged only
/// when the projected gradient is already below `gtol`.
///
/// The inner CGLS stops once the free-set gradient of the subproblem has
/// shrunk by `inner_tol` relative to its start, or after `max_inner_iter`
/// products with `A` and `Aᵀ`.
///
/// # Defaults
///
/// | Parameter        | Default |
/// |------------------|---------|
/// | `lower_bound`    | 1.0     |
/// | `max_iter`       | 100     |
/// | `tol`            | 1e-10   |
/// | `gtol`           | 1e-12   |
/// | `inner_tol`      | 1e-8    |
/// | `max_inner_iter` | 200     |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedLeastSquares {
    lower_bound: f64,
    max_iter: usize,
    tol: f64,
    gtol: f64,
    inner_tol: f64,
    max_inner_iter: usize,
}

impl Default for BoundedLeastSquares {
    fn default() -> Self {
        Self {
            lower_bound: 1.0,
            max_iter: 100,
            tol: 1e-10,
            gtol: 1e-12,
            inner_tol: 1e-8,
            max_inner_iter: 200,
        }
    }
}

impl BoundedLeastSquares {
    /// Set the lower bound shared by every variable.
    #[must_use]
    pub fn with_lower_bound(mut self, lower_bound: f64) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    /// Set the outer iteration budget.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the relative cost-decrease tolerance.
    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set the projected-gradient tolerance.
    #[must_use]
    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.gtol = gtol;
        self
    }

    /// Set the relative residual reduction at which CGLS stops.
    #[must_use]
    pub fn with_inner_tol(mut self, inner_tol: f64) -> Self {
        self.inner_tol = inner_tol;
        self
    }

    /// Set the CGLS iteration cap per outer iteration.
    #[must_use]
    pub fn with_max_inner_iter(mut self, max_inner_iter: usize) -> Self {
        self.max_inner_iter = max_inner_iter;
        self
    }

    /// Return the lower bound.
    #[must_use]
    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    /// Return the outer iteration budget.
    #[must_use]
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Check the solver parameters.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`RgtError::InvalidLowerBound`] | `lower_bound` is not positive and finite |
    /// | [`RgtError::InvalidIterationBudget`] | `max_iter` or `max_inner_iter` is zero |
    /// | [`RgtError::InvalidTolerance`] | `tol`, `gtol` or `inner_tol` is negative or not finite |
    pub fn validate(&self) -> Result<(), RgtError> {
        if !(self.lower_bound.is_finite() && self.lower_bound > 0.0) {
            return Err(RgtError::InvalidLowerBound {
                value: self.lower_bound,
            });
        }
        if self.max_iter == 0 || self.max_inner_iter == 0 {
            return Err(RgtError::InvalidIterationBudget);
        }
        for value in [self.tol, self.gtol, self.inner_tol] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(RgtError::InvalidTolerance { value });
            }
        }
        Ok(())
    }

    /// Solve `min ½‖A x‖²` subject to `x ≥ lower_bound`.
    ///
    /// Running out of iterations is not an error: the best iterate is
    /// returned with `report.converged == false`.
    ///
    /// # Errors
    ///
    /// Same as [`BoundedLeastSquares::validate`].
    #[instrument(skip(self, a), fields(rows = a.shape().0, cols = a.shape().1, nnz = a.nnz()))]
    pub fn solve(&self, a: &ConstraintMatrix) -> Result<Solution, RgtError> {
        self.validate()?;
        let lb = self.lower_bound;
        let n = a.shape().1;

        let mut x = vec![lb; n];
        let mut r = a.mul_vec(&x);
        let mut f = 0.5 * dot(&r, &r);
        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.max_iter {
            let (g, free, pg_norm) = projected_gradient(a, &r, &x, lb);
            if f == 0.0 || pg_norm <= self.gtol {
                converged = true;
                break;
            }
            iterations += 1;

            let d = cgls(a, &r, &g, &free, self.inner_tol, self.max_inner_iter);
            let step = self
                .backtrack(a, &x, &d, &g, f, 1.0)
                .or_else(|| self.steepest_descent(a, &x, &g, &free, f));

            let Some((xn, rn, f_new)) = step else {
                debug!(iterations, cost = f, pg_norm, "no descent step found");
                break;
            };
            let decrease = f - f_new;
            let previous = f;
            x = xn;
            r = rn;
            f = f_new;
            debug!(iterations, cost = f, pg_norm, "solver step");
            if decrease < self.tol * previous {
                converged = true;
                break;
            }
        }

        let (_, _, projected_gradient_norm) = projected_gradient(a, &r, &x, lb);
        if !converged && (f == 0.0 || projected_gradient_norm <= self.gtol) {
            converged = true;
        }
        let report = SolveReport {
            converged,
            iterations,
            cost: f,
            projected_gradient_norm,
        };
        if converged {
            info!(iterations, cost = f, projected_gradient_norm, "solver converged");
        } else {
            warn!(
                iterations,
                cost = f,
                projected_gradient_norm,
                "solver stopped before reaching a stationary point"
            );
        }
        Ok(Solution { x, report })
    }

    /// Projected backtracking along `d` from step `alpha`, halving until the
    /// Armijo condition holds.
    fn backtrack(
        &self,
        a: &ConstraintMatrix,
        x: &[f64],
        d: &[f64],
        g: &[f64],
        f: f64,
        mut alpha: f64,
    ) -> Option<(Vec<f64>, Vec<f64>, f64)> {
        for _ in 0..MAX_BACKTRACKS {
            let xn = project(x, d, alpha, self.lower_bound);
            let rn = a.mul_vec(&xn);
            let f_new = 0.5 * dot(&rn, &rn);
            let predicted: f64 = g
                .iter()
                .zip(xn.iter().zip(x))
                .map(|(gi, (xni, xi))| gi * (xni - xi))
                .sum();
            if f_new <= f + ARMIJO * predicted {
                return Some((xn, rn, f_new));
            }
            alpha *= 0.5;
        }
        None
    }

    /// Projected steepest-descent step with the exact unconstrained step
    /// length `‖pg‖² / ‖A pg‖²`. Rejected unless it strictly lowers the cost.
    fn steepest_descent(
        &self,
        a: &ConstraintMatrix,
        x: &[f64],
        g: &[f64],
        free: &[bool],
        f: f64,
    ) -> Option<(Vec<f64>, Vec<f64>, f64)> {
        let pg: Vec<f64> = g
            .iter()
            .zip(free)
            .map(|(&gi, &fr)| if fr { -gi } else { 0.0 })
            .collect();
        let q = a.mul_vec(&pg);
        let qq = dot(&q, &q);
        if qq <= 0.0 {
            return None;
        }
        let alpha = dot(&pg, &pg) / qq;
        let xn = project(x, &pg, alpha, self.lower_bound);
        let rn = a.mul_vec(&xn);
        let f_new = 0.5 * dot(&rn, &rn);
        (f_new < f).then_some((xn, rn, f_new))
    }
}

/// Gradient `Aᵀ r`, the free-variable mask, and the infinity norm of the
/// projected gradient.
fn projected_gradient(
    a: &ConstraintMatrix,
    r: &[f64],
    x: &[f64],
    lb: f64,
) -> (Vec<f64>, Vec<bool>, f64) {
    let g = a.mul_transpose_vec(r);
    let free: Vec<bool> = x.iter().zip(&g).map(|(&xi, &gi)| xi > lb || gi < 0.0).collect();
    let norm = g
        .iter()
        .zip(&free)
        .filter(|&(_, &fr)| fr)
        .fold(0.0_f64, |m, (&gi, _)| m.max(gi.abs()));
    (g, free, norm)
}

/// Inexact CGLS for `min ‖A_F d + r‖` over the free variables; fixed
/// entries of `d` stay zero. Stops when `‖A_Fᵀ(A_F d + r)‖ ≤ rtol · ‖A_Fᵀ r‖`.
fn cgls(
    a: &ConstraintMatrix,
    r: &[f64],
    g: &[f64],
    free: &[bool],
    rtol: f64,
    max_inner_iter: usize,
) -> Vec<f64> {
    let n = g.len();
    let mut d = vec![0.0; n];
    let mut residual: Vec<f64> = r.iter().map(|v| -v).collect();
    let mut s: Vec<f64> = g
        .iter()
        .zip(free)
        .map(|(&gi, &fr)| if fr { -gi } else { 0.0 })
        .collect();
    let mut p = s.clone();
    let mut gamma = dot(&s, &s);
    let threshold = (rtol * rtol * gamma).max(f64::MIN_POSITIVE);
    let n_free = free.iter().filter(|&&fr| fr).count();

    for _ in 0..n_free.min(max_inner_iter) {
        let q = a.mul_vec(&p);
        let qq = dot(&q, &q);
        if qq <= 0.0 {
            break;
        }
        let alpha = gamma / qq;
        for (di, pi) in d.iter_mut().zip(&p) {
            *di += alpha * pi;
        }
        for (ri, qi) in residual.iter_mut().zip(&q) {
            *ri -= alpha * qi;
        }
        s = a.mul_transpose_vec(&residual);
        for (si, &fr) in s.iter_mut().zip(free) {
            if !fr {
                *si = 0.0;
            }
        }
        let gamma_new = dot(&s, &s);
        if gamma_new <= threshold {
            break;
        }
        let beta = gamma_new / gamma;
        gamma = gamma_new;
        for (pi, si) in p.iter_mut().zip(&s) {
            *pi = si + beta * *pi;
        }
    }
    d
}

fn project(x: &[f64], d: &[f64], alpha: f64, lb: f64) -> Vec<f64> {
    x.iter().zip(d).map(|(xi, di)| (xi + alpha * di).max(lb)).collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
