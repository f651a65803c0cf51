//! Solvers for fitting a parametric forward model to observed data in a
//! least-squares sense, with optional regularization.
//!
//! [`Linear`] solves a linear (or linearized-once) system in a single shot;
//! [`Marquardt`] iterates a damped Gauss-Newton loop for nonlinear forward
//! models. Both assemble the same normal-equation system, the Marquardt
//! solver with an adaptive damping term added to the Hessian diagonal.

use serde::Serialize;

use crate::{Dmat, Dvec};

mod linear;
mod marquardt;

pub use linear::Linear;
pub use marquardt::Marquardt;

#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// The (possibly damped) normal-equation matrix could not be
    /// factorized. Fatal for the solve; never retried.
    #[error("the normal-equation system is singular and cannot be solved")]
    SingularSystem,
}

/// Result of a one-shot linear solve.
#[derive(Clone, Debug, Serialize)]
pub struct Fit {
    /// the estimated parameter vector
    pub estimate: Dvec,

    /// observed data minus the data predicted by `estimate`
    pub residuals: Dvec,
}

/// Result of a Marquardt solve.
#[derive(Clone, Debug, Serialize)]
pub struct MarqFit {
    /// the last accepted parameter vector
    pub estimate: Dvec,

    /// observed data minus the data predicted by `estimate`
    pub residuals: Dvec,

    /// goal function value at the initial guess and after each accepted
    /// iteration
    pub goals: Vec<f64>,
}

/// solve the normal-equation system `h x = b`
pub(crate) fn solve_normal(h: Dmat, b: &Dvec) -> Result<Dvec, SolverError> {
    h.lu().solve(b).ok_or(SolverError::SingularSystem)
}

#[cfg(test)]
mod tests {
    use nalgebra::{dmatrix, dvector};

    use super::*;

    #[test]
    fn test_solve_normal_singular() {
        let h = dmatrix![1.0, 1.0; 1.0, 1.0];
        let got = solve_normal(h, &dvector![1.0, 2.0]);
        assert!(matches!(got, Err(SolverError::SingularSystem)));
    }

    #[test]
    fn test_serialize() {
        let fit = MarqFit {
            estimate: dvector![3.0],
            residuals: dvector![0.0, 0.0],
            goals: vec![45.0, 1.0],
        };
        let json = serde_json::to_string(&fit).unwrap();
        assert!(json.contains("\"goals\":[45.0,1.0]"));
    }
}
