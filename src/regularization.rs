//! Regularizing functions for constraining inverse problems.
//!
//! Potential-field inverse problems are fraught with non-uniqueness:
//! directions in the parameter space that the data misfit barely responds
//! to. A penalty term added to the goal function tames these by preferring,
//! say, small or smooth parameter vectors. Statistically this is called
//! regularization; a squared-norm penalty is ridge regression (a Gaussian
//! prior on the parameters) and a plain norm is lasso.
//!
//! A [`Regularizer`] bundles the penalty value with its first and second
//! derivative contributions so the solvers can fold them into the gradient
//! and Hessian of the data misfit. Supplying the three pieces through one
//! trait keeps them consistent with each other; a partially-specified
//! penalty cannot be expressed.

use crate::{Dmat, Dvec};

/// A penalty term `R(p)` added to the goal function
/// `‖data − func(p)‖² + R(p)`, with its derivative contributions.
///
/// The solvers hand `gradient` the misfit half-gradient `−Jᵀr` and
/// `hessian` the Gauss-Newton matrix `JᵀJ`, so implementations must fold in
/// `∇R/2` and `∇²R/2` to keep the assembled system consistent with the goal
/// function that `norm` contributes to.
pub trait Regularizer {
    /// value of the penalty at `p`
    fn norm(&self, p: &Dvec) -> f64;

    /// fold the penalty contribution into the misfit gradient `g`
    fn gradient(&self, p: &Dvec, g: Dvec) -> Dvec;

    /// fold the penalty contribution into the misfit Hessian `h`
    fn hessian(&self, p: &Dvec, h: Dmat) -> Dmat;
}

/// The no-op regularizer: zero penalty, gradient and Hessian pass through
/// untouched. This is the default for both solvers.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Regularizer for Identity {
    fn norm(&self, _p: &Dvec) -> f64 {
        0.0
    }

    fn gradient(&self, _p: &Dvec, g: Dvec) -> Dvec {
        g
    }

    fn hessian(&self, _p: &Dvec, h: Dmat) -> Dmat {
        h
    }
}

/// Weighted power-norm penalty `w·(pᵀp)^(q/2)`.
///
/// With the default power `q = 2` this is classic ridge regression or
/// damping: the penalty gradient is linear in `p` and its Hessian is a
/// constant multiple of the identity. Other powers use the general formula,
/// which picks up a rank-one `ppᵀ` term in the Hessian.
#[derive(Clone, Copy, Debug)]
pub struct Ridge {
    /// weight multiplying the penalty, relative to the data misfit
    weight: f64,

    /// power of the norm
    power: f64,
}

impl Ridge {
    pub fn new(weight: f64) -> Self {
        Self { weight, power: 2.0 }
    }

    pub fn with_power(weight: f64, power: f64) -> Self {
        Self { weight, power }
    }
}

impl Regularizer for Ridge {
    fn norm(&self, p: &Dvec) -> f64 {
        let m2 = p.dot(p);
        if self.power == 2.0 {
            self.weight * m2
        } else {
            self.weight * m2.powf(self.power / 2.0)
        }
    }

    fn gradient(&self, p: &Dvec, g: Dvec) -> Dvec {
        let q = self.power;
        if q == 2.0 {
            g + self.weight * p
        } else {
            let m2 = p.dot(p);
            g + (self.weight * q / 2.0) * m2.powf(q / 2.0 - 1.0) * p
        }
    }

    fn hessian(&self, p: &Dvec, h: Dmat) -> Dmat {
        let l = p.len();
        let q = self.power;
        if q == 2.0 {
            h + self.weight * Dmat::identity(l, l)
        } else {
            let m2 = p.dot(p);
            h + (self.weight * q / 2.0)
                * m2.powf(q / 2.0 - 1.0)
                * Dmat::identity(l, l)
                + (self.weight * q * (q - 2.0) / 2.0)
                    * m2.powf(q / 2.0 - 2.0)
                    * (p * p.transpose())
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::{dmatrix, dvector};

    use super::*;

    #[test]
    fn test_identity() {
        let p = dvector![1.0, -2.0];
        let g = dvector![3.0, 4.0];
        let h = dmatrix![1.0, 0.0; 0.0, 1.0];
        assert_eq!(Identity.norm(&p), 0.0);
        assert_eq!(Identity.gradient(&p, g.clone()), g);
        assert_eq!(Identity.hessian(&p, h.clone()), h);
    }

    #[test]
    fn test_ridge() {
        let reg = Ridge::new(0.5);
        let p = dvector![1.0, 2.0];
        assert_abs_diff_eq!(reg.norm(&p), 2.5);
        let got = reg.gradient(&p, dvector![1.0, 1.0]);
        assert_abs_diff_eq!(got, dvector![1.5, 2.0]);
        let got = reg.hessian(&p, dmatrix![1.0, 0.0; 0.0, 1.0]);
        assert_abs_diff_eq!(got, dmatrix![1.5, 0.0; 0.0, 1.5]);
    }

    #[test]
    fn test_ridge_power() {
        // R = (p^T p)^2, so the folded-in contributions are half of
        // grad R = 4 m2 p and hess R = 4 m2 I + 8 p p^T
        let reg = Ridge::with_power(1.0, 4.0);
        let p = dvector![1.0, 2.0];
        assert_abs_diff_eq!(reg.norm(&p), 25.0, epsilon = 1e-12);
        let got = reg.gradient(&p, dvector![0.0, 0.0]);
        assert_abs_diff_eq!(got, dvector![10.0, 20.0], epsilon = 1e-12);
        let got = reg.hessian(&p, dmatrix![0.0, 0.0; 0.0, 0.0]);
        assert_abs_diff_eq!(
            got,
            dmatrix![14.0, 8.0; 8.0, 26.0],
            epsilon = 1e-12
        );
    }
}
