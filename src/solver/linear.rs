use crate::{
    regularization::{Identity, Regularizer},
    Dmat, Dvec,
};

use super::{solve_normal, Fit, SolverError};

/// One-shot solver for linear inverse problems.
///
/// The forward operator must be linear in the parameters, so its Jacobian
/// is a constant matrix supplied directly to [`Linear::solve`]. There is no
/// iteration, damping, or convergence criterion.
pub struct Linear<F, R = Identity>
where
    F: Fn(&Dvec) -> Dvec,
    R: Regularizer,
{
    /// the forward operator, only used to compute the final residuals
    func: F,

    reg: R,
}

impl<F> Linear<F, Identity>
where
    F: Fn(&Dvec) -> Dvec,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            reg: Identity,
        }
    }
}

impl<F, R> Linear<F, R>
where
    F: Fn(&Dvec) -> Dvec,
    R: Regularizer,
{
    pub fn with_regularizer<R2>(self, reg: R2) -> Linear<F, R2>
    where
        R2: Regularizer,
    {
        Linear {
            func: self.func,
            reg,
        }
    }

    /// Fit `data` by solving the normal equations `JᵀJ p = Jᵀ d` exactly,
    /// with the penalty Hessian folded into `JᵀJ`.
    pub fn solve(&self, data: &Dvec, jac: &Dmat) -> Result<Fit, SolverError> {
        // a penalty usable with a linear problem is quadratic, so its
        // Hessian does not depend on where it is evaluated
        let origin = Dvec::zeros(jac.ncols());
        let hessian = self.reg.hessian(&origin, jac.transpose() * jac);
        let estimate = solve_normal(hessian, &(jac.transpose() * data))?;
        let residuals = data - (self.func)(&estimate);
        Ok(Fit {
            estimate,
            residuals,
        })
    }
}
