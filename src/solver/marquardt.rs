use log::{debug, warn};

use crate::{
    config::Config,
    regularization::{Identity, Regularizer},
    Dmat, Dvec,
};

use super::{solve_normal, MarqFit, SolverError};

/// hard bounds on the damping parameter
const LM_MIN: f64 = 1e-10;
const LM_MAX: f64 = 1e10;

/// Levenberg-Marquardt solver for nonlinear inverse problems.
///
/// Repeatedly linearizes the forward operator around the current estimate
/// and solves the damped normal equations `(H + λ·diag(H))·Δ = −g`. The
/// damping parameter λ interpolates between Gauss-Newton (λ→0) and
/// steepest-descent (λ→∞) behavior and is tuned adaptively: shrunk after
/// every accepted step, grown after every rejected one. λ persists across
/// outer iterations, so a solve that needed heavy damping stays cautious.
pub struct Marquardt<F, J, R = Identity>
where
    F: Fn(&Dvec) -> Dvec,
    J: Fn(&Dvec) -> Dmat,
    R: Regularizer,
{
    /// the forward operator, mapping parameters to predicted data
    func: F,

    /// the Jacobian of `func`, re-evaluated at every outer iteration
    jac: J,

    reg: R,

    config: Config,
}

impl<F, J> Marquardt<F, J, Identity>
where
    F: Fn(&Dvec) -> Dvec,
    J: Fn(&Dvec) -> Dmat,
{
    pub fn new(func: F, jac: J) -> Self {
        Self {
            func,
            jac,
            reg: Identity,
            config: Config::default(),
        }
    }
}

impl<F, J, R> Marquardt<F, J, R>
where
    F: Fn(&Dvec) -> Dvec,
    J: Fn(&Dvec) -> Dmat,
    R: Regularizer,
{
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_regularizer<R2>(self, reg: R2) -> Marquardt<F, J, R2>
    where
        R2: Regularizer,
    {
        Marquardt {
            func: self.func,
            jac: self.jac,
            reg,
            config: self.config,
        }
    }

    /// Minimize `‖data − func(p)‖² + R(p)` starting from `init`.
    ///
    /// The returned goal history holds the goal function at `init` plus one
    /// entry per accepted iteration; its residuals always belong to the
    /// returned estimate. Running out of iterations before reaching the
    /// convergence tolerance is not an error; callers can detect it from
    /// the length and trend of the history.
    pub fn solve(
        &self,
        data: &Dvec,
        init: &Dvec,
    ) -> Result<MarqFit, SolverError> {
        let Config {
            lmstart,
            lmstep,
            maxsteps,
            maxit,
            tol,
        } = self.config.clone();

        let mut residuals = data - (self.func)(init);
        let mut goals = vec![residuals.norm_squared() + self.reg.norm(init)];

        let mut lm_param = lmstart;
        let mut next = init.clone();
        for _ in 0..maxit {
            let prev = next.clone();
            let jacobian = (self.jac)(&prev);
            let mut gradient = self
                .reg
                .gradient(&prev, -(jacobian.transpose() * &residuals));
            let hessian =
                self.reg.hessian(&prev, jacobian.transpose() * &jacobian);
            let hessian_diag = Dmat::from_diagonal(&hessian.diagonal());
            gradient.neg_mut();

            // residuals belonging to `prev`, restored if no damping value
            // pans out
            let prev_residuals = residuals.clone();
            let last_goal = goals[goals.len() - 1];

            // search for a damping value that improves the goal function
            let mut accepted = None;
            for _ in 0..maxsteps {
                let damped = &hessian + lm_param * &hessian_diag;
                let delta = solve_normal(damped, &gradient)?;
                next = &prev + delta;
                residuals = data - (self.func)(&next);
                let goal =
                    residuals.norm_squared() + self.reg.norm(&next);
                if goal < last_goal {
                    lm_param = (lm_param / lmstep).max(LM_MIN);
                    accepted = Some(goal);
                    break;
                }
                lm_param = (lm_param * lmstep).min(LM_MAX);
            }

            let Some(goal) = accepted else {
                // stagnation: discard the attempted step and return the
                // last accepted estimate
                next = prev;
                residuals = prev_residuals;
                warn!("convergence tolerance not achieved");
                break;
            };

            goals.push(goal);
            debug!("accepted goal {goal:e} with damping {lm_param:e}");

            let n = goals.len();
            if ((goals[n - 1] - goals[n - 2]) / goals[n - 2]).abs() <= tol {
                break;
            }
        }

        Ok(MarqFit {
            estimate: next,
            residuals,
            goals,
        })
    }
}
