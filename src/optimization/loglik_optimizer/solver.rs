//! L-BFGS construction and execution.
//!
//! Purpose
//! -------
//! Build an argmin L-BFGS solver for the line search named in
//! [`MLEOptions`] and run it over an [`ArgMinAdapter`], turning the final
//! iteration state into an [`OptimOutcome`].
//!
//! Conventions
//! -----------
//! - History size is `opts.lbfgs_mem`, or [`DEFAULT_LBFGS_MEM`].
//! - Unset tolerances keep argmin's defaults.
//! - The iteration cap and deadline are executor settings, applied in
//!   [`run`]; a deadline stop is reported through `timed_out`, not as an
//!   error.
use argmin::{
    core::{Executor, IterState, Solver, State},
    solver::{
        linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
        quasinewton::LBFGS,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;
use ndarray::Array1;
use std::collections::HashMap;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        traits::{LogLikelihood, MLEOptions, OptimOutcome},
    },
};

/// Unconstrained parameter vector θ.
pub type Theta = Array1<f64>;

/// Gradient with the shape of [`Theta`].
pub type Grad = Array1<f64>;

pub type Cost = f64;

/// Solver counters keyed by name (`"cost_count"`, `"gradient_count"`).
pub type FnEvalMap = HashMap<String, u64>;

pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

type Lbfgs<L> = LBFGS<L, Theta, Grad, Cost>;
type LbfgsState = IterState<Theta, Grad, (), (), (), Cost>;

/// L-BFGS over `line_search` with the history size and tolerances in
/// `opts`.
///
/// # Errors
/// argmin rejections of a tolerance value.
pub fn lbfgs<L>(line_search: L, opts: &MLEOptions) -> OptResult<Lbfgs<L>> {
    let mut solver = LBFGS::new(line_search, opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM));
    if let Some(tol) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(tol)?;
    }
    if let Some(tol) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(tol)?;
    }
    Ok(solver)
}

/// Run `solver` on `problem` from `theta0`.
///
/// The outcome's `value` is the best log-likelihood, i.e. the negated best
/// cost.
///
/// # Errors
/// - argmin runtime failures, with a wrapped `OptError` recovered intact.
/// - [`OptimOutcome::new`] rejections of the final state.
pub fn run<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, LbfgsState> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let start = -problem.cost(&theta0)?;
        let grad_norm = problem.gradient(&theta0).ok().map(|g| g.l2_norm());
        tracing::debug!(loglik = start, grad_norm = ?grad_norm, "optimizer start");
    }

    let mut executor = Executor::new(problem, solver).configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        executor = executor.configure(|state| state.max_iters(max_iter as u64));
    }
    if let Some(deadline) = opts.timeout {
        executor = executor.timeout(deadline);
    }
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        executor = executor.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        );
    }

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let grad = state.take_gradient();
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        termination,
        iterations,
        fn_evals,
        grad,
    )
}
