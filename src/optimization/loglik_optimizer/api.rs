//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! [`maximize`] validates the start point, wraps the model in an
//! `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`), builds the L-BFGS solver for
//! the configured line search and runs it.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        solver::{HagerZhangLS, MoreThuenteLS, lbfgs, run},
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` with L-BFGS starting from `theta0`.
///
/// # Errors
/// - Any error from `f.check(theta0, data)`.
/// - Solver construction errors (invalid tolerances).
/// - Runtime errors from the executor, e.g. a line search that cannot find
///   an acceptable step or a cost that turns non-finite.
///
/// A run stopped by `opts.timeout` is *not* an error; it returns the best
/// point so far with `timed_out = true`.
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => run(theta0, opts, problem, lbfgs(MoreThuenteLS::new(), opts)?),
        LineSearcher::HagerZhang => run(theta0, opts, problem, lbfgs(HagerZhangLS::new(), opts)?),
    }
}
