//! Scalar root finding.
//!
//! Brent's method on a bracketed, sign-changing function. Evaluations may
//! fail (the function returns [`CalcResult`]), in which case the error is
//! propagated unchanged.

use crate::errors::{CalcError, CalcResult};

/// Converged root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub x: f64,
    /// Function value at `x`
    pub fx: f64,
    /// Function evaluations spent inside the bracket
    pub iterations: usize,
}

/// Find a root of `f` in `[a, b]` given `fa = f(a)` and `fb = f(b)` of opposite sign.
///
/// Stops when `|f(x)| <= f_tol` or the bracket shrinks below `x_tol`.
/// Exceeding `max_iterations` yields [`CalcError::SolverNonConvergence`]
/// carrying the best estimate and its residual.
#[allow(clippy::too_many_arguments)]
pub fn brent<F>(
    mut f: F,
    mut a: f64,
    mut b: f64,
    mut fa: f64,
    mut fb: f64,
    x_tol: f64,
    f_tol: f64,
    max_iterations: usize,
) -> CalcResult<Root>
where
    F: FnMut(f64) -> CalcResult<f64>,
{
    if fa.abs() <= f_tol {
        return Ok(Root { x: a, fx: fa, iterations: 0 });
    }
    if fb.abs() <= f_tol {
        return Ok(Root { x: b, fx: fb, iterations: 0 });
    }
    if fa.signum() == fb.signum() {
        return Err(CalcError::Internal {
            message: format!("root not bracketed: f({}) = {}, f({}) = {}", a, fa, b, fb),
        });
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=max_iterations {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * x_tol;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb.abs() <= f_tol {
            return Ok(Root {
                x: b,
                fx: fb,
                iterations: iteration,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            // inverse quadratic interpolation, or secant when only two points are distinct
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let qa = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * qa * (qa - r) - (b - a) * (r - 1.0)),
                    (qa - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = f(b)?;
    }

    Err(CalcError::non_convergence(max_iterations, b, fb))
}
