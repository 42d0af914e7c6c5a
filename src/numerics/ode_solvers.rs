//! Solver for system of ordinary differential equations (ODE)

use ndarray::*;
use serde::{Deserialize, Serialize};

/// Explicit one-step methods available to advance a reactor state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    #[default]
    Rk4,
    Euler,
}

impl Integrator {
    pub fn step<F>(&self, f: F, x: &Array1<f64>, t: f64, step: f64) -> Array1<f64>
    where
        F: Fn(f64, &Array1<f64>) -> Array1<f64>,
    {
        match self {
            Integrator::Rk4 => rk4_step(f, x, t, step),
            Integrator::Euler => euler_step(f, x, t, step),
        }
    }
}

/// Integrates a system of ODEs over a single time step using 4th order Runge-Kutta
///
/// `x` is the initial condition stored in a 1D-ndarray form and `t` the time at the beginning of the step.
///
/// # Examples
///
/// Let's solve the famous Lorentz system of equations:
/// ```
/// use ndarray::*;
/// use rcm_simulator::ode_solvers::rk4_step;
///
/// let lorentz_eqs = |_t: f64, x: &Array1<f64>| -> Array1<f64> {
///     array![ 10.0 * (x[1] - x[0]),
///             x[0] * (28.0 - x[2]) - x[1],
///             x[0] * x[1] - 8.0/3.0 * x[2] ]
///     };
/// let ini_state = array![0.1, 0.1, 0.1];
/// let solution = rk4_step( lorentz_eqs, &ini_state, 0.0, 1e-4 );
/// assert_eq!(solution.len(), 3);
/// ```
pub fn rk4_step<F>(f: F, x: &Array1<f64>, t: f64, step: f64) -> Array1<f64>
where
    F: Fn(f64, &Array1<f64>) -> Array1<f64>,
{
    let half = step / 2.0;
    let t_half = t + half;
    let k1 = f(t, x);
    let k2 = f(t_half, &(x + &(&k1 * half)));
    let k3 = f(t_half, &(x + &(&k2 * half)));
    let k4 = f(t + step, &(x + &(&k3 * step)));
    x + &((step / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4))
}

/// Integrates a system of ODEs over a single time step using explicit Euler method
pub fn euler_step<F>(f: F, x: &Array1<f64>, t: f64, step: f64) -> Array1<f64>
where
    F: Fn(f64, &Array1<f64>) -> Array1<f64>,
{
    let k1 = f(t, x);
    x + &(step * k1)
}
