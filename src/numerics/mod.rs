//! Numerical building blocks: single-step ODE integrators and interpolation
pub mod interpolation;
pub mod ode_solvers;
