//! Contains **Gas** struct and the thermodynamic data it is built from
pub mod gas;
mod json_data;
pub mod thermo;
