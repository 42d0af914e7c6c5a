//! Objects that connect two zero-dimensional objects
pub mod wall;
