//! Zero-dimensional objects: reactors and environments
pub mod environment;
pub mod reactor;
