//! Rapid compression machine inputs: recorded traces, the velocity profile derived from a volume
//! trace and the analysis of pressure traces
pub mod data_file;
pub mod trace;
pub mod velocity_profile;
