//! # Example of an RCM run
//!
//! ## The rcm.json file
//!
//! ```text
//! {
//!     "mechanism": "air.json",
//!     "initial_state": {
//!         "temperature": 297.4,
//!         "pressure": 127722.8,
//!         "mole_fractions": "O2:0.21, N2:0.78, AR:0.01"
//!     },
//!     "reactor": {
//!         "kind": "variable_volume",
//!         "volume": 1.0,
//!         "heat_transfer_coeff": 0.0
//!     },
//!     "volume_trace": "volume.csv",
//!     "pressure_trace": "pressure.csv",
//!     "pressure_unit": "bar",
//!     "time_unit": "s",
//!     "end_time": 0.05,
//!     "time_step": 1e-5,
//!     "integrator": "rk4",
//!     "output": "reactor.tsv"
//! }
//! ```
//!
//! `volume.csv` holds the normalized volume of the machine against time. The wall area
//! defaults to the initial volume, so the reactor volume is `volume * V(t)`.
//!
//! ## Running it
//!
//! ```text
//! $ RUST_LOG=debug rcm-sim data/rcm.json --end-time 0.04
//! ```
//!
//! The same run from code:
//!
//! ```no_run
//! use rcm_simulator::simulation::Simulation;
//!
//! let sim = Simulation::from_file("data/rcm.json").unwrap();
//! let result = sim.run().unwrap();
//! println!("{}", sim.compare(&result));
//! ```
//!
//! ## Building a network by hand
//!
//! ```
//! use rcm_simulator::{doc::AIR_MECHANISM, Gas, SystemBuilder};
//!
//! let mut gas = Gas::from_json_str(AIR_MECHANISM).unwrap();
//! gas.TP(300.0, 1e5).unwrap();
//! let mut builder = SystemBuilder::new();
//! builder
//!     .add_reactor("reactor", 1e-4, &gas).unwrap()
//!     .add_environment("env", &gas).unwrap()
//!     .add_wall("piston", 1e-4, 0.0, Box::new(-10.0), vec!["reactor", "env"]).unwrap();
//! let mut net = builder.build_system().unwrap();
//! net.advance_to(0.05, 1e-4).unwrap();
//! let state = net.get_state("reactor").unwrap();
//! assert!((state.volume.unwrap() - 0.5e-4).abs() < 1e-12);
//! ```

/// Air mechanism (O2, N2, AR) with GRI-3.0 NASA polynomials
pub const AIR_MECHANISM: &str = include_str!("../../data/air.json");
