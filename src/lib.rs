//! # rcm_simulator
//!
//! The `rcm_simulator` crate models zero-dimensional ideal-gas reactors, with constant or
//! variable volume, and compares their pressure and temperature histories with rapid
//! compression machine (RCM) experiments. A recorded volume trace drives a moving wall through
//! a piecewise-constant [`VelocityProfile`].

use ansi_term::Style;
use ndarray::Array1;
use std::ops::Add;

pub mod config;
mod connector;
pub mod doc;
pub mod error;
mod network;
mod numerics;
pub mod rcm;
mod reaction;
pub mod simulation;
mod zero_dim;

// Re-exporting
pub use crate::connector::wall::{Wall, WallVelocity};
pub use crate::network::reactor_net::ReactorNet;
pub use crate::network::system_builder::SystemBuilder;
pub use crate::error::{Result, SimError};
pub use crate::numerics::ode_solvers::{self, Integrator};
pub use crate::numerics::interpolation;
pub use crate::rcm::velocity_profile::VelocityProfile;
pub use crate::reaction::gas::Gas;
pub use crate::reaction::thermo;
pub use crate::zero_dim::{environment::Environment, reactor::Reactor};

// Object's type
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ObjectType {
    ZeroDim,
    Connector,
}

#[derive(Debug, Clone)]
pub struct BasicProperties<'a> {
    pub name: &'a str,
    pub pressure: f64,      // Pa
    pub temperature: f64,   // K
    pub volume: Option<f64>, // m³, `None` for objects of infinite size
    pub cp: f64,            // J/(kg.K)
    pub cv: f64,            // J/(kg.K)
    pub cp_cv: f64,
    pub gas_const: f64,     // J/(kg.K)
}

impl<'a> std::fmt::Display for BasicProperties<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let volume = match self.volume {
            Some(v) => format!("{} [m³]", v),
            None => "infinite".to_string(),
        };
        write!(f, "{}:
        pressure: {} [Pa]
        temperature: {} [K]
        volume: {}
        cp: {} [J/(kg.K)]
        cv: {} [J/(kg.K)]
        cp/cv: {}
        R: {} [J/(kg.K)]",
        Style::new().bold().paint(self.name),
        self.pressure,
        self.temperature,
        volume,
        self.cp,
        self.cv,
        self.cp_cv,
        self.gas_const)
    }
}

/// Contribution of a wall to one of its sides
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WallFlux {
    pub volume_rate: f64, // m³/s, positive when the side expands
    pub heat_rate: f64,   // W, positive when heat enters the side
}

impl WallFlux {
    pub fn new() -> WallFlux {
        WallFlux {
            volume_rate: 0.0,
            heat_rate: 0.0,
        }
    }
}

impl Add for WallFlux {
    type Output = WallFlux;
    fn add(self, other: WallFlux) -> WallFlux {
        WallFlux {
            volume_rate: self.volume_rate + other.volume_rate,
            heat_rate: self.heat_rate + other.heat_rate,
        }
    }
}

impl<'a, 'b> Add<&'b WallFlux> for &'a WallFlux {
    type Output = WallFlux;
    fn add(self, other: &'b WallFlux) -> WallFlux {
        WallFlux {
            volume_rate: self.volume_rate + other.volume_rate,
            heat_rate: self.heat_rate + other.heat_rate,
        }
    }
}

/// History of the storable variables of one object
#[derive(Debug, Clone)]
pub(crate) struct StoreData {
    pub headers: String,
    pub num_variables: usize,
    pub data: Vec<Array1<f64>>,
}

impl StoreData {
    pub fn new(headers: &str, num_variables: usize) -> StoreData {
        StoreData {
            headers: headers.to_string(),
            num_variables,
            data: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ObjectInfo {
    pub name: String,
    pub obj_type: ObjectType,
    pub index: usize,
    pub stored: StoreData,
}

impl ObjectInfo {
    pub fn new(name: String, obj_type: ObjectType, index: usize, stored: StoreData) -> ObjectInfo {
        ObjectInfo {
            name,
            obj_type,
            index,
            stored,
        }
    }
}
