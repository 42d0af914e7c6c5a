use crate::error::{Result, SimError};
use crate::network::traits::{Conn, Connector, SaveData};
use crate::{BasicProperties, WallFlux};
use dyn_clone::DynClone;
use ndarray::*;

/// Velocity `[m/s]` of a wall as a function of time `[s]`.
///
/// Implementations must be pure: the integrator calls them at arbitrary sub-step times,
/// repeatedly and out of order.
pub trait WallVelocity: DynClone {
    fn velocity(&self, time: f64) -> f64;
}

dyn_clone::clone_trait_object!(WallVelocity);

/// Constant velocity
impl WallVelocity for f64 {
    fn velocity(&self, _: f64) -> f64 {
        *self
    }
}

/// Moving wall between two objects, `connecting[0]` on the left and `connecting[1]` on the right.
///
/// A positive velocity expands the left object by `area * velocity` and compresses the right one
/// by the same amount. Heat flows from left to right at `U * area * (T_left - T_right)`.
#[derive(Clone)]
pub struct Wall {
    name: String,
    area: f64,
    heat_transfer_coeff: f64,
    velocity: Box<dyn WallVelocity>,
    connecting: Vec<String>,
    temperatures: Vec<f64>,
    time: f64,
}

impl Wall {
    /// `area` in m², `heat_transfer_coeff` in W/(m².K)
    pub fn new(
        name: &str,
        area: f64,
        heat_transfer_coeff: f64,
        velocity: Box<dyn WallVelocity>,
        connecting: Vec<String>,
    ) -> Result<Wall> {
        if !(area > 0.0 && area.is_finite()) {
            return Err(SimError::connection(name, format!("`area` must be greater than zero: {}", area)));
        }
        if !(heat_transfer_coeff >= 0.0 && heat_transfer_coeff.is_finite()) {
            return Err(SimError::connection(
                name,
                format!("`heat_transfer_coeff` cannot be negative: {}", heat_transfer_coeff),
            ));
        }
        if connecting.len() > 2 {
            return Err(SimError::connection(
                name,
                format!("a wall connects only two elements, connecting: {}", connecting.len()),
            ));
        }
        Ok(Wall {
            name: name.to_string(),
            area,
            heat_transfer_coeff,
            velocity,
            temperatures: vec![0.0; connecting.len()],
            connecting,
            time: 0.0,
        })
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn heat_transfer_coeff(&self) -> f64 {
        self.heat_transfer_coeff
    }

    /// Volume rate `[m³/s]` expanding the left side at `time`
    pub fn expansion_rate(&self, time: f64) -> f64 {
        self.area * self.velocity.velocity(time)
    }

    /// Heat rate `[W]` leaving the left side, from the last received temperatures
    pub fn heat_rate(&self) -> f64 {
        if self.temperatures.len() != 2 {
            return 0.0;
        }
        self.heat_transfer_coeff * self.area * (self.temperatures[0] - self.temperatures[1])
    }
}

impl Connector for Wall {
    fn name(&self) -> &str {
        &self.name
    }
    fn connecting(&self) -> &Vec<String> {
        &self.connecting
    }
    fn connect_to(&mut self, elem_name: &str) -> Result<()> {
        if self.connecting.len() >= 2 {
            return Err(SimError::connection(
                &self.name,
                format!("unable to connect `{}`: a wall connects only two elements", elem_name),
            ));
        }
        if self.connecting.iter().any(|c| c == elem_name) {
            return Err(SimError::connection(
                &self.name,
                format!("`{}` is already connected", elem_name),
            ));
        }
        self.connecting.push(elem_name.to_string());
        self.temperatures.push(0.0);
        Ok(())
    }
    fn update_state(&mut self, info: Vec<BasicProperties>, time: f64) {
        self.temperatures = info.iter().map(|p| p.temperature).collect();
        self.time = time;
    }
    fn flux_at(&self, side: usize, time: f64) -> WallFlux {
        let volume_rate = self.expansion_rate(time);
        let heat_rate = self.heat_rate();
        match side {
            0 => WallFlux {
                volume_rate,
                heat_rate: -heat_rate,
            },
            _ => WallFlux {
                volume_rate: -volume_rate,
                heat_rate,
            },
        }
    }
}

impl SaveData for Wall {
    fn get_headers(&self) -> String {
        "velocity [m/s]\tvolume rate [m³/s]\theat rate [W]".to_string()
    }
    fn num_storable_variables(&self) -> usize {
        3
    }
    fn get_storable_data(&self) -> Array1<f64> {
        array![
            self.velocity.velocity(self.time),
            self.expansion_rate(self.time),
            self.heat_rate()
        ]
    }
}

impl Conn for Wall {}
