use crate::error::Result;
use crate::network::traits::{SaveData, ZeroD, ZeroDim};
use crate::reaction::gas::Gas;
use crate::{BasicProperties, WallFlux};
use ndarray::*;

/// Zero-Dimensional struct with constant pressure, temperature and composition.
#[derive(Debug, Clone)]
pub struct Environment {
    name: String,
    gas: Gas,
}

impl Environment {
    pub fn new(name: String, gas: &Gas) -> Environment {
        Environment {
            name,
            gas: gas.clone(),
        }
    }
}

impl ZeroDim for Environment {
    fn name(&self) -> &str {
        &self.name
    }
    fn get_state(&self) -> BasicProperties<'_> {
        BasicProperties {
            name: self.name(),
            pressure: self.gas.P(),
            temperature: self.gas.T(),
            volume: None,
            cp: self.gas.cp(),
            cv: self.gas.cv(),
            cp_cv: self.gas.k(),
            gas_const: self.gas.R(),
        }
    }
    fn advance(&mut self, _: f64, _: f64, _: &dyn Fn(f64) -> WallFlux) -> Result<()> {
        Ok(())
    }
}

impl SaveData for Environment {
    fn get_headers(&self) -> String {
        "pressure [bar]\ttemperature [K]".to_string()
    }
    fn num_storable_variables(&self) -> usize {
        2
    }
    fn get_storable_data(&self) -> Array1<f64> {
        array![self.gas.P() / 1e5, self.gas.T()]
    }
}

impl ZeroD for Environment {}
