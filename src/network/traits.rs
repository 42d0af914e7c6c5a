use crate::error::Result;
use crate::{BasicProperties, WallFlux};
use dyn_clone::DynClone;
use ndarray::*;

// Super Traits
pub trait ZeroD: ZeroDim + SaveData + DynClone {}
pub trait Conn: Connector + SaveData + DynClone {}

dyn_clone::clone_trait_object!(ZeroD);
dyn_clone::clone_trait_object!(Conn);

pub trait ZeroDim {
    fn name(&self) -> &str;
    fn get_state(&self) -> BasicProperties<'_>;
    /// Advances the object from `time` to `time + dt`. `flux` returns the sum of the
    /// contributions of every connected wall at the requested time.
    fn advance(&mut self, time: f64, dt: f64, flux: &dyn Fn(f64) -> WallFlux) -> Result<()>;
}

pub trait Connector {
    fn name(&self) -> &str;
    fn connecting(&self) -> &Vec<String>;
    fn connect_to(&mut self, elem_name: &str) -> Result<()>;
    /// Receives the state of the connected objects, in the order of `connecting()`, at `time`
    fn update_state(&mut self, info: Vec<BasicProperties>, time: f64);
    /// Contribution to the object at position `side` of `connecting()`
    fn flux_at(&self, side: usize, time: f64) -> WallFlux;
}

pub trait SaveData {
    fn get_headers(&self) -> String;
    fn num_storable_variables(&self) -> usize;
    fn get_storable_data(&self) -> Array1<f64>;
}
