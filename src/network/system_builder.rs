use super::reactor_net::ReactorNet;
use super::traits::{Conn, SaveData, ZeroD};
use crate::connector::wall::{Wall, WallVelocity};
use crate::error::{Result, SimError};
use crate::numerics::ode_solvers::Integrator;
use crate::reaction::gas::Gas;
use crate::zero_dim::environment::Environment;
use crate::zero_dim::reactor::Reactor;
use crate::{ObjectInfo, ObjectType, StoreData};
use tracing::debug;

#[derive(Clone, Default)]
pub struct SystemBuilder {
    objs_info: Vec<ObjectInfo>,
    zero_dim: Vec<Box<dyn ZeroD>>,
    connector: Vec<Box<dyn Conn>>,
    integrator: Integrator,
}

impl SystemBuilder {
    /// Creates a `SystemBuilder`. This object is used to construct the desired reactor network.
    /// The construction is made by the object methods exclusively.
    /// Once the building is finished, the network can be built using `build_system()` method.
    pub fn new() -> SystemBuilder {
        SystemBuilder::default()
    }

    /// Integrator used by the reactors added after this call
    pub fn with_integrator(&mut self, integrator: Integrator) -> &mut Self {
        self.integrator = integrator;
        self
    }

    /// Build a `ReactorNet`. `SystemBuilder` objects is consumed in the process.
    pub fn build_system(self) -> Result<ReactorNet> {
        ReactorNet::new(self.objs_info, self.zero_dim, self.connector)
    }

    /// Add a `Reactor`: closed ideal-gas reactor. The input `volume` must be in cubic meters [m³].
    /// The variable `gas` is cloned into the reactor.
    pub fn add_reactor(&mut self, elem_name: &str, volume: f64, gas: &Gas) -> Result<&mut Self> {
        self.check_name(elem_name)?;
        let reactor = Reactor::new(elem_name.to_string(), gas, volume, self.integrator)?;
        debug!("adding reactor `{}`: {:.4e} m³, {:.2} K, {:.0} Pa", elem_name, volume, gas.T(), gas.P());
        self.push_zero_dim(Box::new(reactor));
        Ok(self)
    }

    /// Add an `Environment`. It has constant temperature and pressure and infinite mass
    pub fn add_environment(&mut self, elem_name: &str, gas: &Gas) -> Result<&mut Self> {
        self.check_name(elem_name)?;
        let env = Environment::new(elem_name.to_string(), gas);
        debug!("adding environment `{}`", elem_name);
        self.push_zero_dim(Box::new(env));
        Ok(self)
    }

    /// Add a `Wall` of `area` [m²] and heat transfer coefficient `heat_transfer_coeff` [W/(m².K)].
    /// `conn` lists the objects on the left and right side; it may be completed later
    /// with `connect_from_to`.
    pub fn add_wall(
        &mut self,
        elem_name: &str,
        area: f64,
        heat_transfer_coeff: f64,
        velocity: Box<dyn WallVelocity>,
        conn: Vec<&str>,
    ) -> Result<&mut Self> {
        self.check_name(elem_name)?;
        for c in conn.iter() {
            if !self.is_zero_dim(c) {
                return Err(SimError::UnknownObject(c.to_string()));
            }
        }
        let connecting: Vec<String> = conn.iter().map(|c| c.to_string()).collect();
        let wall = Wall::new(elem_name, area, heat_transfer_coeff, velocity, connecting)?;
        debug!("adding wall `{}`: {:.4e} m², U = {} W/(m².K)", elem_name, area, heat_transfer_coeff);

        let i = self.connector.len();
        self.objs_info.push(ObjectInfo::new(
            elem_name.to_string(),
            ObjectType::Connector,
            i,
            StoreData::new(&wall.get_headers(), wall.num_storable_variables()),
        ));
        self.connector.push(Box::new(wall));
        Ok(self)
    }

    /// Connect a `connector` object to an element object. The inputs must be the name of the connector and element as `&str`
    pub fn connect_from_to(&mut self, connector: &str, elem_name: &str) -> Result<&mut Self> {
        if !self.is_zero_dim(elem_name) {
            return Err(SimError::UnknownObject(elem_name.to_string()));
        }

        let obj_info = self
            .objs_info
            .iter()
            .find(|info| info.name == connector)
            .ok_or_else(|| SimError::UnknownObject(connector.to_string()))?;

        match obj_info.obj_type {
            ObjectType::Connector => {
                let i = obj_info.index;
                self.connector[i].connect_to(elem_name)?;
            }
            ObjectType::ZeroDim => {
                return Err(SimError::connection(
                    connector,
                    format!("`{}` is not a connector and cannot be connected to `{}`", connector, elem_name),
                ));
            }
        }
        Ok(self)
    }

    fn push_zero_dim(&mut self, obj: Box<dyn ZeroD>) {
        let i = self.zero_dim.len();
        self.objs_info.push(ObjectInfo::new(
            obj.name().to_string(),
            ObjectType::ZeroDim,
            i,
            StoreData::new(&obj.get_headers(), obj.num_storable_variables()),
        ));
        self.zero_dim.push(obj);
    }

    fn check_name(&self, obj_name: &str) -> Result<()> {
        if self.does_it_exist(obj_name) {
            return Err(SimError::DuplicateName(obj_name.to_string()));
        }
        Ok(())
    }

    fn does_it_exist(&self, obj_name: &str) -> bool {
        self.objs_info.iter().any(|info| info.name == obj_name)
    }

    fn is_zero_dim(&self, obj_name: &str) -> bool {
        self.objs_info
            .iter()
            .any(|info| info.name == obj_name && info.obj_type == ObjectType::ZeroDim)
    }
}
