use crate::error::{Result, SimError};
use crate::network::traits::{SaveData, ZeroD, ZeroDim};
use crate::numerics::ode_solvers::Integrator;
use crate::reaction::gas::Gas;
use crate::{BasicProperties, WallFlux};
use ansi_term::Style;
use ndarray::*;

/// Closed ideal-gas reactor: constant mass and composition, volume changed by its walls.
///
/// Without walls it is a constant-volume reactor. The energy balance is
/// `m cv dT/dt = Q - P dV/dt` with `P = m R T / V`.
#[derive(Debug, Clone)]
pub struct Reactor {
    name: String,
    gas: Gas,
    volume: f64, // [m³]
    mass: f64,   // [kg]
    integrator: Integrator,
}

impl Reactor {
    /// `volume` must be in cubic meters [m³]
    pub fn new(name: String, gas: &Gas, volume: f64, integrator: Integrator) -> Result<Reactor> {
        if !(volume > 0.0 && volume.is_finite()) {
            return Err(SimError::state(&name, format!("`volume` must be greater than zero: {}", volume)));
        }

        Ok(Reactor {
            mass: gas.rho() * volume,
            name,
            gas: gas.clone(),
            volume,
            integrator,
        })
    }

    pub fn gas(&self) -> &Gas {
        &self.gas
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }
}

impl ZeroDim for Reactor {
    fn name(&self) -> &str {
        &self.name
    }
    fn get_state(&self) -> BasicProperties<'_> {
        BasicProperties {
            name: self.name(),
            pressure: self.gas.P(),
            temperature: self.gas.T(),
            volume: Some(self.volume),
            cp: self.gas.cp(),
            cv: self.gas.cv(),
            cp_cv: self.gas.k(),
            gas_const: self.gas.R(),
        }
    }
    fn advance(&mut self, time: f64, dt: f64, flux: &dyn Fn(f64) -> WallFlux) -> Result<()> {
        let mass = self.mass;
        let gas_const = self.gas.R();
        let cv = self.gas.cv();
        let reactor_equations = |t: f64, x: &Array1<f64>| -> Array1<f64> {
            // x[0] = temperature, x[1] = volume
            let wall = flux(t);
            let press = mass * gas_const * x[0] / x[1];
            let d_temp = (wall.heat_rate - press * wall.volume_rate) / (mass * cv); // [K/s]
            array![d_temp, wall.volume_rate]
        };

        let ini = array![self.gas.T(), self.volume];
        let integrated = self.integrator.step(reactor_equations, &ini, time, dt);
        let temp = integrated[0];
        let vol = integrated[1];
        if !(vol > 0.0 && vol.is_finite()) {
            return Err(SimError::state(
                &self.name,
                format!("volume became non-positive at t = {} s: {}", time + dt, vol),
            ));
        }
        if !(temp > 0.0 && temp.is_finite()) {
            return Err(SimError::state(
                &self.name,
                format!("temperature became non-positive at t = {} s: {}", time + dt, temp),
            ));
        }

        let press = mass * gas_const * temp / vol;
        self.gas.TP(temp, press)?;
        self.volume = vol;
        Ok(())
    }
}

impl SaveData for Reactor {
    fn get_headers(&self) -> String {
        "pressure [bar]\ttemperature [K]\tvolume [cm³]\tmass [mg]".to_string()
    }
    fn num_storable_variables(&self) -> usize {
        4
    }
    fn get_storable_data(&self) -> Array1<f64> {
        array![self.gas.P() / 1e5, self.gas.T(), self.volume * 1e6, self.mass * 1e6]
    }
}

impl ZeroD for Reactor {}

impl std::fmt::Display for Reactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:
        gas: `{}` ({})
        temperature: {:.2} [K]
        pressure: {:.4} [bar]
        volume: {:.4e} [m³]
        mass: {:.4e} [kg]",
            Style::new().bold().paint(&self.name),
            self.gas.name(),
            self.gas.composition(),
            self.gas.T(),
            self.gas.P() / 1e5,
            self.volume,
            self.mass,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::AIR_MECHANISM;

    fn reactor(volume: f64) -> Reactor {
        let mut gas = Gas::from_json_str(AIR_MECHANISM).unwrap();
        gas.TPX(300.0, 1e5, "O2:0.21, N2:0.79").unwrap();
        Reactor::new("r".to_string(), &gas, volume, Integrator::Rk4).unwrap()
    }

    #[test]
    fn mass_follows_ideal_gas_law() {
        let r = reactor(2.0);
        assert!((r.mass() - 2.0 * 1e5 / (r.gas().R() * 300.0)).abs() < 1e-12);
    }

    #[test]
    fn no_walls_keeps_state() {
        let mut r = reactor(1.0);
        for i in 0..10 {
            r.advance(i as f64 * 1e-3, 1e-3, &|_| WallFlux::new()).unwrap();
        }
        assert_eq!(r.volume(), 1.0);
        assert!((r.gas().T() - 300.0).abs() < 1e-9);
        assert!((r.gas().P() - 1e5).abs() < 1e-6);
    }

    #[test]
    fn adiabatic_compression_heats_the_gas() {
        let mut r = reactor(1.0);
        let compression = |_: f64| WallFlux {
            volume_rate: -50.0,
            heat_rate: 0.0,
        };
        let dt = 1e-5;
        for i in 0..1000 {
            r.advance(i as f64 * dt, dt, &compression).unwrap();
        }
        assert!((r.volume() - 0.5).abs() < 1e-9);
        // isentropic estimate with k ~ 1.4: T2 = 300 * 2^0.4 ~ 396 K
        assert!(r.gas().T() > 385.0 && r.gas().T() < 405.0);
        assert!(r.gas().P() > 2.5e5 && r.gas().P() < 2.8e5);
    }

    #[test]
    fn heat_input_at_constant_volume() {
        let mut r = reactor(1.0);
        let q = 1000.0;
        let heating = move |_: f64| WallFlux {
            volume_rate: 0.0,
            heat_rate: q,
        };
        r.advance(0.0, 1.0, &heating).unwrap();
        let expected = 300.0 + q / (r.mass() * r.gas().cv());
        assert!((r.gas().T() - expected).abs() < 0.05);
    }

    #[test]
    fn collapsing_volume_is_an_error() {
        let mut r = reactor(1.0);
        let crush = |_: f64| WallFlux {
            volume_rate: -2.0,
            heat_rate: 0.0,
        };
        assert!(matches!(r.advance(0.0, 1.0, &crush), Err(SimError::State { .. })));
        assert_eq!(r.volume(), 1.0);
    }

    #[test]
    fn non_positive_volume_is_rejected() {
        let gas = Gas::from_json_str(AIR_MECHANISM).unwrap();
        assert!(Reactor::new("r".to_string(), &gas, 0.0, Integrator::Rk4).is_err());
    }
}
