//! Harness of an RCM run: builds the reactor network described by an [`RcmConfig`], steps it
//! to the end time and compares the result with the experimental traces.

use crate::config::{RcmConfig, ReactorKind};
use crate::error::Result;
use crate::network::reactor_net::{step_targets, ReactorNet};
use crate::network::system_builder::SystemBuilder;
use crate::rcm::data_file::{read_two_columns, DataSeries};
use crate::rcm::trace::{self, TraceComparison};
use crate::rcm::velocity_profile::VelocityProfile;
use crate::reaction::gas::Gas;
use ansi_term::Style;
use tracing::{debug, info, warn};

pub const REACTOR: &str = "reactor";
pub const ENVIRONMENT: &str = "environment";
pub const PISTON: &str = "piston";

/// Reactor history, one entry per stored step, initial state included
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationResult {
    pub time: Vec<f64>,        // [s]
    pub temperature: Vec<f64>, // [K]
    pub pressure: Vec<f64>,    // [Pa]
    pub volume: Vec<f64>,      // [m³]
}

impl SimulationResult {
    fn record(&mut self, net: &ReactorNet) -> Result<()> {
        let state = net.get_state(REACTOR)?;
        self.time.push(net.time());
        self.temperature.push(state.temperature);
        self.pressure.push(state.pressure);
        self.volume.push(state.volume.unwrap_or(f64::NAN));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time and value of the highest pressure
    pub fn peak_pressure(&self) -> Option<(f64, f64)> {
        self.time
            .iter()
            .zip(self.pressure.iter())
            .fold(None, |best: Option<(f64, f64)>, (&t, &p)| match best {
                Some((_, pmax)) if pmax >= p => best,
                _ => Some((t, p)),
            })
    }

    /// Time and value of the smallest volume
    pub fn min_volume(&self) -> Option<(f64, f64)> {
        self.time
            .iter()
            .zip(self.volume.iter())
            .fold(None, |best: Option<(f64, f64)>, (&t, &v)| match best {
                Some((_, vmin)) if vmin <= v => best,
                _ => Some((t, v)),
            })
    }
}

/// What can be learned from the experimental traces against a simulated history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentSummary {
    pub end_of_compression: Option<f64>, // [s]
    pub ignition_delay: Option<f64>,     // [s]
    pub pressure: Option<TraceComparison>, // [Pa]
}

impl std::fmt::Display for ExperimentSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let opt = |v: Option<f64>, scale: f64, unit: &str| match v {
            Some(v) => format!("{:.3} [{}]", v * scale, unit),
            None => "-".to_string(),
        };
        writeln!(f, "{}", Style::new().bold().paint("experiment"))?;
        writeln!(f, "        end of compression: {}", opt(self.end_of_compression, 1e3, "ms"))?;
        write!(f, "        ignition delay: {}", opt(self.ignition_delay, 1e3, "ms"))?;
        if let Some(cmp) = &self.pressure {
            write!(
                f,
                "\n        pressure RMS error: {:.4} [bar] (max {:.4} [bar], {} samples)",
                cmp.rms_error / 1e5,
                cmp.max_abs_error / 1e5,
                cmp.samples
            )?;
        }
        Ok(())
    }
}

/// A configured run. The initial network is kept so that `run` can be repeated.
#[derive(Clone)]
pub struct Simulation {
    config: RcmConfig,
    gas: Gas,
    profile: Option<VelocityProfile>,
    volume_trace: Option<DataSeries>,
    pressure_trace: Option<DataSeries>,
    net: ReactorNet,
}

impl Simulation {
    pub fn from_config(config: RcmConfig) -> Result<Simulation> {
        config.validate()?;
        let mut gas = Gas::from_file(&config.mechanism)?;
        let ini = &config.initial_state;
        match &ini.mole_fractions {
            Some(x) => gas.TPX(ini.temperature, ini.pressure, x)?,
            None => gas.TP(ini.temperature, ini.pressure)?,
        }
        info!("initial state: {:.2} K, {:.0} Pa, {}", gas.T(), gas.P(), gas.composition());

        let to_seconds = config.time_unit.to_seconds();
        let volume_trace = match &config.volume_trace {
            Some(path) => {
                let raw = read_two_columns(path)?;
                Some(DataSeries::new(raw.time() * to_seconds, raw.values().clone())?)
            }
            None => None,
        };
        let pressure_trace = match &config.pressure_trace {
            Some(path) => {
                let raw = read_two_columns(path)?.scaled(config.pressure_unit.to_pascal());
                Some(DataSeries::new(raw.time() * to_seconds, raw.values().clone())?)
            }
            None => None,
        };

        let mut builder = SystemBuilder::new();
        builder
            .with_integrator(config.integrator)
            .add_reactor(REACTOR, config.reactor.volume, &gas)?;

        let profile = match (config.reactor.kind, &volume_trace) {
            (ReactorKind::VariableVolume, Some(series)) => {
                let profile = VelocityProfile::new(series.time().clone(), series.values().clone())?;
                debug!(
                    "velocity profile of {} samples over [{}, {}] s",
                    profile.len(),
                    profile.start_time(),
                    profile.end_time()
                );
                if config.end_time > profile.end_time() {
                    warn!(
                        "volume trace ends at {} s, the piston stays still until {} s",
                        profile.end_time(),
                        config.end_time
                    );
                }
                builder.add_environment(ENVIRONMENT, &gas)?.add_wall(
                    PISTON,
                    config.wall_area(),
                    config.reactor.heat_transfer_coeff,
                    Box::new(profile.clone()),
                    vec![REACTOR, ENVIRONMENT],
                )?;
                Some(profile)
            }
            (ReactorKind::VariableVolume, None) => None, // rejected by `validate`
            (ReactorKind::ConstantVolume, _) => {
                if config.reactor.heat_transfer_coeff > 0.0 {
                    builder.add_environment(ENVIRONMENT, &gas)?.add_wall(
                        PISTON,
                        config.wall_area(),
                        config.reactor.heat_transfer_coeff,
                        Box::new(0.0),
                        vec![REACTOR, ENVIRONMENT],
                    )?;
                }
                None
            }
        };

        let net = builder.build_system()?;
        Ok(Simulation {
            config,
            gas,
            profile,
            volume_trace,
            pressure_trace,
            net,
        })
    }

    pub fn from_file(config_file: impl AsRef<std::path::Path>) -> Result<Simulation> {
        Simulation::from_config(RcmConfig::from_file(config_file)?)
    }

    pub fn config(&self) -> &RcmConfig {
        &self.config
    }

    pub fn gas(&self) -> &Gas {
        &self.gas
    }

    pub fn profile(&self) -> Option<&VelocityProfile> {
        self.profile.as_ref()
    }

    pub fn volume_trace(&self) -> Option<&DataSeries> {
        self.volume_trace.as_ref()
    }

    pub fn pressure_trace(&self) -> Option<&DataSeries> {
        self.pressure_trace.as_ref()
    }

    /// Network in its initial state
    pub fn network(&self) -> &ReactorNet {
        &self.net
    }

    /// Steps a copy of the initial network from 0 to `end_time`. The reactor history is
    /// written to `output` when configured.
    pub fn run(&self) -> Result<SimulationResult> {
        let mut net = self.net.clone();
        let end_time = self.config.end_time;
        let dt = self.config.time_step;
        info!("running until {} s with steps of {} s", end_time, dt);

        let mut result = SimulationResult::default();
        result.record(&net)?;
        for target in step_targets(net.time(), end_time, dt) {
            let step = target - net.time();
            net.advance(step)?;
            result.record(&net)?;
        }

        if let Some(path) = &self.config.output {
            net.write_to_file(path, REACTOR, None)?;
        }
        if let Some((t, p)) = result.peak_pressure() {
            info!("finished after {} steps, peak pressure {:.4} bar at {:.4e} s", result.len() - 1, p / 1e5, t);
        }
        Ok(result)
    }

    /// End of compression and ignition delay of the experiment, and the pressure error of `result`
    pub fn compare(&self, result: &SimulationResult) -> ExperimentSummary {
        let end_of_compression = self
            .volume_trace
            .as_ref()
            .and_then(trace::end_of_compression)
            .map(|(_, t)| t);
        let ignition_delay = match (&self.pressure_trace, end_of_compression) {
            (Some(pressure), Some(eoc)) => trace::ignition_delay(pressure, eoc),
            _ => None,
        };
        let pressure = self
            .pressure_trace
            .as_ref()
            .and_then(|exp| trace::compare(&result.time, &result.pressure, exp));
        if self.pressure_trace.is_some() && pressure.is_none() {
            warn!("no experimental pressure sample lies inside the simulated time");
        }
        ExperimentSummary {
            end_of_compression,
            ignition_delay,
            pressure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::AIR_MECHANISM;
    use std::path::Path;

    fn write_case(dir: &Path, kind: &str, extra: &str) -> std::path::PathBuf {
        std::fs::write(dir.join("air.json"), AIR_MECHANISM).unwrap();
        std::fs::write(
            dir.join("volume.csv"),
            "time [s], volume [-]\n0.0, 1.0\n0.01, 0.8\n0.02, 0.6\n0.03, 0.5\n0.05, 0.5\n",
        )
        .unwrap();
        let config = format!(
            r#"{{
                "mechanism": "air.json",
                "initial_state": {{ "temperature": 300.0, "pressure": 1e5 }},
                "reactor": {{ "kind": "{}", "volume": 1.0 }},
                "volume_trace": "volume.csv",
                "end_time": 0.04,
                "time_step": 1e-4{}
            }}"#,
            kind, extra
        );
        let path = dir.join("rcm.json");
        std::fs::write(&path, config).unwrap();
        path
    }

    #[test]
    fn variable_volume_follows_the_trace() {
        let dir = tempfile::tempdir().unwrap();
        let sim = Simulation::from_file(write_case(dir.path(), "variable_volume", "")).unwrap();
        assert!(sim.profile().is_some());
        let result = sim.run().unwrap();
        assert_eq!(result.len(), 401);
        assert_eq!(result.time[0], 0.0);
        assert_eq!(result.volume[0], 1.0);
        let v_end = *result.volume.last().unwrap();
        assert!((v_end - 0.5).abs() < 2e-3, "final volume {}", v_end);
        assert!(*result.temperature.last().unwrap() > 380.0);
        let (t_min, _) = result.min_volume().unwrap();
        assert!(t_min >= 0.03 - 1e-3);
    }

    #[test]
    fn runs_are_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let sim = Simulation::from_file(write_case(dir.path(), "variable_volume", "")).unwrap();
        assert_eq!(sim.run().unwrap(), sim.run().unwrap());
        assert_eq!(sim.network().time(), 0.0);
    }

    #[test]
    fn constant_volume_keeps_the_initial_state() {
        let dir = tempfile::tempdir().unwrap();
        let sim = Simulation::from_file(write_case(dir.path(), "constant_volume", "")).unwrap();
        assert!(sim.profile().is_none());
        let result = sim.run().unwrap();
        assert!(result.volume.iter().all(|v| *v == 1.0));
        assert!(result.temperature.iter().all(|t| (t - 300.0).abs() < 1e-9));
    }

    fn with_heat_transfer(config: &Path, heat_transfer_coeff: f64) {
        let text = std::fs::read_to_string(config).unwrap();
        let text = text.replace(
            "\"volume\": 1.0 }",
            &format!("\"volume\": 1.0, \"heat_transfer_coeff\": {:?} }}", heat_transfer_coeff),
        );
        std::fs::write(config, text).unwrap();
    }

    #[test]
    fn heat_loss_cools_the_compressed_gas() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_case(dir.path(), "variable_volume", "");
        let adiabatic = Simulation::from_file(&config).unwrap().run().unwrap();

        with_heat_transfer(&config, 2000.0);
        let sim = Simulation::from_file(&config).unwrap();
        assert_eq!(sim.config().reactor.heat_transfer_coeff, 2000.0);
        let cooled = sim.run().unwrap();

        assert_eq!(cooled.len(), adiabatic.len());
        assert_eq!(cooled.temperature[0], 300.0);
        assert_eq!(cooled.pressure[0], 1e5);
        let (t_cooled, t_adiabatic) = (cooled.temperature.last().unwrap(), adiabatic.temperature.last().unwrap());
        assert!(t_cooled < &(t_adiabatic - 1.0), "{} >= {}", t_cooled, t_adiabatic);
        assert!(*t_cooled > 300.0);
        let v_end = *cooled.volume.last().unwrap();
        assert!((v_end - 0.5).abs() < 2e-3);
    }

    #[test]
    fn still_wall_at_ambient_temperature_keeps_the_state() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_case(dir.path(), "constant_volume", "");
        with_heat_transfer(&config, 50.0);
        let sim = Simulation::from_file(&config).unwrap();
        assert_eq!(sim.network().history(PISTON).unwrap().ncols(), 4);
        let result = sim.run().unwrap();
        assert!(result.volume.iter().all(|v| *v == 1.0));
        assert!(result.temperature.iter().all(|t| (t - 300.0).abs() < 1e-9));
        assert!(result.pressure.iter().all(|p| (p - 1e5).abs() < 1e-6));
    }

    #[test]
    fn output_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_case(dir.path(), "variable_volume", ",\n\"output\": \"out.tsv\"");
        let sim = Simulation::from_file(config).unwrap();
        let result = sim.run().unwrap();
        let text = std::fs::read_to_string(dir.path().join("out.tsv")).unwrap();
        assert_eq!(text.lines().count(), result.len() + 1);
        assert!(text.starts_with("time [s]\tpressure [bar]"));
    }

    #[test]
    fn compares_with_the_experiment() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("pressure.csv"),
            "0.0 1.0\n0.01 1.4\n0.02 2.0\n0.03 2.6\n0.032 2.7\n0.034 6.0\n0.036 6.2\n",
        )
        .unwrap();
        let config = write_case(
            dir.path(),
            "variable_volume",
            ",\n\"pressure_trace\": \"pressure.csv\", \"pressure_unit\": \"bar\"",
        );
        let sim = Simulation::from_file(config).unwrap();
        let result = sim.run().unwrap();
        let summary = sim.compare(&result);
        assert_eq!(summary.end_of_compression, Some(0.03));
        assert!((summary.ignition_delay.unwrap() - 0.002).abs() < 1e-12);
        let cmp = summary.pressure.unwrap();
        assert_eq!(cmp.samples, 7);
        assert!(cmp.rms_error > 0.0 && cmp.max_abs_error >= cmp.rms_error);
    }

    #[test]
    fn missing_mechanism_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_case(dir.path(), "variable_volume", "");
        std::fs::remove_file(dir.path().join("air.json")).unwrap();
        assert!(matches!(
            Simulation::from_file(config),
            Err(crate::SimError::Io { .. })
        ));
    }
}
