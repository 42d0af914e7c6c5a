//! JSON configuration of an RCM run.
//!
//! Relative paths are resolved against the directory of the configuration file.

use crate::error::{Result, SimError};
use crate::numerics::ode_solvers::Integrator;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RcmConfig {
    pub mechanism: PathBuf,
    pub initial_state: InitialState,
    #[serde(default)]
    pub reactor: ReactorConfig,
    #[serde(default)]
    pub volume_trace: Option<PathBuf>,
    #[serde(default)]
    pub pressure_trace: Option<PathBuf>,
    #[serde(default)]
    pub pressure_unit: PressureUnit,
    #[serde(default)]
    pub time_unit: TimeUnit,
    pub end_time: f64,  // [s]
    pub time_step: f64, // [s]
    #[serde(default)]
    pub integrator: Integrator,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InitialState {
    pub temperature: f64, // [K]
    pub pressure: f64,    // [Pa]
    /// e.g. "O2:0.21, N2:0.79"; the mechanism composition is used when absent
    #[serde(default)]
    pub mole_fractions: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReactorConfig {
    #[serde(default)]
    pub kind: ReactorKind,
    #[serde(default = "default_volume")]
    pub volume: f64, // [m³]
    /// Defaults to `volume` so that the reactor follows the normalized volume trace
    #[serde(default)]
    pub wall_area: Option<f64>, // [m²]
    #[serde(default)]
    pub heat_transfer_coeff: f64, // [W/(m².K)]
}

fn default_volume() -> f64 {
    1.0
}

impl Default for ReactorConfig {
    fn default() -> ReactorConfig {
        ReactorConfig {
            kind: ReactorKind::default(),
            volume: default_volume(),
            wall_area: None,
            heat_transfer_coeff: 0.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReactorKind {
    ConstantVolume,
    #[default]
    VariableVolume,
}

/// Unit of the pressure column of the experimental trace
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressureUnit {
    #[default]
    #[serde(rename = "Pa")]
    Pa,
    #[serde(rename = "bar")]
    Bar,
    #[serde(rename = "MPa")]
    MPa,
    #[serde(rename = "atm")]
    Atm,
}

impl PressureUnit {
    /// Factor converting to Pa
    pub fn to_pascal(&self) -> f64 {
        match self {
            PressureUnit::Pa => 1.0,
            PressureUnit::Bar => 1e5,
            PressureUnit::MPa => 1e6,
            PressureUnit::Atm => 101325.0,
        }
    }
}

/// Unit of the time column of the trace files
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    #[default]
    S,
    Ms,
}

impl TimeUnit {
    /// Factor converting to seconds
    pub fn to_seconds(&self) -> f64 {
        match self {
            TimeUnit::S => 1.0,
            TimeUnit::Ms => 1e-3,
        }
    }
}

impl RcmConfig {
    pub fn from_file(file_name: impl AsRef<Path>) -> Result<RcmConfig> {
        let file_name = file_name.as_ref();
        let json_file =
            std::fs::read_to_string(file_name).map_err(|err| SimError::io(file_name, err))?;
        let mut config = RcmConfig::from_json_str(&json_file)
            .map_err(|err| match err {
                SimError::Json { source, .. } => SimError::json(file_name, source),
                other => other,
            })?;
        if let Some(dir) = file_name.parent() {
            config.resolve_paths(dir);
        }
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<RcmConfig> {
        let config: RcmConfig =
            serde_json::from_str(json).map_err(|err| SimError::json("<memory>", err))?;
        config.validate()?;
        Ok(config)
    }

    /// Makes every relative path relative to `dir`
    pub fn resolve_paths(&mut self, dir: &Path) {
        let paths = std::iter::once(&mut self.mechanism)
            .chain(self.volume_trace.iter_mut())
            .chain(self.pressure_trace.iter_mut())
            .chain(self.output.iter_mut());
        for p in paths {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |value: f64, what: &str| -> Result<()> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SimError::Config(format!("`{}` must be greater than zero: {}", what, value)))
            }
        };
        positive(self.initial_state.temperature, "initial_state.temperature")?;
        positive(self.initial_state.pressure, "initial_state.pressure")?;
        positive(self.reactor.volume, "reactor.volume")?;
        positive(self.end_time, "end_time")?;
        positive(self.time_step, "time_step")?;
        if let Some(area) = self.reactor.wall_area {
            positive(area, "reactor.wall_area")?;
        }
        if !(self.reactor.heat_transfer_coeff >= 0.0 && self.reactor.heat_transfer_coeff.is_finite()) {
            return Err(SimError::Config(format!(
                "`reactor.heat_transfer_coeff` cannot be negative: {}",
                self.reactor.heat_transfer_coeff
            )));
        }
        if self.reactor.kind == ReactorKind::VariableVolume && self.volume_trace.is_none() {
            return Err(SimError::Config(
                "a variable volume reactor requires `volume_trace`".to_string(),
            ));
        }
        Ok(())
    }

    /// Wall area, defaulting to the initial reactor volume
    pub fn wall_area(&self) -> f64 {
        self.reactor.wall_area.unwrap_or(self.reactor.volume)
    }
}
