#![allow(non_snake_case)]

use super::json_data;
use super::thermo::{Nasa7, ThermoProp};
use crate::error::{Result, SimError};
use ndarray::prelude::*;
use std::path::Path;

/// Universal gas constant [J/(kmol.K)]
pub const GAS_CONSTANT: f64 = 8314.462618;
/// Reference pressure of the NASA polynomials [Pa]
pub const ONE_ATM: f64 = 101325.0;

/// Ideal-gas mixture with fixed species set and NASA-7 thermodynamics.
#[derive(Debug, Clone)]
pub struct Gas {
    name: String,
    species: Vec<String>,
    species_molar_weight: Array1<f64>,
    mol_frac: Array1<f64>,
    thermo: Vec<Nasa7>,
    thermo_prop: ThermoProp,
}

impl Gas {
    /// Creates a `Gas` object from a mechanism file. The initial state is the one stored in the file.
    pub fn from_file(gas_file: impl AsRef<Path>) -> Result<Gas> {
        let json_output = json_data::read_and_treat_json(gas_file.as_ref())?;
        Gas::from_output(json_output)
    }

    /// Creates a `Gas` object from the content of a mechanism file
    pub fn from_json_str(json: &str) -> Result<Gas> {
        let json_output = json_data::read_and_treat_json_str(json)?;
        Gas::from_output(json_output)
    }

    fn from_output(json_output: json_data::OutputJson) -> Result<Gas> {
        let mut gas = Gas {
            name: json_output.name,
            mol_frac: Array::from_elem(json_output.species.len(), 0.),
            species: json_output.species,
            species_molar_weight: json_output.species_molar_weight,
            thermo: json_output.thermo,
            thermo_prop: ThermoProp::default(),
        };
        gas.TPX(json_output.ini_temp, json_output.ini_press, &json_output.mol_frac)?;
        Ok(gas)
    }

    /// Set temperature and pressure. Thermo properties are recalculated
    /// # Examples
    /// ```
    /// # use rcm_simulator::Gas;
    /// # let mut gas = Gas::from_json_str(rcm_simulator::doc::AIR_MECHANISM).unwrap();
    /// gas.TP(350.0, 2e5).unwrap();
    /// assert_eq!(350.0, gas.T());
    /// assert_eq!(2e5, gas.P());
    /// ```
    pub fn TP(&mut self, temp: f64, press: f64) -> Result<()> {
        self.check_state(temp, press)?;
        self.thermo_prop.T = temp;
        self.thermo_prop.P = press;
        self.calc_prop();
        Ok(())
    }

    /// Set temperature, pressure, and mole fraction of species. Thermo properties are recalculated
    /// # Examples
    /// ```
    /// # use rcm_simulator::Gas;
    /// # let mut gas = Gas::from_json_str(rcm_simulator::doc::AIR_MECHANISM).unwrap();
    /// gas.TPX(350.0, 2e5, "O2:0.21, N2:0.79").unwrap();
    /// assert_eq!(350.0, gas.T());
    /// assert!((gas.mole_frac_of("O2") - 0.21).abs() < 1e-12);
    /// ```
    pub fn TPX(&mut self, temp: f64, press: f64, mol_frac: &str) -> Result<()> {
        let X = self.parse_mole_fractions(mol_frac)?;
        self.check_state(temp, press)?;
        self.mol_frac = X;
        self.TP(temp, press)
    }

    /// Set mole fraction of species. Values are normalized to sum one. Thermo properties are recalculated
    pub fn X(&mut self, mol_frac: &str) -> Result<()> {
        self.mol_frac = self.parse_mole_fractions(mol_frac)?;
        self.calc_prop();
        Ok(())
    }

    fn check_state(&self, temp: f64, press: f64) -> Result<()> {
        if !(temp > 0.0 && temp.is_finite()) {
            return Err(SimError::state(&self.name, format!("temperature must be positive: {}", temp)));
        }
        if !(press > 0.0 && press.is_finite()) {
            return Err(SimError::state(&self.name, format!("pressure must be positive: {}", press)));
        }
        Ok(())
    }

    fn parse_mole_fractions(&self, mol_frac: &str) -> Result<Array1<f64>> {
        let mut X = Array::from_elem(self.species.len(), 0.);
        let cleaned = mol_frac.replace(&[',', '"'][..], " ");

        for word in cleaned.split_whitespace() {
            // specie should be like "O2:0.21"
            let (specie, value) = word.split_once(':').ok_or_else(|| {
                SimError::Composition(format!("expected `species:value`, found `{}`", word))
            })?;
            let i = self
                .species
                .iter()
                .position(|s| s == specie)
                .ok_or_else(|| SimError::UnknownSpecies(specie.to_string()))?;
            let value: f64 = value.parse().map_err(|_| {
                SimError::Composition(format!("unable to parse `{}` for `{}`", value, specie))
            })?;
            if value < 0.0 || !value.is_finite() {
                return Err(SimError::Composition(format!(
                    "`{}` has an invalid mole fraction: {}",
                    specie, value
                )));
            }
            X[i] += value;
        }
        let total = X.sum();
        if total <= 0.0 {
            return Err(SimError::Composition(format!(
                "mole fractions must sum to a positive value: `{}`",
                mol_frac
            )));
        }
        Ok(X / total)
    }

    fn calc_prop(&mut self) {
        let T = self.thermo_prop.T;
        let P = self.thermo_prop.P;
        let mut cp_R = 0.0;
        let mut h_RT = 0.0;
        let mut s_R = 0.0;
        for (x, poly) in self.mol_frac.iter().zip(self.thermo.iter()) {
            if *x <= 0.0 {
                continue;
            }
            let (cp, h, s) = poly.evaluate(T);
            cp_R += x * cp;
            h_RT += x * h;
            s_R += x * (s - x.ln() - (P / ONE_ATM).ln());
        }
        let prop = &mut self.thermo_prop;
        prop.M = self.mol_frac.dot(&self.species_molar_weight);
        prop.R = GAS_CONSTANT / prop.M;
        prop.cp = cp_R * prop.R;
        prop.cv = prop.cp - prop.R;
        prop.k = prop.cp / prop.cv;
        prop.rho = P / (prop.R * T);
        prop.h = h_RT * prop.R * T;
        prop.e = prop.h - prop.R * T;
        prop.s = s_R * prop.R;
        prop.a = (prop.k * prop.R * T).sqrt();
        prop.mu = (1.458e-6) * (T * T * T / (T + 110.4)).sqrt();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species(&self) -> &Vec<String> {
        &self.species
    }

    pub fn mole_frac(&self) -> &Array1<f64> {
        &self.mol_frac
    }

    /// Mole fraction of `specie`, zero when the species is not part of the mixture
    pub fn mole_frac_of(&self, specie: &str) -> f64 {
        match self.species.iter().position(|s| s == specie) {
            Some(i) => self.mol_frac[i],
            None => 0.0,
        }
    }

    /// Composition formatted as accepted by [`Gas::X`]
    pub fn composition(&self) -> String {
        self.species
            .iter()
            .zip(self.mol_frac.iter())
            .filter(|(_, x)| **x > 0.0)
            .map(|(s, x)| format!("{}:{}", s, x))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn T(&self) -> f64 {
        self.thermo_prop.T
    }

    pub fn P(&self) -> f64 {
        self.thermo_prop.P
    }

    pub fn rho(&self) -> f64 {
        self.thermo_prop.rho
    }

    pub fn cp(&self) -> f64 {
        self.thermo_prop.cp
    }

    pub fn cv(&self) -> f64 {
        self.thermo_prop.cv
    }

    pub fn R(&self) -> f64 {
        self.thermo_prop.R
    }

    pub fn k(&self) -> f64 {
        self.thermo_prop.k
    }

    pub fn M(&self) -> f64 {
        self.thermo_prop.M
    }

    pub fn e(&self) -> f64 {
        self.thermo_prop.e
    }

    pub fn h(&self) -> f64 {
        self.thermo_prop.h
    }

    pub fn s(&self) -> f64 {
        self.thermo_prop.s
    }

    pub fn a(&self) -> f64 {
        self.thermo_prop.a
    }

    pub fn mu(&self) -> f64 {
        self.thermo_prop.mu
    }
}
