// File to read and treat the data in the mechanism .json files

#![allow(non_snake_case)]

use super::thermo::Nasa7;
use crate::error::{Result, SimError};
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug)]
struct IdealGas {
    phase: Phase,
    species_data: Vec<SpeciesData>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Phase {
    id: String,
    speciesArray: String,
    state: State,
}

#[derive(Serialize, Deserialize, Debug)]
struct SpeciesData {
    name: String,
    molecular_weight: f64,
    thermo: Option<JsonThermo>,
}

#[derive(Serialize, Deserialize, Debug)]
struct State {
    temperature: f64,
    pressure: f64,
    moleFractions: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct JsonThermo {
    Tmin: f64,
    Tmid: f64,
    Tmax: f64,
    coeffs_low: Vec<f64>,
    coeffs_high: Vec<f64>,
}

#[derive(Debug)]
pub struct OutputJson {
    pub name: String,
    pub species: Vec<String>,
    pub ini_temp: f64,
    pub ini_press: f64,
    pub mol_frac: String,
    pub species_molar_weight: Array1<f64>,
    pub thermo: Vec<Nasa7>,
}

pub fn read_and_treat_json(file_name: &Path) -> Result<OutputJson> {
    let json_file =
        std::fs::read_to_string(file_name).map_err(|err| SimError::io(file_name, err))?;
    let gas: IdealGas =
        serde_json::from_str(&json_file).map_err(|err| SimError::json(file_name, err))?;
    treat_json(gas)
}

pub fn read_and_treat_json_str(json: &str) -> Result<OutputJson> {
    let gas: IdealGas =
        serde_json::from_str(json).map_err(|err| SimError::json("<memory>", err))?;
    treat_json(gas)
}

fn treat_json(gas: IdealGas) -> Result<OutputJson> {
    let species = get_species(&gas)?;
    let (species_molar_weight, thermo) = get_thermo(gas.species_data, &species)?;

    Ok(OutputJson {
        name: gas.phase.id,
        species,
        ini_temp: gas.phase.state.temperature,
        ini_press: gas.phase.state.pressure,
        mol_frac: gas.phase.state.moleFractions,
        species_molar_weight,
        thermo,
    })
}

fn get_species(gas: &IdealGas) -> Result<Vec<String>> {
    let species: Vec<String> = gas
        .phase
        .speciesArray
        .split_whitespace()
        .map(|s| s.to_string())
        .collect();

    if species.is_empty() {
        return Err(SimError::Mechanism(format!(
            "phase `{}` has an empty 'speciesArray'",
            gas.phase.id
        )));
    }
    Ok(species)
}

fn get_thermo(
    mut species_data: Vec<SpeciesData>,
    species: &[String],
) -> Result<(Array1<f64>, Vec<Nasa7>)> {
    let mut molecular_weight = Array::from_elem(species.len(), 0.);
    let mut thermo: Vec<Nasa7> = Vec::with_capacity(species.len());
    for (i, specie) in species.iter().enumerate() {
        let data = species_data
            .iter_mut()
            .find(|data| data.name == *specie)
            .ok_or_else(|| {
                SimError::Mechanism(format!("not enough data for `{}` in 'species_data'", specie))
            })?;
        if data.molecular_weight <= 0.0 {
            return Err(SimError::Mechanism(format!(
                "molecular weight of `{}` must be positive",
                specie
            )));
        }
        molecular_weight[i] = data.molecular_weight;
        let json_thermo = data.thermo.take().ok_or_else(|| {
            SimError::Mechanism(format!("missing thermo data for `{}`", specie))
        })?;
        let poly = Nasa7::new(
            specie.clone(),
            json_thermo.Tmin,
            json_thermo.Tmid,
            json_thermo.Tmax,
            json_thermo.coeffs_low,
            json_thermo.coeffs_high,
        )?;
        poly.validate()?;
        thermo.push(poly);
    }
    Ok((molecular_weight, thermo))
}
