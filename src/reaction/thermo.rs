#![allow(non_snake_case)]

use crate::error::{Result, SimError};
use ndarray::prelude::*;

/// NASA 7-coefficient polynomial of a single species, split at `Tmid`.
#[derive(Debug, Clone)]
pub struct Nasa7 {
    specie: String,
    Tmin: f64,
    Tmid: f64,
    Tmax: f64,
    coeffs_low: Array1<f64>,
    coeffs_high: Array1<f64>,
}

impl Nasa7 {
    pub fn new(
        specie: String,
        Tmin: f64,
        Tmid: f64,
        Tmax: f64,
        coeffs_low: Vec<f64>,
        coeffs_high: Vec<f64>,
    ) -> Result<Nasa7> {
        if coeffs_low.len() != 7 || coeffs_high.len() != 7 {
            return Err(SimError::Mechanism(format!(
                "`{}` must have 7 low and 7 high coefficients, found {} and {}",
                specie,
                coeffs_low.len(),
                coeffs_high.len()
            )));
        }
        if !(Tmin < Tmid && Tmid < Tmax) || Tmin <= 0.0 {
            return Err(SimError::Mechanism(format!(
                "`{}` temperature ranges must satisfy 0 < Tmin < Tmid < Tmax: {} {} {}",
                specie, Tmin, Tmid, Tmax
            )));
        }
        Ok(Nasa7 {
            specie,
            Tmin,
            Tmid,
            Tmax,
            coeffs_low: Array1::from(coeffs_low),
            coeffs_high: Array1::from(coeffs_high),
        })
    }

    /// Checks continuity of cp/R, h/RT and s/R at `Tmid`
    pub fn validate(&self) -> Result<()> {
        let (cp_low, h_low, s_low) = Nasa7::calc_thermo_properties(&self.coeffs_low, self.Tmid);
        let (cp_high, h_high, s_high) =
            Nasa7::calc_thermo_properties(&self.coeffs_high, self.Tmid);

        let discontinuity = |property: &str, low: f64, high: f64| {
            SimError::Mechanism(format!(
                "for species {}, discontinuity in {} detected at Tmid = {}: low-temperature polynomial {}, high-temperature polynomial {}",
                self.specie, property, self.Tmid, low, high
            ))
        };

        if ((cp_low - cp_high) / (cp_low.abs() + 1.0E-4)).abs() > 0.01 {
            return Err(discontinuity("cp/R", cp_low, cp_high));
        }
        if (h_low - h_high).abs() / cp_low.abs() > 0.001 {
            return Err(discontinuity("h/RT", h_low, h_high));
        }
        if ((s_low - s_high) / (s_low.abs() + cp_low)).abs() > 0.001 {
            return Err(discontinuity("s/R", s_low, s_high));
        }
        Ok(())
    }

    /// Non-dimensional cp/R, h/RT and s/R at `temp`. Outside `[Tmin, Tmax]` the nearest
    /// polynomial is extrapolated.
    pub fn evaluate(&self, temp: f64) -> (f64, f64, f64) {
        if temp < self.Tmid {
            Nasa7::calc_thermo_properties(&self.coeffs_low, temp)
        } else {
            Nasa7::calc_thermo_properties(&self.coeffs_high, temp)
        }
    }

    /// Calculate non-dimensional cp, enthalpy and entropy for a given temperature using 4th order
    /// NASA polynomial
    fn calc_thermo_properties(coeff: &Array1<f64>, temp: f64) -> (f64, f64, f64) {
        let cT0 = coeff[0];
        let cT1 = coeff[1] * temp;
        let cT2 = coeff[2] * temp.powi(2);
        let cT3 = coeff[3] * temp.powi(3);
        let cT4 = coeff[4] * temp.powi(4);
        let cT5 = coeff[5] / temp;
        let cT6 = coeff[0] * temp.ln();

        let cp_R = cT0 + cT1 + cT2 + cT3 + cT4;
        let h_RT = cT0 + 0.5 * cT1 + 1.0 / 3.0 * cT2 + 0.25 * cT3 + 0.20 * cT4 + cT5;
        let s_R = cT6 + cT1 + 0.5 * cT2 + 1.0 / 3.0 * cT3 + 0.25 * cT4 + coeff[6];
        (cp_R, h_RT, s_R)
    }

    pub fn specie(&self) -> &str {
        &self.specie
    }

    pub fn Tmin(&self) -> f64 {
        self.Tmin
    }

    pub fn Tmid(&self) -> f64 {
        self.Tmid
    }

    pub fn Tmax(&self) -> f64 {
        self.Tmax
    }
}

#[derive(Debug, Clone, Default)]
pub struct ThermoProp {
    pub P: f64,   // pressure [Pa]
    pub T: f64,   // temperature [K]
    pub rho: f64, // density [kg/m^3]
    pub cp: f64,  // specific heat capacity - cp [J/(kg.K)]
    pub cv: f64,  // specific heat capacity - cv [J/(kg.K)]
    pub R: f64,   // gas constant [J/(kg.K)]
    pub k: f64,   // cp/cv
    pub M: f64,   // molecular weight [kg/kmol]
    pub e: f64,   // internal energy [J/kg]
    pub h: f64,   // enthalpy [J/kg]
    pub s: f64,   // entropy [J/(kg.K)]
    pub a: f64,   // sound speed [m/s]
    pub mu: f64,  // viscosity [Pa.s]
}
