//! Analysis of RCM traces: end of compression, ignition delay and comparison of a simulated
//! history against experimental samples.

use super::data_file::DataSeries;
use crate::numerics::interpolation::linear_interp;

/// Time and index of the minimum volume sample, the end of compression (EOC).
pub fn end_of_compression(volume: &DataSeries) -> Option<(usize, f64)> {
    let (index, _) = volume
        .values()
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, vmin)) if vmin <= v => best,
            _ => Some((i, v)),
        })?;
    Some((index, volume.time()[index]))
}

/// Time between `eoc_time` and the steepest pressure rise at or after it.
///
/// The pressure derivative is a forward difference; `None` when fewer than two samples
/// lie at or after `eoc_time`.
pub fn ignition_delay(pressure: &DataSeries, eoc_time: f64) -> Option<f64> {
    let time = pressure.time();
    let press = pressure.values();
    let mut best: Option<(f64, f64)> = None; // (dp/dt, time)
    for i in 0..pressure.len().saturating_sub(1) {
        if time[i] < eoc_time {
            continue;
        }
        let dt = time[i + 1] - time[i];
        if dt <= 0.0 {
            continue;
        }
        let dp_dt = (press[i + 1] - press[i]) / dt;
        if best.map_or(true, |(max, _)| dp_dt > max) {
            best = Some((dp_dt, time[i]));
        }
    }
    best.map(|(_, t)| t - eoc_time)
}

/// Deviation between a simulated history and experimental samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceComparison {
    pub rms_error: f64,
    pub max_abs_error: f64,
    pub samples: usize,
}

/// Interpolates the simulated history at every experimental time inside the simulated span.
pub fn compare(sim_time: &[f64], sim_value: &[f64], experiment: &DataSeries) -> Option<TraceComparison> {
    let mut sum_sq = 0.0;
    let mut max_abs: f64 = 0.0;
    let mut samples = 0;
    for (t, exp) in experiment.time().iter().zip(experiment.values().iter()) {
        if let Some(sim) = linear_interp(sim_time, sim_value, *t) {
            let err = sim - exp;
            sum_sq += err * err;
            max_abs = max_abs.max(err.abs());
            samples += 1;
        }
    }
    if samples == 0 {
        return None;
    }
    Some(TraceComparison {
        rms_error: (sum_sq / samples as f64).sqrt(),
        max_abs_error: max_abs,
        samples,
    })
}
