use crate::connector::wall::WallVelocity;
use crate::error::{Result, SimError};
use ndarray::prelude::*;

/// Piecewise-constant wall velocity built from a recorded RCM volume trace.
///
/// Volumes are normalized by the first sample, so a wall of unit area moving with this
/// velocity changes a unit volume exactly as the recorded trace does. The profile is a step
/// function: the velocity of a segment is the forward difference of the normalized volume over
/// the segment length and holds until the next sample. The last sample carries zero velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityProfile {
    time: Vec<f64>,
    volume: Array1<f64>,
    velocity: Array1<f64>,
}

impl VelocityProfile {
    /// Builds the profile from raw time `[s]` and volume samples (any volume unit).
    ///
    /// Times must be finite and non-decreasing. Repeated times are accepted; such a zero-length
    /// segment takes the velocity of the segment that follows it.
    pub fn new(time: Array1<f64>, volume: Array1<f64>) -> Result<VelocityProfile> {
        if time.len() != volume.len() {
            return Err(SimError::Profile(format!(
                "time and volume must have the same length: {} != {}",
                time.len(),
                volume.len()
            )));
        }
        if time.is_empty() {
            return Err(SimError::Profile("at least one sample is required".to_string()));
        }
        if let Some(t) = time.iter().find(|t| !t.is_finite()) {
            return Err(SimError::Profile(format!("time sample is not finite: {}", t)));
        }
        if let Some(i) = (1..time.len()).find(|&i| time[i] < time[i - 1]) {
            return Err(SimError::Profile(format!(
                "time must be non-decreasing: t[{}] = {} < t[{}] = {}",
                i,
                time[i],
                i - 1,
                time[i - 1]
            )));
        }
        let v0 = volume[0];
        if v0 == 0.0 || !v0.is_finite() {
            return Err(SimError::Profile(format!(
                "first volume sample must be finite and non-zero: {}",
                v0
            )));
        }
        if let Some(v) = volume.iter().find(|v| !v.is_finite()) {
            return Err(SimError::Profile(format!("volume sample is not finite: {}", v)));
        }

        let volume = volume / v0;
        let n = time.len();
        let mut velocity = Array::from_elem(n, 0.);
        for i in (0..n - 1).rev() {
            let dt = time[i + 1] - time[i];
            velocity[i] = if dt > 0.0 {
                (volume[i + 1] - volume[i]) / dt
            } else {
                velocity[i + 1]
            };
        }

        Ok(VelocityProfile {
            time: time.to_vec(),
            volume,
            velocity,
        })
    }

    /// Velocity of the segment starting at the latest sample time not exceeding `t`.
    ///
    /// Zero before the first sample and after the last one. When several samples share that
    /// time, the first of them is used.
    pub fn velocity_at(&self, t: f64) -> f64 {
        let n = self.time.len();
        if n == 0 || !(t >= self.time[0] && t <= self.time[n - 1]) {
            return 0.0;
        }
        let time = &self.time;
        // largest sample time <= t, then the first sample holding that time
        let last_le = time.partition_point(|&ti| ti <= t) - 1;
        let t_sel = time[last_le];
        let first = time[..=last_le].partition_point(|&ti| ti < t_sel);
        self.velocity[first]
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Volume samples normalized by the first one
    pub fn volume(&self) -> &Array1<f64> {
        &self.volume
    }

    pub fn velocity(&self) -> &Array1<f64> {
        &self.velocity
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn start_time(&self) -> f64 {
        self.time[0]
    }

    pub fn end_time(&self) -> f64 {
        self.time[self.time.len() - 1]
    }
}

impl WallVelocity for VelocityProfile {
    fn velocity(&self, time: f64) -> f64 {
        self.velocity_at(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> VelocityProfile {
        VelocityProfile::new(array![0.0, 1.0, 2.0, 4.0], array![2.0, 2.0, 1.0, 0.5]).unwrap()
    }

    #[test]
    fn volume_is_normalized_by_first_sample() {
        let p = profile();
        assert_eq!(p.volume(), &array![1.0, 1.0, 0.5, 0.25]);
    }

    #[test]
    fn velocity_has_trailing_zero_and_same_length() {
        let p = profile();
        assert_eq!(p.velocity().len(), p.time().len());
        assert_eq!(p.velocity(), &array![0.0, -0.5, -0.125, 0.0]);
    }

    #[test]
    fn outside_the_trace_is_zero() {
        let p = profile();
        assert_eq!(p.velocity_at(-1e-9), 0.0);
        assert_eq!(p.velocity_at(4.0 + 1e-9), 0.0);
        assert_eq!(p.velocity_at(f64::NAN), 0.0);
    }

    #[test]
    fn exact_sample_time_returns_its_velocity() {
        let p = profile();
        for (t, v) in p.time().iter().zip(p.velocity().iter()) {
            assert_eq!(p.velocity_at(*t), *v);
        }
    }

    #[test]
    fn lookup_is_a_step_function() {
        let p = profile();
        assert_eq!(p.velocity_at(0.5), 0.0);
        assert_eq!(p.velocity_at(1.999), -0.5);
        assert_eq!(p.velocity_at(3.0), -0.125);
        // repeated calls, any order
        assert_eq!(p.velocity_at(1.5), p.velocity_at(1.5));
        assert_eq!(p.velocity_at(3.5), p.velocity_at(2.5));
    }

    #[test]
    fn linear_volume_gives_uniform_positive_velocity() {
        let time = Array::linspace(0.0, 0.01, 11);
        let volume = Array::linspace(1.0, 2.0, 11);
        let p = VelocityProfile::new(time, volume).unwrap();
        let v = p.velocity();
        for i in 0..v.len() - 1 {
            assert!(v[i] > 0.0);
            assert!((v[i] - 100.0).abs() < 1e-9);
        }
        assert_eq!(v[v.len() - 1], 0.0);
    }

    #[test]
    fn repeated_time_uses_first_sample_and_following_velocity() {
        let p = VelocityProfile::new(array![0.0, 1.0, 1.0, 2.0], array![1.0, 1.0, 1.0, 3.0]).unwrap();
        assert_eq!(p.velocity(), &array![0.0, 2.0, 2.0, 0.0]);
        assert_eq!(p.velocity_at(1.0), 2.0);
        assert_eq!(p.velocity_at(1.5), 2.0);
    }

    #[test]
    fn single_sample_profile_is_zero_everywhere() {
        let p = VelocityProfile::new(array![0.5], array![3.0]).unwrap();
        assert_eq!(p.velocity_at(0.5), 0.0);
        assert_eq!(p.velocity_at(0.0), 0.0);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(VelocityProfile::new(array![0.0, 1.0], array![1.0]).is_err());
        assert!(VelocityProfile::new(Array1::zeros(0), Array1::zeros(0)).is_err());
        assert!(VelocityProfile::new(array![1.0, 0.0], array![1.0, 1.0]).is_err());
        assert!(VelocityProfile::new(array![0.0, 1.0], array![0.0, 1.0]).is_err());
        assert!(VelocityProfile::new(array![0.0, f64::INFINITY], array![1.0, 1.0]).is_err());
    }
}
