use rcm_simulator::config::{RcmConfig, ReactorKind};
use rcm_simulator::rcm::{data_file, trace};
use rcm_simulator::simulation::Simulation;
use rcm_simulator::{Integrator, SimError};
use std::path::PathBuf;

fn sample_config() -> RcmConfig {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join("rcm.json");
    let mut config = RcmConfig::from_file(path).unwrap();
    config.output = None;
    config.time_step = 1e-4;
    config
}

#[test]
fn sample_run_reaches_the_compressed_volume() {
    let sim = Simulation::from_config(sample_config()).unwrap();
    let result = sim.run().unwrap();
    assert_eq!(result.len(), 501);

    let v_end = *result.volume.last().unwrap();
    assert!((v_end - 0.1).abs() < 2e-3, "final volume {}", v_end);
    // compression ratio 10 from 297.4 K: isentropic estimate ~ 740 K
    let t_end = *result.temperature.last().unwrap();
    assert!(t_end > 700.0 && t_end < 780.0, "final temperature {}", t_end);

    let (t_peak, _) = result.peak_pressure().unwrap();
    assert!(t_peak >= 0.029);
}

#[test]
fn sample_experiment_summary() {
    let sim = Simulation::from_config(sample_config()).unwrap();
    let result = sim.run().unwrap();
    let summary = sim.compare(&result);

    assert!((summary.end_of_compression.unwrap() - 0.03).abs() < 1e-9);
    let delay = summary.ignition_delay.unwrap();
    assert!(delay > 0.009 && delay < 0.011, "ignition delay {}", delay);

    let pressure = summary.pressure.unwrap();
    assert_eq!(pressure.samples, 101);
    assert!(pressure.max_abs_error > pressure.rms_error);
}

#[test]
fn euler_and_rk4_agree_on_the_sample() {
    let rk4 = Simulation::from_config(sample_config()).unwrap().run().unwrap();
    let mut config = sample_config();
    config.integrator = Integrator::Euler;
    let euler = Simulation::from_config(config).unwrap().run().unwrap();
    let (a, b) = (rk4.temperature.last().unwrap(), euler.temperature.last().unwrap());
    assert!((a - b).abs() / a < 1e-2);
}

#[test]
fn constant_volume_sample_is_steady() {
    let mut config = sample_config();
    config.reactor.kind = ReactorKind::ConstantVolume;
    config.end_time = 0.01;
    let result = Simulation::from_config(config).unwrap().run().unwrap();
    assert_eq!(result.len(), 101);
    assert!(result.pressure.iter().all(|p| (p - 127722.8).abs() < 1e-6));
}

#[test]
fn sample_traces_are_consistent() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data");
    let volume = data_file::read_two_columns(dir.join("volume.csv")).unwrap();
    let pressure = data_file::read_two_columns(dir.join("pressure.csv")).unwrap();
    assert_eq!(volume.len(), pressure.len());
    let (index, eoc) = trace::end_of_compression(&volume).unwrap();
    assert_eq!(index, 60);
    assert!((eoc - 0.03).abs() < 1e-12);
}

#[test]
fn invalid_time_step_is_a_config_error() {
    let mut config = sample_config();
    config.time_step = 0.0;
    assert!(matches!(Simulation::from_config(config), Err(SimError::Config(_))));
}
