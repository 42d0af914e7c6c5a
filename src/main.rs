use ansi_term::Style;
use clap::Parser;
use rcm_simulator::config::RcmConfig;
use rcm_simulator::simulation::Simulation;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rcm-sim")]
#[command(about = "Simulates a rapid compression machine experiment with a zero-dimensional reactor")]
#[command(version)]
struct Cli {
    /// JSON configuration of the run
    config: PathBuf,

    /// Write the reactor history to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Simulated time [s]
    #[arg(long)]
    end_time: Option<f64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{} {}", Style::new().bold().paint("error:"), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> rcm_simulator::Result<()> {
    let mut config = RcmConfig::from_file(&cli.config)?;
    if let Some(output) = cli.output {
        config.output = Some(output);
    }
    if let Some(end_time) = cli.end_time {
        config.end_time = end_time;
    }

    let sim = Simulation::from_config(config)?;
    let result = sim.run()?;

    println!("{}", Style::new().bold().paint("simulation"));
    if let (Some(t), Some(temp), Some(press), Some(vol)) = (
        result.time.last(),
        result.temperature.last(),
        result.pressure.last(),
        result.volume.last(),
    ) {
        println!(
            "        final state at {:.4e} [s]: {:.2} [K], {:.4} [bar], {:.4e} [m³]",
            t,
            temp,
            press / 1e5,
            vol
        );
    }
    if let Some((t, p)) = result.peak_pressure() {
        println!("        peak pressure: {:.4} [bar] at {:.3} [ms]", p / 1e5, t * 1e3);
    }
    if let Some((t, v)) = result.min_volume() {
        println!("        end of compression: {:.3} [ms] ({:.4e} [m³])", t * 1e3, v);
    }
    if sim.volume_trace().is_some() || sim.pressure_trace().is_some() {
        println!("{}", sim.compare(&result));
    }
    Ok(())
}
