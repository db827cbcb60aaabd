//! Continuum-limit sweep binary.
//!
//! `continuum_sweep L amu scale_max` runs the full Wilson-sign ×
//! refinement sweep on a 2L×L³ grid with twisted mass `amu`, writing
//! correlator records and a² difference files to the working directory.

use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::process;

use wilson_correlator_sim::sweep::{run_sweep, SweepConfig};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Use: {} L amu scale_max", args[0]);
        process::exit(1);
    }

    let l_extent: usize = args[1].parse()?;
    let mu: f64 = args[2].parse()?;
    let scale_max: usize = args[3].parse()?;

    #[cfg(feature = "parallel")]
    println!("Using {} threads", rayon::current_num_threads());

    let config = SweepConfig {
        l_extent,
        mu,
        mu_text: args[2].clone(),
        scale_max,
        output_dir: PathBuf::from("."),
    };
    println!(
        "L={} T={} scale_max={}",
        l_extent,
        config.t_extent(),
        scale_max
    );

    run_sweep(&config)?;
    Ok(())
}
