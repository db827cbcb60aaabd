//! Wilson-sign and refinement sweep.
//!
//! Reruns the correlator over the Wilson-sign product choices
//! r2 ∈ {−1, +1, 0} and refinement scales 1..=scale_max, differencing each
//! refined result against the unrefined one of the same r2 to expose the
//! a² discretization artifact. One two-column difference file is written
//! per combination, next to the correlator records themselves.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::info;

use crate::lattice::Lattice;
use crate::scaling::{correlator_at, ScaleParams};
use crate::store::{cache_tag, format_record, FileStore, StoreError};

/// Wilson-sign products swept, in run order. r2 = 0 swaps in the
/// conserved-current insertion.
pub const R2_SWEEP: [i32; 3] = [-1, 1, 0];

/// First Wilson sign, fixed across the sweep.
pub const R1: i32 = 1;

/// Sweep configuration. The mass keeps its command-line spelling for tag
/// construction.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Spatial extent of the coarse grid.
    pub l_extent: usize,
    /// Twisted mass on the coarse grid.
    pub mu: f64,
    /// The mass exactly as supplied, reused in record tags.
    pub mu_text: String,
    /// Largest refinement factor; scales 1..=scale_max are run.
    pub scale_max: usize,
    /// Directory receiving correlator records and difference files.
    pub output_dir: PathBuf,
}

impl SweepConfig {
    /// Temporal extent of the coarse grid; the sweep convention is T = 2L.
    pub fn t_extent(&self) -> usize {
        2 * self.l_extent
    }
}

/// Extrapolate the wall time of `scale` from the previous scale's time.
/// The pair loop grows as s² and the folded spatial sum as s³, so kernel
/// cost scales as the fifth power.
pub fn estimate_seconds(previous: f64, scale: usize) -> f64 {
    debug_assert!(scale >= 2);
    previous * (scale as f64 / (scale - 1) as f64).powi(5)
}

/// Remaining-work estimate: fifth-power extrapolations summed over every
/// scale still to run.
pub fn estimate_total_seconds(previous: f64, scale: usize, scale_max: usize) -> f64 {
    (scale..=scale_max)
        .map(|s| previous * (s as f64 / (scale - 1) as f64).powi(5))
        .sum()
}

/// Elementwise difference of a refined correlator against the unrefined
/// baseline.
pub fn discretization_shift(refined: &[f64], baseline: &[f64]) -> Vec<f64> {
    refined.iter().zip(baseline).map(|(r, b)| r - b).collect()
}

/// Run the full sweep, producing `corr_*` records and `a2Corr_*`
/// difference files under the output directory.
pub fn run_sweep(config: &SweepConfig) -> Result<(), StoreError> {
    let t_extent = config.t_extent();
    let lattice = Lattice::new(t_extent, config.l_extent);
    let store = FileStore::new(&config.output_dir);

    let started = Instant::now();
    for &r2 in R2_SWEEP.iter() {
        let mut baseline: Option<Vec<f64>> = None;
        let mut previous_seconds = 0.0;

        for scale in 1..=config.scale_max {
            let tag = cache_tag(R1, r2, config.l_extent, t_extent, &config.mu_text, scale);
            if scale > 1 {
                info!(
                    "r2={} scale {}: estimated {:.0} s, {:.0} s for the remaining scales",
                    r2,
                    scale,
                    estimate_seconds(previous_seconds, scale),
                    estimate_total_seconds(previous_seconds, scale, config.scale_max)
                );
            }

            let begun = Instant::now();
            let params = ScaleParams {
                lattice,
                mu: config.mu,
                r1: R1,
                r2,
                scale,
            };
            let corr = correlator_at(&params, &store, &tag)?;
            previous_seconds = begun.elapsed().as_secs_f64();
            info!(
                "r2={} scale {} finished in {:.0} s ({:.0} s since sweep start)",
                r2,
                scale,
                previous_seconds,
                started.elapsed().as_secs_f64()
            );

            let baseline = baseline.get_or_insert_with(|| corr.clone());
            let shift = discretization_shift(&corr, baseline);
            write_shift_file(&config.output_dir, &tag, &shift)?;
        }
    }
    Ok(())
}

/// `a2Corr_<tag>`: same two-column layout as the correlator records.
fn write_shift_file(dir: &Path, tag: &str, shift: &[f64]) -> Result<(), StoreError> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(format!("a2Corr_{}", tag)), format_record(shift))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifth_power_cost_extrapolation() {
        assert!((estimate_seconds(1.0, 2) - 32.0).abs() < 1e-12);
        assert!((estimate_seconds(2.0, 3) - 2.0 * (1.5f64).powi(5)).abs() < 1e-12);
        // scales 2 and 3 from a 1 s scale-1 run: 2⁵ + 3⁵
        assert!((estimate_total_seconds(1.0, 2, 3) - 275.0).abs() < 1e-12);
    }

    #[test]
    fn test_discretization_shift_is_elementwise() {
        assert_eq!(
            discretization_shift(&[3.0, 5.0], &[1.0, 1.5]),
            vec![2.0, 3.5]
        );
    }

    #[test]
    fn test_sweep_convention_doubles_spatial_extent() {
        let config = SweepConfig {
            l_extent: 12,
            mu: 0.1,
            mu_text: "0.1".into(),
            scale_max: 1,
            output_dir: PathBuf::from("."),
        };
        assert_eq!(config.t_extent(), 24);
    }

    #[test]
    fn test_sweep_writes_records_and_shift_files() {
        let dir = std::env::temp_dir()
            .join(format!("wilson-correlator-sweep-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let config = SweepConfig {
            l_extent: 2,
            mu: 0.1,
            mu_text: "0.1".into(),
            scale_max: 2,
            output_dir: dir.clone(),
        };
        run_sweep(&config).unwrap();

        for r2_tag in ["0", "1", "2"] {
            for scale in ["1", "2"] {
                let tag = format!("r1_1_r2_{}_L_2_T_4_mu_0.1_scale_{}", r2_tag, scale);
                assert!(
                    dir.join(format!("corr_{}", tag)).exists(),
                    "missing record corr_{}",
                    tag
                );
                assert!(
                    dir.join(format!("a2Corr_{}", tag)).exists(),
                    "missing difference file a2Corr_{}",
                    tag
                );
            }
        }

        // The scale-1 difference is against itself and must vanish
        let text =
            fs::read_to_string(dir.join("a2Corr_r1_1_r2_1_L_2_T_4_mu_0.1_scale_1")).unwrap();
        for line in text.lines() {
            let value: f64 = line.split_whitespace().nth(1).unwrap().parse().unwrap();
            assert_eq!(value, 0.0, "scale-1 shift must be exactly zero, got {}", value);
        }
        let _ = fs::remove_dir_all(&dir);
    }
}
