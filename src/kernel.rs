//! Momentum-space correlator kernel.
//!
//! Evaluates the one-loop vector-current two-point function of a free
//! Wilson twisted-mass fermion: for every pair of temporal momenta (q₀, p₀)
//! and every spatial momentum triple, the product of two free propagators
//! is accumulated into the momentum-difference bin (p₀ − q₀) mod T, then
//! transformed back to time separation by a discrete cosine sum and
//! normalized by 4·Nc/(T²L³).
//!
//! # Integrand
//!
//! With M(k) = 4 − Σ_μ cos k_μ (the Wilson mass function) and the twisted
//! mass μ, each propagator contributes a factor
//!
//!   D(k) = μ² + M(k)² + Σ_μ sin²k_μ
//!
//! to the denominator. Two numerators share that denominator:
//! - **local-local** (r12 ≠ 0): μ² + sin p₀ sin q₀ + (Σᵢ sin²pᵢ)/3
//!   − M(p)M(q)·r12;
//! - **local-conserved** (r12 = 0): a point-split insertion replaces one
//!   local current, weighting the spatial cosines by signed sin²
//!   combinations.
//!
//! The integrand depends on spatial momenta only through cos and sin², so
//! the spatial sum folds under reflection and axis permutation onto ordered
//! triples with multiplicity weights (see [`crate::lattice`]). Folding
//! reproduces the full sum exactly for even L, the convention of every
//! caller here (T = 2L).
//!
//! # Parallelism
//!
//! Each triangular pair index is an independent unit of work. Partial
//! results live in per-worker vectors merged by elementwise addition; the
//! merge is associative and commutative, so the total is independent of
//! scheduling order.

use std::f64::consts::PI;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::lattice::{
    pair_from_index, permutation_multiplicity, triple_reflection_multiplicity, Lattice,
    MomentumTable,
};

/// Number of color degrees of freedom.
pub const N_COLORS: usize = 3;

/// Time-separation correlator of length T for the given geometry, twisted
/// mass and Wilson-parameter product.
///
/// `r12` is the product of the two Wilson parameters; the special value 0
/// selects the conserved-current numerator. Total over every constructed
/// [`Lattice`]; the μ = 0 spatial zero mode can produce a vanishing
/// denominator and is not guarded.
pub fn vector_correlator(lattice: &Lattice, mu: f64, r12: i32) -> Vec<f64> {
    let t = lattice.t_extent;
    let temporal = MomentumTable::antiperiodic(t);
    let spatial = MomentumTable::periodic(lattice.l_extent);

    let momentum_corr = accumulate_pairs(lattice, &temporal, &spatial, mu * mu, r12);

    // Cosine transform back to time separation
    let mut corr = vec![0.0; t];
    for (i_t, value) in corr.iter_mut().enumerate() {
        for (i_p0, &amplitude) in momentum_corr.iter().enumerate() {
            *value += (2.0 * PI * (i_p0 * i_t) as f64 / t as f64).cos() * amplitude;
        }
    }

    let norm = 4.0 * N_COLORS as f64
        / (t as f64 * t as f64 * lattice.spatial_volume() as f64);
    for value in corr.iter_mut() {
        *value *= norm;
    }
    corr
}

/// Sum every unordered temporal momentum pair into the momentum-space
/// correlator, one private accumulator per worker.
#[cfg(feature = "parallel")]
fn accumulate_pairs(
    lattice: &Lattice,
    temporal: &MomentumTable,
    spatial: &MomentumTable,
    mu2: f64,
    r12: i32,
) -> Vec<f64> {
    let t = lattice.t_extent;
    (0..lattice.num_pairs())
        .into_par_iter()
        .fold(
            || vec![0.0; t],
            |mut partial, index| {
                deposit_pair(lattice, temporal, spatial, mu2, r12, index, &mut partial);
                partial
            },
        )
        .reduce(|| vec![0.0; t], merge_elementwise)
}

#[cfg(not(feature = "parallel"))]
fn accumulate_pairs(
    lattice: &Lattice,
    temporal: &MomentumTable,
    spatial: &MomentumTable,
    mu2: f64,
    r12: i32,
) -> Vec<f64> {
    let mut acc = vec![0.0; lattice.t_extent];
    for index in 0..lattice.num_pairs() {
        deposit_pair(lattice, temporal, spatial, mu2, r12, index, &mut acc);
    }
    acc
}

#[cfg(feature = "parallel")]
fn merge_elementwise(mut into: Vec<f64>, from: Vec<f64>) -> Vec<f64> {
    for (a, b) in into.iter_mut().zip(from) {
        *a += b;
    }
    into
}

/// Add one (q₀, p₀) pair's spatial sum into its momentum-difference bin.
/// Off-diagonal pairs stand for both orderings and count twice.
fn deposit_pair(
    lattice: &Lattice,
    temporal: &MomentumTable,
    spatial: &MomentumTable,
    mu2: f64,
    r12: i32,
    index: usize,
    acc: &mut [f64],
) {
    let t = lattice.t_extent;
    let (q0, p0) = pair_from_index(index);
    let bin = (t + p0 - q0) % t;
    let weight = if q0 == p0 { 1.0 } else { 2.0 };
    acc[bin] += weight * pair_sum(lattice, temporal, spatial, mu2, r12, q0, p0);
}

/// Folded spatial sum for one temporal momentum pair.
fn pair_sum(
    lattice: &Lattice,
    temporal: &MomentumTable,
    spatial: &MomentumTable,
    mu2: f64,
    r12: i32,
    q0: usize,
    p0: usize,
) -> f64 {
    let half = lattice.l_extent / 2;
    let mut total = 0.0;
    for p1 in 0..=half {
        for p2 in 0..=p1 {
            for p3 in 0..=p2 {
                let multiplicity = triple_reflection_multiplicity([p1, p2, p3], lattice.l_extent)
                    * permutation_multiplicity(p1, p2, p3);
                total += multiplicity
                    * integrand(temporal, spatial, mu2, r12, q0, p0, [p1, p2, p3]);
            }
        }
    }
    total
}

/// One-configuration integrand: numerator over propagator denominator at
/// full (unfolded) momentum indices.
fn integrand(
    temporal: &MomentumTable,
    spatial: &MomentumTable,
    mu2: f64,
    r12: i32,
    q0: usize,
    p0: usize,
    triple: [usize; 3],
) -> f64 {
    let [p1, p2, p3] = triple;

    // Wilson mass function at p and q; the spatial part is shared
    let m_p = 4.0 - temporal.cos[p0] - spatial.cos[p1] - spatial.cos[p2] - spatial.cos[p3];
    let m_q = 4.0 - temporal.cos[q0] - spatial.cos[p1] - spatial.cos[p2] - spatial.cos[p3];

    let sin0_prod = temporal.sin[p0] * temporal.sin[q0];
    let spatial_sin2 = spatial.sin2[p1] + spatial.sin2[p2] + spatial.sin2[p3];

    let numerator = if r12 == 0 {
        conserved_numerator(mu2, m_p, m_q, sin0_prod, spatial, p1, p2, p3)
    } else {
        mu2 + sin0_prod + spatial_sin2 / 3.0 - m_p * m_q * r12 as f64
    };

    let den_p = mu2 + m_p * m_p + temporal.sin2[p0] + spatial_sin2;
    let den_q = mu2 + m_q * m_q + temporal.sin2[q0] + spatial_sin2;

    numerator / (den_p * den_q)
}

/// Numerator for one local and one point-split (conserved) current
/// insertion. Each spatial direction's cosine is weighted by the sin² of
/// the other two directions against its own.
fn conserved_numerator(
    mu2: f64,
    m_p: f64,
    m_q: f64,
    sin0_prod: f64,
    spatial: &MomentumTable,
    p1: usize,
    p2: usize,
    p3: usize,
) -> f64 {
    let (c1, c2, c3) = (spatial.cos[p1], spatial.cos[p2], spatial.cos[p3]);
    let (s1, s2, s3) = (spatial.sin2[p1], spatial.sin2[p2], spatial.sin2[p3]);

    (mu2 + m_p * m_q) * (c1 + c2 + c3) / 3.0
        + (sin0_prod - s1 + s2 + s3) * c1 / 3.0
        + (sin0_prod + s1 - s2 + s3) * c2 / 3.0
        + (sin0_prod + s1 + s2 - s3) * c3 / 3.0
}
