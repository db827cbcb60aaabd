//! Lattice geometry and discrete momentum tables.
//!
//! The fermion lives on a T×L³ Euclidean grid: T sites along time with
//! antiperiodic boundary conditions, L sites along each of the three
//! spatial axes with periodic ones. Antiperiodicity shifts every temporal
//! momentum by half a lattice unit:
//!
//!   p₀(k) = 2π(k + 1/2)/T,    pᵢ(k) = 2πk/L
//!
//! The correlator kernel consumes momenta only through sin, sin², and cos,
//! so each axis precomputes those three tables once per invocation.
//!
//! # Symmetry packings
//!
//! Two index reductions keep the momentum sums tractable:
//! - unordered temporal pairs (q₀, p₀) with q₀ ≥ p₀ pack into a single
//!   linear index i = q₀(q₀+1)/2 + p₀, halving the T² double loop; the
//!   linear index is also the unit of parallel work distribution;
//! - spatial triples fold into p₁ ≥ p₂ ≥ p₃ with each component in
//!   0..=L/2, unfolded by reflection and permutation multiplicities.

use std::f64::consts::PI;

/// Phase offset of temporal momenta in units of 2π/T (antiperiodic bc).
const TEMPORAL_TWIST: f64 = 0.5;

/// Permutation multiplicity, indexed by the number of unequal pairs among
/// the three spatial components. Index 1 cannot occur.
const PERM_MULT: [f64; 4] = [1.0, 1.0, 3.0, 6.0];

/// A finite T×L³ space-time grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lattice {
    /// Temporal extent T (the antiperiodic axis).
    pub t_extent: usize,
    /// Spatial extent L, shared by all three spatial axes.
    pub l_extent: usize,
}

impl Lattice {
    /// Create a T×L³ grid.
    pub fn new(t_extent: usize, l_extent: usize) -> Self {
        assert!(t_extent > 0, "temporal extent must be positive, got {}", t_extent);
        assert!(l_extent > 0, "spatial extent must be positive, got {}", l_extent);
        Self { t_extent, l_extent }
    }

    /// The same physical volume at `scale`-times-finer spacing: both
    /// extents multiplied by `scale`.
    pub fn refined(&self, scale: usize) -> Self {
        assert!(scale >= 1, "refinement scale must be at least 1, got {}", scale);
        Self::new(self.t_extent * scale, self.l_extent * scale)
    }

    /// Number of unordered temporal momentum pairs, T(T+1)/2.
    pub fn num_pairs(&self) -> usize {
        self.t_extent * (self.t_extent + 1) / 2
    }

    /// Spatial volume L³.
    pub fn spatial_volume(&self) -> usize {
        self.l_extent * self.l_extent * self.l_extent
    }
}

/// Precomputed sin / sin² / cos of the discrete momenta along one axis.
#[derive(Debug, Clone)]
pub struct MomentumTable {
    pub sin: Vec<f64>,
    pub sin2: Vec<f64>,
    pub cos: Vec<f64>,
}

impl MomentumTable {
    /// Temporal axis: momenta shifted by half a lattice unit.
    pub fn antiperiodic(extent: usize) -> Self {
        Self::build(extent, TEMPORAL_TWIST)
    }

    /// Spatial axis: unshifted periodic momenta. One table serves all
    /// three axes.
    pub fn periodic(extent: usize) -> Self {
        Self::build(extent, 0.0)
    }

    fn build(extent: usize, twist: f64) -> Self {
        let mut sin = Vec::with_capacity(extent);
        let mut sin2 = Vec::with_capacity(extent);
        let mut cos = Vec::with_capacity(extent);
        for k in 0..extent {
            let p = 2.0 * PI * (k as f64 + twist) / extent as f64;
            let s = p.sin();
            sin.push(s);
            sin2.push(s * s);
            cos.push(p.cos());
        }
        Self { sin, sin2, cos }
    }

    /// Number of momenta along the axis.
    pub fn len(&self) -> usize {
        self.cos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cos.is_empty()
    }
}

/// Pack an ordered pair q₀ ≥ p₀ into its linear triangular index.
pub fn pair_index(q0: usize, p0: usize) -> usize {
    debug_assert!(p0 <= q0);
    q0 * (q0 + 1) / 2 + p0
}

/// Recover (q₀, p₀) with q₀ ≥ p₀ from a linear triangular index.
pub fn pair_from_index(i: usize) -> (usize, usize) {
    let q0 = ((-1.0 + (1.0 + 8.0 * i as f64).sqrt()) / 2.0) as usize;
    let p0 = i - q0 * (q0 + 1) / 2;
    (q0, p0)
}

/// Reflection multiplicity of one folded spatial component: momenta
/// strictly between 0 and L/2 stand for a ± pair, the endpoints are
/// self-conjugate.
pub fn reflection_multiplicity(component: usize, l_extent: usize) -> usize {
    if component != 0 && component != l_extent / 2 {
        2
    } else {
        1
    }
}

/// Combined reflection multiplicity of a folded spatial triple.
pub fn triple_reflection_multiplicity(triple: [usize; 3], l_extent: usize) -> f64 {
    triple
        .iter()
        .map(|&c| reflection_multiplicity(c, l_extent))
        .product::<usize>() as f64
}

/// Permutation multiplicity of an ordered triple p₁ ≥ p₂ ≥ p₃: the number
/// of distinct axis orderings it stands for (1, 3 or 6).
pub fn permutation_multiplicity(p1: usize, p2: usize, p3: usize) -> f64 {
    let unequal = (p1 != p2) as usize + (p2 != p3) as usize + (p3 != p1) as usize;
    PERM_MULT[unequal]
}
