//! # wilson-correlator-sim
//!
//! Vector-current two-point correlator of a free Wilson twisted-mass
//! fermion on a finite T×L³ Euclidean lattice, with continuum-scaling
//! sweeps that expose a² discretization artifacts.
//!
//! ## Physics
//!
//! - **Correlator**: C(t) = Σₖ ⟨Vₖ(t) Vₖ(0)⟩ for the spatial vector
//!   currents of one free quark flavor with Nc = 3 colors. This is a
//!   one-loop product of two lattice propagators, evaluated in momentum
//!   space and cosine-transformed back to Euclidean time separation.
//! - **Insertions**: two local currents (r12 ≠ 0, with the Wilson-sign
//!   product as coefficient), or one local and one conserved point-split
//!   current (r12 = 0).
//! - **Boundary conditions**: antiperiodic in time (every temporal
//!   momentum is offset by half a lattice unit), periodic in space.
//! - **Scaling**: refining the grid by s (extents ×s, mass ÷s), sampling
//!   every s-th time slice and rescaling by s³ reproduces the coarse
//!   correlator up to O(a²); differencing against s = 1 isolates the
//!   artifact, scale by scale.
//!
//! Momentum sums fold the octahedral symmetry of the spatial cube
//! (±reflection and axis permutation) onto ordered triples with
//! multiplicity weights, and pack the temporal pair loop into a triangular
//! index that doubles as the unit of parallel work.

pub mod kernel;
pub mod lattice;
pub mod scaling;
pub mod store;
pub mod sweep;

pub mod prelude {
    pub use crate::kernel::*;
    pub use crate::lattice::*;
    pub use crate::scaling::*;
    pub use crate::store::*;
    pub use crate::sweep::*;
}
