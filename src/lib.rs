#![deny(
    missing_docs,
    unreachable_pub,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]

//! `spinlattice` is a library for simulating classical binary spin models on periodic
//! lattices of any dimension using Metropolis monte carlo.
//!
//! The lattice is built once from its extents, a neighborhood rule, and one coupling
//! per neighbor offset. Sweeps then propose a flip at every site in index order and
//! record energy, magnetization, and the even/odd sublattice magnetizations after
//! each production sweep.
//!
//! It also offers a few feature gated modules:
//! - autocorrelation calculations on traced observables: use `autocorrelations`
//! - parameter, state, and trace serialization using serde with the `serialize` feature.
//!
//! # Basic Ising Example
//! ```
//! use spinlattice::simulation::*;
//!
//! // 8x8 ferromagnet, J = 1 on each of the four nearest neighbor bonds.
//! let params = SimulationParameters::nearest_neighbor(vec![8, 8], 1.0, 2.0)
//!     .with_sweeps(100, 1000)
//!     .with_seed(1234);
//!
//! let mut trace = SimulationTrace::new();
//! let (sim, order) = run_simulation::<DefaultRng, _>(params, &mut trace).unwrap();
//!
//! assert_eq!(trace.len(), 1000);
//! assert!(order.ferromagnetic.abs() <= 1.0);
//! println!("{}", order);
//! # let _ = sim;
//! ```
//!
//! # Driving sweeps by hand
//! ```
//! use spinlattice::*;
//! use rand::prelude::*;
//!
//! let lattice = Lattice::build(&[16], &NearestNeighbors, &[1.0, 1.0]).unwrap();
//! let mut rng = StdRng::seed_from_u64(1234);
//! let mut state = sample_random_state(&lattice, &mut rng);
//! let mut estimators = EstimatorAccumulators::new();
//!
//! for i in 0..10 {
//!     sweep_grid(&lattice, &mut state, &mut estimators, SweepContext::new(i, i < 5), 1.5, &mut rng)
//!         .unwrap();
//! }
//! assert_eq!(estimators.count(Observable::Energy), 5);
//! let energy = estimators.moment(Observable::Energy).unwrap();
//! ```

/// Autocorrelation of traced observables.
#[cfg(feature = "autocorrelations")]
pub mod autocorrelations;
/// Error types.
pub mod errors;
/// Running estimators for the recorded observables.
pub mod estimators;
/// Lattice geometry and neighbor tables.
pub mod lattice;
/// Energy and magnetization of a spin configuration.
pub mod observables;
/// The run driver and its external boundaries.
pub mod simulation;
/// Spin configurations and random initial states.
pub mod state;
/// The Metropolis sweep.
pub mod sweep;

#[cfg(feature = "autocorrelations")]
pub use autocorrelations::TraceAutoCorrelations;
pub use errors::{IsingError, Result};
pub use estimators::{Accumulator, EstimatorAccumulators, Observable};
pub use lattice::{
    CustomNeighborhood, Lattice, NearestNeighbors, Neighborhood, NeighborhoodSpec,
    NextNearestNeighbors, Parity,
};
pub use observables::{
    local_energy_contribution, magnetization, sublattice_magnetization, total_energy,
    Measurement,
};
pub use state::{sample_random_state, Spin, SpinState};
pub use sweep::{sweep_grid, SweepContext, SweepOutcome, SweepPhase};
