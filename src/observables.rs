use crate::errors::Result;
use crate::lattice::{Lattice, Parity};
use crate::state::{Spin, SpinState};
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Sum of `coefficient_k * spin[neighbor_k]` around `site`, without size checks.
#[inline]
pub(crate) fn local_field(lattice: &Lattice, spins: &[Spin], site: usize) -> f64 {
    lattice
        .couplings(site)
        .map(|(neighbor, j)| j * f64::from(spins[neighbor]))
        .sum()
}

/// Energy attributable to `site`: `-spin[site] * sum_k(coefficient_k * spin[neighbor_k])`.
///
/// Panics if `site` is not a site of the lattice.
pub fn local_energy_contribution(lattice: &Lattice, state: &SpinState, site: usize) -> Result<f64> {
    lattice.check_state_size(state.len())?;
    let spins = state.as_slice();
    Ok(-f64::from(spins[site]) * local_field(lattice, spins, site))
}

/// Total energy. Each pair is seen once from either end, so the local sum is halved.
pub fn total_energy(lattice: &Lattice, state: &SpinState) -> Result<f64> {
    lattice.check_state_size(state.len())?;
    let spins = state.as_slice();
    let twice_energy: f64 = (0..lattice.number_sites())
        .map(|site| -f64::from(spins[site]) * local_field(lattice, spins, site))
        .sum();
    Ok(twice_energy / 2.0)
}

/// Sum of all spins.
pub fn magnetization(state: &SpinState) -> f64 {
    state.as_slice().iter().map(|s| f64::from(*s)).sum()
}

/// Sum of the spins on sites of the given parity.
pub fn sublattice_magnetization(
    lattice: &Lattice,
    state: &SpinState,
    parity: Parity,
) -> Result<f64> {
    lattice.check_state_size(state.len())?;
    Ok(state
        .as_slice()
        .iter()
        .enumerate()
        .filter(|(site, _)| lattice.parity(*site) == parity)
        .map(|(_, s)| f64::from(*s))
        .sum())
}

/// Whole-lattice observables taken at a sweep boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Measurement {
    /// Total energy.
    pub energy: f64,
    /// Sum of all spins.
    pub magnetization: f64,
    /// Sum of the spins on even sites.
    pub magnetization_even_sites: f64,
    /// Sum of the spins on odd sites.
    pub magnetization_odd_sites: f64,
}

impl Measurement {
    /// Measure every observable of `state`.
    pub fn measure(lattice: &Lattice, state: &SpinState) -> Result<Self> {
        let energy = total_energy(lattice, state)?;
        let (even, odd) = state.as_slice().iter().enumerate().fold(
            (0.0, 0.0),
            |(even, odd), (site, s)| match lattice.parity(site) {
                Parity::Even => (even + f64::from(*s), odd),
                Parity::Odd => (even, odd + f64::from(*s)),
            },
        );
        Ok(Self {
            energy,
            magnetization: even + odd,
            magnetization_even_sites: even,
            magnetization_odd_sites: odd,
        })
    }

    /// Staggered magnetization, even minus odd.
    pub fn staggered_magnetization(&self) -> f64 {
        self.magnetization_even_sites - self.magnetization_odd_sites
    }
}
