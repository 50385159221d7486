use crate::errors::{IsingError, Result};
use crate::lattice::Lattice;
use rand::Rng;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A single binary spin, always `-1` or `+1`.
pub type Spin = i8;

/// Dense spin configuration, indexed like the lattice it was made for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SpinState {
    spins: Vec<Spin>,
}

impl SpinState {
    /// Every site set to `spin`.
    pub fn uniform(lattice: &Lattice, up: bool) -> Self {
        let spin = if up { 1 } else { -1 };
        Self {
            spins: vec![spin; lattice.number_sites()],
        }
    }

    /// Restore a configuration, checking its size and values against the lattice.
    pub fn from_spins<S: Into<Vec<Spin>>>(lattice: &Lattice, spins: S) -> Result<Self> {
        let spins = spins.into();
        lattice.check_state_size(spins.len())?;
        if let Some((site, value)) = spins
            .iter()
            .copied()
            .enumerate()
            .find(|(_, s)| *s != 1 && *s != -1)
        {
            return Err(IsingError::InvalidSpin { site, value });
        }
        Ok(Self { spins })
    }

    /// Restore a configuration from booleans, `true` is spin up.
    pub fn from_bools(lattice: &Lattice, state: &[bool]) -> Result<Self> {
        lattice.check_state_size(state.len())?;
        Ok(Self {
            spins: state.iter().map(|b| if *b { 1 } else { -1 }).collect(),
        })
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.spins.len()
    }

    /// True if there are no sites.
    pub fn is_empty(&self) -> bool {
        self.spins.is_empty()
    }

    /// The raw spins.
    pub fn as_slice(&self) -> &[Spin] {
        &self.spins
    }

    /// Spin up as `true`.
    pub fn to_bools(&self) -> Vec<bool> {
        self.spins.iter().map(|s| *s > 0).collect()
    }

    /// Reverse the spin at `site`.
    #[inline]
    pub fn flip(&mut self, site: usize) {
        self.spins[site] = -self.spins[site];
    }
}

impl Index<usize> for SpinState {
    type Output = Spin;

    fn index(&self, site: usize) -> &Spin {
        &self.spins[site]
    }
}

/// Draw an independent fair coin per site.
pub fn sample_random_state<R: Rng + ?Sized>(lattice: &Lattice, rng: &mut R) -> SpinState {
    SpinState {
        spins: (0..lattice.number_sites())
            .map(|_| if rng.gen::<bool>() { 1 } else { -1 })
            .collect(),
    }
}
