use crate::errors::Result;
use crate::lattice::{Lattice, NeighborhoodSpec};
use crate::sweep::check_temperature;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Everything needed to set up and run one simulation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationParameters {
    /// Extent along each axis.
    pub dimensions: Vec<usize>,
    /// Neighborhood rule.
    pub neighborhood: NeighborhoodSpec,
    /// One coupling per neighborhood offset.
    pub interaction_coefficients: Vec<f64>,
    /// Temperature, must be positive.
    pub temperature: f64,
    /// Unrecorded burn-in sweeps.
    pub equilibration_sweeps: usize,
    /// Recorded sweeps.
    pub sweeps: usize,
    /// Seed for the random source, consumed once.
    pub seed: u64,
}

impl SimulationParameters {
    /// Nearest neighbor model with the same coupling on every bond.
    ///
    /// Positive `coupling` is ferromagnetic, negative is antiferromagnetic.
    /// Runs a single production sweep without burn-in until adjusted.
    pub fn nearest_neighbor(dimensions: Vec<usize>, coupling: f64, temperature: f64) -> Self {
        let interaction_coefficients = vec![coupling; 2 * dimensions.len()];
        Self {
            dimensions,
            neighborhood: NeighborhoodSpec::NearestNeighbor,
            interaction_coefficients,
            temperature,
            equilibration_sweeps: 0,
            sweeps: 1,
            seed: 0,
        }
    }

    /// Set the number of equilibration and production sweeps.
    pub fn with_sweeps(mut self, equilibration_sweeps: usize, sweeps: usize) -> Self {
        self.equilibration_sweeps = equilibration_sweeps;
        self.sweeps = sweeps;
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the lattice described by these parameters.
    pub fn build_lattice(&self) -> Result<Lattice> {
        Lattice::build(
            &self.dimensions,
            &self.neighborhood,
            &self.interaction_coefficients,
        )
    }

    /// Run every configuration check without keeping the lattice.
    pub fn validate(&self) -> Result<()> {
        check_temperature(self.temperature)?;
        self.build_lattice().map(|_| ())
    }
}
