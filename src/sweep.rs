use crate::errors::{IsingError, Result};
use crate::estimators::EstimatorAccumulators;
use crate::lattice::Lattice;
use crate::observables::{local_field, Measurement};
use crate::state::{Spin, SpinState};
use rand::Rng;

/// Whether a sweep is relaxing the state or measuring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SweepPhase {
    /// Burn-in, nothing is recorded.
    Equilibration,
    /// Observables are measured and recorded once after the pass.
    Production,
}

/// Bookkeeping for a single sweep call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SweepContext {
    /// Index of the sweep within its phase.
    pub sweep_index: usize,
    /// Phase the sweep belongs to.
    pub phase: SweepPhase,
}

impl SweepContext {
    /// Context from the `equilibration_run` flag.
    pub fn new(sweep_index: usize, equilibration_run: bool) -> Self {
        if equilibration_run {
            Self::equilibration(sweep_index)
        } else {
            Self::production(sweep_index)
        }
    }

    /// An equilibration sweep.
    pub fn equilibration(sweep_index: usize) -> Self {
        Self {
            sweep_index,
            phase: SweepPhase::Equilibration,
        }
    }

    /// A production sweep.
    pub fn production(sweep_index: usize) -> Self {
        Self {
            sweep_index,
            phase: SweepPhase::Production,
        }
    }

    /// True during burn-in.
    pub fn is_equilibration(&self) -> bool {
        self.phase == SweepPhase::Equilibration
    }
}

/// What a sweep did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepOutcome {
    /// Index of the sweep within its phase.
    pub sweep_index: usize,
    /// Number of proposed flips which were accepted.
    pub accepted_flips: usize,
    /// Number of proposed flips, one per site.
    pub trials: usize,
    /// Observables recorded after the pass, production sweeps only.
    pub measurement: Option<Measurement>,
}

impl SweepOutcome {
    /// Fraction of accepted proposals.
    pub fn acceptance_ratio(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.accepted_flips as f64 / self.trials as f64
        }
    }
}

/// Fail unless the temperature is strictly positive. NaN is rejected.
pub fn check_temperature(temperature: f64) -> Result<()> {
    if temperature > 0.0 {
        Ok(())
    } else {
        Err(IsingError::InvalidTemperature(temperature))
    }
}

/// Energy change from reversing the spin at `site`.
///
/// This is twice the local contribution of the reversed spin. It equals the
/// change in total energy when every coupling is mirrored, i.e. the
/// neighborhood contains `-o` with the same coefficient for every offset `o`.
#[inline]
pub fn flip_energy_change(lattice: &Lattice, spins: &[Spin], site: usize) -> f64 {
    2.0 * f64::from(spins[site]) * local_field(lattice, spins, site)
}

/// Metropolis acceptance probability, `min(1, exp(-delta_e / temperature))`.
pub fn acceptance_probability(delta_e: f64, temperature: f64) -> f64 {
    if delta_e > 0.0 {
        (-delta_e / temperature).exp()
    } else {
        1.0
    }
}

/// Randomly choose if a flip should be made based on temperature and energy change.
pub fn should_flip<R: Rng + ?Sized>(rng: &mut R, temperature: f64, delta_e: f64) -> bool {
    // If dE <= 0 then it will always flip, don't draw.
    if delta_e > 0.0 {
        rng.gen::<f64>() < acceptance_probability(delta_e, temperature)
    } else {
        true
    }
}

/// Perform one Metropolis sweep: a single flip proposal at every site, in index order.
///
/// Production sweeps measure the whole lattice once afterwards and append to
/// `accumulators`. Equilibration sweeps leave `accumulators` untouched.
///
/// # Errors
/// * [`IsingError::InvalidTemperature`] for a non-positive temperature.
/// * [`IsingError::StateSizeMismatch`] if `state` was not made for `lattice`.
///
/// Both are checked before any spin is touched.
pub fn sweep_grid<R: Rng + ?Sized>(
    lattice: &Lattice,
    state: &mut SpinState,
    accumulators: &mut EstimatorAccumulators,
    context: SweepContext,
    temperature: f64,
    rng: &mut R,
) -> Result<SweepOutcome> {
    check_temperature(temperature)?;
    lattice.check_state_size(state.len())?;

    let trials = lattice.number_sites();
    let mut accepted_flips = 0;
    for site in 0..trials {
        let delta_e = flip_energy_change(lattice, state.as_slice(), site);
        if should_flip(rng, temperature, delta_e) {
            state.flip(site);
            accepted_flips += 1;
        }
    }

    let measurement = match context.phase {
        SweepPhase::Equilibration => None,
        SweepPhase::Production => {
            let measurement = Measurement::measure(lattice, state)?;
            accumulators.record_measurement(&measurement);
            Some(measurement)
        }
    };

    Ok(SweepOutcome {
        sweep_index: context.sweep_index,
        accepted_flips,
        trials,
        measurement,
    })
}
