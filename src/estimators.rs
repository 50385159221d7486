use crate::errors::{IsingError, Result};
use crate::observables::Measurement;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The observables tracked over a production run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Observable {
    /// Total energy of the lattice.
    Energy,
    /// Sum of all spins.
    Magnetization,
    /// Sum of the spins on even sites.
    MagnetizationEvenSites,
    /// Sum of the spins on odd sites.
    MagnetizationOddSites,
}

impl Observable {
    /// Every observable, in storage order.
    pub const ALL: [Observable; 4] = [
        Observable::Energy,
        Observable::Magnetization,
        Observable::MagnetizationEvenSites,
        Observable::MagnetizationOddSites,
    ];

    /// Snake case name, as used for trace columns.
    pub fn name(self) -> &'static str {
        match self {
            Observable::Energy => "energy",
            Observable::Magnetization => "magnetization",
            Observable::MagnetizationEvenSites => "magnetization_even_sites",
            Observable::MagnetizationOddSites => "magnetization_odd_sites",
        }
    }

    /// Pick this observable out of a measurement.
    pub fn of(self, measurement: &Measurement) -> f64 {
        match self {
            Observable::Energy => measurement.energy,
            Observable::Magnetization => measurement.magnetization,
            Observable::MagnetizationEvenSites => measurement.magnetization_even_sites,
            Observable::MagnetizationOddSites => measurement.magnetization_odd_sites,
        }
    }

    fn index(self) -> usize {
        match self {
            Observable::Energy => 0,
            Observable::Magnetization => 1,
            Observable::MagnetizationEvenSites => 2,
            Observable::MagnetizationOddSites => 3,
        }
    }
}

impl Display for Observable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Running sums for one observable.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Accumulator {
    total: f64,
    total_squared: f64,
    count: usize,
}

impl Accumulator {
    /// Add one sample.
    pub fn record(&mut self, value: f64) {
        self.total += value;
        self.total_squared += value * value;
        self.count += 1;
    }

    /// Sum of recorded values.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Sum of squared recorded values.
    pub fn total_squared(&self) -> f64 {
        self.total_squared
    }

    /// Number of recorded samples.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean of the samples, `None` before the first sample.
    pub fn moment(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }

    /// Mean of the squared samples, `None` before the first sample.
    pub fn second_moment(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total_squared / self.count as f64)
    }

    /// Population variance of the samples.
    pub fn variance(&self) -> Option<f64> {
        let mean = self.moment()?;
        // Cancellation can push this a hair below zero.
        Some((self.second_moment()? - mean * mean).max(0.0))
    }
}

/// Running estimators for every [`Observable`]. Strictly append and read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct EstimatorAccumulators {
    accumulators: [Accumulator; 4],
}

impl EstimatorAccumulators {
    /// Empty accumulators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample for one observable.
    pub fn record(&mut self, observable: Observable, value: f64) {
        self.accumulators[observable.index()].record(value)
    }

    /// Append one sample to every observable.
    pub fn record_measurement(&mut self, measurement: &Measurement) {
        Observable::ALL
            .iter()
            .for_each(|o| self.record(*o, o.of(measurement)));
    }

    /// Raw sums for one observable.
    pub fn accumulator(&self, observable: Observable) -> &Accumulator {
        &self.accumulators[observable.index()]
    }

    /// Number of samples recorded for an observable.
    pub fn count(&self, observable: Observable) -> usize {
        self.accumulator(observable).count()
    }

    /// Sum of the samples recorded for an observable.
    pub fn total(&self, observable: Observable) -> f64 {
        self.accumulator(observable).total()
    }

    /// Mean of an observable, total over count.
    ///
    /// # Errors
    /// [`IsingError::NoSamplesRecorded`] if nothing has been recorded yet.
    pub fn moment(&self, observable: Observable) -> Result<f64> {
        self.accumulator(observable)
            .moment()
            .ok_or(IsingError::NoSamplesRecorded(observable))
    }

    /// Mean of the squared observable.
    pub fn second_moment(&self, observable: Observable) -> Result<f64> {
        self.accumulator(observable)
            .second_moment()
            .ok_or(IsingError::NoSamplesRecorded(observable))
    }

    /// Variance of an observable over the recorded samples.
    pub fn variance(&self, observable: Observable) -> Result<f64> {
        self.accumulator(observable)
            .variance()
            .ok_or(IsingError::NoSamplesRecorded(observable))
    }
}
