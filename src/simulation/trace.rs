use crate::errors::Result;
use crate::estimators::Observable;
use crate::observables::Measurement;
use crate::state::SpinState;
#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// One production sweep worth of observables.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct TraceRow {
    /// Index of the production sweep.
    pub sweep_index: usize,
    /// Total energy.
    pub energy: f64,
    /// Sum of all spins.
    pub magnetization: f64,
    /// Sum of the spins on even sites.
    pub magnetization_even_sites: f64,
    /// Sum of the spins on odd sites.
    pub magnetization_odd_sites: f64,
}

impl TraceRow {
    /// Row for a measurement taken after sweep `sweep_index`.
    pub fn new(sweep_index: usize, measurement: &Measurement) -> Self {
        Self {
            sweep_index,
            energy: measurement.energy,
            magnetization: measurement.magnetization,
            magnetization_even_sites: measurement.magnetization_even_sites,
            magnetization_odd_sites: measurement.magnetization_odd_sites,
        }
    }

    /// The value of one observable in this row.
    pub fn value(&self, observable: Observable) -> f64 {
        match observable {
            Observable::Energy => self.energy,
            Observable::Magnetization => self.magnetization,
            Observable::MagnetizationEvenSites => self.magnetization_even_sites,
            Observable::MagnetizationOddSites => self.magnetization_odd_sites,
        }
    }
}

/// Receives the history of a run: one checkpoint, then one row per production sweep.
pub trait TraceSink {
    /// Store a deep copy of the state at the start of production.
    fn save_full_state(&mut self, state: &SpinState) -> Result<()>;

    /// Store the observables of one production sweep.
    fn record_sweep(&mut self, row: TraceRow) -> Result<()>;
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn save_full_state(&mut self, state: &SpinState) -> Result<()> {
        (**self).save_full_state(state)
    }

    fn record_sweep(&mut self, row: TraceRow) -> Result<()> {
        (**self).record_sweep(row)
    }
}

/// A sink which drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn save_full_state(&mut self, _state: &SpinState) -> Result<()> {
        Ok(())
    }

    fn record_sweep(&mut self, _row: TraceRow) -> Result<()> {
        Ok(())
    }
}

/// In-memory history of a run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationTrace {
    checkpoint: Option<SpinState>,
    rows: Vec<TraceRow>,
}

impl SimulationTrace {
    /// An empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// State at the start of production, if it has been saved.
    pub fn checkpoint(&self) -> Option<&SpinState> {
        self.checkpoint.as_ref()
    }

    /// Every recorded row in sweep order.
    pub fn rows(&self) -> &[TraceRow] {
        &self.rows
    }

    /// Number of recorded rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no rows were recorded.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Time series of one observable.
    pub fn series(&self, observable: Observable) -> Vec<f64> {
        self.rows.iter().map(|row| row.value(observable)).collect()
    }
}

impl TraceSink for SimulationTrace {
    fn save_full_state(&mut self, state: &SpinState) -> Result<()> {
        self.checkpoint = Some(state.clone());
        Ok(())
    }

    fn record_sweep(&mut self, row: TraceRow) -> Result<()> {
        self.rows.push(row);
        Ok(())
    }
}
