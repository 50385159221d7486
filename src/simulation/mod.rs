//! Drives a run: burn-in, checkpoint, production, report.

/// Run configuration.
pub mod parameters;

/// Order parameters derived from the estimators.
pub mod report;

/// The persistence boundary and an in-memory trace.
pub mod trace;

pub use parameters::SimulationParameters;
pub use report::OrderParameters;
pub use trace::{NullSink, SimulationTrace, TraceRow, TraceSink};

use crate::errors::Result;
use crate::estimators::EstimatorAccumulators;
use crate::lattice::Lattice;
use crate::state::{sample_random_state, SpinState};
use crate::sweep::{check_temperature, sweep_grid, SweepContext, SweepOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

/// Random source used when none is chosen.
pub type DefaultRng = StdRng;

/// A single replica simulation owning its lattice, state, estimators and random source.
#[derive(Debug)]
pub struct Simulation<R: Rng> {
    parameters: SimulationParameters,
    lattice: Lattice,
    state: SpinState,
    estimators: EstimatorAccumulators,
    rng: R,
    equilibration_sweeps_done: usize,
    production_sweeps_done: usize,
    accepted_flips: usize,
    trials: usize,
}

impl<R: Rng + SeedableRng> Simulation<R> {
    /// Validate the parameters, seed the random source from them, and sample a state.
    pub fn new(parameters: SimulationParameters) -> Result<Self> {
        let rng = R::seed_from_u64(parameters.seed);
        Self::new_with_rng(parameters, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Set up with an already seeded random source. `parameters.seed` is ignored.
    pub fn new_with_rng(parameters: SimulationParameters, mut rng: R) -> Result<Self> {
        check_temperature(parameters.temperature)?;
        let lattice = parameters.build_lattice()?;
        let state = sample_random_state(&lattice, &mut rng);
        info!(
            dimensions = ?parameters.dimensions,
            number_sites = lattice.number_sites(),
            temperature = parameters.temperature,
            "simulation initialized"
        );
        Ok(Self {
            parameters,
            lattice,
            state,
            estimators: EstimatorAccumulators::new(),
            rng,
            equilibration_sweeps_done: 0,
            production_sweeps_done: 0,
            accepted_flips: 0,
            trials: 0,
        })
    }

    /// The run configuration.
    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// The lattice.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// The live spin state.
    pub fn state(&self) -> &SpinState {
        &self.state
    }

    /// The production estimators.
    pub fn estimators(&self) -> &EstimatorAccumulators {
        &self.estimators
    }

    /// Overwrite the live state wholesale, e.g. from a checkpoint.
    pub fn restore_state(&mut self, state: SpinState) -> Result<()> {
        self.lattice.check_state_size(state.len())?;
        self.state = state;
        Ok(())
    }

    /// Fraction of accepted flip proposals over every sweep so far.
    pub fn acceptance_ratio(&self) -> Option<f64> {
        (self.trials > 0).then(|| self.accepted_flips as f64 / self.trials as f64)
    }

    fn sweep(&mut self, context: SweepContext) -> Result<SweepOutcome> {
        let outcome = sweep_grid(
            &self.lattice,
            &mut self.state,
            &mut self.estimators,
            context,
            self.parameters.temperature,
            &mut self.rng,
        )?;
        self.accepted_flips += outcome.accepted_flips;
        self.trials += outcome.trials;
        Ok(outcome)
    }

    /// Run the configured number of unrecorded burn-in sweeps.
    #[instrument(skip(self), name = "equilibration")]
    pub fn equilibrate(&mut self) -> Result<()> {
        let n = self.parameters.equilibration_sweeps;
        info!(sweeps = n, "equilibration starting");
        for _ in 0..n {
            let context = SweepContext::equilibration(self.equilibration_sweeps_done);
            self.sweep(context)?;
            self.equilibration_sweeps_done += 1;
        }
        debug!(acceptance = ?self.acceptance_ratio(), "equilibration complete");
        Ok(())
    }

    /// Hand a deep copy of the current state to the sink.
    pub fn checkpoint<S: TraceSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        debug!(number_sites = self.state.len(), "saving full state");
        sink.save_full_state(&self.state)
    }

    /// Run the configured number of production sweeps, one trace row each.
    #[instrument(skip_all, name = "production")]
    pub fn produce<S: TraceSink + ?Sized>(&mut self, sink: &mut S) -> Result<()> {
        let n = self.parameters.sweeps;
        info!(sweeps = n, "production starting");
        for _ in 0..n {
            let context = SweepContext::production(self.production_sweeps_done);
            let outcome = self.sweep(context)?;
            self.production_sweeps_done += 1;
            if let Some(measurement) = outcome.measurement {
                tracing::trace!(
                    sweep = outcome.sweep_index,
                    energy = measurement.energy,
                    magnetization = measurement.magnetization,
                    accepted = outcome.accepted_flips,
                    "sweep recorded"
                );
                sink.record_sweep(TraceRow::new(outcome.sweep_index, &measurement))?;
            }
        }
        Ok(())
    }

    /// Order parameters from the production estimators.
    pub fn report(&self) -> Result<OrderParameters> {
        OrderParameters::from_estimators(
            &self.estimators,
            self.lattice.number_sites(),
            self.parameters.temperature,
        )
    }

    /// Equilibrate, checkpoint, produce, and report.
    pub fn run<S: TraceSink + ?Sized>(&mut self, sink: &mut S) -> Result<OrderParameters> {
        self.equilibrate()?;
        self.checkpoint(sink)?;
        self.produce(sink)?;
        let order = self.report()?;
        info!(
            average_energy = order.average_energy,
            ferromagnetic = order.ferromagnetic,
            antiferromagnetic = order.antiferromagnetic,
            acceptance = ?self.acceptance_ratio(),
            "simulation complete"
        );
        Ok(order)
    }
}

/// Build, seed, and run a simulation end to end.
///
/// Returns the finished simulation, for its estimators and final state, with
/// the order parameters.
pub fn run_simulation<R, S>(
    parameters: SimulationParameters,
    sink: &mut S,
) -> Result<(Simulation<R>, OrderParameters)>
where
    R: Rng + SeedableRng,
    S: TraceSink + ?Sized,
{
    let mut simulation = Simulation::<R>::new(parameters)?;
    let order = simulation.run(sink)?;
    Ok((simulation, order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IsingError;
    use crate::estimators::Observable;
    use crate::observables::Measurement;
    use rand::rngs::SmallRng;

    fn params() -> SimulationParameters {
        SimulationParameters::nearest_neighbor(vec![4, 4], 1.0, 2.0)
            .with_sweeps(10, 25)
            .with_seed(1234)
    }

    #[test]
    fn test_run_counts() {
        let mut trace = SimulationTrace::new();
        let (sim, _) = run_simulation::<SmallRng, _>(params(), &mut trace).unwrap();
        assert_eq!(trace.len(), 25);
        assert!(trace.checkpoint().is_some());
        for o in Observable::ALL {
            assert_eq!(sim.estimators().count(o), 25);
        }
        let indices = trace.rows().iter().map(|r| r.sweep_index).collect::<Vec<_>>();
        assert_eq!(indices, (0..25).collect::<Vec<_>>());
        assert!(sim.acceptance_ratio().is_some());
    }

    #[test]
    fn test_last_row_is_final_state() {
        let mut trace = SimulationTrace::new();
        let (sim, _) = run_simulation::<SmallRng, _>(params(), &mut trace).unwrap();
        let last = trace.rows().last().copied().unwrap();
        let m = Measurement::measure(sim.lattice(), sim.state()).unwrap();
        assert_eq!(last, TraceRow::new(24, &m));
    }

    #[test]
    fn test_checkpoint_is_production_start() {
        let params = params().with_sweeps(3, 0);
        let mut sim = Simulation::<SmallRng>::new(params).unwrap();
        let mut trace = SimulationTrace::new();
        sim.equilibrate().unwrap();
        sim.checkpoint(&mut trace).unwrap();
        assert_eq!(trace.checkpoint(), Some(sim.state()));
        // Nothing produced, reporting must refuse rather than return zeros.
        sim.produce(&mut trace).unwrap();
        assert!(trace.is_empty());
        assert!(matches!(
            sim.report(),
            Err(IsingError::NoSamplesRecorded(_))
        ));
    }

    #[test]
    fn test_restore_state() {
        let mut sim = Simulation::<SmallRng>::new(params()).unwrap();
        let up = SpinState::uniform(sim.lattice(), true);
        sim.restore_state(up.clone()).unwrap();
        assert_eq!(sim.state(), &up);

        let small = SimulationParameters::nearest_neighbor(vec![2], 1.0, 1.0);
        let other = Simulation::<SmallRng>::new(small).unwrap();
        assert_eq!(
            sim.restore_state(other.state().clone()),
            Err(IsingError::StateSizeMismatch {
                expected: 16,
                found: 2
            })
        );
    }

    #[test]
    fn test_bad_parameters() {
        let params = SimulationParameters {
            temperature: -1.0,
            ..params()
        };
        assert_eq!(
            Simulation::<SmallRng>::new(params).err(),
            Some(IsingError::InvalidTemperature(-1.0))
        );
    }
}
