use crate::estimators::Observable;
use crate::simulation::SimulationTrace;
use rayon::prelude::*;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Calculate autocorrelations of traced observables.
pub trait TraceAutoCorrelations {
    /// Time series of one observable.
    fn observable_series(&self, observable: Observable) -> Vec<f64>;

    /// Normalized periodic autocorrelation of an observable, `rho[0] == 1`.
    ///
    /// `None` for fewer than two samples or a series which never changes.
    fn calculate_autocorrelation(
        &self,
        observable: Observable,
        use_fft: Option<bool>,
    ) -> Option<Vec<f64>> {
        let samples = self.observable_series(observable);
        if use_fft.unwrap_or(true) {
            fft_autocorrelation(&samples)
        } else {
            naive_autocorrelation(&samples)
        }
    }

    /// Integrated autocorrelation time of an observable, in sweeps.
    fn integrated_autocorrelation_time(
        &self,
        observable: Observable,
        use_fft: Option<bool>,
    ) -> Option<f64> {
        self.calculate_autocorrelation(observable, use_fft)
            .map(|rho| integrated_time(&rho))
    }
}

impl TraceAutoCorrelations for SimulationTrace {
    fn observable_series(&self, observable: Observable) -> Vec<f64> {
        self.series(observable)
    }
}

fn centered(samples: &[f64]) -> Option<(Vec<f64>, f64)> {
    if samples.len() < 2 {
        return None;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let centered = samples.iter().map(|x| x - mean).collect::<Vec<_>>();
    let norm = centered.iter().map(|x| x * x).sum::<f64>();
    (norm > 0.0).then(|| (centered, norm))
}

/// Periodic autocorrelation through an FFT round trip.
pub fn fft_autocorrelation(samples: &[f64]) -> Option<Vec<f64>> {
    let (centered, _) = centered(samples)?;
    let tmax = centered.len();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(tmax);
    let ifft = planner.plan_fft_inverse(tmax);

    let mut buffer = centered
        .into_iter()
        .map(|x| Complex::new(x, 0.0))
        .collect::<Vec<_>>();
    fft.process(&mut buffer);
    buffer
        .iter_mut()
        .for_each(|c| *c = Complex::new(c.norm_sqr(), 0.0));
    ifft.process(&mut buffer);

    // rustfft does not normalize, lag zero carries the same scale as every other lag.
    let zero = buffer[0].re;
    Some(buffer.into_iter().map(|c| c.re / zero).collect())
}

/// Periodic autocorrelation by direct summation, parallel over lags.
pub fn naive_autocorrelation(samples: &[f64]) -> Option<Vec<f64>> {
    let (centered, norm) = centered(samples)?;
    let tmax = centered.len();
    Some(
        (0..tmax)
            .into_par_iter()
            .map(|tau| {
                (0..tmax)
                    .map(|t| centered[t] * centered[(t + tau) % tmax])
                    .sum::<f64>()
                    / norm
            })
            .collect(),
    )
}

/// Sum of the autocorrelation with a self-consistent window, cut at `5 tau`.
pub fn integrated_time(rho: &[f64]) -> f64 {
    let mut tau = 0.5;
    // Past half the series the periodic correlation mirrors itself.
    for (w, r) in rho.iter().enumerate().take(rho.len() / 2 + 1).skip(1) {
        tau += r;
        if w as f64 >= 5.0 * tau {
            break;
        }
    }
    tau
}
