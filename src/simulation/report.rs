use crate::errors::Result;
use crate::estimators::{EstimatorAccumulators, Observable};
use std::fmt::{Display, Formatter};

/// Per-site summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderParameters {
    /// Mean energy per site.
    pub average_energy: f64,
    /// Mean magnetization per site.
    pub ferromagnetic: f64,
    /// Mean even minus odd sublattice magnetization, per site.
    pub antiferromagnetic: f64,
    /// `Var(E) / (T^2 N)`.
    pub specific_heat: f64,
    /// `Var(M) / (T N)`.
    pub susceptibility: f64,
}

impl OrderParameters {
    /// Normalize the accumulated moments by the number of sites.
    ///
    /// # Errors
    /// [`crate::errors::IsingError::NoSamplesRecorded`] if no production sweep was recorded.
    pub fn from_estimators(
        estimators: &EstimatorAccumulators,
        number_sites: usize,
        temperature: f64,
    ) -> Result<Self> {
        let n = number_sites as f64;
        let even = estimators.moment(Observable::MagnetizationEvenSites)?;
        let odd = estimators.moment(Observable::MagnetizationOddSites)?;
        Ok(Self {
            average_energy: estimators.moment(Observable::Energy)? / n,
            ferromagnetic: estimators.moment(Observable::Magnetization)? / n,
            antiferromagnetic: (even - odd) / n,
            specific_heat: estimators.variance(Observable::Energy)?
                / (temperature * temperature * n),
            susceptibility: estimators.variance(Observable::Magnetization)? / (temperature * n),
        })
    }
}

impl Display for OrderParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Average energy = {}", self.average_energy)?;
        writeln!(f, "FM order parameter = {}", self.ferromagnetic)?;
        write!(f, "AFM order parameter = {}", self.antiferromagnetic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IsingError;
    use crate::observables::Measurement;

    #[test]
    fn test_from_estimators() {
        let mut est = EstimatorAccumulators::new();
        for (e, m) in [(-16.0, 4.0), (-8.0, 2.0)] {
            est.record_measurement(&Measurement {
                energy: e,
                magnetization: m,
                magnetization_even_sites: m,
                magnetization_odd_sites: 0.0,
            });
        }
        let order = OrderParameters::from_estimators(&est, 4, 2.0).unwrap();
        assert_eq!(order.average_energy, -3.0);
        assert_eq!(order.ferromagnetic, 0.75);
        assert_eq!(order.antiferromagnetic, 0.75);
        // Var(E) = 16, Var(M) = 1
        assert_eq!(order.specific_heat, 1.0);
        assert_eq!(order.susceptibility, 0.125);
        assert_eq!(
            order.to_string(),
            "Average energy = -3\nFM order parameter = 0.75\nAFM order parameter = 0.75"
        );
    }

    #[test]
    fn test_empty_report_fails() {
        let est = EstimatorAccumulators::new();
        assert!(matches!(
            OrderParameters::from_estimators(&est, 16, 1.0),
            Err(IsingError::NoSamplesRecorded(_))
        ));
    }
}
